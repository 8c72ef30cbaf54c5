#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    dkg_publisher::run().await;
}
