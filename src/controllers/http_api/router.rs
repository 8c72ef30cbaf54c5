use std::net::{Ipv4Addr, SocketAddr};

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::{
    HttpApiDeps,
    v1::{
        cluster_enqueue::ClusterEnqueueHttpApiController, enqueue::EnqueueHttpApiController,
        info::InfoHttpApiController, queue_status::QueueStatusHttpApiController,
    },
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HttpApiConfig {
    /// Whether the intake API is served at all.
    pub enabled: bool,
    pub port: u16,
}

pub(crate) struct HttpApiRouter {
    config: HttpApiConfig,
    router: Router,
}

/// Maximum request body size in bytes (10 MB)
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

impl HttpApiRouter {
    pub(crate) fn new(config: &HttpApiConfig, deps: HttpApiDeps) -> Self {
        HttpApiRouter {
            config: config.to_owned(),
            router: routes(deps),
        }
    }

    pub(crate) async fn listen_and_handle_http_requests(&self, shutdown_rx: oneshot::Receiver<()>) {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.config.port));

        let listener = TcpListener::bind(addr)
            .await
            .expect("Failed to bind HTTP listener");
        tracing::info!(%addr, "HTTP intake listening");

        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .expect("Server failed");
    }
}

// Layers run outermost first: CORS, tracing, body limit.
fn routes(deps: HttpApiDeps) -> Router {
    Router::new()
        .route("/v1/info", get(InfoHttpApiController::handle_request))
        .route("/v1/queue", get(QueueStatusHttpApiController::handle_request))
        .route("/v1/enqueue", post(EnqueueHttpApiController::handle_request))
        .route(
            "/v1/enqueue/clusters",
            post(ClusterEnqueueHttpApiController::handle_request),
        )
        .with_state(deps)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
