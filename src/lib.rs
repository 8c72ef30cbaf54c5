mod bootstrap;
mod config;
mod controllers;
mod error;
mod intake;
mod logger;
mod periodic_tasks;
mod queue;
mod runtime;
mod services;

pub async fn run() {
    // Install rustls crypto provider before any TLS connections
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let core = bootstrap::build_core().await;

    display_dkg_publisher_ascii_art();
    tracing::info!(
        blockchain = %core.config.blockchain.blockchain_id(),
        stage_a_interval_ms = core.config.queue.stage_a_interval_ms,
        stage_b_interval_ms = core.config.queue.stage_b_interval_ms,
        failure_policy = ?core.config.queue.registration_failure_policy,
        "Publishing pipeline configured"
    );

    let periodic_tasks_deps = bootstrap::build_periodic_tasks_deps(&core);
    let http_router = bootstrap::build_http_router(&core);

    runtime::run(runtime::RuntimeDeps {
        periodic_tasks_deps,
        http_router,
        queue: core.queue.clone(),
        finality_watcher: core.finality_watcher.clone(),
    })
    .await;
}

fn display_dkg_publisher_ascii_art() {
    tracing::info!("██████╗ ██╗  ██╗ ██████╗     ██████╗ ██╗   ██╗██████╗ ");
    tracing::info!("██╔══██╗██║ ██╔╝██╔════╝     ██╔══██╗██║   ██║██╔══██╗");
    tracing::info!("██║  ██║█████╔╝ ██║  ███╗    ██████╔╝██║   ██║██████╔╝");
    tracing::info!("██║  ██║██╔═██╗ ██║   ██║    ██╔═══╝ ██║   ██║██╔══██╗");
    tracing::info!("██████╔╝██║  ██╗╚██████╔╝    ██║     ╚██████╔╝██████╔╝");
    tracing::info!("╚═════╝ ╚═╝  ╚═╝ ╚═════╝     ╚═╝      ╚═════╝ ╚═════╝ ");

    tracing::info!("======================================================");
    tracing::info!(
        "             DKG Publisher v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("======================================================");
    let environment = config::current_env();
    tracing::info!("Publisher is running in {} environment", environment);
}
