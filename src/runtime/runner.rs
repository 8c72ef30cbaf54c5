use tokio::{select, signal::unix::SignalKind};
use tokio_util::sync::CancellationToken;

use super::{RuntimeDeps, shutdown};
use crate::periodic_tasks;

pub(crate) async fn run(deps: RuntimeDeps) {
    let RuntimeDeps {
        periodic_tasks_deps,
        http_router,
        queue,
        finality_watcher,
    } = deps;

    // Create HTTP shutdown channel (oneshot for single signal)
    let (http_shutdown_tx, http_shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let periodic_shutdown = CancellationToken::new();
    let periodic_handle = tokio::task::spawn(periodic_tasks::run(
        periodic_tasks_deps,
        periodic_shutdown.clone(),
    ));

    let handle_http_events_task = tokio::task::spawn(async move {
        if let Some(router) = http_router {
            router
                .listen_and_handle_http_requests(http_shutdown_rx)
                .await;
        } else {
            // HTTP intake disabled - wait for shutdown signal
            let _ = http_shutdown_rx.await;
        }
    });

    // Wait for shutdown signal (SIGINT or SIGTERM)
    let ctrl_c = tokio::signal::ctrl_c();
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())
        .expect("Failed to install SIGTERM handler");

    select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, initiating shutdown..."),
        _ = sigterm.recv() => tracing::info!("Received SIGTERM, initiating shutdown..."),
    }

    shutdown::graceful_shutdown(shutdown::ShutdownContext {
        periodic_shutdown,
        periodic_handle,
        http_shutdown_tx,
        handle_http_events_task,
        queue,
        finality_watcher,
    })
    .await;
}
