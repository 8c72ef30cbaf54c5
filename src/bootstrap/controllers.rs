use crate::{
    bootstrap::CoreBootstrap,
    controllers::http_api::{HttpApiDeps, HttpApiRouter},
};

pub(crate) fn build_http_router(core: &CoreBootstrap) -> Option<HttpApiRouter> {
    let http_api_config = &core.config.http_api;

    if http_api_config.enabled {
        tracing::info!("HTTP API enabled on port {}", http_api_config.port);
        Some(HttpApiRouter::new(
            http_api_config,
            HttpApiDeps {
                queue: core.queue.clone(),
            },
        ))
    } else {
        tracing::info!("HTTP API disabled");
        None
    }
}
