mod runner;
mod shutdown;

use std::sync::Arc;

use crate::{
    controllers::http_api::HttpApiRouter, periodic_tasks::PeriodicTasksDeps, queue::QueueHandle,
    services::FinalityWatcher,
};

pub(crate) struct RuntimeDeps {
    pub(crate) periodic_tasks_deps: PeriodicTasksDeps,
    pub(crate) http_router: Option<HttpApiRouter>,
    pub(crate) queue: QueueHandle,
    pub(crate) finality_watcher: Arc<FinalityWatcher>,
}

pub(crate) use runner::run;
