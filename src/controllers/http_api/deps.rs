use axum::extract::FromRef;

use crate::queue::QueueHandle;

#[derive(Clone)]
pub(crate) struct HttpApiDeps {
    pub(crate) queue: QueueHandle,
}

impl FromRef<HttpApiDeps> for QueueHandle {
    fn from_ref(input: &HttpApiDeps) -> Self {
        input.queue.clone()
    }
}
