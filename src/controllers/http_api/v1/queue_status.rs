use axum::{Json, extract::State};

use crate::queue::{QueueDepths, QueueHandle};

pub(crate) struct QueueStatusHttpApiController;

impl QueueStatusHttpApiController {
    pub(crate) async fn handle_request(State(queue): State<QueueHandle>) -> Json<QueueDepths> {
        Json(queue.depths().await)
    }
}
