use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use dkg_dataset::Content;
use serde_json::Value;

use super::dto::enqueue::EnqueueResponse;
use crate::queue::QueueHandle;

pub(crate) struct EnqueueHttpApiController;

impl EnqueueHttpApiController {
    pub(crate) async fn handle_request(
        State(queue): State<QueueHandle>,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        let content = match Content::try_from(body) {
            Ok(content) => content,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("Validation error: {e}"))
                    .into_response();
            }
        };

        let depth = queue.enqueue(content).await;
        tracing::info!(stage_a = depth, "Content accepted for publishing");

        (StatusCode::ACCEPTED, Json(EnqueueResponse::new(1, depth))).into_response()
    }
}
