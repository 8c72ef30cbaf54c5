use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use super::{
    dto::{cluster::ClusterEnqueueRequest, enqueue::EnqueueResponse},
    validation_error_response,
};
use crate::{
    intake::{ClusterReport, DEFAULT_CHAIN},
    queue::QueueHandle,
};

pub(crate) struct ClusterEnqueueHttpApiController;

const SOURCE: &str = "cluster_report";

impl ClusterEnqueueHttpApiController {
    pub(crate) async fn handle_request(
        State(queue): State<QueueHandle>,
        Json(req): Json<ClusterEnqueueRequest>,
    ) -> impl IntoResponse {
        if let Err(e) = req.validate() {
            return validation_error_response(&e);
        }

        let chain = req.chain.clone().unwrap_or_else(|| DEFAULT_CHAIN.to_string());
        let report = ClusterReport::from(req);
        let cluster_id = report.cluster_id.clone();

        let contents = match report.into_contents(&chain) {
            Ok(contents) => contents,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, format!("Validation error: {e}"))
                    .into_response();
            }
        };

        let queued = contents.len();
        let depth = queue.enqueue_all(contents, SOURCE).await;
        tracing::info!(
            cluster_id = cluster_id.as_deref().unwrap_or("-"),
            chain = %chain,
            queued,
            stage_a = depth,
            "Cluster report accepted for publishing"
        );

        (StatusCode::ACCEPTED, Json(EnqueueResponse::new(queued, depth))).into_response()
    }
}
