pub(crate) mod cluster_enqueue;
pub(crate) mod dto;
pub(crate) mod enqueue;
pub(crate) mod info;
pub(crate) mod queue_status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

/// Flattens field errors into a single `400` body.
pub(super) fn validation_error_response(errors: &ValidationErrors) -> Response {
    let error_messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect();

    (
        StatusCode::BAD_REQUEST,
        format!("Validation error: {}", error_messages.join("; ")),
    )
        .into_response()
}
