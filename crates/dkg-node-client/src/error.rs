use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum NodeClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Node returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid node endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Operation {operation_id} did not finish after {attempts} polls")]
    OperationTimeout { operation_id: Uuid, attempts: u32 },
}

impl NodeClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::OperationTimeout { .. })
    }
}
