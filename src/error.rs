use dkg_dataset::DatasetError;
use thiserror::Error;

use crate::services::{PublishError, RegistrationError};

/// Top-level pipeline error composing the per-stage errors.
#[derive(Error, Debug)]
pub(crate) enum PipelineError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),
}

impl PipelineError {
    /// Short label used in logs and metrics.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Dataset(DatasetError::Validation(_)) => "validation",
            Self::Dataset(DatasetError::SizeLimitExceeded { .. }) => "size_limit_exceeded",
            Self::Publish(PublishError::Transport(_)) => "transport",
            Self::Publish(PublishError::OperationTimeout { .. }) => "operation_timeout",
            Self::Publish(PublishError::Protocol { .. }) => "protocol",
            Self::Publish(PublishError::RootMismatch { .. }) => "root_mismatch",
            Self::Publish(PublishError::Blockchain(_)) => "pricing",
            Self::Registration(_) => "registration",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use uuid::Uuid;

    use super::*;

    #[test]
    fn kinds_follow_the_error_taxonomy() {
        let validation = PipelineError::from(DatasetError::Validation("empty".to_string()));
        assert_eq!(validation.kind(), "validation");

        let too_large = PipelineError::from(DatasetError::SizeLimitExceeded {
            size: 64,
            limit: 32,
        });
        assert_eq!(too_large.kind(), "size_limit_exceeded");

        let timeout = PipelineError::from(PublishError::OperationTimeout {
            operation_id: Uuid::nil(),
            attempts: 300,
        });
        assert_eq!(timeout.kind(), "operation_timeout");
        assert!(timeout.to_string().contains("300 polls"));
    }
}
