use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Invalid content: {0}")]
    Validation(String),

    #[error("Dataset size {size} bytes exceeds the limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },
}

impl DatasetError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
