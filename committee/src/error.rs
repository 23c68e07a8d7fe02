use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommitteeError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("entropy source failed: {0}")]
    Entropy(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CommitteeResult<T> = Result<T, CommitteeError>;
