use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{entity} is missing required field '{field}'")]
    MissingField { entity: String, field: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Local storage error: {0}")]
    LocalStorage(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

impl From<BridgeError> for SyncError {
    fn from(err: BridgeError) -> Self {
        SyncError::Provider(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
