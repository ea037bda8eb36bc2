use thiserror::Error;

use crate::provider::ProviderError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Insufficient privilege")]
    Forbidden,
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Activity of two neighbouring session events must differ")]
    InvalidTransition,
    #[error("Session is not started yet")]
    NoOpenSession,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

pub type CoreResult<T> = Result<T, CoreError>;
