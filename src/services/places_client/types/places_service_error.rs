use thiserror::Error;

use crate::utils::rest_caller::CallerError;

#[derive(Debug, Error)]
pub enum PlacesServiceError {
    #[error("entity required")]
    MissingEntity,
    #[error(transparent)]
    Caller(#[from] CallerError),
    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("fetch cancelled")]
    Cancelled,
}
