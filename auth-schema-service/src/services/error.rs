use service_core::error::AppError;
use thiserror::Error;

use crate::services::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Schema store error: {0}")]
    Persistence(String),

    #[error("Token expiration must be between 1 and 8760 hours (got {0})")]
    InvalidTokenExpiration(u32),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => AppError::Unprocessable(e.to_string()),
            ServiceError::Persistence(e) => AppError::BadGateway(e),
            ServiceError::InvalidTokenExpiration(hours) => AppError::BadRequest(anyhow::anyhow!(
                "Token expiration must be between 1 and 8760 hours (got {})",
                hours
            )),
        }
    }
}
