use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::service::{ConnectionError, LifecycleError, ReadModelError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    WalletUnavailable(String),

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("Read model error: {0}")]
    ReadModelError(#[from] ReadModelError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
    details: Option<String>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::WalletUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::WalletError(_) | ApiError::ReadModelError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ApiError::ReadModelError(_) => "Failed to load dashboard data".to_string(),
            ApiError::WalletError(_) => "Wallet error".to_string(),
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: message,
            code: status.as_u16(),
            details: Some(self.to_string()),
        };

        HttpResponse::build(status).json(error_response)
    }
}

impl From<ConnectionError> for ApiError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::NotConnected(_) => ApiError::Unauthorized(err.to_string()),
            ConnectionError::WalletNotInstalled => ApiError::WalletUnavailable(err.to_string()),
            ConnectionError::UserRejected => ApiError::Forbidden(err.to_string()),
            ConnectionError::RequestPending => ApiError::Conflict(err.to_string()),
            ConnectionError::Failed(_) => ApiError::WalletError(err.to_string()),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::AlreadyInFlight(_) => ApiError::Conflict(err.to_string()),
            LifecycleError::InvalidAmount(_) => ApiError::BadRequest(err.to_string()),
            LifecycleError::WalletNotInstalled(_) => ApiError::WalletUnavailable(err.to_string()),
            LifecycleError::Reverted(_) | LifecycleError::Wallet(_) => {
                ApiError::WalletError(err.to_string())
            }
        }
    }
}
