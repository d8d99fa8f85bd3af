//! Core-module error taxonomy, propagated up to the gateway boundary.

use thiserror::Error;

/// The seven error categories surfaced to callers of a core boundary.
#[derive(Debug, Error)]
pub enum FulfilmentError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("invalid state transition: {0}")]
    InvalidState(String),

    #[error("stock unavailable: {0}")]
    StockUnavailable(String),

    #[error("no driver available: {0}")]
    NoDriverAvailable(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl FulfilmentError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::InvalidState(_) => 400,
            Self::StockUnavailable(_) => 400,
            Self::NoDriverAvailable(_) => 200,
            Self::Transient(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::InvalidState(_) => "invalid_state",
            Self::StockUnavailable(_) => "stock_unavailable",
            Self::NoDriverAvailable(_) => "no_driver_available",
            Self::Transient(_) => "transient",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<crate::contracts::RpcError> for FulfilmentError {
    fn from(err: crate::contracts::RpcError) -> Self {
        use crate::contracts::Status;
        match err.status {
            Status::NotFound => Self::Validation(err.message),
            Status::InvalidArgument => Self::Validation(err.message),
            Status::FailedPrecondition => Self::InvalidState(err.message),
            Status::Unauthenticated => Self::Unauthenticated(err.message),
            Status::DeadlineExceeded => Self::Transient(err.message),
            Status::Internal => Self::Internal(err.message),
        }
    }
}
