//! Unified API response envelope for the HTTP gateway.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::FulfilmentError;

/// Unified API response wrapper: `code` 0 means success, `data` is present
/// only on success.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

#[inline]
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Error codes used across the gateway's responses.
pub mod error_codes {
    pub const MISSING_AUTH: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const INVALID_PARAMETER: i32 = 1100;
    pub const ORDER_NOT_FOUND: i32 = 1200;
    pub const INVALID_STATE: i32 = 1201;
    pub const STOCK_UNAVAILABLE: i32 = 1202;
    pub const TRANSIENT: i32 = 1300;
    pub const INTERNAL_ERROR: i32 = 1500;
}

/// A unified error type with automatic `IntoResponse`, used as the error
/// half of every gateway handler's `Result`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR, msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ApiResponse::<()>::error(self.code, self.message));
        (self.status, body).into_response()
    }
}

impl From<FulfilmentError> for ApiError {
    fn from(err: FulfilmentError) -> Self {
        let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &err {
            FulfilmentError::Validation(_) => error_codes::INVALID_PARAMETER,
            FulfilmentError::Unauthenticated(_) => error_codes::AUTH_FAILED,
            FulfilmentError::InvalidState(_) => error_codes::INVALID_STATE,
            FulfilmentError::StockUnavailable(_) => error_codes::STOCK_UNAVAILABLE,
            FulfilmentError::NoDriverAvailable(_) => 0,
            FulfilmentError::Transient(_) => error_codes::TRANSIENT,
            FulfilmentError::Internal(_) => error_codes::INTERNAL_ERROR,
        };
        Self::new(status, code, err.to_string())
    }
}
