use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError},
    http::StatusCode,
};
use derive_more::Display;
use serde::Serialize;
use strum::Display as CodeDisplay;
use tracing::debug;

/// Machine-readable `code` carried by every failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, CodeDisplay)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    AuthFailed,
    Unauthorized,
    Forbidden,
    InsufficientPrivileges,
    RecordNotFound,
    NotFound,
    RateLimited,
    InternalError,
}

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Validation(String),
    #[display(fmt = "Invalid email or password")]
    AuthFailed,
    #[display(fmt = "Invalid or missing token")]
    Unauthorized,
    #[display(fmt = "{}", _0)]
    Forbidden(String),
    #[display(fmt = "{}", _0)]
    InsufficientPrivileges(String),
    #[display(fmt = "Attendance record not found")]
    RecordNotFound,
    #[display(fmt = "Resource not found")]
    NotFound,
    #[display(fmt = "Too many requests, retry in {}s", _0)]
    RateLimited(u64),
    /// Details stay in the logs.
    #[display(fmt = "Internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        ApiError::Forbidden(msg.into())
    }

    pub fn insufficient_privileges(msg: impl Into<String>) -> Self {
        ApiError::InsufficientPrivileges(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Validation(_) => ErrorCode::ValidationError,
            ApiError::AuthFailed => ErrorCode::AuthFailed,
            ApiError::Unauthorized => ErrorCode::Unauthorized,
            ApiError::Forbidden(_) => ErrorCode::Forbidden,
            ApiError::InsufficientPrivileges(_) => ErrorCode::InsufficientPrivileges,
            ApiError::RecordNotFound => ErrorCode::RecordNotFound,
            ApiError::NotFound => ErrorCode::NotFound,
            ApiError::RateLimited(_) => ErrorCode::RateLimited,
            ApiError::Internal => ErrorCode::InternalError,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    code: ErrorCode,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthFailed | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) | ApiError::InsufficientPrivileges(_) => StatusCode::FORBIDDEN,
            ApiError::RecordNotFound | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.to_string(),
            code: self.code(),
        })
    }
}

/// Any body that cannot be read as the expected JSON object is a validation failure.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = %req.path(), "Rejected request body");
    ApiError::validation("Request body is required").into()
}

/// A non-numeric record id cannot name any record.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = %req.path(), "Rejected path parameter");
    ApiError::RecordNotFound.into()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}
