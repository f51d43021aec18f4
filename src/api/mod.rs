use crate::error::ApiError;
use actix_web::{HttpResponse, web};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

pub mod attendance;

/// Success envelope shared by every endpoint; failures go through `ApiError`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data,
            message: None,
        })
    }

    pub fn ok_with_message(data: T, message: &'static str) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data,
            message: Some(message),
        })
    }
}

/// Reads a JSON object body into `T`. An empty object counts as no body.
pub fn require_body<T: DeserializeOwned>(
    payload: web::Json<Map<String, Value>>,
) -> Result<T, ApiError> {
    let fields = payload.into_inner();
    if fields.is_empty() {
        return Err(ApiError::validation("Request body is required"));
    }

    serde_json::from_value(Value::Object(fields)).map_err(|err| {
        debug!(error = %err, "Request body has mistyped fields");
        ApiError::validation("Request body is required")
    })
}
