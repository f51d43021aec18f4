use crate::{
    api::{ApiResponse, require_body},
    auth::{password::verify_password, token::Sessions},
    db::Store,
    error::ApiError,
    model::user::UserProfile,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@company.com")]
    pub email: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "atk_4f1c2e9a0b7d4c3e8f6a5b4c3d2e1f00")]
    pub token: String,
    pub user: UserProfile,
}

/// Checks the credentials and opens a session for the matching user.
pub fn authenticate(
    store: &Store,
    sessions: &Sessions,
    email: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    let user = match store.find_user_by_email(email) {
        Some(u) => u,
        None => {
            info!("Invalid credentials: unknown email");
            return Err(ApiError::AuthFailed);
        }
    };

    if !verify_password(password, &user.password) {
        info!(user_id = user.id, "Invalid credentials: password mismatch");
        return Err(ApiError::AuthFailed);
    }

    let profile = UserProfile::from(&user);
    let token = sessions.issue(profile.clone());

    info!(
        user_id = user.id,
        role = %user.role,
        active_sessions = sessions.len(),
        "Login successful"
    );

    Ok(LoginResponse {
        token,
        user: profile,
    })
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body(
        content = LoginRequest,
        description = "Email and password",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Login successful", body = Object, example = json!({
            "success": true,
            "data": {
                "token": "atk_4f1c2e9a0b7d4c3e8f6a5b4c3d2e1f00",
                "user": {
                    "id": 2,
                    "username": "jane_smith",
                    "email": "jane@company.com",
                    "role": "employee",
                    "manager_id": 5
                }
            },
            "message": "Login successful"
        })),
        (status = 400, description = "Missing email or password", body = Object, example = json!({
            "success": false,
            "error": "Email and password are required",
            "code": "VALIDATION_ERROR"
        })),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "success": false,
            "error": "Invalid email or password",
            "code": "AUTH_FAILED"
        })),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(payload, store, sessions),
    fields(email = %payload.get("email").and_then(serde_json::Value::as_str).unwrap_or_default())
)]
pub async fn login(
    payload: web::Json<Map<String, Value>>,
    store: web::Data<Store>,
    sessions: web::Data<Sessions>,
) -> Result<HttpResponse, ApiError> {
    debug!("Login request received");

    let LoginRequest { email, password } = require_body(payload)?;

    let (email, password) = match (email, password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            info!("Validation failed: empty email or password");
            return Err(ApiError::validation("Email and password are required"));
        }
    };

    let response = authenticate(&store, &sessions, &email, &password)?;

    Ok(ApiResponse::ok_with_message(response, "Login successful"))
}
