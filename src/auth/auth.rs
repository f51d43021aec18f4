use crate::{auth::token::Sessions, error::ApiError, model::role::Role};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web::Data};
use futures::future::{Ready, ready};
use tracing::{debug, error};

/// Caller resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let sessions = match req.app_data::<Data<Sessions>>() {
            Some(s) => s,
            None => {
                error!("Session store missing from app data");
                return ready(Err(ApiError::Internal));
            }
        };

        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let profile = match sessions.resolve(header_value) {
            Some(p) => p,
            None => {
                debug!(path = %req.path(), "Invalid or missing token");
                return ready(Err(ApiError::Unauthorized));
            }
        };

        ready(Ok(AuthUser {
            user_id: profile.id,
            username: profile.username,
            role: profile.role,
        }))
    }
}

impl AuthUser {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    pub fn require_manager(&self, message: &str) -> Result<(), ApiError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(ApiError::insufficient_privileges(message))
        }
    }
}
