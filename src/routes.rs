use crate::{
    api::attendance,
    auth::handlers,
    config::Config,
    error::ApiError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, KeyExtractor, PeerIpKeyExtractor, SimpleKeyExtractionError,
    governor::{
        NotUntil,
        clock::{Clock, DefaultClock, QuantaInstant},
        middleware::NoOpMiddleware,
    },
};
use actix_web::{
    HttpResponse, HttpResponseBuilder, ResponseError,
    dev::ServiceRequest,
    http::header::{self, HeaderName, HeaderValue},
    web,
};
use std::net::IpAddr;
use tracing::warn;

/// Keys limits on the peer IP and answers 429s with the error envelope.
#[derive(Debug, Clone, Copy)]
pub struct PeerIp;

impl KeyExtractor for PeerIp {
    type Key = IpAddr;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        PeerIpKeyExtractor.extract(req)
    }

    fn exceed_rate_limit_response(
        &self,
        negative: &NotUntil<QuantaInstant>,
        _response: HttpResponseBuilder,
    ) -> HttpResponse {
        let wait_secs = negative
            .wait_time_from(DefaultClock::default().now())
            .as_secs();
        warn!(retry_after = wait_secs, "Rate limit exceeded");

        let mut response = ApiError::RateLimited(wait_secs).error_response();
        let headers = response.headers_mut();
        headers.insert(header::RETRY_AFTER, HeaderValue::from(wait_secs));
        headers.insert(
            HeaderName::from_static("x-ratelimit-after"),
            HeaderValue::from(wait_secs),
        );
        response
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIp, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIp)
            .finish()
            .expect("period and burst size are non-zero");
        Governor::new(&cfg)
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            // Public routes
            .service(
                web::scope("/auth").service(
                    web::resource("/login")
                        .wrap(login_limiter)
                        .route(web::post().to(handlers::login)),
                ),
            )
            // Token-protected routes; callers are resolved by the AuthUser extractor
            .service(
                web::scope("/attendance")
                    .wrap(protected_limiter)
                    // /attendance/my
                    .service(web::resource("/my").route(web::get().to(attendance::my_attendance)))
                    // /attendance/staff
                    .service(
                        web::resource("/staff").route(web::get().to(attendance::staff_attendance)),
                    )
                    // /attendance/{id}/remark
                    .service(
                        web::resource("/{id}/remark")
                            .route(web::put().to(attendance::update_remark)),
                    )
                    // /attendance/{id}/verify
                    .service(
                        web::resource("/{id}/verify")
                            .route(web::put().to(attendance::verify_remark)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use actix_web::{
        http::StatusCode,
        test::{TestRequest, call_service, init_service, read_body_json},
    };
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn login_is_rate_limited_per_peer() {
        let config = Config {
            rate_login_per_min: 2,
            ..Config::default()
        };
        let app = init_service(test_support::app_with(config)).await;

        let mut statuses = Vec::new();
        let mut last = None;
        for _ in 0..3 {
            let req = test_support::request(TestRequest::post())
                .uri("/api/v1/auth/login")
                .set_json(json!({"email": "john@company.com", "password": "password123"}))
                .to_request();
            let resp = call_service(&app, req).await;
            statuses.push(resp.status());
            last = Some(resp);
        }

        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );

        let resp = last.unwrap();
        assert!(resp.headers().contains_key(header::RETRY_AFTER));
        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "RATE_LIMITED");
        assert!(body["error"].as_str().unwrap().starts_with("Too many requests"));
    }

    #[actix_web::test]
    async fn unknown_routes_get_the_error_envelope() {
        let app = init_service(test_support::app()).await;

        let req = test_support::request(TestRequest::get())
            .uri("/api/v1/payroll")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[actix_web::test]
    async fn trailing_slash_is_normalised() {
        let app = init_service(test_support::app()).await;

        let req = test_support::request(TestRequest::get())
            .uri("/api/v1/attendance/my/")
            .to_request();
        let resp = call_service(&app, req).await;
        // reached the handler, which wants a token
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
