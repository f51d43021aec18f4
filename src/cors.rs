use crate::config::Config;
use crate::error::ApiError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        Method,
        header::{self, HeaderMap, HeaderValue},
    },
    web::Data,
};
use tracing::error;

const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Adds CORS headers to browser requests (those carrying `Origin`) and
/// answers every preflight `OPTIONS` without routing it.
pub async fn cors_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = match req.app_data::<Data<Config>>() {
        Some(c) => c.clone(),
        None => {
            error!("App config missing");
            return Err(ApiError::Internal.into());
        }
    };

    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    if req.method() == Method::OPTIONS {
        let mut resp = HttpResponse::Ok().finish();
        if let Some(origin) = &origin {
            apply_cors_headers(resp.headers_mut(), origin, &config);
        }
        return Ok(req.into_response(resp.map_into_boxed_body()));
    }

    let mut res = next.call(req).await?;

    if let Some(origin) = &origin {
        apply_cors_headers(res.headers_mut(), origin, &config);
    }

    Ok(res)
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: &str, config: &Config) {
    if config.debug {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    } else if config.is_origin_allowed(origin) {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn debug_mode_allows_any_origin() {
        let app = test::init_service(test_support::app()).await;

        let req = test_support::request(test::TestRequest::get())
            .uri("/api/v1/attendance/my")
            .insert_header((header::ORIGIN, "https://anywhere.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        // error responses carry the headers too
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let headers = resp.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn production_echoes_only_listed_origins() {
        let config = Config {
            debug: false,
            ..Config::default()
        };
        let app = test::init_service(test_support::app_with(config)).await;

        let req = test_support::request(test::TestRequest::get())
            .uri("/api/v1/attendance/my")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );

        let req = test_support::request(test::TestRequest::get())
            .uri("/api/v1/attendance/my")
            .insert_header((header::ORIGIN, "https://evil.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            ALLOW_METHODS
        );
    }

    #[actix_web::test]
    async fn preflight_is_answered_without_routing() {
        let app = test::init_service(test_support::app()).await;

        let req = test_support::request(test::TestRequest::default())
            .method(Method::OPTIONS)
            .uri("/api/v1/attendance/5/verify")
            .insert_header((header::ORIGIN, "http://localhost:4200"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            ALLOW_HEADERS
        );
    }

    #[actix_web::test]
    async fn requests_without_origin_get_no_cors_headers() {
        let app = test::init_service(test_support::app()).await;

        let req = test_support::request(test::TestRequest::get())
            .uri("/api/v1/attendance/my")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).is_none());
    }
}
