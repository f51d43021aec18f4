use crate::{app::build_app, auth::token::Sessions, config::Config, db::init_db};
use actix_web::{
    App, Error,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    test::TestRequest,
    web::Data,
};

/// Fresh app over freshly seeded tables.
pub fn app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    app_with(Config::default())
}

pub fn app_with(
    config: Config,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    build_app(
        Data::new(init_db()),
        Data::new(Sessions::new()),
        Data::new(config),
    )
}

/// The rate limiters key on the peer address, which test requests lack by default.
pub fn request(req: TestRequest) -> TestRequest {
    req.peer_addr("127.0.0.1:40000".parse().unwrap())
}

/// Logs in through the HTTP API and evaluates to the bearer token.
macro_rules! login {
    ($app:expr, $credentials:expr) => {{
        let (email, password) = $credentials;
        let req = $crate::test_support::request(actix_web::test::TestRequest::post())
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({"email": email, "password": password}))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json($app, req).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }};
}

pub(crate) use login;
