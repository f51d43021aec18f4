use crate::{
    auth::token::Sessions,
    config::Config,
    cors::cors_middleware,
    db::Store,
    docs::ApiDoc,
    error::{json_error_handler, not_found, path_error_handler},
    routes,
};
use actix_web::{
    App, Error, Responder,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    get,
    middleware::{Logger, NormalizePath, from_fn},
    web::{self, Data},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Access log line keyed on the forwarded client address.
const PROXY_LOG_FORMAT: &str = r#"%{r}a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance API"
}

/// Assembles the application around already-built shared state.
///
/// `store` and `sessions` must be created once and cloned into every worker,
/// otherwise each worker would see its own tables.
pub fn build_app(
    store: Data<Store>,
    sessions: Data<Sessions>,
    config: Data<Config>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let logger = if config.behind_proxy {
        Logger::new(PROXY_LOG_FORMAT)
    } else {
        Logger::default()
    };
    let route_config = config.get_ref().clone();

    App::new()
        .app_data(store)
        .app_data(sessions)
        .app_data(config)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(from_fn(cors_middleware))
        .wrap(NormalizePath::trim())
        .wrap(logger)
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard so JS/CSS assets resolve
                .url("/api-doc/openapi.json", ApiDoc::openapi()),
        )
        .service(index)
        .configure(|cfg| routes::configure(cfg, &route_config))
        .default_service(web::to(not_found))
}
