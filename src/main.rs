use actix_web::HttpServer;
use actix_web::web::Data;

mod api;
mod app;
mod auth;
mod config;
mod cors;
mod db;
mod docs;
mod error;
mod model;
mod routes;
#[cfg(test)]
mod test_support;

use auth::token::Sessions;
use config::Config;
use db::init_db;

use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::new(config.log_filter()))
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        debug = config.debug,
        behind_proxy = config.behind_proxy,
        "Server starting..."
    );

    // Shared by every worker
    let store = Data::new(init_db());
    let sessions = Data::new(Sessions::new());
    let config_data = Data::new(config.clone());

    let server_addr = config.server_addr();
    info!(host = %server_addr.0, port = server_addr.1, "Binding");

    HttpServer::new(move || {
        app::build_app(store.clone(), sessions.clone(), config_data.clone())
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
