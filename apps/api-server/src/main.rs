//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use quill_infra::DataStore;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let store = DataStore::from_config(config.database.as_ref())
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    // Requests retry the connection, so a store that is down at boot is not fatal.
    if let Err(e) = store.ensure_connected().await {
        tracing::error!(
            backend = store.backend_name(),
            error = %e,
            "Database unavailable at startup"
        );
    }

    let state = AppState::new(store.clone(), config.max_page_size);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(middleware::error::json_config())
            .app_data(middleware::error::query_config())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    store.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
