mod app_config;
pub mod routes;
mod server_error;
mod startup;
mod state;

pub use app_config::{AppConfiguration, ConfigError};
pub use server_error::ServerError;
pub use startup::{initialize, StartupError};
pub use state::{AppPhase, ReadyContext, SharedState};

/// binds the listener, launches the warm-up task and serves until shutdown.
/// the server accepts connections immediately; routing-dependent endpoints
/// answer 503 until the warm-up publishes the ready context.
pub async fn serve(config: AppConfiguration) -> Result<(), StartupError> {
    let state = SharedState::not_ready();
    let address = format!("{}:{}", config.server.host, config.server.port);
    startup::spawn_warmup(state.clone(), config);
    let listener = tokio::net::TcpListener::bind(address.as_str())
        .await
        .map_err(|e| StartupError::BindError(address.clone(), e))?;
    log::info!("listening on {address}");
    axum::serve(listener, routes::router(state))
        .await
        .map_err(|e| StartupError::ServeError(e.to_string()))?;
    Ok(())
}
