use tracing::info;

use crate::config::AppConfig;

pub mod api;
pub mod routes;
pub mod state;

pub use state::AppState;

pub async fn run_server(config: &AppConfig) -> std::io::Result<()> {
    let state = AppState::from_config(config).map_err(std::io::Error::other)?;
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(
        bind = %config.bind_addr,
        worldstate = %config.worldstate_url,
        market = %config.market_url,
        "tennohub server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
