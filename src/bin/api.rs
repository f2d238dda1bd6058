use anyhow::Result;
use searchrelay::{
    api,
    app_state::AppState,
    config::Config,
    fetcher::HttpTransport,
    relay::RelayService,
    resolver::Resolver,
    search::BraveSearchProvider,
    telemetry,
};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_format());

    let transport = HttpTransport::new(config.fetch_config())?;
    let resolver = Resolver::new(Arc::new(transport), config.resolve_config());
    let provider = BraveSearchProvider::with_endpoint(
        config.brave_api_key(),
        config.search_endpoint(),
        config.fetch_timeout(),
    )?;
    if config.brave_api_key().is_empty() {
        warn!("BRAVE_API_KEY not set; /v1/search will answer 503");
    }

    let relay = RelayService::new(Arc::new(provider), resolver, config.relay_config());
    let app = api::router(AppState::new(relay));

    let shutdown_token = CancellationToken::new();
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Received shutdown signal, initiating graceful shutdown...");
        signal_token.cancel();
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "searchrelay api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
