use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod error;
mod model;
mod provider;
mod ranking;
mod server;

use config::Config;
use provider::{EspnProvider, EventProvider, LeagueId};
use ranking::ScoringPolicy;
use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let provider: Arc<dyn EventProvider> = Arc::new(EspnProvider::new(
        &config.espn_api_url,
        Duration::from_secs(config.upstream_timeout_secs),
    )?);
    info!(
        "Event provider: {} ({} leagues: {:?})",
        provider.name(),
        LeagueId::all().len(),
        LeagueId::all()
            .iter()
            .map(|l| l.league)
            .collect::<Vec<_>>()
    );

    let state = AppState {
        provider,
        policy: ScoringPolicy::default(),
        fetch_timeout: Duration::from_secs(config.league_fetch_timeout_secs),
    };

    let app = server::router(state);
    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
