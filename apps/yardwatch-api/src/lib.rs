pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use yardwatch_service::{FleetEngine, LiveFeedPoller, Providers};

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = yardwatch_cli::VERSION,
	rename_all = "kebab",
	styles = yardwatch_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = yardwatch_config::load(&args.config)?;

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let engine = Arc::new(FleetEngine::from_config(&config));
	let providers = Providers::http(&config.feed)?;
	let poller = LiveFeedPoller::new(
		engine.clone(),
		providers,
		Duration::from_millis(config.feed.poll_interval_ms),
	);
	let yard = *engine.yard();
	let state = AppState::new(engine, poller.stats());
	let app = routes::router(state);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(
		%http_addr,
		yard_lat = yard.center().lat,
		yard_lng = yard.center().lng,
		radius_km = yard.radius_km(),
		"HTTP server listening."
	);

	let handle = poller.start();
	let served = axum::serve(http_listener, app).with_graceful_shutdown(shutdown_signal()).await;

	handle.stop().await;

	Ok(served?)
}

fn init_tracing(config: &yardwatch_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %err, "Failed to listen for shutdown signal.");
		std::future::pending::<()>().await;
	}

	tracing::info!("Shutdown signal received.");
}
