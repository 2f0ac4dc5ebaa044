use axum::{Json, Router, extract::State, routing::get};
use beacon::constants::NODE_SYNCING_ROUTE;
use beacon::types::{SyncStatus, SyncStatusResponse};
use eyre::{Result, WrapErr};
use tracing::info;
use tracing::level_filters::LevelFilter;

/// Handler for the node syncing endpoint
async fn get_syncing_handler(State(is_syncing): State<bool>) -> Json<SyncStatusResponse> {
	info!("Reporting sync status, is_syncing = {}", is_syncing);

	Json(SyncStatusResponse {
		data: SyncStatus {
			head_slot: 1_000,
			sync_distance: if is_syncing { 64 } else { 0 },
			is_syncing,
			is_optimistic: false,
			el_offline: false,
		},
	})
}

#[tokio::main]
async fn main() -> Result<()> {
	// Read env vars
	let log_level = std::env::var("LOG_LEVEL").unwrap_or("info".to_string());
	let host = std::env::var("BEACON_HOST").wrap_err("BEACON_HOST environment variable not set")?;
	let port = std::env::var("BEACON_PORT").wrap_err("BEACON_PORT environment variable not set")?;
	let is_syncing = std::env::var("BEACON_SYNCING").map(|v| v == "true" || v == "1").unwrap_or(false);

	let level = common::logging::parse_log_level(&log_level).unwrap_or(LevelFilter::INFO);
	common::logging::setup_logging(false, level)?;

	let bind_addr = format!("{}:{}", host, port);

	info!("Mock Beacon Node Server");
	info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
	info!("Listening on: {}", bind_addr);
	info!("Syncing: {}", is_syncing);
	info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
	info!("Endpoint: GET /{}", NODE_SYNCING_ROUTE);

	let app = Router::new()
		.route(format!("/{}", NODE_SYNCING_ROUTE).as_str(), get(get_syncing_handler))
		.with_state(is_syncing);

	let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

	info!("Mock Beacon Node server ready");

	axum::serve(listener, app).await?;

	Ok(())
}
