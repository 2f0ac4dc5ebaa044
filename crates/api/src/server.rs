use std::sync::Arc;
use std::time::Duration;

use alloy::{primitives::B256, rpc::types::beacon::relay::ValidatorRegistration};
use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	routing::{get, post},
};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use beacon::beacon_client::{BeaconApiClient, HttpClient};
use common::network::Network;
use datastore::ProposerDatastore;
use signing::{
	domain::compute_builder_domain,
	signer::{RelaySigner, verify_signature},
	ssz::validator_registration_root,
};

use crate::metrics::{RELAY_REGISTRATIONS_TOTAL, encode_metrics, server_http_metrics};
use crate::routes;

/// Everything the relay service needs, collected by the startup sequence.
pub struct RelayApiOpts<H: HttpClient> {
	pub listen_addr: String,
	pub beacon_client: BeaconApiClient<H>,
	pub datastore: ProposerDatastore,
	pub network: Network,
	pub pprof_api: bool,
	pub get_header_wait_time: Duration,
	pub signer: RelaySigner,
}

/// Shared by request handlers.
pub struct RelayState {
	pub datastore: ProposerDatastore,
	pub builder_signing_domain: B256,
	pub get_header_wait_time: Duration,
	pub signer: RelaySigner,
}

/// The relay HTTP service.
pub struct RelayApi<H: HttpClient> {
	listen_addr: String,
	pprof_api: bool,
	beacon_client: BeaconApiClient<H>,
	state: Arc<RelayState>,
}

impl<H: HttpClient> RelayApi<H> {
	pub fn new(opts: RelayApiOpts<H>) -> Result<Self> {
		if opts.listen_addr.trim().is_empty() {
			eyre::bail!("listen address is empty");
		}

		let builder_signing_domain = compute_builder_domain(opts.network.genesis_fork_version());
		info!(
			network = %opts.network,
			domain = %builder_signing_domain,
			relay_pubkey = %opts.signer.public_key(),
			"Relay service configured"
		);

		Ok(Self {
			listen_addr: opts.listen_addr,
			pprof_api: opts.pprof_api,
			beacon_client: opts.beacon_client,
			state: Arc::new(RelayState {
				datastore: opts.datastore,
				builder_signing_domain,
				get_header_wait_time: opts.get_header_wait_time,
				signer: opts.signer,
			}),
		})
	}

	pub fn listen_addr(&self) -> &str {
		&self.listen_addr
	}

	pub fn beacon_client(&self) -> &BeaconApiClient<H> {
		&self.beacon_client
	}

	pub fn state(&self) -> &Arc<RelayState> {
		&self.state
	}

	pub fn router(&self) -> Router {
		build_relay_router(Arc::clone(&self.state), self.pprof_api)
	}

	/// Bind the listen address and serve until SIGINT or SIGTERM.
	pub async fn start_server(&self) -> Result<()> {
		let listener = TcpListener::bind(&self.listen_addr)
			.await
			.with_context(|| format!("Failed to bind {}", self.listen_addr))?;
		info!(addr = %self.listen_addr, "Webserver listening");

		axum::serve(listener, self.router())
			.with_graceful_shutdown(async {
				if let Err(e) = common::utils::wait_for_signal().await {
					warn!("Signal handler failed: {}", e);
					std::future::pending::<()>().await;
				}
				info!("Shutdown signal received, stopping webserver");
			})
			.await
			.context("Webserver failed")
	}
}

pub fn build_relay_router(state: Arc<RelayState>, pprof_api: bool) -> Router {
	let router = Router::new()
		.route(routes::STATUS, get(status))
		.route(routes::REGISTER_VALIDATORS, post(register_validators))
		.route(routes::GET_HEADER, get(get_header));

	let router = if pprof_api { router.route(routes::DEBUG_METRICS, get(debug_metrics)) } else { router };

	router.with_state(state)
}

// ---------- Handlers ----------

// GET /eth/v1/builder/status
async fn status() -> impl IntoResponse {
	const ENDPOINT: &str = routes::STATUS;
	const METHOD: &str = "GET";

	let metrics = server_http_metrics();
	let start = metrics.start(ENDPOINT, METHOD);
	metrics.finish_status(ENDPOINT, METHOD, StatusCode::OK.as_u16(), start);
	StatusCode::OK
}

// POST /eth/v1/builder/validators
async fn register_validators(
	State(state): State<Arc<RelayState>>,
	Json(registrations): Json<Vec<ValidatorRegistration>>,
) -> impl IntoResponse {
	const ENDPOINT: &str = routes::REGISTER_VALIDATORS;
	const METHOD: &str = "POST";

	let metrics = server_http_metrics();
	let start = metrics.start(ENDPOINT, METHOD);

	for registration in &registrations {
		let root = validator_registration_root(&registration.message);
		if let Err(e) = verify_signature(
			&registration.message.pubkey,
			&registration.signature,
			&root,
			&state.builder_signing_domain,
		) {
			RELAY_REGISTRATIONS_TOTAL.with_label_values(&["invalid"]).inc();
			warn!(pubkey = %registration.message.pubkey, error = %e, "Rejected validator registration");
			metrics.finish_status(ENDPOINT, METHOD, StatusCode::BAD_REQUEST.as_u16(), start);
			return (
				StatusCode::BAD_REQUEST,
				format!("invalid signature for {}: {e}", registration.message.pubkey),
			)
				.into_response();
		}
	}

	for registration in &registrations {
		if let Err(e) = state.datastore.set_validator_registration(registration).await {
			metrics.finish_status(ENDPOINT, METHOD, StatusCode::INTERNAL_SERVER_ERROR.as_u16(), start);
			return (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to store registration: {e}")).into_response();
		}
		RELAY_REGISTRATIONS_TOTAL.with_label_values(&["stored"]).inc();
	}

	metrics.finish_status(ENDPOINT, METHOD, StatusCode::OK.as_u16(), start);
	StatusCode::OK.into_response()
}

// GET /eth/v1/builder/header/{slot}/{parent_hash}/{pubkey}
async fn get_header(
	State(state): State<Arc<RelayState>>,
	Path((slot, parent_hash, pubkey)): Path<(u64, String, String)>,
) -> impl IntoResponse {
	const ENDPOINT: &str = routes::GET_HEADER;
	const METHOD: &str = "GET";

	let metrics = server_http_metrics();
	let start = metrics.start(ENDPOINT, METHOD);

	tokio::time::sleep(state.get_header_wait_time).await;

	// No bids are held, so there is never a header to return.
	tracing::debug!(slot, %parent_hash, %pubkey, "No bid available");
	metrics.finish_status(ENDPOINT, METHOD, StatusCode::NO_CONTENT.as_u16(), start);
	StatusCode::NO_CONTENT
}

// GET /debug/metrics
async fn debug_metrics() -> impl IntoResponse {
	match encode_metrics() {
		Ok(body) => (StatusCode::OK, body).into_response(),
		Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to encode metrics: {e}")).into_response(),
	}
}
