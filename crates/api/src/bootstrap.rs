//! Startup sequence of the relay.
//!
//! Each stage is a type that can only be produced from the one before it, so the order
//! `network identity → beacon sync → datastore → key material → service` is carried by the
//! data rather than by statement order. Every stage either hands its output forward or
//! returns a `StartupError`; nothing is retried.

use tracing::info;

use beacon::{
	beacon_client::{BeaconApiClient, HttpClient, ReqwestClient},
	constants::BEACON_REQUEST_TIMEOUT_SECS,
	types::BeaconApiConfig,
};
use common::network::Network;
use datastore::{CacheConnector, ProposerDatastore, RedisConnector};
use signing::{
	keys::{decode_secret_key_hex, secret_key_from_bytes},
	signer::RelaySigner,
};

use crate::config::Config;
use crate::error::StartupError;
use crate::network::select_network;
use crate::server::{RelayApi, RelayApiOpts};

/// Configuration with its network identity resolved. No I/O has happened yet.
#[derive(Debug)]
pub struct Resolved {
	config: Config,
	network: Network,
}

impl Resolved {
	pub fn new(config: Config) -> Result<Self, StartupError> {
		let network = select_network(&config.network)?;
		info!(network = %network, "Using genesis fork version");
		Ok(Self { config, network })
	}

	/// Query the beacon node's sync status once. Any failure, including a node that is still
	/// syncing, ends startup.
	pub async fn verify_beacon<H: HttpClient>(self, http_client: H) -> Result<BeaconVerified<H>, StartupError> {
		info!(endpoint = %self.config.beacon_uri, "Using beacon endpoint");

		let beacon_client = BeaconApiClient::new(
			BeaconApiConfig {
				endpoint: self.config.beacon_uri.clone(),
				request_timeout_secs: BEACON_REQUEST_TIMEOUT_SECS,
			},
			http_client,
		)
		.map_err(|reason| StartupError::InvalidBeaconUri { uri: self.config.beacon_uri.clone(), reason })?;

		let sync_status = beacon_client.sync_status().await.map_err(StartupError::BeaconNotReady)?;
		info!(head_slot = sync_status.head_slot, "Beacon node is synced");

		Ok(BeaconVerified { resolved: self, beacon_client })
	}
}

/// The beacon node answered and reported itself synced.
pub struct BeaconVerified<H: HttpClient> {
	resolved: Resolved,
	beacon_client: BeaconApiClient<H>,
}

impl<H: HttpClient> BeaconVerified<H> {
	pub async fn connect_datastore<C: CacheConnector>(
		self,
		connector: &C,
	) -> Result<DatastoreConnected<H>, StartupError> {
		let uri = self.resolved.config.redis_uri.clone();
		let cache = connector
			.connect(&uri)
			.await
			.map_err(|reason| StartupError::CacheUnavailable { uri: uri.clone(), reason })?;
		info!(uri = %uri, "Connected to Redis");

		Ok(DatastoreConnected { beacon: self, datastore: ProposerDatastore::new(cache) })
	}
}

/// The cache answered and is wrapped as the proposer datastore.
pub struct DatastoreConnected<H: HttpClient> {
	beacon: BeaconVerified<H>,
	datastore: ProposerDatastore,
}

impl<H: HttpClient> DatastoreConnected<H> {
	/// Decode and validate the relay secret key. Bad hex and a bad key are reported
	/// separately.
	pub fn load_key(self) -> Result<KeyLoaded<H>, StartupError> {
		let config = &self.beacon.resolved.config;
		let bytes = decode_secret_key_hex(config.secret_key.expose()).map_err(StartupError::MalformedSecretKey)?;
		let secret_key = secret_key_from_bytes(&bytes).map_err(StartupError::InvalidSecretKey)?;

		let signer = RelaySigner::new(secret_key);
		info!(pubkey = %signer.public_key(), "Loaded relay signing key");

		Ok(KeyLoaded { connected: self, signer })
	}
}

/// Every precondition holds; ready to build the service.
pub struct KeyLoaded<H: HttpClient> {
	connected: DatastoreConnected<H>,
	signer: RelaySigner,
}

impl<H: HttpClient> KeyLoaded<H> {
	pub fn into_opts(self) -> RelayApiOpts<H> {
		let DatastoreConnected { beacon, datastore } = self.connected;
		let BeaconVerified { resolved, beacon_client } = beacon;
		let Resolved { config, network } = resolved;

		RelayApiOpts {
			listen_addr: config.listen_addr,
			beacon_client,
			datastore,
			network,
			pprof_api: config.pprof,
			get_header_wait_time: config.getheader_wait,
			signer: self.signer,
		}
	}
}

/// Run every stage up to and including service construction.
pub async fn prepare<H, C>(config: Config, http_client: H, connector: &C) -> Result<RelayApi<H>, StartupError>
where
	H: HttpClient,
	C: CacheConnector,
{
	let opts = Resolved::new(config)?
		.verify_beacon(http_client)
		.await?
		.connect_datastore(connector)
		.await?
		.load_key()?
		.into_opts();

	RelayApi::new(opts).map_err(StartupError::ServiceConstruction)
}

/// Serve until shutdown. Returning an error means the server failed.
pub async fn serve<H: HttpClient>(api: RelayApi<H>) -> Result<(), StartupError> {
	info!("Webserver starting on {} ...", api.listen_addr());
	api.start_server().await.map_err(StartupError::Serve)
}

/// Full startup against the real beacon node and Redis.
pub async fn run(config: Config) -> Result<(), StartupError> {
	let http_client = ReqwestClient::new(BEACON_REQUEST_TIMEOUT_SECS).map_err(StartupError::BeaconNotReady)?;
	let api = prepare(config, http_client, &RedisConnector::default()).await?;
	serve(api).await
}
