use std::fmt;
use std::time::Duration;

use clap::{Args, Parser};
use tracing::level_filters::LevelFilter;

use common::logging::parse_log_level;

use crate::error::StartupError;

pub const DEFAULT_LISTEN_ADDR: &str = "localhost:9062";
pub const DEFAULT_REDIS_URI: &str = "localhost:6379";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_GETHEADER_WAIT_MS: u64 = 500;

pub const ENV_BEACON_URI: &str = "BEACON_URI";
pub const ENV_REDIS_URI: &str = "REDIS_URI";
pub const ENV_LOG_JSON: &str = "LOG_JSON";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_GENESIS_FORK_VERSION: &str = "GENESIS_FORK_VERSION";

/// Command line of the relay API server.
#[derive(Parser)]
#[command(name = "relay", about = "Start the relay API server", version)]
pub struct RelayArgs {
	/// Listen address for the webserver
	#[arg(long = "listen-addr", default_value = DEFAULT_LISTEN_ADDR)]
	pub listen_addr: String,

	/// Beacon node endpoint [env: BEACON_URI]
	#[arg(long = "beacon-uri")]
	pub beacon_uri: Option<String>,

	/// Redis uri [env: REDIS_URI] [default: localhost:6379]
	#[arg(long = "redis-uri")]
	pub redis_uri: Option<String>,

	/// Enable profiling endpoints
	#[arg(long)]
	pub pprof: bool,

	/// Milliseconds to wait on getHeader requests
	#[arg(long = "getheader-wait-ms", default_value_t = DEFAULT_GETHEADER_WAIT_MS)]
	pub getheader_wait_ms: u64,

	/// Secret key for signing bids, 0x prefixed hex
	#[arg(long = "secret-key", default_value = "", hide_default_value = true)]
	pub secret_key: String,

	/// Log in JSON format instead of text, `--json=false` overrides the environment [env: LOG_JSON]
	#[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
	pub json: Option<bool>,

	/// Log level: trace, debug, info, warn/warning, error, fatal, panic [env: LOG_LEVEL] [default: info]
	#[arg(long = "loglevel")]
	pub log_level: Option<String>,

	#[command(flatten)]
	pub network: NetworkArgs,
}

/// Genesis fork version selection. At most one may be passed.
#[derive(Args, Debug, Clone, Default)]
#[group(id = "network", multiple = false)]
pub struct NetworkArgs {
	/// Use Mainnet genesis fork version 0x00000000 (for signature validation)
	#[arg(long)]
	pub mainnet: bool,

	/// Use Kiln genesis fork version 0x70000069 (for signature validation)
	#[arg(long)]
	pub kiln: bool,

	/// Use Ropsten genesis fork version 0x80000069 (for signature validation)
	#[arg(long)]
	pub ropsten: bool,

	/// Use Sepolia genesis fork version 0x90000069 (for signature validation)
	#[arg(long)]
	pub sepolia: bool,

	/// Use a custom genesis fork version (for signature validation) [env: GENESIS_FORK_VERSION]
	#[arg(long = "genesis-fork-version")]
	pub genesis_fork_version: Option<String>,
}

/// Where a custom fork version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
	Flag,
	Environment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomForkVersion {
	pub value: String,
	pub origin: SourceOrigin,
}

/// Every candidate source for the network identity, before selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSources {
	pub custom: Option<CustomForkVersion>,
	pub mainnet: bool,
	pub kiln: bool,
	pub ropsten: bool,
	pub sepolia: bool,
}

/// Hex secret key as given by the operator. `Debug` never prints it.
#[derive(Clone, Default)]
pub struct SecretKeyHex(String);

impl SecretKeyHex {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for SecretKeyHex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.is_empty() { f.write_str("SecretKeyHex(<unset>)") } else { f.write_str("SecretKeyHex(<redacted>)") }
	}
}

/// Resolved relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
	pub listen_addr: String,
	pub beacon_uri: String,
	pub redis_uri: String,
	pub log_json: bool,
	pub log_level: LevelFilter,
	pub pprof: bool,
	pub getheader_wait: Duration,
	pub secret_key: SecretKeyHex,
	pub network: NetworkSources,
}

impl Config {
	/// Resolve against the process environment.
	pub fn from_args(args: RelayArgs) -> Result<Self, StartupError> {
		Self::resolve(args, common::utils::env_var)
	}

	/// Resolve each value as flag, then environment variable, then built-in default.
	///
	/// `env` returns `None` for unset variables; callers should map empty values to `None`.
	pub fn resolve<E>(args: RelayArgs, env: E) -> Result<Self, StartupError>
	where
		E: Fn(&str) -> Option<String>,
	{
		let beacon_uri = args.beacon_uri.or_else(|| env(ENV_BEACON_URI)).unwrap_or_default();
		let redis_uri = args.redis_uri.or_else(|| env(ENV_REDIS_URI)).unwrap_or_else(|| DEFAULT_REDIS_URI.to_string());
		let log_json = args.json.unwrap_or_else(|| env(ENV_LOG_JSON).is_some());

		let log_level_name = args.log_level.or_else(|| env(ENV_LOG_LEVEL)).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
		let log_level =
			parse_log_level(&log_level_name).map_err(|_| StartupError::InvalidLogLevel(log_level_name.clone()))?;

		let custom = match args.network.genesis_fork_version {
			Some(value) => Some(CustomForkVersion { value, origin: SourceOrigin::Flag }),
			None => env(ENV_GENESIS_FORK_VERSION)
				.map(|value| CustomForkVersion { value, origin: SourceOrigin::Environment }),
		};

		Ok(Self {
			listen_addr: args.listen_addr,
			beacon_uri,
			redis_uri,
			log_json,
			log_level,
			pprof: args.pprof,
			getheader_wait: Duration::from_millis(args.getheader_wait_ms),
			secret_key: SecretKeyHex::new(args.secret_key),
			network: NetworkSources {
				custom,
				mainnet: args.network.mainnet,
				kiln: args.network.kiln,
				ropsten: args.network.ropsten,
				sepolia: args.network.sepolia,
			},
		})
	}
}
