use std::fmt;

/// Point in the startup sequence at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Config,
	NetworkIdentity,
	BeaconSync,
	Datastore,
	KeyMaterial,
	ServiceConstruction,
	Serve,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Stage::Config => "config",
			Stage::NetworkIdentity => "network-identity",
			Stage::BeaconSync => "beacon-sync",
			Stage::Datastore => "datastore",
			Stage::KeyMaterial => "key-material",
			Stage::ServiceConstruction => "service-construction",
			Stage::Serve => "serve",
		};
		f.write_str(name)
	}
}

/// Broad class of a startup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Operator input is wrong
	Configuration,
	/// A system the relay depends on is unavailable or not ready
	Dependency,
	/// The service could not be built or stopped serving
	Service,
}

/// Every way startup can fail. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error("invalid log level '{0}' (expected trace, debug, info, warn, warning, error, fatal or panic)")]
	InvalidLogLevel(String),

	#[error(
		"no genesis fork version selected (use --mainnet, --kiln, --ropsten, --sepolia or --genesis-fork-version)"
	)]
	NoNetworkSelected,

	#[error("conflicting genesis fork version selections: {}", .0.join(", "))]
	ConflictingNetworks(Vec<&'static str>),

	#[error("invalid custom genesis fork version '{value}': {reason:#}")]
	InvalidForkVersion { value: String, reason: eyre::Report },

	#[error("invalid beacon node URI '{uri}': {reason:#}")]
	InvalidBeaconUri { uri: String, reason: eyre::Report },

	#[error("beacon node is not ready: {0:#}")]
	BeaconNotReady(eyre::Report),

	#[error("failed to connect to redis at {uri}: {reason:#}")]
	CacheUnavailable { uri: String, reason: eyre::Report },

	#[error("incorrect secret key provided: {0:#}")]
	MalformedSecretKey(eyre::Report),

	#[error("incorrect builder API secret key provided: {0:#}")]
	InvalidSecretKey(eyre::Report),

	#[error("failed to create service: {0:#}")]
	ServiceConstruction(eyre::Report),

	#[error("server stopped: {0:#}")]
	Serve(eyre::Report),
}

impl StartupError {
	pub fn stage(&self) -> Stage {
		match self {
			StartupError::InvalidLogLevel(_) => Stage::Config,
			StartupError::NoNetworkSelected
			| StartupError::ConflictingNetworks(_)
			| StartupError::InvalidForkVersion { .. } => Stage::NetworkIdentity,
			StartupError::InvalidBeaconUri { .. } | StartupError::BeaconNotReady(_) => Stage::BeaconSync,
			StartupError::CacheUnavailable { .. } => Stage::Datastore,
			StartupError::MalformedSecretKey(_) | StartupError::InvalidSecretKey(_) => Stage::KeyMaterial,
			StartupError::ServiceConstruction(_) => Stage::ServiceConstruction,
			StartupError::Serve(_) => Stage::Serve,
		}
	}

	pub fn kind(&self) -> ErrorKind {
		match self {
			StartupError::InvalidLogLevel(_)
			| StartupError::NoNetworkSelected
			| StartupError::ConflictingNetworks(_)
			| StartupError::InvalidForkVersion { .. }
			| StartupError::InvalidBeaconUri { .. }
			| StartupError::MalformedSecretKey(_)
			| StartupError::InvalidSecretKey(_) => ErrorKind::Configuration,
			StartupError::BeaconNotReady(_) | StartupError::CacheUnavailable { .. } => ErrorKind::Dependency,
			StartupError::ServiceConstruction(_) | StartupError::Serve(_) => ErrorKind::Service,
		}
	}
}
