use common::network::{GenesisForkVersion, Network};

use crate::config::{NetworkSources, SourceOrigin};
use crate::error::StartupError;

/// Resolve the network identity from every candidate source.
///
/// More than one explicit selection is rejected. A custom fork version taken from the
/// environment does not count as explicit, and when present it wins over any named network.
/// Named networks are considered in the order of `Network::NAMED`.
pub fn select_network(sources: &NetworkSources) -> Result<Network, StartupError> {
	let named: Vec<Network> = Network::NAMED
		.into_iter()
		.filter(|network| match network {
			Network::Mainnet => sources.mainnet,
			Network::Kiln => sources.kiln,
			Network::Ropsten => sources.ropsten,
			Network::Sepolia => sources.sepolia,
			Network::Custom(_) => false,
		})
		.collect();

	let mut explicit: Vec<&'static str> =
		named.iter().map(|network| network.name()).collect();
	if let Some(custom) = &sources.custom {
		if custom.origin == SourceOrigin::Flag {
			explicit.insert(0, "genesis-fork-version");
		}
	}
	if explicit.len() > 1 {
		return Err(StartupError::ConflictingNetworks(explicit));
	}

	if let Some(custom) = &sources.custom {
		let version = custom.value.trim().parse::<GenesisForkVersion>().map_err(|reason| {
			StartupError::InvalidForkVersion { value: custom.value.clone(), reason }
		})?;
		return Ok(Network::Custom(version));
	}

	named.into_iter().next().ok_or(StartupError::NoNetworkSelected)
}
