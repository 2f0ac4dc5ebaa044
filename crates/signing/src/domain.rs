use alloy::primitives::B256;

use common::network::GenesisForkVersion;

use crate::ssz::fork_data_root;

pub type DomainType = [u8; 4];

/// Application domain used by the builder API
pub const DOMAIN_APPLICATION_BUILDER: DomainType = [0x00, 0x00, 0x00, 0x01];

/// `compute_domain` from the consensus specs: the domain type followed by the first 28
/// bytes of the fork data root.
pub fn compute_domain(
	domain_type: DomainType,
	fork_version: GenesisForkVersion,
	genesis_validators_root: B256,
) -> B256 {
	let fork_root = fork_data_root(fork_version.0, genesis_validators_root);
	let mut domain = [0u8; 32];
	domain[..4].copy_from_slice(&domain_type);
	domain[4..].copy_from_slice(&fork_root[..28]);
	B256::from(domain)
}

/// Builder messages are signed over a zero genesis validators root.
pub fn compute_builder_domain(fork_version: GenesisForkVersion) -> B256 {
	compute_domain(DOMAIN_APPLICATION_BUILDER, fork_version, B256::ZERO)
}
