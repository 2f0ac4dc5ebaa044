//! Hash tree roots of the containers the relay signs or verifies.

use alloy::{
	primitives::{Address, B256, FixedBytes},
	rpc::types::beacon::{BlsPublicKey, relay::ValidatorRegistrationMessage},
};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

#[derive(TreeHash)]
struct ForkData {
	current_version: FixedBytes<4>,
	genesis_validators_root: B256,
}

#[derive(TreeHash)]
struct SigningData {
	object_root: B256,
	domain: B256,
}

/// `ValidatorRegistrationV1` as hashed by the builder API.
#[derive(TreeHash)]
struct ValidatorRegistrationV1 {
	fee_recipient: Address,
	gas_limit: u64,
	timestamp: u64,
	pubkey: BlsPublicKey,
}

impl From<&ValidatorRegistrationMessage> for ValidatorRegistrationV1 {
	fn from(message: &ValidatorRegistrationMessage) -> Self {
		Self {
			fee_recipient: message.fee_recipient,
			gas_limit: message.gas_limit,
			timestamp: message.timestamp,
			pubkey: message.pubkey,
		}
	}
}

pub fn fork_data_root(current_version: [u8; 4], genesis_validators_root: B256) -> B256 {
	ForkData { current_version: FixedBytes(current_version), genesis_validators_root }.tree_hash_root()
}

pub fn signing_data_root(object_root: B256, domain: B256) -> B256 {
	SigningData { object_root, domain }.tree_hash_root()
}

pub fn validator_registration_root(message: &ValidatorRegistrationMessage) -> B256 {
	ValidatorRegistrationV1::from(message).tree_hash_root()
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::b256;

	fn message() -> ValidatorRegistrationMessage {
		ValidatorRegistrationMessage {
			fee_recipient: Address::repeat_byte(0x01),
			gas_limit: 30_000_000,
			timestamp: 1_700_000_000,
			pubkey: FixedBytes::repeat_byte(0x02),
		}
	}

	#[test]
	fn test_zero_fork_data_root() {
		// hash of two zero chunks
		assert_eq!(
			fork_data_root([0u8; 4], B256::ZERO),
			b256!("f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a92759fb4b")
		);
	}

	#[test]
	fn test_registration_root_changes_with_each_field() {
		let root = validator_registration_root(&message());

		let mut changed = message();
		changed.gas_limit += 1;
		assert_ne!(validator_registration_root(&changed), root);

		let mut changed = message();
		changed.timestamp += 1;
		assert_ne!(validator_registration_root(&changed), root);

		let mut changed = message();
		changed.fee_recipient = Address::repeat_byte(0x03);
		assert_ne!(validator_registration_root(&changed), root);

		let mut changed = message();
		let mut pubkey = [0x02; 48];
		pubkey[47] = 0x04;
		changed.pubkey = FixedBytes::from(pubkey);
		assert_ne!(validator_registration_root(&changed), root);
	}
}
