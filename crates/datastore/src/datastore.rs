use std::sync::Arc;

use alloy::{
	hex,
	rpc::types::beacon::{BlsPublicKey, relay::ValidatorRegistration},
};
use eyre::{Context, Result};

use crate::cache::{CACHE_PREFIX, Cache, key_with_prefix};

fn validator_registration_key() -> String {
	key_with_prefix(CACHE_PREFIX, ["validators-registration"])
}

/// Hash fields are the lower-case `0x` hex pubkey.
fn pubkey_field(pubkey: &BlsPublicKey) -> String {
	format!("0x{}", hex::encode(pubkey))
}

/// Proposer registration state, stored on top of a `Cache`.
#[derive(Clone)]
pub struct ProposerDatastore {
	cache: Arc<dyn Cache>,
}

impl ProposerDatastore {
	pub fn new(cache: Arc<dyn Cache>) -> Self {
		Self { cache }
	}

	pub async fn set_validator_registration(&self, registration: &ValidatorRegistration) -> Result<()> {
		let value = serde_json::to_vec(registration)?;
		self.cache
			.hset_raw(&validator_registration_key(), &pubkey_field(&registration.message.pubkey), value)
			.await
			.context("Failed to store validator registration")
	}

	pub async fn get_validator_registration(
		&self,
		pubkey: &BlsPublicKey,
	) -> Result<Option<ValidatorRegistration>> {
		let raw = self.cache.hget_raw(&validator_registration_key(), &pubkey_field(pubkey)).await?;
		match raw {
			Some(bytes) => Ok(Some(
				serde_json::from_slice(&bytes).context("Stored validator registration is not valid JSON")?,
			)),
			None => Ok(None),
		}
	}

	pub async fn num_registered_validators(&self) -> Result<u64> {
		self.cache.hlen(&validator_registration_key()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::MockCache;
	use alloy::primitives::{Address, FixedBytes};
	use alloy::rpc::types::beacon::relay::ValidatorRegistrationMessage;
	use mockall::predicate::eq;

	fn registration(byte: u8) -> ValidatorRegistration {
		ValidatorRegistration {
			message: ValidatorRegistrationMessage {
				fee_recipient: Address::repeat_byte(0x11),
				gas_limit: 30_000_000,
				timestamp: 1_700_000_000,
				pubkey: FixedBytes::repeat_byte(byte),
			},
			signature: FixedBytes::repeat_byte(0x22),
		}
	}

	#[tokio::test]
	async fn set_registration_writes_json_under_pubkey_field() -> Result<()> {
		let reg = registration(0xab);
		let expected_field = format!("0x{}", "ab".repeat(48));
		let expected_value = serde_json::to_vec(&reg)?;

		let mut cache = MockCache::new();
		cache
			.expect_hset_raw()
			.with(eq("boost-relay:validators-registration"), eq(expected_field), eq(expected_value))
			.times(1)
			.returning(|_, _, _| Ok(()));

		let ds = ProposerDatastore::new(Arc::new(cache));
		ds.set_validator_registration(&reg).await?;
		Ok(())
	}

	#[tokio::test]
	async fn get_registration_decodes_stored_value() -> Result<()> {
		let reg = registration(0x01);
		let stored = serde_json::to_vec(&reg)?;

		let mut cache = MockCache::new();
		cache.expect_hget_raw().times(1).returning(move |_, _| Ok(Some(stored.clone())));

		let ds = ProposerDatastore::new(Arc::new(cache));
		let loaded = ds.get_validator_registration(&reg.message.pubkey).await?;
		assert_eq!(loaded, Some(reg));
		Ok(())
	}

	#[tokio::test]
	async fn get_registration_missing() -> Result<()> {
		let mut cache = MockCache::new();
		cache.expect_hget_raw().times(1).returning(|_, _| Ok(None));

		let ds = ProposerDatastore::new(Arc::new(cache));
		assert_eq!(ds.get_validator_registration(&FixedBytes::repeat_byte(0x02)).await?, None);
		Ok(())
	}

	#[tokio::test]
	async fn get_registration_corrupt_value_is_error() {
		let mut cache = MockCache::new();
		cache.expect_hget_raw().times(1).returning(|_, _| Ok(Some(b"not json".to_vec())));

		let ds = ProposerDatastore::new(Arc::new(cache));
		assert!(ds.get_validator_registration(&FixedBytes::repeat_byte(0x02)).await.is_err());
	}

	#[tokio::test]
	async fn num_registered_validators_reads_hash_length() -> Result<()> {
		let mut cache = MockCache::new();
		cache.expect_hlen().with(eq("boost-relay:validators-registration")).times(1).returning(|_| Ok(7));

		let ds = ProposerDatastore::new(Arc::new(cache));
		assert_eq!(ds.num_registered_validators().await?, 7);
		Ok(())
	}
}
