use std::fmt;

use alloy::primitives::B256;
use blst::{
	BLST_ERROR,
	min_pk::{PublicKey, SecretKey, Signature},
};
use eyre::{Result, eyre};

use alloy::rpc::types::beacon::{BlsPublicKey, BlsSignature};

use crate::ssz::signing_data_root;

/// Ciphersuite used by the consensus layer for BLS signatures
pub const BLS_DST_SIG: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Relay signing key. The secret never leaves this type and is not printed.
pub struct RelaySigner {
	secret_key: SecretKey,
	public_key: BlsPublicKey,
}

impl RelaySigner {
	pub fn new(secret_key: SecretKey) -> Self {
		let public_key = BlsPublicKey::from(secret_key.sk_to_pk().to_bytes());
		Self { secret_key, public_key }
	}

	pub fn public_key(&self) -> &BlsPublicKey {
		&self.public_key
	}

	/// Sign `object_root` under `domain`.
	pub fn sign(&self, object_root: &B256, domain: &B256) -> BlsSignature {
		let signing_root = signing_data_root(*object_root, *domain);
		let signature = self.secret_key.sign(signing_root.as_slice(), BLS_DST_SIG, &[]);
		BlsSignature::from(signature.to_bytes())
	}
}

impl fmt::Debug for RelaySigner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RelaySigner").field("public_key", &self.public_key).finish_non_exhaustive()
	}
}

/// Check that `signature` is `public_key`'s signature over `object_root` in `domain`.
pub fn verify_signature(
	public_key: &BlsPublicKey,
	signature: &BlsSignature,
	object_root: &B256,
	domain: &B256,
) -> Result<()> {
	let pk = PublicKey::from_bytes(public_key.as_slice()).map_err(|e| eyre!("invalid public key: {:?}", e))?;
	let sig = Signature::from_bytes(signature.as_slice()).map_err(|e| eyre!("invalid signature: {:?}", e))?;
	let signing_root = signing_data_root(*object_root, *domain);

	match sig.verify(true, signing_root.as_slice(), BLS_DST_SIG, &[], &pk, true) {
		BLST_ERROR::BLST_SUCCESS => Ok(()),
		err => Err(eyre!("signature verification failed: {:?}", err)),
	}
}
