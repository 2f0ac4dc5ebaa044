use blst::min_pk::SecretKey;
use eyre::{Result, eyre};

use common::utils::decode_prefixed_hex;

/// Length of a BLS12-381 secret key scalar
pub const SECRET_KEY_LENGTH: usize = 32;

/// Decode the hex form of the relay secret key. Only the encoding is checked here.
pub fn decode_secret_key_hex(secret_key_hex: &str) -> Result<Vec<u8>> {
	decode_prefixed_hex(secret_key_hex.trim())
}

/// Validate raw bytes as a BLS secret key: 32 bytes, a non-zero scalar below the curve order.
pub fn secret_key_from_bytes(bytes: &[u8]) -> Result<SecretKey> {
	if bytes.len() != SECRET_KEY_LENGTH {
		return Err(eyre!("secret key must be {} bytes, got {}", SECRET_KEY_LENGTH, bytes.len()));
	}
	SecretKey::from_bytes(bytes).map_err(|e| eyre!("invalid BLS secret key: {:?}", e))
}
