use alloy::hex;
use eyre::{Result, bail};

/// Decode a `0x` prefixed hex string.
///
/// Empty input, a missing prefix, odd length and non hex characters are all rejected.
pub fn decode_prefixed_hex(input: &str) -> Result<Vec<u8>> {
	if input.is_empty() {
		bail!("empty hex string");
	}
	let Some(digits) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) else {
		bail!("hex string without 0x prefix");
	};
	if digits.is_empty() {
		bail!("hex string \"0x\" has no digits");
	}
	if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
		bail!("invalid hex character {bad:?}");
	}
	Ok(hex::decode(digits)?)
}

/// Look up an environment variable, treating an empty value as unset.
pub fn env_var(key: &str) -> Option<String> {
	std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(unix)]
pub async fn wait_for_signal() -> Result<()> {
	use tokio::{
		select,
		signal::unix::{SignalKind, signal},
	};

	let mut sigint = signal(SignalKind::interrupt())?;
	let mut sigterm = signal(SignalKind::terminate())?;

	select! {
		_ = sigint.recv() => {}
		_ = sigterm.recv() => {}
	}

	Ok(())
}

#[cfg(windows)]
pub async fn wait_for_signal() -> eyre::Result<()> {
	tokio::signal::ctrl_c().await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_prefixed_hex_valid() {
		let bytes = decode_prefixed_hex("0x00ff10").unwrap();
		assert_eq!(bytes, vec![0x00, 0xff, 0x10]);
	}

	#[test]
	fn test_decode_prefixed_hex_requires_prefix() {
		let err = decode_prefixed_hex("00ff10").unwrap_err();
		assert!(err.to_string().contains("without 0x prefix"));
	}

	#[test]
	fn test_decode_prefixed_hex_empty() {
		assert!(decode_prefixed_hex("").is_err());
		assert!(decode_prefixed_hex("0x").is_err());
	}

	#[test]
	fn test_decode_prefixed_hex_invalid_chars() {
		assert!(decode_prefixed_hex("0xzzzz").is_err());
		assert!(decode_prefixed_hex("not-hex").is_err());
	}

	#[test]
	fn test_decode_prefixed_hex_double_prefix() {
		let err = decode_prefixed_hex("0x0x00ff").unwrap_err();
		assert!(err.to_string().contains("invalid hex character"));
		assert!(decode_prefixed_hex("0x0X00ff").is_err());
	}

	#[test]
	fn test_decode_prefixed_hex_odd_length() {
		assert!(decode_prefixed_hex("0xabc").is_err());
	}
}
