use std::fmt;
use std::str::FromStr;

use alloy::hex;
use eyre::{Result, bail};

use crate::utils::decode_prefixed_hex;

/// Genesis fork version of a network, used to derive signing domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenesisForkVersion(pub [u8; 4]);

impl GenesisForkVersion {
	pub const MAINNET: Self = Self([0x00, 0x00, 0x00, 0x00]);
	pub const KILN: Self = Self([0x70, 0x00, 0x00, 0x69]);
	pub const ROPSTEN: Self = Self([0x80, 0x00, 0x00, 0x69]);
	pub const SEPOLIA: Self = Self([0x90, 0x00, 0x00, 0x69]);
}

impl FromStr for GenesisForkVersion {
	type Err = eyre::Report;

	fn from_str(s: &str) -> Result<Self> {
		let bytes = decode_prefixed_hex(s)?;
		let Ok(version) = <[u8; 4]>::try_from(bytes.as_slice()) else {
			bail!("genesis fork version must be 4 bytes, got {}", bytes.len());
		};
		Ok(Self(version))
	}
}

impl fmt::Display for GenesisForkVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

/// Networks the relay knows by name, plus an operator supplied override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
	Mainnet,
	Kiln,
	Ropsten,
	Sepolia,
	Custom(GenesisForkVersion),
}

impl Network {
	/// Named networks in the order they take precedence.
	pub const NAMED: [Network; 4] = [Network::Mainnet, Network::Kiln, Network::Ropsten, Network::Sepolia];

	pub fn genesis_fork_version(&self) -> GenesisForkVersion {
		match self {
			Network::Mainnet => GenesisForkVersion::MAINNET,
			Network::Kiln => GenesisForkVersion::KILN,
			Network::Ropsten => GenesisForkVersion::ROPSTEN,
			Network::Sepolia => GenesisForkVersion::SEPOLIA,
			Network::Custom(version) => *version,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Network::Mainnet => "mainnet",
			Network::Kiln => "kiln",
			Network::Ropsten => "ropsten",
			Network::Sepolia => "sepolia",
			Network::Custom(_) => "custom",
		}
	}
}

impl fmt::Display for Network {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.name(), self.genesis_fork_version())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_named_fork_versions() {
		assert_eq!(Network::Mainnet.genesis_fork_version().to_string(), "0x00000000");
		assert_eq!(Network::Kiln.genesis_fork_version().to_string(), "0x70000069");
		assert_eq!(Network::Ropsten.genesis_fork_version().to_string(), "0x80000069");
		assert_eq!(Network::Sepolia.genesis_fork_version().to_string(), "0x90000069");
	}

	#[test]
	fn test_parse_fork_version() {
		let version: GenesisForkVersion = "0x10203040".parse().unwrap();
		assert_eq!(version, GenesisForkVersion([0x10, 0x20, 0x30, 0x40]));
		assert_eq!(version.to_string(), "0x10203040");
	}

	#[test]
	fn test_parse_fork_version_wrong_length() {
		assert!("0x102030".parse::<GenesisForkVersion>().is_err());
		assert!("0x1020304050".parse::<GenesisForkVersion>().is_err());
	}

	#[test]
	fn test_parse_fork_version_requires_prefix() {
		assert!("10203040".parse::<GenesisForkVersion>().is_err());
		assert!("0x0x01017000".parse::<GenesisForkVersion>().is_err());
	}
}
