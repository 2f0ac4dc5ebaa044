pub mod domain;
pub mod keys;
pub mod signer;
pub mod ssz;
