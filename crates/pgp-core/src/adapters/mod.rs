//! Per-algorithm adapters (C3): each module presents a subset of
//! `{generate, sign, verify, encrypt, decrypt, validate_params}` for one
//! algorithm family, delegating to primitive crates. See spec.md §4.2.

pub mod dsa;
pub mod ec;
pub mod ed25519;
pub mod ed448;
pub mod eddsa_legacy;
pub mod elgamal;
pub mod rsa;
pub mod symmetric_placeholder;
pub mod x25519;
pub mod x448;

use crate::algorithm::HashAlgorithm;

/// Preferred (minimum-strength) hash per EdDSA variant, per spec.md §4.2.
pub fn preferred_hash_for_ed25519() -> HashAlgorithm {
    HashAlgorithm::Sha256
}

pub fn preferred_hash_for_ed448() -> HashAlgorithm {
    HashAlgorithm::Sha512
}
