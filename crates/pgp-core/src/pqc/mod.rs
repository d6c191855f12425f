//! PQC composite constructions (C4): ML-KEM-768+X25519 composite KEM,
//! ML-DSA-65+Ed25519 composite signature, and standalone SLH-DSA-SHAKE-128s.
//! See draft-ietf-openpgp-pqc-10 §5-§7.

pub mod dsa;
pub mod kem;
pub mod slhdsa;
