//! OpenPGP (RFC 9580 "crypto-refresh") public-key dispatcher and packet
//! protection layer, extended with the draft-ietf-openpgp-pqc composite
//! algorithms.
//!
//! This crate covers the algorithm registry, the MPI wire codec, one
//! adapter per public-key algorithm family, the PQC composite
//! constructions, the single dispatcher those adapters sit behind, and
//! the two packet types whose wire format is algorithm-dependent: PKESK
//! (tag 1) and Secret-Key (tags 5/7).
//!
//! Out of scope: OpenPGP message assembly, ASCII armor, literal and
//! compressed data packets, the primitive cryptographic implementations
//! themselves (delegated to their respective crates), and CLI/streaming
//! glue — see `pgp-cli` for a thin consumer of this crate.

pub mod adapters;
pub mod algorithm;
pub mod config;
pub mod constant_time;
pub mod dispatch;
pub mod error;
pub mod mpi;
pub mod params;
pub mod pkesk;
pub mod pqc;
pub mod s2k;
pub mod secret_key;
pub mod wrap;

pub use algorithm::{AeadId, AlgoId, CurveOid, HashAlgorithm, PacketTag, SymAlgoId};
pub use config::Config;
pub use error::{Error, Result};
pub use params::{PrivateParams, PublicParams};
pub use pkesk::{Pkesk, Recipient};
pub use secret_key::{Protection, SecretKeyPacket};
