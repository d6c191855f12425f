//! The closed error taxonomy for the dispatcher and packet layer.
//!
//! Kept deliberately opaque: several variants exist precisely so that a
//! caller cannot distinguish *why* a decryption failed (see
//! [`Error::DecryptionError`] and [`Error::IncorrectPassphrase`]) — folding
//! more detail into the message would reopen the oracle these variants are
//! meant to close.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported algorithm, curve, version or S2K type: {0}")]
    Unsupported(String),

    #[error("malformed packet: {0}")]
    Malformed(String),

    #[error("digest too weak for this algorithm")]
    HashTooWeak,

    #[error("incorrect passphrase")]
    IncorrectPassphrase,

    #[error("decryption error")]
    DecryptionError,

    #[error("key is invalid")]
    KeyIsInvalid,

    #[error("signing failed transiently, caller may retry")]
    TransientSigningFailure,

    #[error("error reading MPIs")]
    ErrorReadingMPIs,
}

pub type Result<T> = std::result::Result<T, Error>;
