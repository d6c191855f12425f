//! Native Ed25519 (spec.md §3's Ed25519 row; §4.2's Ed25519/Ed448 contract).

use bytes::Bytes;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use super::preferred_hash_for_ed25519;
use crate::algorithm::HashAlgorithm;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::params::{PrivateParams, PublicParams};

fn check_hash_strength(hash: HashAlgorithm) -> Result<()> {
    if hash.byte_length() < preferred_hash_for_ed25519().byte_length() {
        return Err(Error::HashTooWeak);
    }
    Ok(())
}

pub fn generate() -> (PublicParams, PrivateParams) {
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    let seed = signing_key.to_bytes();
    let a = signing_key.verifying_key().to_bytes();
    (PublicParams::Ed25519 { a }, PrivateParams::Ed25519 { seed })
}

/// Signs `hashed` directly (pure EdDSA — there is no pre-hash step beyond
/// what the caller already computed). If `config.check_eddsa_faulty_signatures`
/// is set, the signature is verified before being returned; a verification
/// failure at this point means a fault occurred during signing and is
/// surfaced as [`Error::TransientSigningFailure`] so the caller may retry.
pub fn sign(
    hash: HashAlgorithm,
    config: &Config,
    priv_params: &PrivateParams,
    hashed: &[u8],
) -> Result<Bytes> {
    check_hash_strength(hash)?;
    let PrivateParams::Ed25519 { seed } = priv_params else {
        return Err(Error::Malformed("expected Ed25519 private params".into()));
    };
    let signing_key = SigningKey::from_bytes(seed);
    let sig = signing_key.sign(hashed);
    if config.check_eddsa_faulty_signatures
        && signing_key.verifying_key().verify(hashed, &sig).is_err()
    {
        return Err(Error::TransientSigningFailure);
    }
    Ok(Bytes::copy_from_slice(&sig.to_bytes()))
}

pub fn verify(hash: HashAlgorithm, pub_params: &PublicParams, sig: &[u8], hashed: &[u8]) -> Result<bool> {
    check_hash_strength(hash)?;
    let PublicParams::Ed25519 { a } = pub_params else {
        return Err(Error::Malformed("expected Ed25519 public params".into()));
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(a) else {
        return Ok(false);
    };
    let sig_bytes: [u8; 64] = match sig.try_into() {
        Ok(s) => s,
        Err(_) => return Ok(false),
    };
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
    Ok(verifying_key.verify(hashed, &sig).is_ok())
}

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (PublicParams::Ed25519 { a }, PrivateParams::Ed25519 { seed }) = (pub_params, priv_params)
    else {
        return false;
    };
    let signing_key = SigningKey::from_bytes(seed);
    &signing_key.verifying_key().to_bytes() == a
}
