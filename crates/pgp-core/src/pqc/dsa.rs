//! Composite ML-DSA-65+Ed25519 signature (algorithm 107, spec.md §4.2.1).
//! Both components sign the same pre-hashed digest independently; a
//! signature verifies only when both components verify. The digest must
//! be at least 32 bytes (SHA-256-strength), per the composite's hash gate.

use bytes::{Buf, Bytes, BytesMut};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use pqcrypto_mldsa::mldsa65;
use pqcrypto_traits::sign::{
    DetachedSignature as _, PublicKey as _, SecretKey as _,
};

use crate::error::{Error, Result};
use crate::params::{PrivateParams, PublicParams};

const MIN_DIGEST_LEN: usize = 32;

pub fn generate() -> (PublicParams, PrivateParams) {
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    let (mldsa_public, mldsa_secret) = mldsa65::keypair();
    (
        PublicParams::MlDsaEd25519 {
            ecc_public: signing_key.verifying_key().to_bytes(),
            mldsa_public: mldsa_public.as_bytes().to_vec(),
        },
        PrivateParams::MlDsaEd25519 {
            ecc_secret: signing_key.to_bytes(),
            mldsa_seed: {
                let bytes = mldsa_secret.as_bytes();
                let mut seed = [0u8; 32];
                seed[..32.min(bytes.len())].copy_from_slice(&bytes[..32.min(bytes.len())]);
                seed
            },
            mldsa_secret_expanded: Some(mldsa_secret.as_bytes().to_vec()),
        },
    )
}

/// `MPI(ed25519_sig) || mldsa_sig`, mirroring the wire layout native
/// Ed25519 signatures use for the classical component.
pub fn sign(priv_params: &PrivateParams, hashed: &[u8]) -> Result<Bytes> {
    if hashed.len() < MIN_DIGEST_LEN {
        return Err(Error::HashTooWeak);
    }
    let PrivateParams::MlDsaEd25519 {
        ecc_secret,
        mldsa_secret_expanded,
        ..
    } = priv_params
    else {
        return Err(Error::Malformed("expected ML-DSA+Ed25519 private params".into()));
    };
    let Some(mldsa_secret_bytes) = mldsa_secret_expanded else {
        return Err(Error::KeyIsInvalid);
    };

    let signing_key = SigningKey::from_bytes(ecc_secret);
    let ecc_sig = signing_key.sign(hashed);

    let mldsa_sk = mldsa65::SecretKey::from_bytes(mldsa_secret_bytes)
        .map_err(|_| Error::KeyIsInvalid)?;
    let mldsa_sig = mldsa65::detached_sign(hashed, &mldsa_sk);

    let mut out = BytesMut::new();
    out.extend_from_slice(&ecc_sig.to_bytes());
    out.extend_from_slice(mldsa_sig.as_bytes());
    Ok(out.freeze())
}

pub fn verify(pub_params: &PublicParams, sig: &[u8], hashed: &[u8]) -> Result<bool> {
    if hashed.len() < MIN_DIGEST_LEN {
        return Err(Error::HashTooWeak);
    }
    let PublicParams::MlDsaEd25519 {
        ecc_public,
        mldsa_public,
    } = pub_params
    else {
        return Err(Error::Malformed("expected ML-DSA+Ed25519 public params".into()));
    };

    if sig.len() < 64 {
        return Ok(false);
    }
    let mut buf = Bytes::copy_from_slice(sig);
    let ecc_sig_bytes = buf.copy_to_bytes(64);
    let mldsa_sig_bytes = buf;

    let Ok(verifying_key) = VerifyingKey::from_bytes(ecc_public) else {
        return Ok(false);
    };
    let sig_arr: [u8; 64] = match ecc_sig_bytes[..].try_into() {
        Ok(a) => a,
        Err(_) => return Ok(false),
    };
    let ecc_sig = ed25519_dalek::Signature::from_bytes(&sig_arr);
    let ecc_ok = verifying_key.verify(hashed, &ecc_sig).is_ok();

    let Ok(mldsa_pk) = mldsa65::PublicKey::from_bytes(mldsa_public) else {
        return Ok(false);
    };
    let Ok(mldsa_sig) = mldsa65::DetachedSignature::from_bytes(&mldsa_sig_bytes) else {
        return Ok(false);
    };
    let mldsa_ok = mldsa65::verify_detached_signature(&mldsa_sig, hashed, &mldsa_pk).is_ok();

    Ok(ecc_ok && mldsa_ok)
}

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (
        PublicParams::MlDsaEd25519 { ecc_public, .. },
        PrivateParams::MlDsaEd25519 { ecc_secret, .. },
    ) = (pub_params, priv_params)
    else {
        return false;
    };
    let signing_key = SigningKey::from_bytes(ecc_secret);
    &signing_key.verifying_key().to_bytes() == ecc_public
}
