//! Standalone SLH-DSA-SHAKE-128s (algorithm 108, spec.md §4.2.1). Fixed to
//! SHA3-256 pre-hashing — the only digest this algorithm accepts.

use bytes::Bytes;
use pqcrypto_sphincsplus::sphincsshake128ssimple as slh;
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use sha3::{Digest, Sha3_256};

use crate::error::{Error, Result};
use crate::params::{PrivateParams, PublicParams};

pub fn generate() -> (PublicParams, PrivateParams) {
    let (public, secret) = slh::keypair();
    (
        PublicParams::SlhDsa {
            public: public.as_bytes().to_vec(),
        },
        PrivateParams::SlhDsa {
            secret: secret.as_bytes().to_vec(),
        },
    )
}

pub fn required_digest(message: &[u8]) -> [u8; 32] {
    Sha3_256::digest(message).into()
}

pub fn sign(priv_params: &PrivateParams, hashed: &[u8]) -> Result<Bytes> {
    if hashed.len() != 32 {
        return Err(Error::HashTooWeak);
    }
    let PrivateParams::SlhDsa { secret } = priv_params else {
        return Err(Error::Malformed("expected SLH-DSA private params".into()));
    };
    let sk = slh::SecretKey::from_bytes(secret).map_err(|_| Error::KeyIsInvalid)?;
    let sig = slh::detached_sign(hashed, &sk);
    Ok(Bytes::copy_from_slice(sig.as_bytes()))
}

pub fn verify(pub_params: &PublicParams, sig: &[u8], hashed: &[u8]) -> Result<bool> {
    if hashed.len() != 32 {
        return Err(Error::HashTooWeak);
    }
    let PublicParams::SlhDsa { public } = pub_params else {
        return Err(Error::Malformed("expected SLH-DSA public params".into()));
    };
    let Ok(pk) = slh::PublicKey::from_bytes(public) else {
        return Ok(false);
    };
    let Ok(sig) = slh::DetachedSignature::from_bytes(sig) else {
        return Ok(false);
    };
    Ok(slh::verify_detached_signature(&sig, hashed, &pk).is_ok())
}

/// FIPS 205 §9.1 lays the secret key out as `SK.seed || SK.prf || PK.seed ||
/// PK.root`, with the public key being exactly the trailing `PK.seed ||
/// PK.root` half of it — so the public key can be re-derived by slicing the
/// secret key rather than needing a keygen round trip.
pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (PublicParams::SlhDsa { public }, PrivateParams::SlhDsa { secret }) =
        (pub_params, priv_params)
    else {
        return false;
    };
    if secret.len() < public.len() {
        return false;
    }
    &secret[secret.len() - public.len()..] == &public[..]
}
