//! Legacy EdDSA (algorithm 22, tag `eddsaLegacy` in spec.md §1) — Ed25519
//! only, native point encoded as `0x40 || a` per RFC 9580 §5.5.5.6, and
//! signatures carried as two left-padded MPIs rather than a single 64-byte
//! blob the way native Ed25519 (algorithm 27) does it.

use bytes::{Bytes, BytesMut};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use crate::algorithm::CurveOid;
use crate::error::{Error, Result};
use crate::mpi::{left_pad, mpi_bytes, read_mpi};
use crate::params::{PrivateParams, PublicParams};

const NATIVE_POINT_PREFIX: u8 = 0x40;

pub fn sign(curve: CurveOid, priv_params: &PrivateParams, hashed: &[u8]) -> Result<Bytes> {
    if curve != CurveOid::Ed25519Legacy {
        return Err(Error::Unsupported(format!("EdDSA-legacy over {curve:?}")));
    }
    let PrivateParams::EddsaLegacy { seed } = priv_params else {
        return Err(Error::Malformed("expected EdDSA-legacy private params".into()));
    };
    let signing_key = SigningKey::from_bytes(seed);
    let sig = signing_key.sign(hashed);
    let (r, s) = sig.to_bytes().split_at(32);
    let mut out = BytesMut::new();
    out.extend_from_slice(&mpi_bytes(r));
    out.extend_from_slice(&mpi_bytes(s));
    Ok(out.freeze())
}

pub fn verify(curve: CurveOid, pub_params: &PublicParams, sig: &[u8], hashed: &[u8]) -> Result<bool> {
    if curve != CurveOid::Ed25519Legacy {
        return Err(Error::Unsupported(format!("EdDSA-legacy over {curve:?}")));
    }
    let PublicParams::EddsaLegacy { q, .. } = pub_params else {
        return Err(Error::Malformed("expected EdDSA-legacy public params".into()));
    };
    if q[0] != NATIVE_POINT_PREFIX {
        return Err(Error::Malformed("EdDSA-legacy point missing 0x40 prefix".into()));
    }
    let Ok(verifying_key) = VerifyingKey::from_bytes(&q[1..33].try_into().unwrap()) else {
        return Ok(false);
    };

    let mut buf = Bytes::copy_from_slice(sig);
    let r = read_mpi(&mut buf)?;
    let s = read_mpi(&mut buf)?;
    let r = left_pad(&r, 32)?;
    let s = left_pad(&s, 32)?;
    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&r);
    rs[32..].copy_from_slice(&s);
    let sig = ed25519_dalek::Signature::from_bytes(&rs);
    Ok(verifying_key.verify(hashed, &sig).is_ok())
}

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (PublicParams::EddsaLegacy { q, .. }, PrivateParams::EddsaLegacy { seed }) =
        (pub_params, priv_params)
    else {
        return false;
    };
    if q[0] != NATIVE_POINT_PREFIX {
        return false;
    }
    let signing_key = SigningKey::from_bytes(seed);
    signing_key.verifying_key().to_bytes() == q[1..33]
}
