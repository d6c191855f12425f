//! RSA sign/verify/encrypt/decrypt (spec.md §4.2: "RSA sign/verify").
//!
//! Grounded on the `rsa` crate, the same crate the in-pack `pgp` (rpgp)
//! manifest depends on for RSA (`other_examples/manifests/yonasBSD-rpgp/Cargo.toml`).

use ::rsa::pkcs1v15::{Pkcs1v15Encrypt, Pkcs1v15Sign};
use ::rsa::traits::PublicKeyParts;
use ::rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use bytes::Bytes;
use rand::rngs::OsRng;

use crate::algorithm::HashAlgorithm;
use crate::error::{Error, Result};
use crate::mpi::left_pad;
use crate::params::{PrivateParams, PublicParams};

fn asn1_prefix(hash: HashAlgorithm) -> Result<&'static [u8]> {
    // DigestInfo prefixes, RFC 8017 Appendix A.2.4 / AlgorithmIdentifier DER.
    Ok(match hash {
        HashAlgorithm::Sha256 => {
            &[
                0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x01, 0x05, 0x00, 0x04, 0x20,
            ]
        }
        HashAlgorithm::Sha384 => {
            &[
                0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x02, 0x05, 0x00, 0x04, 0x30,
            ]
        }
        HashAlgorithm::Sha512 => {
            &[
                0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x03, 0x05, 0x00, 0x04, 0x40,
            ]
        }
        HashAlgorithm::Sha1 => {
            &[
                0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00,
                0x04, 0x14,
            ]
        }
        other => return Err(Error::Unsupported(format!("RSA signing hash {other:?}"))),
    })
}

fn to_public_key(params: &PublicParams) -> Result<RsaPublicKey> {
    let PublicParams::Rsa { n, e } = params else {
        return Err(Error::Malformed("expected RSA public params".into()));
    };
    RsaPublicKey::new(BigUint::from_bytes_be(n), BigUint::from_bytes_be(e))
        .map_err(|_| Error::Malformed("invalid RSA public key".into()))
}

fn to_private_key(pub_params: &PublicParams, priv_params: &PrivateParams) -> Result<RsaPrivateKey> {
    let PublicParams::Rsa { n, e } = pub_params else {
        return Err(Error::Malformed("expected RSA public params".into()));
    };
    let PrivateParams::Rsa { d, p, q, .. } = priv_params else {
        return Err(Error::Malformed("expected RSA private params".into()));
    };
    let key = RsaPrivateKey::from_components(
        BigUint::from_bytes_be(n),
        BigUint::from_bytes_be(e),
        BigUint::from_bytes_be(d),
        vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)],
    )
    .map_err(|_| Error::Malformed("invalid RSA private key".into()))?;
    Ok(key)
}

/// Signs a pre-hashed digest. `hashed` is the raw digest (EMSA-PKCS1-v1.5
/// padding is applied here, not by the caller).
pub fn sign(
    hash: HashAlgorithm,
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    hashed: &[u8],
) -> Result<Bytes> {
    let key = to_private_key(pub_params, priv_params)?;
    let prefix = asn1_prefix(hash)?;
    let scheme = Pkcs1v15Sign {
        hash_len: Some(hashed.len()),
        prefix: prefix.into(),
    };
    let sig = key
        .sign(scheme, hashed)
        .map_err(|_| Error::TransientSigningFailure)?;
    Ok(Bytes::from(sig))
}

/// Verifies `sig` against `hashed`. `sig` must be left-padded to `len(n)`
/// before the modular exponentiation, per spec.md §4.2.
pub fn verify(hash: HashAlgorithm, pub_params: &PublicParams, sig: &[u8], hashed: &[u8]) -> Result<bool> {
    let key = to_public_key(pub_params)?;
    let n_len = (key.n().bits() + 7) / 8;
    let padded_sig = left_pad(sig, n_len)?;
    let prefix = asn1_prefix(hash)?;
    let scheme = Pkcs1v15Sign {
        hash_len: Some(hashed.len()),
        prefix: prefix.into(),
    };
    Ok(key.verify(scheme, hashed, &padded_sig).is_ok())
}

pub fn encrypt(pub_params: &PublicParams, data: &[u8]) -> Result<Bytes> {
    let key = to_public_key(pub_params)?;
    let mut rng = OsRng;
    let ct = key
        .encrypt(&mut rng, Pkcs1v15Encrypt, data)
        .map_err(|_| Error::DecryptionError)?;
    Ok(Bytes::from(ct))
}

/// Decrypts `ct`. On any PKCS#1 v1.5 padding failure, if `random_payload` is
/// supplied, that value is returned instead of propagating the error — the
/// constant-time oracle defense described in spec.md §4.2/§7. `rsa`'s own
/// `decrypt` already implements Bleichenbacher countermeasures internally by
/// returning a generic error on any padding failure; this layer just decides
/// whether to surface that error or substitute the caller-supplied random
/// bytes.
pub fn decrypt(
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    ct: &[u8],
    random_payload: Option<&[u8]>,
) -> Result<Bytes> {
    let key = to_private_key(pub_params, priv_params)?;
    match key.decrypt(Pkcs1v15Encrypt, ct) {
        Ok(pt) => Ok(Bytes::from(pt)),
        Err(_) => match random_payload {
            Some(r) => Ok(Bytes::copy_from_slice(r)),
            None => Err(Error::DecryptionError),
        },
    }
}

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    to_private_key(pub_params, priv_params).is_ok()
}
