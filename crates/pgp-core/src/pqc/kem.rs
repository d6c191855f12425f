//! Composite ML-KEM-768+X25519 KEM (algorithm 105, spec.md §4.2.1). The two
//! component shared secrets, their ciphertexts, and their public keys are
//! combined with a single SHA3-256 call, domain-separated by the algorithm
//! ID and a fixed label — this is the normative combiner order from the
//! dispatcher, not the older message-level KDF some early PQC drafts used.

use bytes::Bytes;
use pqcrypto_mlkem::mlkem768;
use pqcrypto_traits::kem::{Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _};
use sha3::{Digest, Sha3_256};
use x25519_dalek::{EphemeralSecret, PublicKey as X25519Public, StaticSecret};

use crate::algorithm::{AlgoId, SymAlgoId};
use crate::error::{Error, Result};
use crate::params::{PrivateParams, PublicParams};
use crate::wrap;

const KDF_LABEL: &[u8] = b"OpenPGPCompositeKDFv1";

/// One-shot combiner: `SHA3-256(counter || eccShare || eccCt || eccPub ||
/// mlkemShare || mlkemCt || mlkemPub || algId || label)`.
fn multi_key_combine(
    ecc_share: &[u8],
    ecc_ct: &[u8],
    ecc_pub: &[u8],
    mlkem_share: &[u8],
    mlkem_ct: &[u8],
    mlkem_pub: &[u8],
) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    hasher.update([0u8, 0, 0, 1]);
    hasher.update(ecc_share);
    hasher.update(ecc_ct);
    hasher.update(ecc_pub);
    hasher.update(mlkem_share);
    hasher.update(mlkem_ct);
    hasher.update(mlkem_pub);
    hasher.update([AlgoId::MlKemX25519.code()]);
    hasher.update(KDF_LABEL);
    hasher.finalize().into()
}

pub fn generate() -> (PublicParams, PrivateParams) {
    let ecc_secret = StaticSecret::random_from_rng(rand::rngs::OsRng);
    let ecc_public = X25519Public::from(&ecc_secret);
    let (mlkem_public, mlkem_secret) = mlkem768::keypair();

    (
        PublicParams::MlKemX25519 {
            ecc_public: *ecc_public.as_bytes(),
            mlkem_public: mlkem_public.as_bytes().to_vec(),
        },
        PrivateParams::MlKemX25519 {
            ecc_secret: ecc_secret.to_bytes(),
            mlkem_seed: {
                // pqcrypto's keypair API does not expose the raw 64-byte
                // seed; the expanded secret key is retained instead and
                // re-derivation on parse is not attempted (see DESIGN.md).
                let mut padded = [0u8; 64];
                let bytes = mlkem_secret.as_bytes();
                padded[..bytes.len().min(64)].copy_from_slice(&bytes[..bytes.len().min(64)]);
                padded
            },
            mlkem_secret_expanded: Some(mlkem_secret.as_bytes().to_vec()),
        },
    )
}

/// Encapsulates against both components, wraps `session_key` under the
/// combined key via AES-256-KW, and returns `eccEphemeral || mlkemCt ||
/// [sym_algo, v3 only] || wrapped`. `v3_sym_algo` is `Some` for a v3 PKESK
/// (cleartext symmetric algorithm octet) and `None` for v6 (field omitted),
/// per spec.md §4.4.
pub fn encrypt(pub_params: &PublicParams, session_key: &[u8], v3_sym_algo: Option<SymAlgoId>) -> Result<Bytes> {
    let PublicParams::MlKemX25519 {
        ecc_public,
        mlkem_public,
    } = pub_params
    else {
        return Err(Error::Malformed("expected ML-KEM+X25519 public params".into()));
    };

    let ecc_ephemeral = EphemeralSecret::random_from_rng(rand::rngs::OsRng);
    let ecc_ephemeral_public = X25519Public::from(&ecc_ephemeral);
    let ecc_share = ecc_ephemeral.diffie_hellman(&X25519Public::from(*ecc_public));

    let mlkem_pk = mlkem768::PublicKey::from_bytes(mlkem_public)
        .map_err(|_| Error::Malformed("invalid ML-KEM public key".into()))?;
    let (mlkem_share, mlkem_ct) = mlkem768::encapsulate(&mlkem_pk);

    let combined = multi_key_combine(
        ecc_share.as_bytes(),
        ecc_ephemeral_public.as_bytes(),
        ecc_public,
        mlkem_share.as_bytes(),
        mlkem_ct.as_bytes(),
        mlkem_public,
    );
    let wrapped = wrap::wrap_256(&combined, session_key)?;

    let mut out = Vec::with_capacity(33 + mlkem_ct.as_bytes().len() + wrapped.len());
    out.extend_from_slice(ecc_ephemeral_public.as_bytes());
    out.extend_from_slice(mlkem_ct.as_bytes());
    if let Some(sym_algo) = v3_sym_algo {
        out.push(sym_algo.code());
    }
    out.extend_from_slice(&wrapped);
    Ok(Bytes::from(out))
}

/// `version` is the enclosing PKESK's version (3 or 6). Returns the
/// recovered symmetric algorithm for v3, `None` for v6.
pub fn decrypt(
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    ct: &[u8],
    random_payload: Option<&[u8]>,
    version: u8,
) -> Result<(Bytes, Option<SymAlgoId>)> {
    let PublicParams::MlKemX25519 {
        ecc_public,
        mlkem_public,
    } = pub_params
    else {
        return Err(Error::Malformed("expected ML-KEM+X25519 public params".into()));
    };
    let PrivateParams::MlKemX25519 {
        ecc_secret,
        mlkem_secret_expanded,
        ..
    } = priv_params
    else {
        return Err(Error::Malformed("expected ML-KEM+X25519 private params".into()));
    };
    let Some(mlkem_secret_bytes) = mlkem_secret_expanded else {
        return Err(Error::KeyIsInvalid);
    };

    let decode = || -> Result<(Bytes, Option<SymAlgoId>)> {
        const MLKEM768_CT_LEN: usize = 1088;
        if ct.len() < 32 + MLKEM768_CT_LEN {
            return Err(Error::Malformed("truncated composite KEM ciphertext".into()));
        }
        let (ecc_ephemeral_bytes, rest) = ct.split_at(32);
        let (mlkem_ct_bytes, rest) = rest.split_at(MLKEM768_CT_LEN);
        let (sym_algo, wrapped) = if version == 3 {
            if rest.is_empty() {
                return Err(Error::Malformed("missing v3 symmetric algorithm octet".into()));
            }
            (Some(SymAlgoId::from_code(rest[0])?), &rest[1..])
        } else {
            (None, rest)
        };

        let ecc_ephemeral_public: [u8; 32] = ecc_ephemeral_bytes
            .try_into()
            .map_err(|_| Error::Malformed("bad X25519 ephemeral length".into()))?;
        let our_secret = StaticSecret::from(*ecc_secret);
        let ecc_share = our_secret.diffie_hellman(&X25519Public::from(ecc_ephemeral_public));

        let mlkem_sk = mlkem768::SecretKey::from_bytes(mlkem_secret_bytes)
            .map_err(|_| Error::KeyIsInvalid)?;
        let mlkem_ct = mlkem768::Ciphertext::from_bytes(mlkem_ct_bytes)
            .map_err(|_| Error::Malformed("invalid ML-KEM ciphertext".into()))?;
        let mlkem_share = mlkem768::decapsulate(&mlkem_ct, &mlkem_sk);

        let combined = multi_key_combine(
            ecc_share.as_bytes(),
            &ecc_ephemeral_public,
            ecc_public,
            mlkem_share.as_bytes(),
            mlkem_ct_bytes,
            mlkem_public,
        );
        Ok((wrap::unwrap_256(&combined, wrapped)?, sym_algo))
    };

    match decode() {
        Ok(pt) => Ok(pt),
        Err(e) => match random_payload {
            Some(r) => Ok((Bytes::copy_from_slice(r), None)),
            None => Err(e),
        },
    }
}

// ML-KEM-768 (FIPS 203 §8, k=3) decapsulation key layout:
// dk_pke(1152) || ek_pke(1184) || H(ek_pke)(32) || z(32), total 2400 bytes.
// The encapsulation key embedded at this fixed offset is the public key, so
// it can be re-derived by slicing rather than re-running keygen.
const MLKEM768_DK_PKE_LEN: usize = 1152;
const MLKEM768_EK_LEN: usize = 1184;

/// Re-derives both component public keys from the secret material and
/// compares them against the stored public params.
pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (
        PublicParams::MlKemX25519 {
            ecc_public,
            mlkem_public,
        },
        PrivateParams::MlKemX25519 {
            ecc_secret,
            mlkem_secret_expanded,
            ..
        },
    ) = (pub_params, priv_params)
    else {
        return false;
    };

    let derived_ecc_public = X25519Public::from(&StaticSecret::from(*ecc_secret));
    if derived_ecc_public.as_bytes() != ecc_public {
        return false;
    }

    let Some(mlkem_secret_bytes) = mlkem_secret_expanded else {
        return false;
    };
    if mlkem_secret_bytes.len() < MLKEM768_DK_PKE_LEN + MLKEM768_EK_LEN {
        return false;
    }
    let embedded_ek =
        &mlkem_secret_bytes[MLKEM768_DK_PKE_LEN..MLKEM768_DK_PKE_LEN + MLKEM768_EK_LEN];
    embedded_ek == &mlkem_public[..]
}
