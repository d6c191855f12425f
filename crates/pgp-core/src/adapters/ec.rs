//! ECDSA and (legacy, RFC 6637-style) ECDH over the NIST/secp256k1 curves
//! (spec.md §3's "ECDSA / ECDH (legacy)" row). Brainpool curve OIDs are
//! recognized (so key material parses) but every operation on them returns
//! `Unsupported` — no crate in the retrieval pack implements Brainpool
//! field/group arithmetic, and hand-rolling it is out of proportion to this
//! crate's scope (see DESIGN.md Open Questions).

use bytes::{Buf, BufMut, Bytes, BytesMut};
use ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use ecdsa::signature::Signature as _;
use rand::rngs::OsRng;

use crate::algorithm::{CurveOid, HashAlgorithm, SymAlgoId};
use crate::error::{Error, Result};
use crate::mpi::{left_pad, mpi_bytes, read_mpi};
use crate::wrap;

/// AES-key-wraps `plaintext` under `kek_bytes`, choosing the KW variant
/// (128/192/256) that matches `alg_sym`'s key size, per RFC 6637 §8 / RFC
/// 9580 §4.2's ECDH row — the KEK width follows the negotiated symmetric
/// algorithm, not a fixed 256 bits.
fn kek_wrap(alg_sym: SymAlgoId, kek_bytes: &[u8], plaintext: &[u8]) -> Result<Bytes> {
    let n = alg_sym.key_size();
    if kek_bytes.len() < n {
        return Err(Error::Malformed("short KEK".into()));
    }
    match n {
        16 => wrap::wrap_128(kek_bytes[..16].try_into().unwrap(), plaintext),
        24 => wrap::wrap_192(kek_bytes[..24].try_into().unwrap(), plaintext),
        32 => wrap::wrap_256(kek_bytes[..32].try_into().unwrap(), plaintext),
        other => Err(Error::Unsupported(format!("{other}-byte KEK"))),
    }
}

fn kek_unwrap(alg_sym: SymAlgoId, kek_bytes: &[u8], wrapped: &[u8]) -> Result<Bytes> {
    let n = alg_sym.key_size();
    if kek_bytes.len() < n {
        return Err(Error::Malformed("short KEK".into()));
    }
    match n {
        16 => wrap::unwrap_128(kek_bytes[..16].try_into().unwrap(), wrapped),
        24 => wrap::unwrap_192(kek_bytes[..24].try_into().unwrap(), wrapped),
        32 => wrap::unwrap_256(kek_bytes[..32].try_into().unwrap(), wrapped),
        other => Err(Error::Unsupported(format!("{other}-byte KEK"))),
    }
}

/// 20 octets representing "Anonymous Sender    ", per RFC 6637 §8.
const ANON_SENDER: [u8; 20] = [
    0x41, 0x6E, 0x6F, 0x6E, 0x79, 0x6D, 0x6F, 0x75, 0x73, 0x20, 0x53, 0x65, 0x6E, 0x64, 0x65, 0x72,
    0x20, 0x20, 0x20, 0x20,
];

macro_rules! ecdsa_curve {
    ($name_sign:ident, $name_verify:ident, $name_gen:ident, $krate:ident) => {
        fn $name_sign(d: &[u8], hashed: &[u8]) -> Result<Bytes> {
            use $krate::ecdsa::SigningKey;
            let key = SigningKey::from_bytes(d.into())
                .map_err(|_| Error::Malformed("invalid EC private scalar".into()))?;
            let sig: $krate::ecdsa::Signature = key
                .sign_prehash(hashed)
                .map_err(|_| Error::TransientSigningFailure)?;
            let (r, s) = sig.split_bytes();
            let mut out = BytesMut::new();
            out.extend_from_slice(&mpi_bytes(&r));
            out.extend_from_slice(&mpi_bytes(&s));
            Ok(out.freeze())
        }

        fn $name_verify(q: &[u8], sig: &[u8], hashed: &[u8], curve_size: usize) -> Result<bool> {
            use $krate::ecdsa::{Signature, VerifyingKey};
            let key = match VerifyingKey::from_sec1_bytes(q) {
                Ok(k) => k,
                Err(_) => return Ok(false),
            };
            let mut buf = Bytes::copy_from_slice(sig);
            let r = read_mpi(&mut buf)?;
            let s = read_mpi(&mut buf)?;
            let r = left_pad(&r, curve_size)?;
            let s = left_pad(&s, curve_size)?;
            let mut rs = Vec::with_capacity(curve_size * 2);
            rs.extend_from_slice(&r);
            rs.extend_from_slice(&s);
            let sig = match Signature::from_bytes(&rs) {
                Ok(s) => s,
                Err(_) => return Ok(false),
            };
            Ok(key.verify_prehash(hashed, &sig).is_ok())
        }

        #[allow(dead_code)]
        fn $name_gen() -> (Vec<u8>, Vec<u8>) {
            use $krate::ecdsa::SigningKey;
            let key = SigningKey::random(&mut OsRng);
            let d = key.to_bytes().to_vec();
            let q = key.verifying_key().to_encoded_point(false).as_bytes().to_vec();
            (q, d)
        }
    };
}

ecdsa_curve!(sign_p256, verify_p256, gen_p256, p256);
ecdsa_curve!(sign_p384, verify_p384, gen_p384, p384);
ecdsa_curve!(sign_p521, verify_p521, gen_p521, p521);
ecdsa_curve!(sign_k256, verify_k256, gen_k256, k256);

pub fn sign(curve: CurveOid, d: &[u8], hashed: &[u8]) -> Result<Bytes> {
    match curve {
        CurveOid::NistP256 => sign_p256(d, hashed),
        CurveOid::NistP384 => sign_p384(d, hashed),
        CurveOid::NistP521 => sign_p521(d, hashed),
        CurveOid::Secp256k1 => sign_k256(d, hashed),
        _ => Err(Error::Unsupported(format!("ECDSA over {curve:?}"))),
    }
}

/// Verifies, left-padding both `r` and `s` to the curve size before
/// checking, per spec.md §4.2.
pub fn verify(curve: CurveOid, q: &[u8], sig: &[u8], hashed: &[u8]) -> Result<bool> {
    let size = curve.scalar_size();
    match curve {
        CurveOid::NistP256 => verify_p256(q, sig, hashed, size),
        CurveOid::NistP384 => verify_p384(q, sig, hashed, size),
        CurveOid::NistP521 => verify_p521(q, sig, hashed, size),
        CurveOid::Secp256k1 => verify_k256(q, sig, hashed, size),
        _ => Err(Error::Unsupported(format!("ECDSA over {curve:?}"))),
    }
}

/// Builds the RFC 6637 §8 KDF parameter structure fed into the hash ahead
/// of the shared point.
pub fn build_ecdh_param(
    curve: CurveOid,
    hash: HashAlgorithm,
    alg_sym: SymAlgoId,
    fingerprint: &[u8],
) -> Vec<u8> {
    let kdf_params = vec![0x03, 0x01, hash.code(), alg_sym.code()];
    let oid = curve.oid_bytes();
    let oid_len = [oid.len() as u8];
    let pkalgo = [18u8]; // ECDH
    [
        &oid_len[..],
        oid,
        &pkalgo[..],
        &kdf_params[..],
        &ANON_SENDER[..],
        fingerprint,
    ]
    .concat()
}

fn kdf_hash(hash: HashAlgorithm, param: &[u8], shared_x: &[u8]) -> Result<Vec<u8>> {
    let mut input = Vec::with_capacity(4 + shared_x.len() + param.len());
    input.extend_from_slice(&[0, 0, 0, 1]);
    input.extend_from_slice(shared_x);
    input.extend_from_slice(param);
    Ok(match hash {
        HashAlgorithm::Sha256 => {
            use sha2::{Digest, Sha256};
            Sha256::digest(&input).to_vec()
        }
        HashAlgorithm::Sha384 => {
            use sha2::{Digest, Sha384};
            Sha384::digest(&input).to_vec()
        }
        HashAlgorithm::Sha512 => {
            use sha2::{Digest, Sha512};
            Sha512::digest(&input).to_vec()
        }
        other => return Err(Error::Unsupported(format!("ECDH KDF hash {other:?}"))),
    })
}

macro_rules! ecdh_curve {
    ($name_dh:ident, $krate:ident) => {
        fn $name_dh(our_d: &[u8], their_q: &[u8]) -> Result<Vec<u8>> {
            use $krate::ecdh::diffie_hellman;
            use $krate::{PublicKey, SecretKey};
            let sk = SecretKey::from_bytes(our_d.into())
                .map_err(|_| Error::Malformed("invalid EC private scalar".into()))?;
            let pk = PublicKey::from_sec1_bytes(their_q)
                .map_err(|_| Error::Malformed("invalid EC public point".into()))?;
            let shared = diffie_hellman(sk.to_nonzero_scalar(), pk.as_affine());
            Ok(shared.raw_secret_bytes().to_vec())
        }
    };
}

ecdh_curve!(dh_p256, p256);
ecdh_curve!(dh_p384, p384);
ecdh_curve!(dh_p521, p521);

fn ecdh_shared_x(curve: CurveOid, d: &[u8], q: &[u8]) -> Result<Vec<u8>> {
    match curve {
        CurveOid::NistP256 => dh_p256(d, q),
        CurveOid::NistP384 => dh_p384(d, q),
        CurveOid::NistP521 => dh_p521(d, q),
        _ => Err(Error::Unsupported(format!("ECDH over {curve:?}"))),
    }
}

/// Legacy (RFC 6637) ECDH encrypt: generates an ephemeral keypair, derives
/// the KEK, and AES-key-wraps `session_key`. Returns `ephemeral_point ||
/// wrapped`.
pub fn encrypt(
    curve: CurveOid,
    their_q: &[u8],
    hash: HashAlgorithm,
    alg_sym: SymAlgoId,
    fingerprint: &[u8],
    session_key: &[u8],
) -> Result<Bytes> {
    // Ephemeral key generation reuses the per-curve signing-key RNG path:
    // an ECDSA scalar is a valid Diffie-Hellman scalar on the same curve.
    let (eph_q, eph_d) = match curve {
        CurveOid::NistP256 => gen_p256(),
        CurveOid::NistP384 => gen_p384(),
        CurveOid::NistP521 => gen_p521(),
        _ => return Err(Error::Unsupported(format!("ECDH over {curve:?}"))),
    };
    let shared_x = ecdh_shared_x(curve, &eph_d, their_q)?;
    let param = build_ecdh_param(curve, hash, alg_sym, fingerprint);
    let kek_bytes = kdf_hash(hash, &param, &shared_x)?;
    let wrapped = kek_wrap(alg_sym, &kek_bytes, session_key)?;

    let mut out = BytesMut::new();
    out.extend_from_slice(&mpi_bytes(&eph_q));
    out.put_u8(wrapped.len() as u8);
    out.extend_from_slice(&wrapped);
    Ok(out.freeze())
}

/// Legacy ECDH decrypt, mirroring [`encrypt`].
pub fn decrypt(
    curve: CurveOid,
    our_d: &[u8],
    hash: HashAlgorithm,
    alg_sym: SymAlgoId,
    fingerprint: &[u8],
    ct: &[u8],
    random_payload: Option<&[u8]>,
) -> Result<Bytes> {
    let decode = || -> Result<Bytes> {
        let mut buf = Bytes::copy_from_slice(ct);
        let eph_q = read_mpi(&mut buf)?;
        if buf.remaining() < 1 {
            return Err(Error::Malformed("truncated ECDH wrap length".into()));
        }
        let wrap_len = buf[0] as usize;
        buf.advance(1);
        if buf.remaining() < wrap_len {
            return Err(Error::Malformed("truncated ECDH wrapped key".into()));
        }
        let wrapped = buf.copy_to_bytes(wrap_len);

        let shared_x = ecdh_shared_x(curve, our_d, &eph_q)?;
        let param = build_ecdh_param(curve, hash, alg_sym, fingerprint);
        let kek_bytes = kdf_hash(hash, &param, &shared_x)?;
        kek_unwrap(alg_sym, &kek_bytes, &wrapped)
    };

    match decode() {
        Ok(pt) => Ok(pt),
        Err(e) => match random_payload {
            Some(r) => Ok(Bytes::copy_from_slice(r)),
            None => Err(e),
        },
    }
}
