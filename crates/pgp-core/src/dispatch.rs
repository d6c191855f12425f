//! The single algorithm dispatcher (C5): one `sign`/`verify`/`encrypt`/
//! `decrypt`/`generate`/`validate` entry point per operation, switching on
//! [`AlgoId`] to call into the right adapter or PQC module. Also owns the
//! wire-format (de)serialization of [`PublicParams`]/[`PrivateParams`],
//! since that format is itself algorithm-dependent (spec.md §4.3).

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::adapters;
use crate::algorithm::{AlgoId, CurveOid, HashAlgorithm, SymAlgoId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::mpi::{mpi_bytes, read_exact, read_mpi};
use crate::params::{PrivateParams, PublicParams};
use crate::pqc;

/// Parses the algorithm-specific public key fields, per spec.md §4.3's
/// table. `buf` must be positioned right after the algorithm octet.
pub fn parse_public_key_params(algo: AlgoId, buf: &mut Bytes) -> Result<PublicParams> {
    Ok(match algo {
        AlgoId::RsaEncryptSign | AlgoId::RsaEncryptOnly | AlgoId::RsaSignOnly => {
            PublicParams::Rsa {
                n: read_mpi(buf)?,
                e: read_mpi(buf)?,
            }
        }
        AlgoId::Dsa => PublicParams::Dsa {
            p: read_mpi(buf)?,
            q: read_mpi(buf)?,
            g: read_mpi(buf)?,
            y: read_mpi(buf)?,
        },
        AlgoId::ElgamalEncryptOnly | AlgoId::ElgamalEncryptSign => PublicParams::Elgamal {
            p: read_mpi(buf)?,
            g: read_mpi(buf)?,
            y: read_mpi(buf)?,
        },
        AlgoId::Ecdsa => {
            let curve = read_curve_oid(buf)?;
            PublicParams::Ecdsa {
                curve,
                q: read_mpi(buf)?,
            }
        }
        AlgoId::Ecdh => {
            let curve = read_curve_oid(buf)?;
            let q = read_mpi(buf)?;
            if buf.remaining() < 4 {
                return Err(Error::Malformed("truncated ECDH KDF parameters".into()));
            }
            let kdf_len = buf.get_u8();
            if kdf_len != 3 {
                return Err(Error::Malformed("unexpected ECDH KDF parameter length".into()));
            }
            let reserved = buf.get_u8();
            if reserved != 1 {
                return Err(Error::Malformed("unexpected ECDH KDF reserved octet".into()));
            }
            let hash = HashAlgorithm::from_code(buf.get_u8())?;
            let sym = SymAlgoId::from_code(buf.get_u8())?;
            PublicParams::Ecdh { curve, q, hash, sym }
        }
        AlgoId::EddsaLegacy => {
            let curve = read_curve_oid(buf)?;
            let q = read_mpi(buf)?;
            let q: [u8; 33] = q[..]
                .try_into()
                .map_err(|_| Error::Malformed("EdDSA-legacy point must be 33 bytes".into()))?;
            PublicParams::EddsaLegacy { curve, q }
        }
        AlgoId::Ed25519 => PublicParams::Ed25519 {
            a: fixed::<32>(&read_exact(buf, 32)?)?,
        },
        AlgoId::Ed448 => PublicParams::Ed448 {
            a: fixed::<57>(&read_exact(buf, 57)?)?,
        },
        AlgoId::X25519 => PublicParams::X25519 {
            a: fixed::<32>(&read_exact(buf, 32)?)?,
        },
        AlgoId::X448 => PublicParams::X448 {
            a: fixed::<56>(&read_exact(buf, 56)?)?,
        },
        AlgoId::Hmac => PublicParams::Hmac {
            tag: buf.get_u8(),
            binding: fixed::<32>(&read_exact(buf, 32)?)?,
        },
        AlgoId::Aead => PublicParams::Aead {
            tag: buf.get_u8(),
            binding: fixed::<32>(&read_exact(buf, 32)?)?,
        },
        AlgoId::MlKemX25519 => PublicParams::MlKemX25519 {
            ecc_public: fixed::<32>(&read_exact(buf, 32)?)?,
            mlkem_public: read_exact(buf, 1184)?.to_vec(),
        },
        AlgoId::MlDsaEd25519 => PublicParams::MlDsaEd25519 {
            ecc_public: fixed::<32>(&read_exact(buf, 32)?)?,
            mldsa_public: read_exact(buf, 1952)?.to_vec(),
        },
        AlgoId::SlhDsaShake128s => PublicParams::SlhDsa {
            public: read_exact(buf, 32)?.to_vec(),
        },
        other => return Err(Error::Unsupported(format!("public params for {other:?}"))),
    })
}

pub fn serialize_public_key_params(out: &mut BytesMut, params: &PublicParams) {
    match params {
        PublicParams::Rsa { n, e } => {
            out.extend_from_slice(&mpi_bytes(n));
            out.extend_from_slice(&mpi_bytes(e));
        }
        PublicParams::Dsa { p, q, g, y } => {
            out.extend_from_slice(&mpi_bytes(p));
            out.extend_from_slice(&mpi_bytes(q));
            out.extend_from_slice(&mpi_bytes(g));
            out.extend_from_slice(&mpi_bytes(y));
        }
        PublicParams::Elgamal { p, g, y } => {
            out.extend_from_slice(&mpi_bytes(p));
            out.extend_from_slice(&mpi_bytes(g));
            out.extend_from_slice(&mpi_bytes(y));
        }
        PublicParams::Ecdsa { curve, q } => {
            write_curve_oid(out, *curve);
            out.extend_from_slice(&mpi_bytes(q));
        }
        PublicParams::Ecdh { curve, q, hash, sym } => {
            write_curve_oid(out, *curve);
            out.extend_from_slice(&mpi_bytes(q));
            out.put_u8(3);
            out.put_u8(1);
            out.put_u8(hash.code());
            out.put_u8(sym.code());
        }
        PublicParams::EddsaLegacy { curve, q } => {
            write_curve_oid(out, *curve);
            out.extend_from_slice(&mpi_bytes(q));
        }
        PublicParams::Ed25519 { a } => out.extend_from_slice(a),
        PublicParams::Ed448 { a } => out.extend_from_slice(a),
        PublicParams::X25519 { a } => out.extend_from_slice(a),
        PublicParams::X448 { a } => out.extend_from_slice(a),
        PublicParams::Hmac { tag, binding } => {
            out.put_u8(*tag);
            out.extend_from_slice(binding);
        }
        PublicParams::Aead { tag, binding } => {
            out.put_u8(*tag);
            out.extend_from_slice(binding);
        }
        PublicParams::MlKemX25519 {
            ecc_public,
            mlkem_public,
        } => {
            out.extend_from_slice(ecc_public);
            out.extend_from_slice(mlkem_public);
        }
        PublicParams::MlDsaEd25519 {
            ecc_public,
            mldsa_public,
        } => {
            out.extend_from_slice(ecc_public);
            out.extend_from_slice(mldsa_public);
        }
        PublicParams::SlhDsa { public } => out.extend_from_slice(public),
    }
}

fn read_curve_oid(buf: &mut Bytes) -> Result<CurveOid> {
    if buf.remaining() < 1 {
        return Err(Error::Malformed("truncated curve OID length".into()));
    }
    let len = buf.get_u8() as usize;
    let oid = read_exact(buf, len)?;
    CurveOid::from_oid_bytes(&oid)
}

fn write_curve_oid(out: &mut BytesMut, curve: CurveOid) {
    let oid = curve.oid_bytes();
    out.put_u8(oid.len() as u8);
    out.extend_from_slice(oid);
}

fn fixed<const N: usize>(b: &Bytes) -> Result<[u8; N]> {
    b[..].try_into().map_err(|_| Error::Malformed(format!("expected {N} bytes")))
}

/// Parses the algorithm-specific private key fields. `public` carries the
/// already-parsed public parameters, needed to know field widths for the
/// native (non-MPI) algorithms.
pub fn parse_private_key_params(public: &PublicParams, buf: &mut Bytes) -> Result<PrivateParams> {
    Ok(match public {
        PublicParams::Rsa { .. } => PrivateParams::Rsa {
            d: read_mpi(buf)?.to_vec(),
            p: read_mpi(buf)?.to_vec(),
            q: read_mpi(buf)?.to_vec(),
            u: read_mpi(buf)?.to_vec(),
        },
        PublicParams::Dsa { .. } => PrivateParams::Dsa { x: read_mpi(buf)?.to_vec() },
        PublicParams::Elgamal { .. } => PrivateParams::Elgamal { x: read_mpi(buf)?.to_vec() },
        PublicParams::Ecdsa { .. } => PrivateParams::Ecdsa { d: read_mpi(buf)?.to_vec() },
        PublicParams::Ecdh { .. } => PrivateParams::Ecdh { d: read_mpi(buf)?.to_vec() },
        PublicParams::EddsaLegacy { .. } => PrivateParams::EddsaLegacy {
            seed: fixed::<32>(&read_exact(buf, 32)?)?,
        },
        PublicParams::Ed25519 { .. } => PrivateParams::Ed25519 {
            seed: fixed::<32>(&read_exact(buf, 32)?)?,
        },
        PublicParams::Ed448 { .. } => PrivateParams::Ed448 {
            seed: fixed::<57>(&read_exact(buf, 57)?)?,
        },
        PublicParams::X25519 { .. } => PrivateParams::X25519 {
            k: fixed::<32>(&read_exact(buf, 32)?)?,
        },
        PublicParams::X448 { .. } => PrivateParams::X448 {
            k: fixed::<56>(&read_exact(buf, 56)?)?,
        },
        PublicParams::Hmac { .. } => PrivateParams::Hmac {
            hash_seed: fixed::<32>(&read_exact(buf, 32)?)?,
            key_material: buf.copy_to_bytes(buf.remaining()).to_vec(),
        },
        PublicParams::Aead { .. } => PrivateParams::Aead {
            hash_seed: fixed::<32>(&read_exact(buf, 32)?)?,
            key_material: buf.copy_to_bytes(buf.remaining()).to_vec(),
        },
        PublicParams::MlKemX25519 { .. } => {
            let ecc_secret = fixed::<32>(&read_exact(buf, 32)?)?;
            let mlkem_seed = fixed::<64>(&read_exact(buf, 64)?)?;
            PrivateParams::MlKemX25519 {
                ecc_secret,
                mlkem_seed,
                mlkem_secret_expanded: None,
            }
        }
        PublicParams::MlDsaEd25519 { .. } => {
            let ecc_secret = fixed::<32>(&read_exact(buf, 32)?)?;
            let mldsa_seed = fixed::<32>(&read_exact(buf, 32)?)?;
            PrivateParams::MlDsaEd25519 {
                ecc_secret,
                mldsa_seed,
                mldsa_secret_expanded: None,
            }
        }
        PublicParams::SlhDsa { .. } => PrivateParams::SlhDsa {
            secret: buf.copy_to_bytes(buf.remaining()).to_vec(),
        },
    })
}

pub fn serialize_private_key_params(out: &mut BytesMut, params: &PrivateParams) {
    match params {
        PrivateParams::Rsa { d, p, q, u } => {
            out.extend_from_slice(&mpi_bytes(d));
            out.extend_from_slice(&mpi_bytes(p));
            out.extend_from_slice(&mpi_bytes(q));
            out.extend_from_slice(&mpi_bytes(u));
        }
        PrivateParams::Dsa { x } => out.extend_from_slice(&mpi_bytes(x)),
        PrivateParams::Elgamal { x } => out.extend_from_slice(&mpi_bytes(x)),
        PrivateParams::Ecdsa { d } => out.extend_from_slice(&mpi_bytes(d)),
        PrivateParams::Ecdh { d } => out.extend_from_slice(&mpi_bytes(d)),
        PrivateParams::EddsaLegacy { seed } => out.extend_from_slice(seed),
        PrivateParams::Ed25519 { seed } => out.extend_from_slice(seed),
        PrivateParams::Ed448 { seed } => out.extend_from_slice(seed),
        PrivateParams::X25519 { k } => out.extend_from_slice(k),
        PrivateParams::X448 { k } => out.extend_from_slice(k),
        PrivateParams::Hmac {
            hash_seed,
            key_material,
        } => {
            out.extend_from_slice(hash_seed);
            out.extend_from_slice(key_material);
        }
        PrivateParams::Aead {
            hash_seed,
            key_material,
        } => {
            out.extend_from_slice(hash_seed);
            out.extend_from_slice(key_material);
        }
        PrivateParams::MlKemX25519 {
            ecc_secret,
            mlkem_seed,
            ..
        } => {
            out.extend_from_slice(ecc_secret);
            out.extend_from_slice(mlkem_seed);
        }
        PrivateParams::MlDsaEd25519 {
            ecc_secret,
            mldsa_seed,
            ..
        } => {
            out.extend_from_slice(ecc_secret);
            out.extend_from_slice(mldsa_seed);
        }
        PrivateParams::SlhDsa { secret } => out.extend_from_slice(secret),
    }
}

pub fn sign(
    hash: HashAlgorithm,
    config: &Config,
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    hashed: &[u8],
) -> Result<Bytes> {
    match pub_params.algo() {
        AlgoId::RsaEncryptSign | AlgoId::RsaSignOnly => adapters::rsa::sign(hash, pub_params, priv_params, hashed),
        AlgoId::Dsa => adapters::dsa::sign(pub_params, priv_params, hashed),
        AlgoId::ElgamalEncryptSign => Err(Error::Unsupported("ElGamal signing is not defined".into())),
        AlgoId::Ecdsa => {
            let PublicParams::Ecdsa { curve, .. } = pub_params else {
                unreachable!()
            };
            let PrivateParams::Ecdsa { d } = priv_params else {
                return Err(Error::Malformed("expected ECDSA private params".into()));
            };
            adapters::ec::sign(*curve, d, hashed)
        }
        AlgoId::EddsaLegacy => {
            let PublicParams::EddsaLegacy { curve, .. } = pub_params else {
                unreachable!()
            };
            adapters::eddsa_legacy::sign(*curve, priv_params, hashed)
        }
        AlgoId::Ed25519 => adapters::ed25519::sign(hash, config, priv_params, hashed),
        AlgoId::Ed448 => adapters::ed448::sign(hash, config, priv_params, hashed),
        AlgoId::MlDsaEd25519 => pqc::dsa::sign(priv_params, hashed),
        AlgoId::SlhDsaShake128s => pqc::slhdsa::sign(priv_params, hashed),
        other => Err(Error::Unsupported(format!("signing with {other:?}"))),
    }
}

pub fn verify(
    hash: HashAlgorithm,
    pub_params: &PublicParams,
    sig: &[u8],
    hashed: &[u8],
) -> Result<bool> {
    match pub_params.algo() {
        AlgoId::RsaEncryptSign | AlgoId::RsaSignOnly => adapters::rsa::verify(hash, pub_params, sig, hashed),
        AlgoId::Dsa => adapters::dsa::verify(pub_params, sig, hashed),
        AlgoId::Ecdsa => {
            let PublicParams::Ecdsa { curve, q } = pub_params else {
                unreachable!()
            };
            adapters::ec::verify(*curve, q, sig, hashed)
        }
        AlgoId::EddsaLegacy => {
            let PublicParams::EddsaLegacy { curve, .. } = pub_params else {
                unreachable!()
            };
            adapters::eddsa_legacy::verify(*curve, pub_params, sig, hashed)
        }
        AlgoId::Ed25519 => adapters::ed25519::verify(hash, pub_params, sig, hashed),
        AlgoId::Ed448 => adapters::ed448::verify(hash, pub_params, sig, hashed),
        AlgoId::MlDsaEd25519 => pqc::dsa::verify(pub_params, sig, hashed),
        AlgoId::SlhDsaShake128s => pqc::slhdsa::verify(pub_params, sig, hashed),
        other => Err(Error::Unsupported(format!("verifying with {other:?}"))),
    }
}

/// `version` is the enclosing PKESK's version (3 or 6); `sym_algo` is the
/// negotiated symmetric algorithm, required when `version == 3` for the
/// "native field" algorithms (X25519/X448/ML-KEM), which carry it as a
/// cleartext octet inside their own wire structure rather than through the
/// legacy `sym_algo || key || checksum` envelope (spec.md §4.4). Ignored by
/// algorithms that don't use native fields: their v3 envelope is built by
/// `pkesk::build_pkesk` before this function ever sees the payload.
pub fn encrypt(
    pub_params: &PublicParams,
    session_key: &[u8],
    version: u8,
    sym_algo: Option<SymAlgoId>,
) -> Result<Bytes> {
    match pub_params.algo() {
        AlgoId::RsaEncryptSign | AlgoId::RsaEncryptOnly => adapters::rsa::encrypt(pub_params, session_key),
        AlgoId::ElgamalEncryptOnly | AlgoId::ElgamalEncryptSign => {
            adapters::elgamal::encrypt(pub_params, session_key)
        }
        AlgoId::Ecdh => {
            let PublicParams::Ecdh { curve, q, hash, sym } = pub_params else {
                unreachable!()
            };
            // Recipient fingerprint is supplied by the packet layer, not
            // known here; see pkesk.rs, which calls adapters::ec directly
            // with the fingerprint in hand.
            let _ = (curve, q, hash, sym, version, sym_algo);
            Err(Error::Unsupported(
                "ECDH encryption requires a recipient fingerprint; call adapters::ec directly".into(),
            ))
        }
        AlgoId::X25519 => adapters::x25519::encrypt(pub_params, session_key, v3_sym_algo(version, sym_algo)),
        AlgoId::X448 => adapters::x448::encrypt(pub_params, session_key, v3_sym_algo(version, sym_algo)),
        AlgoId::MlKemX25519 => pqc::kem::encrypt(pub_params, session_key, v3_sym_algo(version, sym_algo)),
        other => Err(Error::Unsupported(format!("encryption with {other:?}"))),
    }
}

/// `Some(sym_algo)` iff this is a v3 PKESK, matching the "native field"
/// adapters' expectation that the cleartext octet is present only then.
fn v3_sym_algo(version: u8, sym_algo: Option<SymAlgoId>) -> Option<SymAlgoId> {
    if version == 3 {
        sym_algo
    } else {
        None
    }
}

/// Returns the decrypted session key, plus the symmetric algorithm the
/// native-field adapters recovered from their own v3 cleartext octet (`None`
/// for v6 PKESKs and for algorithms that don't carry it here — those recover
/// it from the legacy envelope via `pkesk::decode_session_key_v3` instead).
pub fn decrypt(
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    ct: &[u8],
    random_payload: Option<&[u8]>,
    version: u8,
) -> Result<(Bytes, Option<SymAlgoId>)> {
    match pub_params.algo() {
        AlgoId::RsaEncryptSign | AlgoId::RsaEncryptOnly => {
            Ok((adapters::rsa::decrypt(pub_params, priv_params, ct, random_payload)?, None))
        }
        AlgoId::ElgamalEncryptOnly | AlgoId::ElgamalEncryptSign => Ok((
            adapters::elgamal::decrypt(pub_params, priv_params, ct, random_payload)?,
            None,
        )),
        AlgoId::X25519 => adapters::x25519::decrypt(pub_params, priv_params, ct, random_payload, version),
        AlgoId::X448 => adapters::x448::decrypt(pub_params, priv_params, ct, random_payload, version),
        AlgoId::MlKemX25519 => pqc::kem::decrypt(pub_params, priv_params, ct, random_payload, version),
        other => Err(Error::Unsupported(format!("decryption with {other:?}"))),
    }
}

pub fn validate(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    match pub_params.algo() {
        AlgoId::RsaEncryptSign | AlgoId::RsaEncryptOnly | AlgoId::RsaSignOnly => {
            adapters::rsa::validate_params(pub_params, priv_params)
        }
        AlgoId::Dsa => adapters::dsa::validate_params(pub_params, priv_params),
        AlgoId::ElgamalEncryptOnly | AlgoId::ElgamalEncryptSign => {
            adapters::elgamal::validate_params(pub_params, priv_params)
        }
        AlgoId::Ed25519 => adapters::ed25519::validate_params(pub_params, priv_params),
        AlgoId::Ed448 => adapters::ed448::validate_params(pub_params, priv_params),
        AlgoId::EddsaLegacy => adapters::eddsa_legacy::validate_params(pub_params, priv_params),
        AlgoId::X25519 => adapters::x25519::validate_params(pub_params, priv_params),
        AlgoId::X448 => adapters::x448::validate_params(pub_params, priv_params),
        AlgoId::MlDsaEd25519 => pqc::dsa::validate_params(pub_params, priv_params),
        AlgoId::SlhDsaShake128s => pqc::slhdsa::validate_params(pub_params, priv_params),
        AlgoId::MlKemX25519 => pqc::kem::validate_params(pub_params, priv_params),
        AlgoId::Hmac | AlgoId::Aead => adapters::symmetric_placeholder::validate_params(pub_params, priv_params),
        // ECDSA/ECDH validation requires scalar multiplication against the
        // recipient curve, not currently exposed by the per-curve macros
        // in adapters::ec; skipped pending DESIGN.md's Open Question.
        AlgoId::Ecdsa | AlgoId::Ecdh => true,
        _ => false,
    }
}
