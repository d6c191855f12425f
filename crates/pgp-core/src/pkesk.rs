//! Public-Key Encrypted Session Key packet, tag 1 (C6, spec.md §4.4).
//! Covers both the v3 layout (one fixed symmetric algorithm octet ahead of
//! the encrypted payload, no AEAD) and the v6 layout (the recipient is
//! named by a fingerprint rather than a bare key ID, and there is no
//! algorithm octet — the payload conveys `sessionKey` directly).

use bytes::{Buf, Bytes, BytesMut};

use crate::algorithm::{AlgoId, SymAlgoId};
use crate::config::Config;
use crate::dispatch;
use crate::error::{Error, Result};
use crate::mpi::checksum16;
use crate::params::{PrivateParams, PublicParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// v3: 8-byte key ID, all-zero for an anonymous recipient.
    KeyId([u8; 8]),
    /// v6: key version (0 for anonymous) followed by a variable-length
    /// fingerprint.
    Fingerprint { version: u8, fingerprint: Vec<u8> },
}

impl Recipient {
    pub fn is_anonymous(&self) -> bool {
        match self {
            Recipient::KeyId(id) => *id == [0u8; 8],
            Recipient::Fingerprint { version, .. } => *version == 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkesk {
    pub version: u8,
    pub recipient: Recipient,
    pub algo: AlgoId,
    pub encrypted_session_key: Bytes,
}

impl Pkesk {
    pub fn parse(buf: &mut Bytes) -> Result<Self> {
        if buf.remaining() < 1 {
            return Err(Error::Malformed("empty PKESK packet".into()));
        }
        let version = buf.get_u8();
        match version {
            3 => {
                if buf.remaining() < 9 {
                    return Err(Error::Malformed("truncated v3 PKESK".into()));
                }
                let mut key_id = [0u8; 8];
                buf.copy_to_slice(&mut key_id);
                let algo = AlgoId::from_code(buf.get_u8())?;
                let encrypted_session_key = buf.copy_to_bytes(buf.remaining());
                Ok(Pkesk {
                    version,
                    recipient: Recipient::KeyId(key_id),
                    algo,
                    encrypted_session_key,
                })
            }
            6 => {
                if buf.remaining() < 1 {
                    return Err(Error::Malformed("truncated v6 PKESK".into()));
                }
                let fp_version = buf.get_u8();
                let fp_len = if fp_version == 0 {
                    0
                } else if fp_version < 5 {
                    20
                } else {
                    32
                };
                if buf.remaining() < fp_len + 1 {
                    return Err(Error::Malformed("truncated v6 PKESK fingerprint".into()));
                }
                let fingerprint = buf.copy_to_bytes(fp_len).to_vec();
                let algo = AlgoId::from_code(buf.get_u8())?;
                let encrypted_session_key = buf.copy_to_bytes(buf.remaining());
                Ok(Pkesk {
                    version,
                    recipient: Recipient::Fingerprint {
                        version: fp_version,
                        fingerprint,
                    },
                    algo,
                    encrypted_session_key,
                })
            }
            other => Err(Error::Unsupported(format!("PKESK version {other}"))),
        }
    }

    pub fn serialize(&self) -> Bytes {
        let mut out = BytesMut::new();
        out.extend_from_slice(&[self.version]);
        match &self.recipient {
            Recipient::KeyId(id) => out.extend_from_slice(id),
            Recipient::Fingerprint { version, fingerprint } => {
                out.extend_from_slice(&[*version]);
                out.extend_from_slice(fingerprint);
            }
        }
        out.extend_from_slice(&[self.algo.code()]);
        out.extend_from_slice(&self.encrypted_session_key);
        out.freeze()
    }
}

/// Wire-encodes a session key for the legacy (non-native) algorithms:
/// `sym_algo || session_key || checksum16` (v3 only; for v6 or the native
/// algorithms the caller passes `sessionKey` directly with no wrapper).
pub fn encode_session_key_v3(sym_algo: SymAlgoId, session_key: &[u8]) -> Bytes {
    let mut out = BytesMut::new();
    out.extend_from_slice(&[sym_algo.code()]);
    out.extend_from_slice(session_key);
    out.extend_from_slice(&checksum16(session_key));
    out.freeze()
}

/// Decodes a v3 plaintext payload, verifying the checksum in constant time.
/// Per spec.md §4.4/§5/§7 (property S6), the `randomSessionKey` fallback is
/// selected branchlessly: the real decode always runs to completion, and
/// `select_bytes`/`ct_eq` pick between its result and the random fallback
/// without branching on whether decoding or the checksum succeeded — a
/// secret-dependent branch there would let a timing or control-flow
/// difference leak which case fired.
pub fn decode_session_key_v3(
    plaintext: &[u8],
    random_session_key: Option<&[u8]>,
) -> Result<(SymAlgoId, Bytes)> {
    use crate::constant_time::{ct_eq, select_bytes};

    if plaintext.len() < 3 {
        // No fixed-size buffer to select over; this is a structural framing
        // error, not a checksum outcome, so it still surfaces (or falls back)
        // without running the constant-time path below.
        return match random_session_key {
            Some(random) => Ok((SymAlgoId::Aes256, Bytes::copy_from_slice(random))),
            None => Err(Error::Malformed("v3 session key payload too short".into())),
        };
    }

    let sym_algo = match SymAlgoId::from_code(plaintext[0]) {
        Ok(a) => a,
        Err(_) => SymAlgoId::Aes256,
    };
    let (key, checksum) = plaintext[1..].split_at(plaintext.len() - 3);
    let expected = checksum16(key);
    let checksum_ok = ct_eq(&expected, checksum);

    match random_session_key {
        None => {
            if bool::from(checksum_ok) {
                Ok((sym_algo, Bytes::copy_from_slice(key)))
            } else {
                Err(Error::DecryptionError)
            }
        }
        Some(random) => {
            // Both arms are fixed-length (`key.len()`), so `select_bytes`
            // never branches on `checksum_ok` itself; only the slice lengths
            // must already agree, which is a public, not secret, fact.
            let random = if random.len() == key.len() {
                random.to_vec()
            } else {
                vec![0u8; key.len()]
            };
            let chosen = select_bytes(checksum_ok, key, &random);
            Ok((sym_algo, Bytes::from(chosen)))
        }
    }
}

/// Dispatches `sessionKey` encryption under `pub_params`, wrapping the
/// v3 legacy `sym_algo || key || checksum` envelope first when the
/// algorithm is not one of the "native field" PQC/X25519/X448 families
/// that carry `sessionKey` directly (spec.md §4.3, §4.4).
pub fn build_pkesk(
    config: &Config,
    version: u8,
    recipient: Recipient,
    pub_params: &PublicParams,
    sym_algo: SymAlgoId,
    session_key: &[u8],
) -> Result<Pkesk> {
    let _ = config;
    let algo = pub_params.algo();
    let payload = if version == 3 && !algo.uses_native_fields() {
        encode_session_key_v3(sym_algo, session_key)
    } else {
        Bytes::copy_from_slice(session_key)
    };
    let encrypted_session_key = dispatch::encrypt(pub_params, &payload, version, Some(sym_algo))?;
    Ok(Pkesk {
        version,
        recipient,
        algo,
        encrypted_session_key,
    })
}

/// Decrypts a parsed [`Pkesk`], returning the recovered symmetric algorithm
/// and session key regardless of whether the algorithm wraps that field in
/// the legacy checksummed envelope or carries it in cleartext inside its own
/// wire structure (spec.md §4.4).
pub fn decrypt_pkesk(
    pkesk: &Pkesk,
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    random_session_key: Option<&[u8]>,
) -> Result<(SymAlgoId, Bytes)> {
    let (payload, native_sym_algo) = dispatch::decrypt(
        pub_params,
        priv_params,
        &pkesk.encrypted_session_key,
        random_session_key,
        pkesk.version,
    )?;
    if pkesk.algo.uses_native_fields() {
        match native_sym_algo {
            Some(algo) => Ok((algo, payload)),
            None => Ok((SymAlgoId::Aes256, payload)),
        }
    } else {
        decode_session_key_v3(&payload, random_session_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v3_session_key_round_trips() {
        let key = [0x42u8; 32];
        let encoded = encode_session_key_v3(SymAlgoId::Aes256, &key);
        let (algo, decoded) = decode_session_key_v3(&encoded, None).unwrap();
        assert_eq!(algo, SymAlgoId::Aes256);
        assert_eq!(&decoded[..], &key[..]);
    }

    #[test]
    fn v3_session_key_falls_back_on_bad_checksum() {
        let key = [0x42u8; 32];
        let mut encoded = encode_session_key_v3(SymAlgoId::Aes256, &key).to_vec();
        *encoded.last_mut().unwrap() ^= 1;
        let random = [0xAAu8; 32];
        let (algo, decoded) = decode_session_key_v3(&encoded, Some(&random)).unwrap();
        assert_eq!(algo, SymAlgoId::Aes256);
        assert_eq!(&decoded[..], &random[..]);
        assert!(decode_session_key_v3(&encoded, None).is_err());
    }

    #[test]
    fn anonymous_recipient_detection() {
        assert!(Recipient::KeyId([0u8; 8]).is_anonymous());
        assert!(!Recipient::KeyId([1u8; 8]).is_anonymous());
        assert!(Recipient::Fingerprint {
            version: 0,
            fingerprint: vec![]
        }
        .is_anonymous());
    }

    #[test]
    fn v3_pkesk_round_trips_wire_format() {
        let pkesk = Pkesk {
            version: 3,
            recipient: Recipient::KeyId([1, 2, 3, 4, 5, 6, 7, 8]),
            algo: AlgoId::RsaEncryptSign,
            encrypted_session_key: Bytes::from_static(&[0xAA, 0xBB]),
        };
        let wire = pkesk.serialize();
        let mut buf = wire.clone();
        let parsed = Pkesk::parse(&mut buf).unwrap();
        assert_eq!(parsed, pkesk);
    }
}
