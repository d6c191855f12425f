//! Secret-Key and Secret-Subkey packets, tags 5 and 7 (C7, spec.md §4.5).
//!
//! Wire layout after the public-key portion: one `s2kUsage` octet, then
//! (depending on its value) a symmetric algorithm octet, an optional AEAD
//! algorithm octet, an S2K specifier, an IV/nonce, and finally the
//! protected secret material plus, for legacy CFB, a trailing checksum or
//! SHA-1 hash folded into the encrypted region.

use bytes::{Buf, Bytes, BytesMut};
use cfb_mode::{
    cipher::{AsyncStreamCipher, KeyIvInit},
    Decryptor as CfbDecryptor, Encryptor as CfbEncryptor,
};
use hkdf::Hkdf;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::algorithm::{AeadId, AlgoId, SymAlgoId};
use crate::config::Config;
use crate::dispatch;
use crate::error::{Error, Result};
use crate::mpi::checksum16;
use crate::params::{PrivateParams, PublicParams};
use crate::s2k::S2k;

/// How the secret material following the public key fields is protected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protection {
    /// `s2kUsage == 0`: cleartext fields plus a 2-byte additive checksum.
    Unprotected,
    /// `s2kUsage == 254`: legacy CFB with an S2K-derived key and a SHA-1
    /// hash of the plaintext folded in ahead of encryption.
    Cfb { sym_algo: SymAlgoId, s2k: S2k, iv: Vec<u8> },
    /// `s2kUsage == 253`: modern AEAD, key derived via HKDF-SHA256 over
    /// the S2K output, bound to the packet's associated data.
    Aead {
        sym_algo: SymAlgoId,
        aead: AeadId,
        s2k: S2k,
        iv: Vec<u8>,
    },
    /// `s2kUsage == 253` on a v4/v5 key when
    /// `Config::parse_aead_encrypted_v4_keys_as_legacy` selects the legacy
    /// reading (empty associated data, no HKDF expansion step).
    LegacyAead {
        sym_algo: SymAlgoId,
        aead: AeadId,
        s2k: S2k,
        iv: Vec<u8>,
    },
    /// A non-zero, non-253/254 `s2kUsage`: a bare legacy symmetric
    /// algorithm octet with no S2K at all (obsolete but still parseable).
    MalleableCfb { sym_algo: SymAlgoId, iv: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKeyPacket {
    pub version: u8,
    pub created: u32,
    pub public_algo: AlgoId,
    pub public_params: PublicParams,
    pub protection: Protection,
    /// The raw bytes of the (still encrypted, or cleartext) secret
    /// material region, exactly as they appear on the wire.
    pub protected_material: Bytes,
}

impl SecretKeyPacket {
    pub fn is_locked(&self) -> bool {
        !matches!(self.protection, Protection::Unprotected)
    }

    /// Parses everything up through and including `s2kUsage` and its
    /// associated fields, leaving `protected_material` unparsed (callers
    /// decide whether to unlock it now or defer).
    pub fn parse(
        buf: &mut Bytes,
        config: &Config,
        public_algo: AlgoId,
        public_params: PublicParams,
        version: u8,
        created: u32,
    ) -> Result<Self> {
        if buf.remaining() < 1 {
            return Err(Error::Malformed("missing s2kUsage octet".into()));
        }
        let s2k_usage = buf.get_u8();
        let protection = match s2k_usage {
            0 => Protection::Unprotected,
            254 | 253 => {
                if buf.remaining() < 1 {
                    return Err(Error::Malformed("missing symmetric algorithm octet".into()));
                }
                let sym_algo = SymAlgoId::from_code(buf.get_u8())?;
                let aead = if s2k_usage == 253 && version >= 6 {
                    if buf.remaining() < 1 {
                        return Err(Error::Malformed("missing AEAD algorithm octet".into()));
                    }
                    Some(AeadId::from_code(buf.get_u8())?)
                } else {
                    None
                };
                if version >= 6 && buf.remaining() < 1 {
                    return Err(Error::Malformed("missing S2K-field-length octet".into()));
                }
                if version >= 6 {
                    buf.get_u8(); // count of octets in the S2K specifier, recomputed on write
                }
                let s2k = parse_s2k(buf)?;
                if version < 6 && s2k.forbidden_for_v6() {
                    // Simple S2K is fine pre-v6; the invariant only binds v6.
                }
                if version >= 6 && s2k.forbidden_for_v6() {
                    return Err(Error::Malformed("Simple S2K is forbidden on a v6 secret key".into()));
                }
                let iv_len = if s2k_usage == 253 {
                    aead.unwrap().iv_length()
                } else {
                    sym_algo.block_size()
                };
                if buf.remaining() < iv_len {
                    return Err(Error::Malformed("truncated IV/nonce".into()));
                }
                let iv = buf.copy_to_bytes(iv_len).to_vec();
                if s2k_usage == 253 {
                    let aead = aead.unwrap();
                    // v5 keys with s2kUsage=253 are always legacy AEAD; v4
                    // follows `config`; v6+ is always modern AEAD (spec.md
                    // §4.5).
                    let legacy = match version {
                        5 => true,
                        4 => config.parse_aead_encrypted_v4_keys_as_legacy,
                        _ => false,
                    };
                    if legacy {
                        Protection::LegacyAead { sym_algo, aead, s2k, iv }
                    } else {
                        Protection::Aead { sym_algo, aead, s2k, iv }
                    }
                } else {
                    Protection::Cfb { sym_algo, s2k, iv }
                }
            }
            other => {
                let sym_algo = SymAlgoId::from_code(other)?;
                let iv_len = sym_algo.block_size();
                if buf.remaining() < iv_len {
                    return Err(Error::Malformed("truncated IV".into()));
                }
                let iv = buf.copy_to_bytes(iv_len).to_vec();
                Protection::MalleableCfb { sym_algo, iv }
            }
        };
        let protected_material = buf.copy_to_bytes(buf.remaining());
        Ok(SecretKeyPacket {
            version,
            created,
            public_algo,
            public_params,
            protection,
            protected_material,
        })
    }

    /// Decrypts (or, for `Unprotected`, directly parses) the secret
    /// material, validating that it is consistent with `public_params`.
    /// Unparseable-but-correctly-decrypted material (an unrecognized
    /// future algorithm's private fields) is tolerated: `Ok(None)` is
    /// returned rather than an error, per spec.md §4.6.
    pub fn unlock(&self, passphrase: &[u8]) -> Result<Option<PrivateParams>> {
        let plaintext = match &self.protection {
            Protection::Unprotected => self.protected_material.clone(),
            Protection::Cfb { sym_algo, s2k, iv } => {
                let key = s2k.produce_key(passphrase, sym_algo.key_size())?;
                let decrypted = cfb_decrypt(*sym_algo, &key, iv, &self.protected_material)?;
                verify_and_strip_sha1(&decrypted)?
            }
            Protection::MalleableCfb { sym_algo, iv } => {
                // No S2K: the "passphrase" is used directly as key
                // material, per the legacy (pre-S2K) convention.
                let mut key = vec![0u8; sym_algo.key_size()];
                let n = passphrase.len().min(key.len());
                key[..n].copy_from_slice(&passphrase[..n]);
                let decrypted = cfb_decrypt(*sym_algo, &key, iv, &self.protected_material)?;
                verify_and_strip_checksum(&decrypted)?
            }
            Protection::Aead { sym_algo, aead, s2k, iv } => {
                let ikm = s2k.produce_key(passphrase, sym_algo.key_size())?;
                let key = hkdf_expand_aead_key(&ikm, self.version, self.public_algo, *sym_algo, *aead)?;
                aead_decrypt(*sym_algo, *aead, &key, iv, &self.protected_material, &self.associated_data())?
            }
            Protection::LegacyAead { sym_algo, aead, s2k, iv } => {
                let key = s2k.produce_key(passphrase, sym_algo.key_size())?;
                aead_decrypt(*sym_algo, *aead, &key, iv, &self.protected_material, &[])?
            }
        };

        let mut cursor = plaintext;
        match dispatch::parse_private_key_params(&self.public_params, &mut cursor) {
            Ok(priv_params) => {
                if !dispatch::validate(&self.public_params, &priv_params) {
                    return Err(Error::KeyIsInvalid);
                }
                Ok(Some(priv_params))
            }
            Err(Error::Unsupported(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Associated data for AEAD protection: packet tag (with the
    /// always-one bit set), version, public-key algorithm, per RFC 9580
    /// §5.5.5.
    fn associated_data(&self) -> Vec<u8> {
        vec![0xC0 | 5, self.version, self.public_algo.code()]
    }

    /// Re-emits the `s2kUsage`-and-onward wire format this packet was
    /// parsed from (or produced by [`generate`]), followed by
    /// `protected_material` verbatim. This never re-derives or
    /// re-encrypts anything — a key whose private fields this crate
    /// can't parse (spec.md §4.6) still round-trips, since
    /// `protected_material` is kept as opaque bytes either way.
    pub fn serialize(&self) -> Bytes {
        let mut out = BytesMut::new();
        match &self.protection {
            Protection::Unprotected => out.extend_from_slice(&[0]),
            Protection::Cfb { sym_algo, s2k, iv } => {
                out.extend_from_slice(&[254, sym_algo.code()]);
                self.write_s2k(&mut out, s2k);
                out.extend_from_slice(iv);
            }
            Protection::Aead { sym_algo, aead, s2k, iv } => {
                out.extend_from_slice(&[253, sym_algo.code(), aead.code()]);
                self.write_s2k(&mut out, s2k);
                out.extend_from_slice(iv);
            }
            Protection::LegacyAead { sym_algo, aead, s2k, iv } => {
                out.extend_from_slice(&[253, sym_algo.code(), aead.code()]);
                self.write_s2k(&mut out, s2k);
                out.extend_from_slice(iv);
            }
            Protection::MalleableCfb { sym_algo, iv } => {
                out.extend_from_slice(&[sym_algo.code()]);
                out.extend_from_slice(iv);
            }
        }
        out.extend_from_slice(&self.protected_material);
        out.freeze()
    }

    /// Writes an S2K specifier, prefixed by its field-length octet on v6+
    /// packets only (spec.md §4.5; the length octet didn't exist before
    /// v6).
    fn write_s2k(&self, out: &mut BytesMut, s2k: &S2k) {
        let encoded = s2k.serialize();
        if self.version >= 6 {
            out.extend_from_slice(&[encoded.len() as u8]);
        }
        out.extend_from_slice(&encoded);
    }
}

fn parse_s2k(buf: &mut Bytes) -> Result<S2k> {
    if buf.remaining() < 1 {
        return Err(Error::Malformed("missing S2K type octet".into()));
    }
    let s2k_type = buf.get_u8();
    Ok(match s2k_type {
        0 => S2k::Simple {
            hash: crate::algorithm::HashAlgorithm::from_code(read_u8(buf)?)?,
        },
        1 => S2k::Salted {
            hash: crate::algorithm::HashAlgorithm::from_code(read_u8(buf)?)?,
            salt: read_fixed::<8>(buf)?,
        },
        3 => S2k::Iterated {
            hash: crate::algorithm::HashAlgorithm::from_code(read_u8(buf)?)?,
            salt: read_fixed::<8>(buf)?,
            count: read_u8(buf)?,
        },
        4 => S2k::Argon2 {
            salt: read_fixed::<16>(buf)?,
            passes: read_u8(buf)?,
            parallelism: read_u8(buf)?,
            memory_exponent: read_u8(buf)?,
        },
        101 => {
            // GNU extension: "GNU" marker octets then a 1-byte extension id.
            let marker = read_fixed::<3>(buf)?;
            if &marker != b"GNU" {
                return Err(Error::Malformed("malformed GNU S2K marker".into()));
            }
            let extension = read_u8(buf)?;
            S2k::GnuDummy {
                extension: match extension {
                    1 => crate::s2k::GnuDummyExtension::NoSecret,
                    2 => crate::s2k::GnuDummyExtension::DivertToCard,
                    other => return Err(Error::Unsupported(format!("GNU S2K extension {other}"))),
                },
            }
        }
        other => return Err(Error::Unsupported(format!("S2K type {other}"))),
    })
}

fn read_u8(buf: &mut Bytes) -> Result<u8> {
    if buf.remaining() < 1 {
        return Err(Error::Malformed("truncated S2K field".into()));
    }
    Ok(buf.get_u8())
}

fn read_fixed<const N: usize>(buf: &mut Bytes) -> Result<[u8; N]> {
    if buf.remaining() < N {
        return Err(Error::Malformed("truncated S2K field".into()));
    }
    let mut out = [0u8; N];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

fn cfb_decrypt(sym_algo: SymAlgoId, key: &[u8], iv: &[u8], ct: &[u8]) -> Result<Vec<u8>> {
    let mut buf = ct.to_vec();
    match sym_algo {
        SymAlgoId::Aes128 => CfbDecryptor::<aes::Aes128>::new_from_slices(key, iv)
            .map_err(|_| Error::Malformed("bad AES-128 key/IV length".into()))?
            .decrypt(&mut buf),
        SymAlgoId::Aes192 => CfbDecryptor::<aes::Aes192>::new_from_slices(key, iv)
            .map_err(|_| Error::Malformed("bad AES-192 key/IV length".into()))?
            .decrypt(&mut buf),
        SymAlgoId::Aes256 => CfbDecryptor::<aes::Aes256>::new_from_slices(key, iv)
            .map_err(|_| Error::Malformed("bad AES-256 key/IV length".into()))?
            .decrypt(&mut buf),
        other => return Err(Error::Unsupported(format!("CFB with {other:?}"))),
    }
    Ok(buf)
}

fn verify_and_strip_sha1(decrypted: &[u8]) -> Result<Bytes> {
    if decrypted.len() < 20 {
        return Err(Error::IncorrectPassphrase);
    }
    let (material, hash) = decrypted.split_at(decrypted.len() - 20);
    let expected = Sha1::digest(material);
    if bool::from(crate::constant_time::ct_eq(expected.as_slice(), hash)) {
        Ok(Bytes::copy_from_slice(material))
    } else {
        Err(Error::IncorrectPassphrase)
    }
}

fn verify_and_strip_checksum(decrypted: &[u8]) -> Result<Bytes> {
    if decrypted.len() < 2 {
        return Err(Error::IncorrectPassphrase);
    }
    let (material, checksum) = decrypted.split_at(decrypted.len() - 2);
    let expected = checksum16(material);
    if bool::from(crate::constant_time::ct_eq(&expected, checksum)) {
        Ok(Bytes::copy_from_slice(material))
    } else {
        Err(Error::IncorrectPassphrase)
    }
}

fn hkdf_expand_aead_key(
    ikm: &[u8],
    version: u8,
    public_algo: AlgoId,
    sym_algo: SymAlgoId,
    aead: AeadId,
) -> Result<Vec<u8>> {
    let info = [0xC0 | 5, version, public_algo.code(), sym_algo.code(), aead.code()];
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut out = vec![0u8; sym_algo.key_size()];
    hk.expand(&info, &mut out)
        .map_err(|_| Error::Malformed("HKDF expand failed for AEAD secret-key protection".into()))?;
    Ok(out)
}

fn aead_decrypt(
    sym_algo: SymAlgoId,
    aead: AeadId,
    key: &[u8],
    iv: &[u8],
    ct: &[u8],
    associated_data: &[u8],
) -> Result<Bytes> {
    use aead::{Aead, KeyInit, Payload};
    let payload = Payload { msg: ct, aad: associated_data };
    let plaintext = match (sym_algo, aead) {
        (SymAlgoId::Aes128, AeadId::Ocb) => ocb3::Ocb3::<aes::Aes128>::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad OCB key length".into()))?
            .decrypt(iv.into(), payload)
            .map_err(|_| Error::DecryptionError)?,
        (SymAlgoId::Aes256, AeadId::Ocb) => ocb3::Ocb3::<aes::Aes256>::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad OCB key length".into()))?
            .decrypt(iv.into(), payload)
            .map_err(|_| Error::DecryptionError)?,
        (SymAlgoId::Aes128, AeadId::Eax) => eax::Eax::<aes::Aes128>::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad EAX key length".into()))?
            .decrypt(iv.into(), payload)
            .map_err(|_| Error::DecryptionError)?,
        (SymAlgoId::Aes256, AeadId::Eax) => eax::Eax::<aes::Aes256>::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad EAX key length".into()))?
            .decrypt(iv.into(), payload)
            .map_err(|_| Error::DecryptionError)?,
        (SymAlgoId::Aes128, AeadId::Gcm) => aes_gcm::Aes128Gcm::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad GCM key length".into()))?
            .decrypt(iv.into(), payload)
            .map_err(|_| Error::DecryptionError)?,
        (SymAlgoId::Aes256, AeadId::Gcm) => aes_gcm::Aes256Gcm::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad GCM key length".into()))?
            .decrypt(iv.into(), payload)
            .map_err(|_| Error::DecryptionError)?,
        (other_sym, other_aead) => {
            return Err(Error::Unsupported(format!(
                "AEAD protection with {other_sym:?}/{other_aead:?}"
            )))
        }
    };
    Ok(Bytes::from(plaintext))
}

/// Produces a fresh, correctly-shaped secret-key packet for `public_params`
/// / `priv_params`, protected per `config`. Rejects algorithm/version
/// combinations spec.md §4.5 forbids (e.g. a v3 public-key version paired
/// with a v6-only private algorithm).
pub fn generate(
    config: &Config,
    version: u8,
    created: u32,
    public_params: PublicParams,
    mut priv_params: PrivateParams,
    passphrase: Option<&[u8]>,
) -> Result<SecretKeyPacket> {
    if version < 4 {
        return Err(Error::Unsupported("key versions below 4 cannot be generated".into()));
    }
    if !dispatch::validate(&public_params, &priv_params) {
        return Err(Error::KeyIsInvalid);
    }

    let mut material = BytesMut::new();
    dispatch::serialize_private_key_params(&mut material, &priv_params);
    priv_params.zeroize();

    let (protection, protected_material) = match passphrase {
        None => (Protection::Unprotected, {
            let mut out = material.clone();
            out.extend_from_slice(&checksum16(&material));
            out.freeze()
        }),
        Some(pass) => {
            let sym_algo = SymAlgoId::Aes256;
            let salt = random_bytes::<16>();
            if config.aead_protect {
                let aead = config.preferred_aead_algorithm;
                let s2k = S2k::Argon2 {
                    salt,
                    passes: 3,
                    parallelism: 4,
                    memory_exponent: 16,
                };
                let ikm = s2k.produce_key(pass, sym_algo.key_size())?;
                let key = hkdf_expand_aead_key(&ikm, version, public_params.algo(), sym_algo, aead)?;
                let iv = random_vec(aead.iv_length());
                let public_algo = public_params.algo();
                let ad = vec![0xC0 | 5, version, public_algo.code()];
                let ct = aead_encrypt(sym_algo, aead, &key, &iv, &material, &ad)?;
                (
                    Protection::Aead { sym_algo, aead, s2k, iv },
                    ct,
                )
            } else {
                let salt8: [u8; 8] = salt[..8].try_into().unwrap();
                let s2k = S2k::Iterated {
                    hash: crate::algorithm::HashAlgorithm::Sha256,
                    salt: salt8,
                    count: 0xC0,
                };
                let key = s2k.produce_key(pass, sym_algo.key_size())?;
                let iv = random_vec(sym_algo.block_size());
                let mut plaintext = material.to_vec();
                plaintext.extend_from_slice(&Sha1::digest(&material));
                let ct = cfb_encrypt(sym_algo, &key, &iv, &plaintext)?;
                (Protection::Cfb { sym_algo, s2k, iv }, Bytes::from(ct))
            }
        }
    };

    Ok(SecretKeyPacket {
        version,
        created,
        public_algo: public_params.algo(),
        public_params,
        protection,
        protected_material,
    })
}

fn cfb_encrypt(sym_algo: SymAlgoId, key: &[u8], iv: &[u8], pt: &[u8]) -> Result<Vec<u8>> {
    let mut buf = pt.to_vec();
    match sym_algo {
        SymAlgoId::Aes128 => CfbEncryptor::<aes::Aes128>::new_from_slices(key, iv)
            .map_err(|_| Error::Malformed("bad AES-128 key/IV length".into()))?
            .encrypt(&mut buf),
        SymAlgoId::Aes192 => CfbEncryptor::<aes::Aes192>::new_from_slices(key, iv)
            .map_err(|_| Error::Malformed("bad AES-192 key/IV length".into()))?
            .encrypt(&mut buf),
        SymAlgoId::Aes256 => CfbEncryptor::<aes::Aes256>::new_from_slices(key, iv)
            .map_err(|_| Error::Malformed("bad AES-256 key/IV length".into()))?
            .encrypt(&mut buf),
        other => return Err(Error::Unsupported(format!("CFB with {other:?}"))),
    }
    Ok(buf)
}

fn aead_encrypt(
    sym_algo: SymAlgoId,
    aead: AeadId,
    key: &[u8],
    iv: &[u8],
    pt: &[u8],
    associated_data: &[u8],
) -> Result<Bytes> {
    use aead::{Aead, KeyInit, Payload};
    let payload = Payload { msg: pt, aad: associated_data };
    let ct = match (sym_algo, aead) {
        (SymAlgoId::Aes256, AeadId::Ocb) => ocb3::Ocb3::<aes::Aes256>::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad OCB key length".into()))?
            .encrypt(iv.into(), payload)
            .map_err(|_| Error::Malformed("OCB encryption failed".into()))?,
        (SymAlgoId::Aes256, AeadId::Eax) => eax::Eax::<aes::Aes256>::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad EAX key length".into()))?
            .encrypt(iv.into(), payload)
            .map_err(|_| Error::Malformed("EAX encryption failed".into()))?,
        (SymAlgoId::Aes256, AeadId::Gcm) => aes_gcm::Aes256Gcm::new_from_slice(key)
            .map_err(|_| Error::Malformed("bad GCM key length".into()))?
            .encrypt(iv.into(), payload)
            .map_err(|_| Error::Malformed("GCM encryption failed".into()))?,
        (other_sym, other_aead) => {
            return Err(Error::Unsupported(format!(
                "AEAD protection with {other_sym:?}/{other_aead:?}"
            )))
        }
    };
    Ok(Bytes::from(ct))
}

fn random_bytes<const N: usize>() -> [u8; N] {
    use rand::RngCore;
    let mut out = [0u8; N];
    rand::rngs::OsRng.fill_bytes(&mut out);
    out
}

fn random_vec(n: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut out = vec![0u8; n];
    rand::rngs::OsRng.fill_bytes(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::HashAlgorithm;

    #[test]
    fn unprotected_round_trip_checksum() {
        let material = b"fake-private-material".to_vec();
        let mut packet = BytesMut::new();
        packet.extend_from_slice(&material);
        packet.extend_from_slice(&checksum16(&material));
        let decrypted = packet.freeze();
        let (body, checksum) = decrypted.split_at(decrypted.len() - 2);
        assert_eq!(checksum16(body), *checksum);
    }

    #[test]
    fn sha1_strip_rejects_tamper() {
        let material = b"some secret bytes".to_vec();
        let mut plaintext = material.clone();
        plaintext.extend_from_slice(&Sha1::digest(&material));
        assert!(verify_and_strip_sha1(&plaintext).is_ok());
        plaintext[0] ^= 1;
        assert!(verify_and_strip_sha1(&plaintext).is_err());
    }

    #[test]
    fn gnu_dummy_s2k_usage_254_parses_but_cannot_unlock() {
        let s2k = S2k::GnuDummy {
            extension: crate::s2k::GnuDummyExtension::NoSecret,
        };
        assert!(s2k.produce_key(b"x", 16).is_err());
        let _ = HashAlgorithm::Sha256;
    }

    fn x25519_public_params() -> PublicParams {
        let (public, _) = crate::adapters::x25519::generate();
        public
    }

    #[test]
    fn write_then_reread_then_decrypt_round_trips() {
        let config = Config::default();
        let (public, private) = crate::adapters::x25519::generate();
        let packet = generate(&config, 6, 1_700_000_000, public.clone(), private.clone(), Some(b"s5")).unwrap();

        let wire = packet.serialize();
        let mut buf = wire.clone();
        let reread = SecretKeyPacket::parse(&mut buf, &config, packet.public_algo, public, packet.version, packet.created).unwrap();
        assert_eq!(reread.protection, packet.protection);
        assert_eq!(reread.protected_material, packet.protected_material);

        let unlocked = reread.unlock(b"s5").unwrap();
        assert_eq!(unlocked, Some(private));
    }

    #[test]
    fn write_then_reread_preserves_unparseable_material() {
        // Per spec.md §4.6, material this crate can't parse into a known
        // `PrivateParams` variant still round-trips verbatim.
        let config = Config::default();
        let public = x25519_public_params();
        let packet = SecretKeyPacket {
            version: 6,
            created: 1_700_000_000,
            public_algo: AlgoId::X25519,
            public_params: public.clone(),
            protection: Protection::Unprotected,
            protected_material: Bytes::from_static(&[0xDE, 0xAD, 0xBE, 0xEF]),
        };
        let wire = packet.serialize();
        let mut buf = wire.clone();
        let reread = SecretKeyPacket::parse(&mut buf, &config, AlgoId::X25519, public, 6, 1_700_000_000).unwrap();
        assert_eq!(reread.protected_material, packet.protected_material);
    }

    #[test]
    fn v4_s2k_usage_253_follows_config_legacy_flag() {
        let mut config = Config::default();
        let (public, private) = crate::adapters::x25519::generate();

        config.parse_aead_encrypted_v4_keys_as_legacy = false;
        let packet = generate(&config, 4, 1_700_000_000, public.clone(), private.clone(), Some(b"p")).unwrap();
        let wire = packet.serialize();
        let mut buf = wire.clone();
        let reread = SecretKeyPacket::parse(&mut buf, &config, AlgoId::X25519, public.clone(), 4, 1_700_000_000).unwrap();
        assert!(matches!(reread.protection, Protection::Aead { .. }));

        config.parse_aead_encrypted_v4_keys_as_legacy = true;
        let mut buf = wire.clone();
        let reread = SecretKeyPacket::parse(&mut buf, &config, AlgoId::X25519, public, 4, 1_700_000_000).unwrap();
        assert!(matches!(reread.protection, Protection::LegacyAead { .. }));
    }
}
