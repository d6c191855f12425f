//! String-to-key specifiers (spec.md §3's S2K row, §4.5's secret-key
//! protection). Five forms: Simple, Salted, Iterated (and the OpenPGP v6
//! superseding "Iterated-and-Salted" is the same variant, salt is
//! mandatory), Argon2, and GNU-Dummy (no key material at all — the secret
//! is not present, only a marker that it once was).

use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::algorithm::HashAlgorithm;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S2k {
    Simple {
        hash: HashAlgorithm,
    },
    Salted {
        hash: HashAlgorithm,
        salt: [u8; 8],
    },
    Iterated {
        hash: HashAlgorithm,
        salt: [u8; 8],
        count: u8,
    },
    Argon2 {
        salt: [u8; 16],
        passes: u8,
        parallelism: u8,
        memory_exponent: u8,
    },
    GnuDummy {
        extension: GnuDummyExtension,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GnuDummyExtension {
    NoSecret,
    DivertToCard,
}

impl S2k {
    pub fn id(&self) -> u8 {
        match self {
            S2k::Simple { .. } => 0,
            S2k::Salted { .. } => 1,
            S2k::Iterated { .. } => 3,
            S2k::Argon2 { .. } => 4,
            S2k::GnuDummy { .. } => 101,
        }
    }

    /// The Simple form is forbidden in a v6 secret key (spec.md §4.5
    /// invariant), and Argon2 is only ever paired with AEAD protection
    /// (never legacy CFB).
    pub fn forbidden_for_v6(&self) -> bool {
        matches!(self, S2k::Simple { .. })
    }

    /// Re-encodes the specifier exactly as [`crate::secret_key`]'s parser
    /// expects to read it back: type octet followed by the type-specific
    /// fields, with no leading S2K-field-length octet (callers that need
    /// one, i.e. v6+, compute it from this output's length).
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = vec![self.id()];
        match self {
            S2k::Simple { hash } => out.push(hash.code()),
            S2k::Salted { hash, salt } => {
                out.push(hash.code());
                out.extend_from_slice(salt);
            }
            S2k::Iterated { hash, salt, count } => {
                out.push(hash.code());
                out.extend_from_slice(salt);
                out.push(*count);
            }
            S2k::Argon2 {
                salt,
                passes,
                parallelism,
                memory_exponent,
            } => {
                out.extend_from_slice(salt);
                out.push(*passes);
                out.push(*parallelism);
                out.push(*memory_exponent);
            }
            S2k::GnuDummy { extension } => {
                out.extend_from_slice(b"GNU");
                out.push(match extension {
                    GnuDummyExtension::NoSecret => 1,
                    GnuDummyExtension::DivertToCard => 2,
                });
            }
        }
        out
    }

    /// Derives `key_len` octets of key material from `passphrase`.
    pub fn produce_key(&self, passphrase: &[u8], key_len: usize) -> Result<Vec<u8>> {
        match self {
            S2k::Simple { hash } => Ok(hash_with_prefix_padding(*hash, &[], passphrase, key_len)?),
            S2k::Salted { hash, salt } => {
                let mut salted = Vec::with_capacity(salt.len() + passphrase.len());
                salted.extend_from_slice(salt);
                salted.extend_from_slice(passphrase);
                Ok(hash_with_prefix_padding(*hash, &[], &salted, key_len)?)
            }
            S2k::Iterated { hash, salt, count } => {
                let mut salted = Vec::with_capacity(salt.len() + passphrase.len());
                salted.extend_from_slice(salt);
                salted.extend_from_slice(passphrase);
                let total = decode_count(*count).max(salted.len());
                let mut expanded = Vec::with_capacity(total);
                while expanded.len() < total {
                    let remaining = total - expanded.len();
                    expanded.extend_from_slice(&salted[..salted.len().min(remaining)]);
                }
                Ok(hash_with_prefix_padding(*hash, &[], &expanded, key_len)?)
            }
            S2k::Argon2 {
                salt,
                passes,
                parallelism,
                memory_exponent,
            } => produce_argon2_key(passphrase, salt, *passes, *parallelism, *memory_exponent, key_len),
            S2k::GnuDummy { .. } => Err(Error::Unsupported(
                "GNU-Dummy S2K has no key material to produce".into(),
            )),
        }
    }
}

fn decode_count(c: u8) -> usize {
    // RFC 9580 §3.7.1.4: count = (16 + (c & 0xF)) << ((c >> 4) + 6)
    (16usize + (c as usize & 0xF)) << ((c as usize >> 4) + 6)
}

fn hash_with_prefix_padding(
    hash: HashAlgorithm,
    prefix_zeros_seen: &[u8],
    data: &[u8],
    key_len: usize,
) -> Result<Vec<u8>> {
    let digest_len = hash.byte_length();
    let rounds = key_len.div_ceil(digest_len).max(1);
    let mut out = Vec::with_capacity(rounds * digest_len);
    for round in 0..rounds {
        let zero_prefix = vec![0u8; round];
        out.extend_from_slice(&digest(hash, &[&zero_prefix, prefix_zeros_seen, data].concat())?);
    }
    out.truncate(key_len);
    Ok(out)
}

fn digest(hash: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
    Ok(match hash {
        HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        HashAlgorithm::Sha224 => Sha224::digest(data).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        other => return Err(Error::Unsupported(format!("S2K hash {other:?}"))),
    })
}

fn produce_argon2_key(
    passphrase: &[u8],
    salt: &[u8; 16],
    passes: u8,
    parallelism: u8,
    memory_exponent: u8,
    key_len: usize,
) -> Result<Vec<u8>> {
    use argon2::{Algorithm, Argon2, Params, Version};
    let memory_kib = 1u32 << memory_exponent;
    let params = Params::new(memory_kib, passes as u32, parallelism as u32, Some(key_len))
        .map_err(|e| Error::Malformed(format!("invalid Argon2 parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut out = vec![0u8; key_len];
    argon2
        .hash_password_into(passphrase, salt, &mut out)
        .map_err(|e| Error::Malformed(format!("Argon2 derivation failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_s2k_matches_single_round_sha256() {
        let s2k = S2k::Simple {
            hash: HashAlgorithm::Sha256,
        };
        let key = s2k.produce_key(b"hunter2", 32).unwrap();
        let expected = Sha256::digest(b"hunter2");
        assert_eq!(&key[..], expected.as_slice());
    }

    #[test]
    fn salted_differs_from_simple() {
        let simple = S2k::Simple {
            hash: HashAlgorithm::Sha256,
        }
        .produce_key(b"hunter2", 32)
        .unwrap();
        let salted = S2k::Salted {
            hash: HashAlgorithm::Sha256,
            salt: [1, 2, 3, 4, 5, 6, 7, 8],
        }
        .produce_key(b"hunter2", 32)
        .unwrap();
        assert_ne!(simple, salted);
    }

    #[test]
    fn count_decoding_matches_rfc_formula() {
        assert_eq!(decode_count(0), 16 << 6);
        assert_eq!(decode_count(0xFF), (16 + 15) << (15 + 6));
    }

    #[test]
    fn gnu_dummy_has_no_key_material() {
        let s2k = S2k::GnuDummy {
            extension: GnuDummyExtension::NoSecret,
        };
        assert!(s2k.produce_key(b"anything", 32).is_err());
    }
}
