//! Algorithm registry: numeric codes for public-key algorithms, hashes,
//! symmetric ciphers, AEAD modes, curves, and packet tags.
//!
//! Ref: RFC 9580 §9 and draft-ietf-openpgp-pqc-10 §6.1.

use crate::error::Error;

/// A registered public-key algorithm identifier (one byte on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AlgoId {
    RsaEncryptSign,
    RsaEncryptOnly,
    RsaSignOnly,
    ElgamalEncryptOnly,
    Dsa,
    Ecdh,
    Ecdsa,
    ElgamalEncryptSign,
    EddsaLegacy,
    X25519,
    X448,
    Ed25519,
    Ed448,
    Hmac,
    Aead,
    MlKemX25519,
    MlDsaEd25519,
    SlhDsaShake128s,
}

impl AlgoId {
    pub fn from_code(code: u8) -> Result<Self, Error> {
        Ok(match code {
            1 => AlgoId::RsaEncryptSign,
            2 => AlgoId::RsaEncryptOnly,
            3 => AlgoId::RsaSignOnly,
            16 => AlgoId::ElgamalEncryptOnly,
            17 => AlgoId::Dsa,
            18 => AlgoId::Ecdh,
            19 => AlgoId::Ecdsa,
            20 => AlgoId::ElgamalEncryptSign,
            22 => AlgoId::EddsaLegacy,
            25 => AlgoId::X25519,
            26 => AlgoId::X448,
            27 => AlgoId::Ed25519,
            28 => AlgoId::Ed448,
            101 => AlgoId::Hmac,
            102 => AlgoId::Aead,
            105 => AlgoId::MlKemX25519,
            107 => AlgoId::MlDsaEd25519,
            108 => AlgoId::SlhDsaShake128s,
            other => return Err(Error::Unsupported(format!("public-key algorithm {other}"))),
        })
    }

    pub fn code(self) -> u8 {
        match self {
            AlgoId::RsaEncryptSign => 1,
            AlgoId::RsaEncryptOnly => 2,
            AlgoId::RsaSignOnly => 3,
            AlgoId::ElgamalEncryptOnly => 16,
            AlgoId::Dsa => 17,
            AlgoId::Ecdh => 18,
            AlgoId::Ecdsa => 19,
            AlgoId::ElgamalEncryptSign => 20,
            AlgoId::EddsaLegacy => 22,
            AlgoId::X25519 => 25,
            AlgoId::X448 => 26,
            AlgoId::Ed25519 => 27,
            AlgoId::Ed448 => 28,
            AlgoId::Hmac => 101,
            AlgoId::Aead => 102,
            AlgoId::MlKemX25519 => 105,
            AlgoId::MlDsaEd25519 => 107,
            AlgoId::SlhDsaShake128s => 108,
        }
    }

    pub fn can_encrypt(self) -> bool {
        matches!(
            self,
            AlgoId::RsaEncryptSign
                | AlgoId::RsaEncryptOnly
                | AlgoId::ElgamalEncryptOnly
                | AlgoId::ElgamalEncryptSign
                | AlgoId::Ecdh
                | AlgoId::X25519
                | AlgoId::X448
                | AlgoId::Hmac
                | AlgoId::Aead
                | AlgoId::MlKemX25519
        )
    }

    pub fn can_sign(self) -> bool {
        matches!(
            self,
            AlgoId::RsaEncryptSign
                | AlgoId::RsaSignOnly
                | AlgoId::Dsa
                | AlgoId::Ecdsa
                | AlgoId::ElgamalEncryptSign
                | AlgoId::EddsaLegacy
                | AlgoId::Ed25519
                | AlgoId::Ed448
                | AlgoId::MlDsaEd25519
                | AlgoId::SlhDsaShake128s
        )
    }

    /// True for the "native" (non-MPI) field algorithms per §4.3.
    pub fn uses_native_fields(self) -> bool {
        matches!(
            self,
            AlgoId::Ed25519
                | AlgoId::Ed448
                | AlgoId::X25519
                | AlgoId::X448
                | AlgoId::Hmac
                | AlgoId::Aead
                | AlgoId::MlKemX25519
                | AlgoId::MlDsaEd25519
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    RipeMd160,
    Sha256,
    Sha384,
    Sha512,
    Sha224,
    Sha3_256,
    Sha3_512,
}

impl HashAlgorithm {
    pub fn from_code(code: u8) -> Result<Self, Error> {
        Ok(match code {
            1 => HashAlgorithm::Md5,
            2 => HashAlgorithm::Sha1,
            3 => HashAlgorithm::RipeMd160,
            8 => HashAlgorithm::Sha256,
            9 => HashAlgorithm::Sha384,
            10 => HashAlgorithm::Sha512,
            11 => HashAlgorithm::Sha224,
            12 => HashAlgorithm::Sha3_256,
            14 => HashAlgorithm::Sha3_512,
            other => return Err(Error::Unsupported(format!("hash algorithm {other}"))),
        })
    }

    pub fn code(self) -> u8 {
        match self {
            HashAlgorithm::Md5 => 1,
            HashAlgorithm::Sha1 => 2,
            HashAlgorithm::RipeMd160 => 3,
            HashAlgorithm::Sha256 => 8,
            HashAlgorithm::Sha384 => 9,
            HashAlgorithm::Sha512 => 10,
            HashAlgorithm::Sha224 => 11,
            HashAlgorithm::Sha3_256 => 12,
            HashAlgorithm::Sha3_512 => 14,
        }
    }

    /// Digest length in bytes.
    pub fn byte_length(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::RipeMd160 => 20,
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
            HashAlgorithm::Sha3_512 => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SymAlgoId {
    Idea,
    Tripledes,
    Cast5,
    Blowfish,
    Aes128,
    Aes192,
    Aes256,
    Twofish,
}

impl SymAlgoId {
    pub fn from_code(code: u8) -> Result<Self, Error> {
        Ok(match code {
            1 => SymAlgoId::Idea,
            2 => SymAlgoId::Tripledes,
            3 => SymAlgoId::Cast5,
            4 => SymAlgoId::Blowfish,
            7 => SymAlgoId::Aes128,
            8 => SymAlgoId::Aes192,
            9 => SymAlgoId::Aes256,
            10 => SymAlgoId::Twofish,
            other => return Err(Error::Unsupported(format!("symmetric algorithm {other}"))),
        })
    }

    pub fn code(self) -> u8 {
        match self {
            SymAlgoId::Idea => 1,
            SymAlgoId::Tripledes => 2,
            SymAlgoId::Cast5 => 3,
            SymAlgoId::Blowfish => 4,
            SymAlgoId::Aes128 => 7,
            SymAlgoId::Aes192 => 8,
            SymAlgoId::Aes256 => 9,
            SymAlgoId::Twofish => 10,
        }
    }

    pub fn key_size(self) -> usize {
        match self {
            SymAlgoId::Idea | SymAlgoId::Cast5 | SymAlgoId::Blowfish => 16,
            SymAlgoId::Tripledes => 24,
            SymAlgoId::Aes128 => 16,
            SymAlgoId::Aes192 => 24,
            SymAlgoId::Aes256 | SymAlgoId::Twofish => 32,
        }
    }

    pub fn block_size(self) -> usize {
        match self {
            SymAlgoId::Idea | SymAlgoId::Cast5 | SymAlgoId::Blowfish | SymAlgoId::Tripledes => 8,
            SymAlgoId::Aes128 | SymAlgoId::Aes192 | SymAlgoId::Aes256 | SymAlgoId::Twofish => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AeadId {
    Eax,
    Ocb,
    Gcm,
}

impl AeadId {
    pub fn from_code(code: u8) -> Result<Self, Error> {
        Ok(match code {
            1 => AeadId::Eax,
            2 => AeadId::Ocb,
            3 => AeadId::Gcm,
            other => return Err(Error::Unsupported(format!("AEAD algorithm {other}"))),
        })
    }

    pub fn code(self) -> u8 {
        match self {
            AeadId::Eax => 1,
            AeadId::Ocb => 2,
            AeadId::Gcm => 3,
        }
    }

    /// IV/nonce length in bytes, per RFC 9580 §9.6.
    pub fn iv_length(self) -> usize {
        match self {
            AeadId::Eax => 16,
            AeadId::Ocb => 15,
            AeadId::Gcm => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CurveOid {
    NistP256,
    NistP384,
    NistP521,
    Secp256k1,
    BrainpoolP256r1,
    BrainpoolP384r1,
    BrainpoolP512r1,
    Ed25519Legacy,
    Curve25519Legacy,
}

impl CurveOid {
    /// DER-encoded OID bytes as they appear on the wire (RFC 9580 §5.5.5.6 /
    /// §9.2).
    pub fn from_oid_bytes(oid: &[u8]) -> Result<Self, Error> {
        Ok(match oid {
            [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07] => CurveOid::NistP256,
            [0x2b, 0x81, 0x04, 0x00, 0x22] => CurveOid::NistP384,
            [0x2b, 0x81, 0x04, 0x00, 0x23] => CurveOid::NistP521,
            [0x2b, 0x81, 0x04, 0x00, 0x0a] => CurveOid::Secp256k1,
            [0x2b, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07] => CurveOid::BrainpoolP256r1,
            [0x2b, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0b] => CurveOid::BrainpoolP384r1,
            [0x2b, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0d] => CurveOid::BrainpoolP512r1,
            [0x2b, 0x06, 0x01, 0x04, 0x01, 0xda, 0x47, 0x0f, 0x01] => CurveOid::Ed25519Legacy,
            [0x2b, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01] => {
                CurveOid::Curve25519Legacy
            }
            other => {
                return Err(Error::Unsupported(format!(
                    "curve OID {}",
                    hex::encode(other)
                )))
            }
        })
    }

    pub fn oid_bytes(self) -> &'static [u8] {
        match self {
            CurveOid::NistP256 => &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07],
            CurveOid::NistP384 => &[0x2b, 0x81, 0x04, 0x00, 0x22],
            CurveOid::NistP521 => &[0x2b, 0x81, 0x04, 0x00, 0x23],
            CurveOid::Secp256k1 => &[0x2b, 0x81, 0x04, 0x00, 0x0a],
            CurveOid::BrainpoolP256r1 => &[0x2b, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07],
            CurveOid::BrainpoolP384r1 => &[0x2b, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0b],
            CurveOid::BrainpoolP512r1 => &[0x2b, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0d],
            CurveOid::Ed25519Legacy => &[0x2b, 0x06, 0x01, 0x04, 0x01, 0xda, 0x47, 0x0f, 0x01],
            CurveOid::Curve25519Legacy => {
                &[0x2b, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01]
            }
        }
    }

    /// Size in bytes of a left-padded scalar / curve point coordinate.
    pub fn scalar_size(self) -> usize {
        match self {
            CurveOid::NistP256 | CurveOid::Secp256k1 | CurveOid::BrainpoolP256r1 => 32,
            CurveOid::NistP384 | CurveOid::BrainpoolP384r1 => 48,
            CurveOid::NistP521 => 66,
            CurveOid::BrainpoolP512r1 => 64,
            CurveOid::Ed25519Legacy | CurveOid::Curve25519Legacy => 32,
        }
    }

    pub fn is_brainpool(self) -> bool {
        matches!(
            self,
            CurveOid::BrainpoolP256r1 | CurveOid::BrainpoolP384r1 | CurveOid::BrainpoolP512r1
        )
    }
}

/// Packet tags relevant to this crate (RFC 9580 §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketTag {
    PublicKeyEncryptedSessionKey = 1,
    SecretKey = 5,
    PublicKey = 6,
    SecretSubkey = 7,
    PublicSubkey = 14,
}
