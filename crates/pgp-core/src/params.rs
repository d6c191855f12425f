//! The algorithm-tagged parameter record (spec.md §3): one sum type for
//! public parameters, one for private parameters. Modeled as a closed,
//! compile-time-exhaustive tagged sum rather than dynamic dispatch, per
//! the REDESIGN note in spec.md §9 ("prefer (a) for the 20-odd closed
//! algorithm set").

use bytes::Bytes;

use crate::algorithm::{AeadId, AlgoId, CurveOid, HashAlgorithm, SymAlgoId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicParams {
    Rsa {
        n: Bytes,
        e: Bytes,
    },
    Dsa {
        p: Bytes,
        q: Bytes,
        g: Bytes,
        y: Bytes,
    },
    Elgamal {
        p: Bytes,
        g: Bytes,
        y: Bytes,
    },
    Ecdsa {
        curve: CurveOid,
        q: Bytes,
    },
    Ecdh {
        curve: CurveOid,
        q: Bytes,
        hash: HashAlgorithm,
        sym: SymAlgoId,
    },
    EddsaLegacy {
        curve: CurveOid,
        q: [u8; 33],
    },
    Ed25519 {
        a: [u8; 32],
    },
    Ed448 {
        a: [u8; 57],
    },
    X25519 {
        a: [u8; 32],
    },
    X448 {
        a: [u8; 56],
    },
    Hmac {
        tag: u8,
        binding: [u8; 32],
    },
    Aead {
        tag: u8,
        binding: [u8; 32],
    },
    MlKemX25519 {
        ecc_public: [u8; 32],
        mlkem_public: Vec<u8>,
    },
    MlDsaEd25519 {
        ecc_public: [u8; 32],
        mldsa_public: Vec<u8>,
    },
    SlhDsa {
        public: Vec<u8>,
    },
}

impl PublicParams {
    pub fn algo(&self) -> AlgoId {
        match self {
            PublicParams::Rsa { .. } => AlgoId::RsaEncryptSign,
            PublicParams::Dsa { .. } => AlgoId::Dsa,
            PublicParams::Elgamal { .. } => AlgoId::ElgamalEncryptSign,
            PublicParams::Ecdsa { .. } => AlgoId::Ecdsa,
            PublicParams::Ecdh { .. } => AlgoId::Ecdh,
            PublicParams::EddsaLegacy { .. } => AlgoId::EddsaLegacy,
            PublicParams::Ed25519 { .. } => AlgoId::Ed25519,
            PublicParams::Ed448 { .. } => AlgoId::Ed448,
            PublicParams::X25519 { .. } => AlgoId::X25519,
            PublicParams::X448 { .. } => AlgoId::X448,
            PublicParams::Hmac { .. } => AlgoId::Hmac,
            PublicParams::Aead { .. } => AlgoId::Aead,
            PublicParams::MlKemX25519 { .. } => AlgoId::MlKemX25519,
            PublicParams::MlDsaEd25519 { .. } => AlgoId::MlDsaEd25519,
            PublicParams::SlhDsa { .. } => AlgoId::SlhDsaShake128s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateParams {
    Rsa {
        d: Vec<u8>,
        p: Vec<u8>,
        q: Vec<u8>,
        u: Vec<u8>,
    },
    Dsa {
        x: Vec<u8>,
    },
    Elgamal {
        x: Vec<u8>,
    },
    Ecdsa {
        d: Vec<u8>,
    },
    Ecdh {
        d: Vec<u8>,
    },
    EddsaLegacy {
        seed: [u8; 32],
    },
    Ed25519 {
        seed: [u8; 32],
    },
    Ed448 {
        seed: [u8; 57],
    },
    X25519 {
        k: [u8; 32],
    },
    X448 {
        k: [u8; 56],
    },
    Hmac {
        hash_seed: [u8; 32],
        key_material: Vec<u8>,
    },
    Aead {
        hash_seed: [u8; 32],
        key_material: Vec<u8>,
    },
    MlKemX25519 {
        ecc_secret: [u8; 32],
        mlkem_seed: [u8; 64],
        /// Re-derived from `mlkem_seed` on parse; never serialized (spec.md
        /// §5's `skip_serialize` marker note, §9).
        mlkem_secret_expanded: Option<Vec<u8>>,
    },
    MlDsaEd25519 {
        ecc_secret: [u8; 32],
        mldsa_seed: [u8; 32],
        /// Re-derived from `mldsa_seed` on parse; never serialized.
        mldsa_secret_expanded: Option<Vec<u8>>,
    },
    SlhDsa {
        secret: Vec<u8>,
    },
}

impl PrivateParams {
    /// Zeroes each private-parameter buffer before the value is dropped,
    /// per spec.md §5's secret-handling policy.
    pub fn zeroize(&mut self) {
        use zeroize::Zeroize;
        match self {
            PrivateParams::Rsa { d, p, q, u } => {
                d.zeroize();
                p.zeroize();
                q.zeroize();
                u.zeroize();
            }
            PrivateParams::Dsa { x } => x.zeroize(),
            PrivateParams::Elgamal { x } => x.zeroize(),
            PrivateParams::Ecdsa { d } => d.zeroize(),
            PrivateParams::Ecdh { d } => d.zeroize(),
            PrivateParams::EddsaLegacy { seed } => seed.zeroize(),
            PrivateParams::Ed25519 { seed } => seed.zeroize(),
            PrivateParams::Ed448 { seed } => seed.zeroize(),
            PrivateParams::X25519 { k } => k.zeroize(),
            PrivateParams::X448 { k } => k.zeroize(),
            PrivateParams::Hmac {
                hash_seed,
                key_material,
            } => {
                hash_seed.zeroize();
                key_material.zeroize();
            }
            PrivateParams::Aead {
                hash_seed,
                key_material,
            } => {
                hash_seed.zeroize();
                key_material.zeroize();
            }
            PrivateParams::MlKemX25519 {
                ecc_secret,
                mlkem_seed,
                mlkem_secret_expanded,
            } => {
                ecc_secret.zeroize();
                mlkem_seed.zeroize();
                if let Some(ref mut v) = mlkem_secret_expanded {
                    v.zeroize();
                }
            }
            PrivateParams::MlDsaEd25519 {
                ecc_secret,
                mldsa_seed,
                mldsa_secret_expanded,
            } => {
                ecc_secret.zeroize();
                mldsa_seed.zeroize();
                if let Some(ref mut v) = mldsa_secret_expanded {
                    v.zeroize();
                }
            }
            PrivateParams::SlhDsa { secret } => secret.zeroize(),
        }
    }
}
