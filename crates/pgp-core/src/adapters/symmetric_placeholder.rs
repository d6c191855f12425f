//! HMAC and AEAD "public key" algorithms (spec.md §3's HMAC/AEAD rows).
//! These algorithm IDs exist so a symmetric key can be wrapped inside a
//! key packet; there is no asymmetric operation to perform, only a
//! binding check between the stored key material and its public hash.

use sha2::{Digest, Sha256};

use crate::params::{PrivateParams, PublicParams};

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    match (pub_params, priv_params) {
        (
            PublicParams::Hmac { binding, .. },
            PrivateParams::Hmac {
                hash_seed,
                key_material,
            },
        )
        | (
            PublicParams::Aead { binding, .. },
            PrivateParams::Aead {
                hash_seed,
                key_material,
            },
        ) => {
            let digest = Sha256::digest(hash_seed);
            digest.as_slice() == binding && !key_material.is_empty()
        }
        _ => false,
    }
}
