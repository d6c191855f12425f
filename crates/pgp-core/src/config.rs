//! Process-wide tunables, threaded explicitly rather than read from a
//! global — see DESIGN.md's note on `spec.md` §9 ("Global config").

use crate::algorithm::AeadId;

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Whether newly-encrypted secret-key packets use modern AEAD
    /// protection (s2kUsage=253) rather than legacy CFB+SHA-1 (254).
    pub aead_protect: bool,
    /// AEAD mode used when `aead_protect` is set.
    pub preferred_aead_algorithm: AeadId,
    /// After signing with Ed25519, re-verify the signature before
    /// returning, to catch a fault that would otherwise leak the private
    /// key if the same message is ever signed twice under a corrupted
    /// scalar.
    pub check_eddsa_faulty_signatures: bool,
    /// Treat v4 secret keys with s2kUsage=253 as legacy AEAD (empty
    /// associated data, no HKDF) instead of modern AEAD. v5 keys with
    /// s2kUsage=253 are always legacy AEAD regardless of this flag.
    pub parse_aead_encrypted_v4_keys_as_legacy: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            aead_protect: true,
            preferred_aead_algorithm: AeadId::Ocb,
            check_eddsa_faulty_signatures: true,
            parse_aead_encrypted_v4_keys_as_legacy: false,
        }
    }
}
