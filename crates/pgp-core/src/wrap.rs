//! AES key wrap (RFC 3394), used to protect session keys under both the
//! legacy ECDH KEK (`adapters::ec`) and the composite PQC KEM combiner
//! output (`pqc::kem`). Kept as a single thin module so both call sites
//! share one RFC-3394 framing and one set of known-answer tests.

use aes_kw::{Kek, KekAes192, KekAes256};
use bytes::Bytes;

use crate::error::{Error, Result};

pub fn wrap_128(kek: &[u8; 16], plaintext: &[u8]) -> Result<Bytes> {
    let kek = Kek::from(*kek);
    let mut out = vec![0u8; plaintext.len() + 8];
    kek.wrap(plaintext, &mut out)
        .map_err(|_| Error::Malformed("AES-128-KW wrap failed".into()))?;
    Ok(Bytes::from(out))
}

pub fn unwrap_128(kek: &[u8; 16], wrapped: &[u8]) -> Result<Bytes> {
    let kek = Kek::from(*kek);
    let mut out = vec![0u8; wrapped.len().saturating_sub(8)];
    kek.unwrap(wrapped, &mut out)
        .map_err(|_| Error::DecryptionError)?;
    Ok(Bytes::from(out))
}

pub fn wrap_192(kek: &[u8; 24], plaintext: &[u8]) -> Result<Bytes> {
    let kek = KekAes192::from(*kek);
    let mut out = vec![0u8; plaintext.len() + 8];
    kek.wrap(plaintext, &mut out)
        .map_err(|_| Error::Malformed("AES-192-KW wrap failed".into()))?;
    Ok(Bytes::from(out))
}

pub fn unwrap_192(kek: &[u8; 24], wrapped: &[u8]) -> Result<Bytes> {
    let kek = KekAes192::from(*kek);
    let mut out = vec![0u8; wrapped.len().saturating_sub(8)];
    kek.unwrap(wrapped, &mut out)
        .map_err(|_| Error::DecryptionError)?;
    Ok(Bytes::from(out))
}

pub fn wrap_256(kek: &[u8; 32], plaintext: &[u8]) -> Result<Bytes> {
    let kek = KekAes256::from(*kek);
    let mut out = vec![0u8; plaintext.len() + 8];
    kek.wrap(plaintext, &mut out)
        .map_err(|_| Error::Malformed("AES-256-KW wrap failed".into()))?;
    Ok(Bytes::from(out))
}

pub fn unwrap_256(kek: &[u8; 32], wrapped: &[u8]) -> Result<Bytes> {
    let kek = KekAes256::from(*kek);
    let mut out = vec![0u8; wrapped.len().saturating_sub(8)];
    kek.unwrap(wrapped, &mut out)
        .map_err(|_| Error::DecryptionError)?;
    Ok(Bytes::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 3394 §4.1: wrap 128 bits of key data with a 128-bit KEK.
    #[test]
    fn rfc3394_128_over_128() {
        let kek = hex!("000102030405060708090A0B0C0D0E0F");
        let key_data = hex!("00112233445566778899AABBCCDDEEFF");
        let expected = hex!("1FA68B0A8112B447AEF34BD8FB5A7B829D3E862371D2CFE5");
        let wrapped = wrap_128(&kek, &key_data).unwrap();
        assert_eq!(&wrapped[..], &expected[..]);
        let unwrapped = unwrap_128(&kek, &wrapped).unwrap();
        assert_eq!(&unwrapped[..], &key_data[..]);
    }

    #[test]
    fn roundtrip_256() {
        let kek = [0x11u8; 32];
        let data = [0x22u8; 32];
        let wrapped = wrap_256(&kek, &data).unwrap();
        let unwrapped = unwrap_256(&kek, &wrapped).unwrap();
        assert_eq!(&unwrapped[..], &data[..]);
    }

    #[test]
    fn unwrap_detects_tamper() {
        let kek = [0x11u8; 16];
        let data = [0x22u8; 16];
        let mut wrapped = wrap_128(&kek, &data).unwrap().to_vec();
        wrapped[0] ^= 1;
        assert!(unwrap_128(&kek, &wrapped).is_err());
    }
}
