//! Native X448 encryption (spec.md §3's X448 row; RFC 9580 §5.1.7).
//! Shared secret via X448 Diffie-Hellman, wrapping key via
//! HKDF-SHA512(info = "OpenPGP X448"), session key via AES-256-KW.

use aes_kw::KekAes256;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use cx448::x448::{PublicKey, StaticSecret};
use hkdf::Hkdf;
use sha2::Sha512;

use crate::algorithm::SymAlgoId;
use crate::error::{Error, Result};
use crate::params::{PrivateParams, PublicParams};

const HKDF_INFO: &[u8] = b"OpenPGP X448";

fn derive_kek(shared: &[u8; 56], ephemeral_public: &[u8; 56], recipient_public: &[u8; 56]) -> [u8; 32] {
    let mut ikm = Vec::with_capacity(56 * 3);
    ikm.extend_from_slice(ephemeral_public);
    ikm.extend_from_slice(recipient_public);
    ikm.extend_from_slice(shared);
    let hk = Hkdf::<Sha512>::new(None, &ikm);
    let mut kek = [0u8; 32];
    hk.expand(HKDF_INFO, &mut kek)
        .expect("32 bytes is a valid SHA-512 HKDF output length");
    kek
}

/// `ephemeral_public (56) || [sym_algo (1), v3 only] || octet_count (1) ||
/// wrapped_session_key`, mirroring [`super::x25519::encrypt`]'s v3/v6 split.
pub fn encrypt(pub_params: &PublicParams, session_key: &[u8], v3_sym_algo: Option<SymAlgoId>) -> Result<Bytes> {
    let PublicParams::X448 { a } = pub_params else {
        return Err(Error::Malformed("expected X448 public params".into()));
    };
    let recipient = PublicKey::from(*a);
    let ephemeral = StaticSecret::random(&mut rand::rngs::OsRng);
    let ephemeral_public = PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&recipient);

    let kek_bytes = derive_kek(shared.as_bytes(), ephemeral_public.as_bytes(), a);
    let kek = KekAes256::from(kek_bytes);
    let mut wrapped = vec![0u8; session_key.len() + 8];
    kek.wrap(session_key, &mut wrapped)
        .map_err(|_| Error::Malformed("AES-KW wrap failed".into()))?;

    let mut out = BytesMut::new();
    out.extend_from_slice(ephemeral_public.as_bytes());
    if let Some(sym_algo) = v3_sym_algo {
        out.put_u8(sym_algo.code());
    }
    out.put_u8(wrapped.len() as u8);
    out.extend_from_slice(&wrapped);
    Ok(out.freeze())
}

pub fn decrypt(
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    ct: &[u8],
    random_payload: Option<&[u8]>,
    version: u8,
) -> Result<(Bytes, Option<SymAlgoId>)> {
    let PublicParams::X448 { a } = pub_params else {
        return Err(Error::Malformed("expected X448 public params".into()));
    };
    let PrivateParams::X448 { k } = priv_params else {
        return Err(Error::Malformed("expected X448 private params".into()));
    };
    let our_secret = StaticSecret::from(*k);

    let decode = || -> Result<(Bytes, Option<SymAlgoId>)> {
        let mut buf = Bytes::copy_from_slice(ct);
        if buf.remaining() < 57 {
            return Err(Error::Malformed("truncated X448 ciphertext".into()));
        }
        let mut ephemeral_public = [0u8; 56];
        buf.copy_to_slice(&mut ephemeral_public);
        let sym_algo = if version == 3 {
            if buf.remaining() < 1 {
                return Err(Error::Malformed("missing v3 symmetric algorithm octet".into()));
            }
            Some(SymAlgoId::from_code(buf.get_u8())?)
        } else {
            None
        };
        if buf.remaining() < 1 {
            return Err(Error::Malformed("truncated X448 wrap length".into()));
        }
        let wrap_len = buf[0] as usize;
        buf.advance(1);
        if buf.remaining() < wrap_len {
            return Err(Error::Malformed("truncated X448 wrapped key".into()));
        }
        let wrapped = buf.copy_to_bytes(wrap_len);

        let shared = our_secret.diffie_hellman(&PublicKey::from(ephemeral_public));
        let kek_bytes = derive_kek(shared.as_bytes(), &ephemeral_public, a);
        let kek = KekAes256::from(kek_bytes);
        let mut out = vec![0u8; wrapped.len() - 8];
        kek.unwrap(&wrapped, &mut out)
            .map_err(|_| Error::DecryptionError)?;
        Ok((Bytes::from(out), sym_algo))
    };

    match decode() {
        Ok(pt) => Ok(pt),
        Err(e) => match random_payload {
            Some(r) => Ok((Bytes::copy_from_slice(r), None)),
            None => Err(e),
        },
    }
}

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (PublicParams::X448 { a }, PrivateParams::X448 { k }) = (pub_params, priv_params) else {
        return false;
    };
    let derived = PublicKey::from(&StaticSecret::from(*k));
    derived.as_bytes() == a
}
