//! ElGamal encrypt/decrypt (spec.md §3's ElGamal row). Legacy and
//! deprecated in OpenPGP, but still a recognized algorithm code (§1). Built
//! directly on `num-bigint-dig`, same rationale as [`super::dsa`].

use bytes::{Bytes, BytesMut};
use num_bigint_dig::{BigUint, ModInverse, RandBigInt};
use rand::rngs::OsRng;

use crate::error::{Error, Result};
use crate::mpi::{mpi_bytes, read_mpi};
use crate::params::{PrivateParams, PublicParams};

fn biguint(b: &[u8]) -> BigUint {
    BigUint::from_bytes_be(b)
}

pub fn encrypt(pub_params: &PublicParams, data: &[u8]) -> Result<Bytes> {
    let PublicParams::Elgamal { p, g, y } = pub_params else {
        return Err(Error::Malformed("expected ElGamal public params".into()));
    };
    let p = biguint(p);
    let g = biguint(g);
    let y = biguint(y);
    let m = BigUint::from_bytes_be(data);
    if m >= p {
        return Err(Error::Malformed("message too large for ElGamal modulus".into()));
    }

    let mut rng = OsRng;
    let k = rng.gen_biguint_below(&p);
    let c1 = g.modpow(&k, &p);
    let c2 = (m * y.modpow(&k, &p)) % &p;

    let mut out = BytesMut::new();
    out.extend_from_slice(&mpi_bytes(&c1.to_bytes_be()));
    out.extend_from_slice(&mpi_bytes(&c2.to_bytes_be()));
    Ok(out.freeze())
}

pub fn decrypt(
    pub_params: &PublicParams,
    priv_params: &PrivateParams,
    ct: &[u8],
    random_payload: Option<&[u8]>,
) -> Result<Bytes> {
    let PublicParams::Elgamal { p, .. } = pub_params else {
        return Err(Error::Malformed("expected ElGamal public params".into()));
    };
    let PrivateParams::Elgamal { x } = priv_params else {
        return Err(Error::Malformed("expected ElGamal private params".into()));
    };
    let p = biguint(p);
    let x = biguint(x);

    let decode = || -> Result<Bytes> {
        let mut buf = Bytes::copy_from_slice(ct);
        let c1 = biguint(&read_mpi(&mut buf)?);
        let c2 = biguint(&read_mpi(&mut buf)?);
        let s = c1.modpow(&x, &p);
        let s_inv = s
            .mod_inverse(&p)
            .ok_or_else(|| Error::DecryptionError)?
            .to_biguint()
            .ok_or(Error::DecryptionError)?;
        let m = (c2 * s_inv) % &p;
        Ok(Bytes::from(m.to_bytes_be()))
    };

    match decode() {
        Ok(pt) => Ok(pt),
        Err(e) => match random_payload {
            Some(r) => Ok(Bytes::copy_from_slice(r)),
            None => Err(e),
        },
    }
}

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (PublicParams::Elgamal { p, g, y }, PrivateParams::Elgamal { x }) = (pub_params, priv_params)
    else {
        return false;
    };
    let p = biguint(p);
    let g = biguint(g);
    let y = biguint(y);
    let x = biguint(x);
    g.modpow(&x, &p) == y
}
