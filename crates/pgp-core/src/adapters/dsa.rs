//! DSA sign/verify (spec.md §3's DSA row), implemented directly against
//! `num-bigint-dig` rather than the typed `dsa` crate — the wire format
//! hands us raw MPI-encoded p/q/g/x/y, which textbook DSA over a bignum
//! maps onto more directly than that crate's component-builder API.

use bytes::Bytes;
use num_bigint_dig::{BigUint, RandBigInt};
use rand::rngs::OsRng;

use crate::error::{Error, Result};
use crate::mpi::{mpi_bytes, read_mpi};
use crate::params::{PrivateParams, PublicParams};

fn biguint(b: &[u8]) -> BigUint {
    BigUint::from_bytes_be(b)
}

/// Signs a pre-hashed digest, truncated to `q`'s bit length per FIPS 186-4
/// §4.6. Returns the wire encoding `MPI(r) || MPI(s)`.
pub fn sign(pub_params: &PublicParams, priv_params: &PrivateParams, hashed: &[u8]) -> Result<Bytes> {
    let PublicParams::Dsa { p, q, g, .. } = pub_params else {
        return Err(Error::Malformed("expected DSA public params".into()));
    };
    let PrivateParams::Dsa { x } = priv_params else {
        return Err(Error::Malformed("expected DSA private params".into()));
    };
    let p = biguint(p);
    let q = biguint(q);
    let g = biguint(g);
    let x = biguint(x);
    let z = truncate_to_q(hashed, &q);

    let mut rng = OsRng;
    loop {
        let k = rng.gen_biguint_below(&q);
        if k == BigUint::default() {
            continue;
        }
        let r = g.modpow(&k, &p) % &q;
        if r == BigUint::default() {
            continue;
        }
        let k_inv = match mod_inverse(&k, &q) {
            Some(v) => v,
            None => continue,
        };
        let s = (k_inv * (&z + &x * &r)) % &q;
        if s == BigUint::default() {
            continue;
        }
        let mut out = bytes::BytesMut::new();
        out.extend_from_slice(&mpi_bytes(&r.to_bytes_be()));
        out.extend_from_slice(&mpi_bytes(&s.to_bytes_be()));
        return Ok(out.freeze());
    }
}

pub fn verify(pub_params: &PublicParams, sig: &[u8], hashed: &[u8]) -> Result<bool> {
    let PublicParams::Dsa { p, q, g, y } = pub_params else {
        return Err(Error::Malformed("expected DSA public params".into()));
    };
    let p = biguint(p);
    let q = biguint(q);
    let g = biguint(g);
    let y = biguint(y);

    let mut buf = Bytes::copy_from_slice(sig);
    let r = biguint(&read_mpi(&mut buf)?);
    let s = biguint(&read_mpi(&mut buf)?);
    if r == BigUint::default() || r >= q || s == BigUint::default() || s >= q {
        return Ok(false);
    }

    let z = truncate_to_q(hashed, &q);
    let Some(w) = mod_inverse(&s, &q) else {
        return Ok(false);
    };
    let u1 = (&z * &w) % &q;
    let u2 = (&r * &w) % &q;
    let v = ((g.modpow(&u1, &p) * y.modpow(&u2, &p)) % &p) % &q;
    Ok(v == r)
}

pub fn validate_params(pub_params: &PublicParams, priv_params: &PrivateParams) -> bool {
    let (PublicParams::Dsa { p, g, y, .. }, PrivateParams::Dsa { x }) = (pub_params, priv_params)
    else {
        return false;
    };
    let p = biguint(p);
    let g = biguint(g);
    let y = biguint(y);
    let x = biguint(x);
    g.modpow(&x, &p) == y
}

fn truncate_to_q(hashed: &[u8], q: &BigUint) -> BigUint {
    let q_bits = q.bits();
    let z = BigUint::from_bytes_be(hashed);
    if (hashed.len() * 8) as u64 <= q_bits {
        z
    } else {
        z >> ((hashed.len() * 8) as u64 - q_bits)
    }
}

fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    use num_bigint_dig::ModInverse;
    a.clone().mod_inverse(m).and_then(|v| v.to_biguint())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_matches_small_q() {
        let q = BigUint::from(65521u32); // fits in 16 bits
        let hashed = [0xFFu8; 32]; // SHA-256-sized
        let z = truncate_to_q(&hashed, &q);
        assert!(z < q);
    }
}
