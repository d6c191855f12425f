//! Branchless selection over secret data, built on `subtle`.
//!
//! Used by the RSA PKCS#1 v1.5 decryption oracle defense, PKESK checksum
//! verification, and the `randomSessionKey` fallback select (§4.4, §5, §7).
//! None of these may branch on secret comparison results.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Selects `a` if `choice` is true, else `b`, byte by byte, without
/// branching on `choice`. Panics if the slices differ in length (a
/// programmer error, not secret-dependent).
pub fn select_bytes(choice: Choice, a: &[u8], b: &[u8]) -> Vec<u8> {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| u8::conditional_select(&y, &x, choice))
        .collect()
}

/// Constant-time equality over two equal-length byte slices.
pub fn ct_eq(a: &[u8], b: &[u8]) -> Choice {
    if a.len() != b.len() {
        return Choice::from(0);
    }
    a.ct_eq(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_picks_a_when_true() {
        let a = [1u8, 2, 3];
        let b = [4u8, 5, 6];
        assert_eq!(select_bytes(Choice::from(1), &a, &b), a.to_vec());
        assert_eq!(select_bytes(Choice::from(0), &a, &b), b.to_vec());
    }

    #[test]
    fn ct_eq_matches_eq() {
        assert_eq!(bool::from(ct_eq(b"abc", b"abc")), true);
        assert_eq!(bool::from(ct_eq(b"abc", b"abd")), false);
        assert_eq!(bool::from(ct_eq(b"abc", b"ab")), false);
    }
}
