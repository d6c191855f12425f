//! MPI / native field codec (C2).
//!
//! An MPI is a 2-byte big-endian bit length followed by `ceil(bits/8)`
//! big-endian bytes (no leading zero byte), per RFC 9580 §3.2.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Error;

/// Reads a cursor-position-advancing MPI off `buf`.
pub fn read_mpi(buf: &mut impl Buf) -> Result<Bytes, Error> {
    if buf.remaining() < 2 {
        return Err(Error::Malformed("truncated MPI length".into()));
    }
    let bits = buf.get_u16();
    let len = ((bits as usize) + 7) / 8;
    if buf.remaining() < len {
        return Err(Error::Malformed("truncated MPI body".into()));
    }
    Ok(buf.copy_to_bytes(len))
}

/// Reads exactly `n` bytes, erroring on truncation.
pub fn read_exact(buf: &mut impl Buf, n: usize) -> Result<Bytes, Error> {
    if buf.remaining() < n {
        return Err(Error::Malformed(format!(
            "expected {n} bytes, got {}",
            buf.remaining()
        )));
    }
    Ok(buf.copy_to_bytes(n))
}

/// Left-pads `b` with zero bytes to length `n`. Errors if `b` is already
/// longer than `n`.
pub fn left_pad(b: &[u8], n: usize) -> Result<Vec<u8>, Error> {
    if b.len() > n {
        return Err(Error::Malformed(format!(
            "value of {} bytes does not fit in {n}",
            b.len()
        )));
    }
    let mut out = vec![0u8; n - b.len()];
    out.extend_from_slice(b);
    Ok(out)
}

/// Strips leading zero bytes (but keeps at least one byte for a zero value).
fn strip_leading_zeros(b: &[u8]) -> &[u8] {
    let first_nonzero = b.iter().position(|&x| x != 0);
    match first_nonzero {
        Some(i) => &b[i..],
        None => {
            if b.is_empty() {
                b
            } else {
                &b[b.len() - 1..]
            }
        }
    }
}

fn bit_length(b: &[u8]) -> u16 {
    if b.is_empty() {
        return 0;
    }
    let lead = b[0];
    let used_bits = 8 - lead.leading_zeros() as u16;
    ((b.len() as u16 - 1) * 8) + used_bits
}

/// Encodes `b` as an MPI: 2-byte bit length (of the highest set bit in the
/// first nonzero byte) followed by the minimal big-endian bytes.
pub fn write_mpi(out: &mut BytesMut, b: &[u8]) {
    let trimmed = strip_leading_zeros(b);
    out.put_u16(bit_length(trimmed));
    out.put_slice(trimmed);
}

pub fn mpi_bytes(b: &[u8]) -> Bytes {
    let mut out = BytesMut::new();
    write_mpi(&mut out, b);
    out.freeze()
}

/// 2-byte big-endian sum of `b` mod 65536, per RFC 9580 §5.5.3 (legacy
/// session-key / secret-key checksum).
pub fn checksum16(b: &[u8]) -> [u8; 2] {
    let sum: u32 = b.iter().fold(0u32, |acc, &x| acc.wrapping_add(x as u32));
    ((sum & 0xFFFF) as u16).to_be_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mpi_round_trip() {
        let val = [0x01, 0x02, 0x03];
        let encoded = mpi_bytes(&val);
        // 3 bytes, top byte 0x01 -> bit length = 16 + 1 = 17
        assert_eq!(&encoded[..2], &[0x00, 0x11]);
        let mut buf = encoded.clone();
        let decoded = read_mpi(&mut buf).unwrap();
        assert_eq!(&decoded[..], &val[..]);
    }

    #[test]
    fn mpi_strips_leading_zeros() {
        let val = [0x00, 0x00, 0xFF];
        let encoded = mpi_bytes(&val);
        let mut buf = encoded.clone();
        let decoded = read_mpi(&mut buf).unwrap();
        assert_eq!(&decoded[..], &[0xFF]);
    }

    #[test]
    fn mpi_truncated_errors() {
        let mut buf = Bytes::from_static(&[0x00, 0x10, 0x01]);
        assert!(read_mpi(&mut buf).is_err());
    }

    #[test]
    fn left_pad_rejects_oversize() {
        assert!(left_pad(&[1, 2, 3], 2).is_err());
        assert_eq!(left_pad(&[1, 2], 4).unwrap(), vec![0, 0, 1, 2]);
    }

    #[test]
    fn checksum_matches_known_value() {
        // sum of 0x01 + 0xAA*16 = 1 + 2720 = 2721 = 0x0AA1
        let mut data = vec![0x01u8];
        data.extend(vec![0xAAu8; 16]);
        assert_eq!(checksum16(&data), [0x0A, 0xA1]);
    }
}
