//! Low-level binary parsing helpers for SAS7BDAT structures.
//!
//! All reads take an explicit `(data, offset)` pair and never advance any
//! cursor: every field in the format lives at a fixed offset within its
//! header, page, or subheader. All multi-byte values are little-endian.

use super::text::decode_text;
use crate::error::{SasError, SasResult};

/// Borrow `len` bytes of `data` starting at `offset`.
///
/// Fails with [`SasError::OutOfRange`] when the span does not fit, including
/// when `offset + len` overflows.
#[inline]
pub fn read_bytes(data: &[u8], offset: usize, len: usize) -> SasResult<&[u8]> {
    match offset.checked_add(len) {
        Some(end) if end <= data.len() => Ok(&data[offset..end]),
        _ => Err(SasError::OutOfRange {
            offset,
            length: len,
            available: data.len(),
        }),
    }
}

#[inline]
fn read_array<const N: usize>(data: &[u8], offset: usize) -> SasResult<[u8; N]> {
    let mut buf = [0u8; N];
    buf.copy_from_slice(read_bytes(data, offset, N)?);
    Ok(buf)
}

/// Read a `u8` at `offset`.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> SasResult<u8> {
    read_array::<1>(data, offset).map(|b| b[0])
}

/// Read a `u16` (little-endian) at `offset`.
#[inline]
pub fn read_u16(data: &[u8], offset: usize) -> SasResult<u16> {
    read_array(data, offset).map(u16::from_le_bytes)
}

/// Read an `i16` (little-endian) at `offset`.
#[inline]
pub fn read_i16(data: &[u8], offset: usize) -> SasResult<i16> {
    read_array(data, offset).map(i16::from_le_bytes)
}

/// Read an `i32` (little-endian) at `offset`.
#[inline]
pub fn read_i32(data: &[u8], offset: usize) -> SasResult<i32> {
    read_array(data, offset).map(i32::from_le_bytes)
}

/// Read an `f64` (IEEE 754 double, little-endian) at `offset`.
#[inline]
pub fn read_f64(data: &[u8], offset: usize) -> SasResult<f64> {
    read_array(data, offset).map(f64::from_le_bytes)
}

/// Decode `len` bytes at `offset` as Windows-1252 text.
pub fn read_text(data: &[u8], offset: usize, len: usize) -> SasResult<String> {
    read_bytes(data, offset, len).map(decode_text)
}

/// Concatenate two byte spans into a new buffer.
pub fn concat(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Rebuild a full-width double from a truncated numeric field.
///
/// SAS drops the low-order bytes of a double when a numeric column is stored
/// in fewer than 8 bytes, so the stored bytes go to the high-order end of the
/// little-endian buffer and the rest is zero-filled. Fields of 8 bytes or more
/// use their first 8 bytes as-is.
pub fn widen_to_f64(raw: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    if raw.len() >= 8 {
        buf.copy_from_slice(&raw[..8]);
    } else {
        buf[8 - raw.len()..].copy_from_slice(raw);
    }
    f64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_i32() {
        let data = [0xFF, 0x78, 0x56, 0x34, 0x12];
        assert_eq!(read_i32(&data, 1).unwrap(), 0x1234_5678);
        assert_eq!(read_i32(&[0xFF; 4], 0).unwrap(), -1);
    }

    #[test]
    fn test_read_u16_and_i16() {
        let data = [0x34, 0x12, 0xFE, 0xFF];
        assert_eq!(read_u16(&data, 0).unwrap(), 0x1234);
        assert_eq!(read_i16(&data, 2).unwrap(), -2);
    }

    #[test]
    fn test_read_f64() {
        let val = 3.14_f64;
        let mut data = vec![0u8; 3];
        data.extend_from_slice(&val.to_le_bytes());
        assert_eq!(read_f64(&data, 3).unwrap(), val);
    }

    #[test]
    fn test_out_of_range_is_typed() {
        let data = [0u8; 4];
        match read_i32(&data, 1) {
            Err(SasError::OutOfRange {
                offset,
                length,
                available,
            }) => {
                assert_eq!((offset, length, available), (1, 4, 4));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
        assert!(read_u8(&[], 0).is_err());
        assert!(read_bytes(&data, usize::MAX, 2).is_err());
        assert_eq!(read_bytes(&data, 4, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_read_text() {
        let data = b"xxABC   ";
        assert_eq!(read_text(data, 2, 6).unwrap(), "ABC   ");
        // 0xE9 is 'é' in Windows-1252
        assert_eq!(read_text(&[0x63, 0x61, 0x66, 0xE9], 0, 4).unwrap(), "café");
    }

    #[test]
    fn test_concat() {
        assert_eq!(concat(&[1, 2], &[3]), vec![1, 2, 3]);
        assert_eq!(concat(&[], &[]), Vec::<u8>::new());
    }

    #[test]
    fn test_widen_full_width() {
        let bytes = 21.43_f64.to_le_bytes();
        assert_eq!(widen_to_f64(&bytes), 21.43);
    }

    #[test]
    fn test_widen_truncated_double() {
        // A 4-byte column stores the 4 high-order bytes of the double.
        let full = 1234.5_f64.to_le_bytes();
        assert_eq!(widen_to_f64(&full[4..]), 1234.5);

        // 3-byte storage of 2.0 (0x4000_0000_0000_0000)
        assert_eq!(widen_to_f64(&[0x00, 0x00, 0x40]), 2.0);
    }

    #[test]
    fn test_widen_matches_high_end_padding() {
        // Placing an f32 bit pattern in the high-order half of a double is
        // exactly what the widening convention does with 4 stored bytes.
        let pattern = 1.5_f32.to_le_bytes();
        let mut manual = [0u8; 8];
        manual[4..].copy_from_slice(&pattern);
        assert_eq!(
            widen_to_f64(&pattern).to_bits(),
            f64::from_le_bytes(manual).to_bits()
        );
    }

    proptest! {
        #[test]
        fn prop_reads_never_panic(data in proptest::collection::vec(any::<u8>(), 0..64), offset in 0usize..96) {
            let fits = offset + 4 <= data.len();
            prop_assert_eq!(read_i32(&data, offset).is_ok(), fits);
            prop_assert_eq!(read_f64(&data, offset).is_ok(), offset + 8 <= data.len());
        }

        #[test]
        fn prop_slice_length(data in proptest::collection::vec(any::<u8>(), 0..64), offset in 0usize..64, len in 0usize..64) {
            match read_bytes(&data, offset, len) {
                Ok(s) => prop_assert_eq!(s.len(), len),
                Err(SasError::OutOfRange { available, .. }) => {
                    prop_assert!(offset + len > data.len());
                    prop_assert_eq!(available, data.len());
                }
                Err(e) => prop_assert!(false, "unexpected error {e}"),
            }
        }
    }
}
