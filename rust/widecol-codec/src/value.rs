//! Stored value layout for long and double samples.
//!
//! Long values use an asymmetric big-endian layout:
//!
//! ```text
//! value == 0   ->  (no bytes)
//! value  > 0   ->  minimal big-endian bytes, no leading zero byte (1..=8 bytes)
//! value  < 0   ->  full 8-byte big-endian two's complement
//! ```
//!
//! Decoding treats 1 to 7 bytes as an unsigned, zero-extended quantity and exactly
//! 8 bytes as a signed one. Only non-negative values get shorter; negative values
//! always occupy the full width. This layout is persisted, so it must not be turned
//! into a symmetric minimal two's complement encoding.

use byteorder::{BigEndian, ByteOrder};
use widecol_common::{Result, verify_data};

/// Size of a fully expanded long value and of a double value.
pub const FULL_WIDTH: usize = 8;

/// Encodes `value` into a freshly allocated buffer.
pub fn pack(value: i64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(packed_len(value));
    pack_into(value, &mut buf);
    buf
}

/// Appends the encoded form of `value` to `buf`.
pub fn pack_into(value: i64, buf: &mut Vec<u8>) {
    let bytes = value.to_be_bytes();
    buf.extend_from_slice(&bytes[FULL_WIDTH - packed_len(value)..]);
}

/// Returns the number of bytes [`pack`] produces for `value`.
#[inline]
pub fn packed_len(value: i64) -> usize {
    if value < 0 {
        FULL_WIDTH
    } else {
        FULL_WIDTH - (value.leading_zeros() as usize / 8)
    }
}

/// Decodes a long value produced by [`pack`].
///
/// Fails when `bytes` is longer than 8 bytes.
pub fn unpack(bytes: &[u8]) -> Result<i64> {
    verify_data!(
        "long value",
        bytes.len() <= FULL_WIDTH,
        "{} bytes exceed the full width of {FULL_WIDTH}",
        bytes.len()
    );
    let value = match bytes.len() {
        0 => 0,
        FULL_WIDTH => BigEndian::read_i64(bytes),
        len => BigEndian::read_uint(bytes, len) as i64,
    };
    Ok(value)
}

/// Encodes a double sample as 8 big-endian IEEE-754 bytes.
pub fn pack_double(value: f64) -> Vec<u8> {
    let mut buf = vec![0u8; FULL_WIDTH];
    BigEndian::write_f64(&mut buf, value);
    buf
}

/// Decodes a double sample; `bytes` must be exactly 8 bytes long.
pub fn unpack_double(bytes: &[u8]) -> Result<f64> {
    verify_data!(
        "double value",
        bytes.len() == FULL_WIDTH,
        "expected {FULL_WIDTH} bytes, found {}",
        bytes.len()
    );
    Ok(BigEndian::read_f64(bytes))
}
