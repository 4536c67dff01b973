//! Variable-length integers in 7-bit groups, least significant group first.
//!
//! Every byte except the last has its high bit set. Signed values are zig-zag mapped
//! first so that small negative numbers stay short.

use widecol_common::{Error, Result};

/// Longest encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Appends the unsigned varint encoding of `value` to `buf`.
pub fn pack_unsigned(mut value: u64, buf: &mut Vec<u8>) {
    while value & !0x7f != 0 {
        buf.push(((value & 0x7f) | 0x80) as u8);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Decodes an unsigned varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn unpack_unsigned(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        // The last group holds only bit 63.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(Error::invalid_format("varint", "value exceeds 64 bits"));
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    if bytes.len() >= MAX_VARINT_LEN {
        Err(Error::invalid_format(
            "varint",
            format!("longer than {MAX_VARINT_LEN} bytes"),
        ))
    } else {
        Err(Error::invalid_format("varint", "truncated input"))
    }
}

/// Appends the zig-zag varint encoding of `value` to `buf`.
pub fn pack_varint(value: i64, buf: &mut Vec<u8>) {
    pack_unsigned(zigzag(value), buf);
}

/// Decodes a zig-zag varint from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn unpack_varint(bytes: &[u8]) -> Result<(i64, usize)> {
    let (value, len) = unpack_unsigned(bytes)?;
    Ok((unzigzag(value), len))
}

#[inline]
fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
fn unzigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
