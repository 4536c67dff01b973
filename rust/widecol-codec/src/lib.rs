//! Byte-level codecs for stored sample values.
//!
//! - [`value`]: the compact big-endian integer layout used for long samples, plus the
//!   fixed-width double layout.
//! - [`varint`]: LEB128-style variable-length integers with zig-zag mapping for signed
//!   values.

pub mod value;
pub mod varint;

pub use value::{pack, pack_double, pack_into, unpack, unpack_double};
