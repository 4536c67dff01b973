//! Sample-type decoders and their lookup by name.
//!
//! Every row either names a registered sample type or, when it has none, uses the
//! legacy format. Both cases go through the same [`SampleDecoder`] shape: the legacy
//! format is simply a built-in entry registered under [`LEGACY_TYPE`].

use std::sync::Arc;

use widecol_codec::value::{unpack, unpack_double};
use widecol_common::{Error, Result};
use widecol_store::{ColumnLayout, ColumnOffset};

use crate::sample::Sample;

/// Sample type assumed for rows without an explicit type.
pub const LEGACY_TYPE: &str = "kairos_legacy";

/// Built-in typed long samples, stored with the compact value codec.
pub const LONG_TYPE: &str = "kairos_long";

/// Built-in typed double samples, stored as 8 big-endian bytes.
pub const DOUBLE_TYPE: &str = "kairos_double";

/// Turns the stored bytes of one column into a [`Sample`].
pub trait SampleDecoder: Send + Sync + 'static {
    /// Name of the sample type this decoder handles.
    fn data_type(&self) -> &str;

    /// Decodes a stored value taken at `timestamp`.
    fn decode(&self, timestamp: i64, value: &[u8]) -> Result<Sample>;

    /// Decodes a column, with access to its offset.
    ///
    /// Typed decoders only need the value; the default implementation forwards to
    /// [`decode`](SampleDecoder::decode).
    fn decode_column(
        &self,
        timestamp: i64,
        _offset: ColumnOffset,
        _layout: &dyn ColumnLayout,
        value: &[u8],
    ) -> Result<Sample> {
        self.decode(timestamp, value)
    }
}

/// Lookup of sample-type decoders by name.
pub trait TypeRegistry: Send + Sync + 'static {
    /// Returns the decoder registered for `data_type`.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::UnknownType` if no such decoder exists.
    fn resolve(&self, data_type: &str) -> Result<Arc<dyn SampleDecoder>>;
}

/// Registry backed by a hash map, populated explicitly by its owner.
pub struct DecoderRegistry {
    decoders: ahash::HashMap<String, Arc<dyn SampleDecoder>>,
}

impl DecoderRegistry {
    /// Creates a registry with no decoders, not even the legacy one.
    pub fn empty() -> DecoderRegistry {
        DecoderRegistry {
            decoders: Default::default(),
        }
    }

    /// Creates a registry holding the legacy, long and double decoders.
    pub fn with_builtins() -> DecoderRegistry {
        let mut registry = DecoderRegistry::empty();
        registry.add(Arc::new(LegacyDecoder));
        registry.add(Arc::new(LongDecoder));
        registry.add(Arc::new(DoubleDecoder));
        registry
    }

    /// Registers a decoder under its own type name, replacing any previous entry.
    pub fn add(&mut self, decoder: Arc<dyn SampleDecoder>) {
        let name = decoder.data_type().to_string();
        self.decoders.insert(name, decoder);
    }

    pub fn contains(&self, data_type: &str) -> bool {
        self.decoders.contains_key(data_type)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TypeRegistry for DecoderRegistry {
    fn resolve(&self, data_type: &str) -> Result<Arc<dyn SampleDecoder>> {
        self.decoders
            .get(data_type)
            .cloned()
            .ok_or_else(|| Error::unknown_type(data_type))
    }
}

/// Legacy rows: the discriminator bit of the column offset tells long values from
/// double values, independently for every column.
pub struct LegacyDecoder;

impl SampleDecoder for LegacyDecoder {
    fn data_type(&self) -> &str {
        LEGACY_TYPE
    }

    fn decode(&self, _timestamp: i64, _value: &[u8]) -> Result<Sample> {
        Err(Error::invalid_format(
            LEGACY_TYPE,
            "legacy values cannot be decoded without their column offset",
        ))
    }

    fn decode_column(
        &self,
        timestamp: i64,
        offset: ColumnOffset,
        layout: &dyn ColumnLayout,
        value: &[u8],
    ) -> Result<Sample> {
        if layout.is_long_value(offset) {
            Ok(Sample::long(timestamp, unpack(value)?))
        } else {
            Ok(Sample::double(timestamp, unpack_double(value)?))
        }
    }
}

pub struct LongDecoder;

impl SampleDecoder for LongDecoder {
    fn data_type(&self) -> &str {
        LONG_TYPE
    }

    fn decode(&self, timestamp: i64, value: &[u8]) -> Result<Sample> {
        Ok(Sample::long(timestamp, unpack(value)?))
    }
}

pub struct DoubleDecoder;

impl SampleDecoder for DoubleDecoder {
    fn data_type(&self) -> &str {
        DOUBLE_TYPE
    }

    fn decode(&self, timestamp: i64, value: &[u8]) -> Result<Sample> {
        Ok(Sample::double(timestamp, unpack_double(value)?))
    }
}
