/// Value of a decoded sample.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Long(i64),
    Double(f64),
    /// Opaque payload produced by custom sample types.
    Binary(Vec<u8>),
}

/// A single timestamped sample delivered to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: i64,
    pub value: SampleValue,
}

impl Sample {
    pub fn long(timestamp: i64, value: i64) -> Sample {
        Sample {
            timestamp,
            value: SampleValue::Long(value),
        }
    }

    pub fn double(timestamp: i64, value: f64) -> Sample {
        Sample {
            timestamp,
            value: SampleValue::Double(value),
        }
    }

    pub fn binary(timestamp: i64, value: impl Into<Vec<u8>>) -> Sample {
        Sample {
            timestamp,
            value: SampleValue::Binary(value.into()),
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self.value {
            SampleValue::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            SampleValue::Double(v) => Some(v),
            _ => None,
        }
    }
}
