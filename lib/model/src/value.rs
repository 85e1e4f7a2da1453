use serde_json::Value as JsonValue;

/// A single decoded cell of a column.
///
/// There is one variant per leaf type of the target schema vocabulary, plus
/// [PlainValue::Group] for one instance of a nested group,
/// [PlainValue::Repeated] for a repeated-group cell, and [PlainValue::Json]
/// for types that are stored as opaque JSON text (lists and fixed-size
/// lists).
#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Utf8(String),
    Bytes(Vec<u8>),
    /// Milliseconds since the Unix epoch.
    TimestampMillis(i64),
    /// Microseconds since the Unix epoch.
    TimestampMicros(i64),
    /// Milliseconds since midnight.
    TimeMillis(i32),
    /// Microseconds since midnight.
    TimeMicros(i64),
    /// A parsed JSON document (the passthrough encoding of nested lists).
    Json(JsonValue),
    /// One instance of a nested group, child values in declared order.
    Group(Vec<(String, Option<PlainValue>)>),
    /// A repeated-group cell. Structs carry exactly one element, maps carry
    /// one element per entry.
    Repeated(Vec<PlainValue>),
}

impl PlainValue {
    /// A short name for the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PlainValue::Bool(_) => "BOOLEAN",
            PlainValue::Int8(_) => "INT_8",
            PlainValue::Int16(_) => "INT_16",
            PlainValue::Int32(_) => "INT_32",
            PlainValue::Int64(_) => "INT_64",
            PlainValue::UInt8(_) => "UINT_8",
            PlainValue::UInt16(_) => "UINT_16",
            PlainValue::UInt32(_) => "UINT_32",
            PlainValue::UInt64(_) => "UINT_64",
            PlainValue::Float(_) => "FLOAT",
            PlainValue::Double(_) => "DOUBLE",
            PlainValue::Utf8(_) => "UTF8",
            PlainValue::Bytes(_) => "BYTE_ARRAY",
            PlainValue::TimestampMillis(_) => "TIMESTAMP_MILLIS",
            PlainValue::TimestampMicros(_) => "TIMESTAMP_MICROS",
            PlainValue::TimeMillis(_) => "TIME_MILLIS",
            PlainValue::TimeMicros(_) => "TIME_MICROS",
            PlainValue::Json(_) => "JSON",
            PlainValue::Group(_) => "GROUP",
            PlainValue::Repeated(_) => "REPEATED",
        }
    }

    /// Returns the contained boolean, if this is a [PlainValue::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PlainValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the contained string slice, if this is a [PlainValue::Utf8].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlainValue::Utf8(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Widens any signed integer or time variant to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PlainValue::Int8(value) => Some(i64::from(*value)),
            PlainValue::Int16(value) => Some(i64::from(*value)),
            PlainValue::Int32(value) => Some(i64::from(*value)),
            PlainValue::Int64(value)
            | PlainValue::TimestampMillis(value)
            | PlainValue::TimestampMicros(value)
            | PlainValue::TimeMicros(value) => Some(*value),
            PlainValue::TimeMillis(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    /// Widens any unsigned integer variant to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            PlainValue::UInt8(value) => Some(u64::from(*value)),
            PlainValue::UInt16(value) => Some(u64::from(*value)),
            PlainValue::UInt32(value) => Some(u64::from(*value)),
            PlainValue::UInt64(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the parsed JSON document, if this is a [PlainValue::Json].
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            PlainValue::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for PlainValue {
    fn from(value: &str) -> Self {
        PlainValue::Utf8(value.into())
    }
}

impl From<i32> for PlainValue {
    fn from(value: i32) -> Self {
        PlainValue::Int32(value)
    }
}

impl From<i64> for PlainValue {
    fn from(value: i64) -> Self {
        PlainValue::Int64(value)
    }
}

impl From<bool> for PlainValue {
    fn from(value: bool) -> Self {
        PlainValue::Bool(value)
    }
}
