use crate::UnsupportedTypeError;
use datafusion::arrow::datatypes::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The target schema type of one column, the output of the type mapper.
///
/// The serialized tag names are part of the container format, so renames here
/// are format changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParquetType {
    #[serde(rename = "BOOLEAN")]
    Boolean,
    #[serde(rename = "INT_8")]
    Int8,
    #[serde(rename = "INT_16")]
    Int16,
    #[serde(rename = "INT_32")]
    Int32,
    #[serde(rename = "INT_64")]
    Int64,
    #[serde(rename = "UINT_8")]
    UInt8,
    #[serde(rename = "UINT_16")]
    UInt16,
    #[serde(rename = "UINT_32")]
    UInt32,
    #[serde(rename = "UINT_64")]
    UInt64,
    #[serde(rename = "FLOAT")]
    Float,
    #[serde(rename = "DOUBLE")]
    Double,
    #[serde(rename = "UTF8")]
    Utf8,
    #[serde(rename = "BYTE_ARRAY")]
    ByteArray,
    #[serde(rename = "TIMESTAMP_MILLIS")]
    TimestampMillis,
    #[serde(rename = "TIMESTAMP_MICROS")]
    TimestampMicros,
    #[serde(rename = "TIME_MILLIS")]
    TimeMillis,
    #[serde(rename = "TIME_MICROS")]
    TimeMicros,
    #[serde(rename = "JSON")]
    Json,
    /// The repeated-struct marker carrying the nested fields.
    #[serde(rename = "GROUP")]
    Group(ParquetGroup),
}

impl ParquetType {
    /// The tag name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            ParquetType::Boolean => "BOOLEAN",
            ParquetType::Int8 => "INT_8",
            ParquetType::Int16 => "INT_16",
            ParquetType::Int32 => "INT_32",
            ParquetType::Int64 => "INT_64",
            ParquetType::UInt8 => "UINT_8",
            ParquetType::UInt16 => "UINT_16",
            ParquetType::UInt32 => "UINT_32",
            ParquetType::UInt64 => "UINT_64",
            ParquetType::Float => "FLOAT",
            ParquetType::Double => "DOUBLE",
            ParquetType::Utf8 => "UTF8",
            ParquetType::ByteArray => "BYTE_ARRAY",
            ParquetType::TimestampMillis => "TIMESTAMP_MILLIS",
            ParquetType::TimestampMicros => "TIMESTAMP_MICROS",
            ParquetType::TimeMillis => "TIME_MILLIS",
            ParquetType::TimeMicros => "TIME_MICROS",
            ParquetType::Json => "JSON",
            ParquetType::Group(_) => "GROUP",
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ParquetType::Group(_))
    }
}

impl fmt::Display for ParquetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The nested fields of a repeated group, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetGroup {
    pub fields: Vec<ParquetField>,
}

/// One named, typed, possibly nullable column of the target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetField {
    pub name: String,
    #[serde(rename = "type")]
    pub parquet_type: ParquetType,
    pub nullable: bool,
}

impl ParquetField {
    pub fn new(name: impl Into<String>, parquet_type: ParquetType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            parquet_type,
            nullable,
        }
    }
}

/// The full target schema: top-level fields in storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetSchema {
    pub fields: Vec<ParquetField>,
}

impl ParquetSchema {
    /// Maps every top-level field of an Arrow schema, in declared order.
    ///
    /// Fails atomically on the first field whose type has no mapping, so no
    /// partial schema can escape.
    pub fn try_from_arrow(schema: &Schema) -> Result<Self, UnsupportedTypeError> {
        let fields = schema
            .fields()
            .iter()
            .map(|field| {
                Ok(ParquetField::new(
                    field.name().to_owned(),
                    crate::parquet_type_of(field.data_type())?,
                    field.is_nullable(),
                ))
            })
            .collect::<Result<Vec<_>, UnsupportedTypeError>>()?;
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
