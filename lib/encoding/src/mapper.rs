use crate::{ParquetField, ParquetGroup, ParquetType, UnsupportedTypeError};
use datafusion::arrow::datatypes::{DataType, Fields, TimeUnit};

/// Maps one Arrow column type to its target schema type.
///
/// This is a pure function over the type tag: data values never influence the
/// result. The mapping is a deliberate allow-list — every type outside it
/// fails with [UnsupportedTypeError] carrying the offending tag, rather than
/// being mapped best-effort and silently lossy. Dates and timestamps other
/// than millisecond/microsecond precision, half floats, decimals, unions,
/// dictionaries, and intervals are all rejected.
///
/// Struct and map types recurse into their child fields; an unsupported child
/// aborts the whole mapping, so no partial group can escape.
pub fn parquet_type_of(data_type: &DataType) -> Result<ParquetType, UnsupportedTypeError> {
    Ok(match data_type {
        DataType::Boolean => ParquetType::Boolean,
        DataType::Int8 => ParquetType::Int8,
        DataType::Int16 => ParquetType::Int16,
        DataType::Int32 => ParquetType::Int32,
        DataType::Int64 => ParquetType::Int64,
        DataType::UInt8 => ParquetType::UInt8,
        DataType::UInt16 => ParquetType::UInt16,
        DataType::UInt32 => ParquetType::UInt32,
        DataType::UInt64 => ParquetType::UInt64,
        DataType::Float32 => ParquetType::Float,
        DataType::Float64 => ParquetType::Double,
        DataType::Utf8 => ParquetType::Utf8,
        DataType::Binary | DataType::FixedSizeBinary(_) => ParquetType::ByteArray,
        DataType::Date64 | DataType::Timestamp(TimeUnit::Millisecond, _) => {
            ParquetType::TimestampMillis
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => ParquetType::TimestampMicros,
        DataType::Time32(TimeUnit::Millisecond) => ParquetType::TimeMillis,
        DataType::Time64(TimeUnit::Microsecond) => ParquetType::TimeMicros,
        DataType::List(_) | DataType::FixedSizeList(_, _) => ParquetType::Json,
        DataType::Struct(fields) => ParquetType::Group(map_group(fields)?),
        DataType::Map(entries, _) => match entries.data_type() {
            DataType::Struct(fields) => ParquetType::Group(map_group(fields)?),
            other => return Err(UnsupportedTypeError(other.clone())),
        },
        other => return Err(UnsupportedTypeError(other.clone())),
    })
}

fn map_group(fields: &Fields) -> Result<ParquetGroup, UnsupportedTypeError> {
    let fields = fields
        .iter()
        .map(|field| {
            Ok(ParquetField::new(
                field.name().to_owned(),
                parquet_type_of(field.data_type())?,
                field.is_nullable(),
            ))
        })
        .collect::<Result<Vec<_>, UnsupportedTypeError>>()?;
    Ok(ParquetGroup { fields })
}
