use crate::bytes::{read_bitmap, write_bitmap, write_length_prefixed, ByteReader, TooLongError};
use crate::json::{downcast_array, json_cell};
use crate::{EncodeError, ParquetField, ParquetGroup, ParquetType};
use datafusion::arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Date64Array, FixedSizeBinaryArray, Float32Array,
    Float64Array, Int8Array, Int16Array, Int32Array, Int64Array, MapArray, StringArray,
    StructArray, Time32MillisecondArray, Time64MicrosecondArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};
use datafusion::arrow::compute;
use datafusion::arrow::datatypes::{DataType, TimeUnit};
use parquetry_common::CorruptionError;
use parquetry_model::PlainValue;

/// Serializes one column into its chunk byte stream.
///
/// Stream layout: a presence bitmap (only if the field is nullable), then the
/// values of the present rows back to back — fixed-width little-endian for
/// numerics, `u32` length prefix plus raw bytes for strings/binaries/JSON,
/// and for groups a `u32` instance count per present row followed by the
/// flattened child streams.
pub fn encode_column(
    array: &dyn Array,
    field: &ParquetField,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    if field.nullable {
        let validity: Vec<bool> = (0..array.len()).map(|index| array.is_valid(index)).collect();
        write_bitmap(out, &validity);
    } else if array.null_count() > 0 {
        return Err(EncodeError::column(
            &field.name,
            "null value in a non-nullable column",
        ));
    }

    macro_rules! encode_le {
        ($arrow:ty) => {{
            let values = downcast_array::<$arrow>(&field.name, array)?;
            for index in 0..values.len() {
                if values.is_valid(index) {
                    out.extend_from_slice(&values.value(index).to_le_bytes());
                }
            }
        }};
    }

    match &field.parquet_type {
        ParquetType::Boolean => {
            let values = downcast_array::<BooleanArray>(&field.name, array)?;
            for index in 0..values.len() {
                if values.is_valid(index) {
                    out.push(u8::from(values.value(index)));
                }
            }
        }
        ParquetType::Int8 => encode_le!(Int8Array),
        ParquetType::Int16 => encode_le!(Int16Array),
        ParquetType::Int32 => encode_le!(Int32Array),
        ParquetType::Int64 => encode_le!(Int64Array),
        ParquetType::UInt8 => encode_le!(UInt8Array),
        ParquetType::UInt16 => encode_le!(UInt16Array),
        ParquetType::UInt32 => encode_le!(UInt32Array),
        ParquetType::UInt64 => encode_le!(UInt64Array),
        ParquetType::Float => encode_le!(Float32Array),
        ParquetType::Double => encode_le!(Float64Array),
        ParquetType::TimestampMillis => match array.data_type() {
            DataType::Date64 => encode_le!(Date64Array),
            DataType::Timestamp(TimeUnit::Millisecond, _) => {
                encode_le!(TimestampMillisecondArray)
            }
            other => {
                return Err(EncodeError::column(
                    &field.name,
                    format!("unexpected array type {other} for TIMESTAMP_MILLIS"),
                ));
            }
        },
        ParquetType::TimestampMicros => encode_le!(TimestampMicrosecondArray),
        ParquetType::TimeMillis => encode_le!(Time32MillisecondArray),
        ParquetType::TimeMicros => encode_le!(Time64MicrosecondArray),
        ParquetType::Utf8 => {
            let values = downcast_array::<StringArray>(&field.name, array)?;
            for index in 0..values.len() {
                if values.is_valid(index) {
                    put_bytes(field, out, values.value(index).as_bytes())?;
                }
            }
        }
        ParquetType::ByteArray => match array.data_type() {
            DataType::Binary => {
                let values = downcast_array::<BinaryArray>(&field.name, array)?;
                for index in 0..values.len() {
                    if values.is_valid(index) {
                        put_bytes(field, out, values.value(index))?;
                    }
                }
            }
            DataType::FixedSizeBinary(_) => {
                let values = downcast_array::<FixedSizeBinaryArray>(&field.name, array)?;
                for index in 0..values.len() {
                    if values.is_valid(index) {
                        put_bytes(field, out, values.value(index))?;
                    }
                }
            }
            other => {
                return Err(EncodeError::column(
                    &field.name,
                    format!("unexpected array type {other} for BYTE_ARRAY"),
                ));
            }
        },
        ParquetType::Json => {
            for index in 0..array.len() {
                if array.is_valid(index) {
                    let document = json_cell(&field.name, array, index)?;
                    put_bytes(field, out, document.to_string().as_bytes())?;
                }
            }
        }
        ParquetType::Group(group) => encode_group(array, field, group, out)?,
    }
    Ok(())
}

fn put_bytes(field: &ParquetField, out: &mut Vec<u8>, bytes: &[u8]) -> Result<(), EncodeError> {
    write_length_prefixed(out, bytes).map_err(|TooLongError(length)| {
        EncodeError::column(
            &field.name,
            format!("value of {length} bytes exceeds the u32 length prefix"),
        )
    })
}

/// Encodes a struct or map column as a repeated group.
///
/// Struct rows contribute exactly one instance each; map rows contribute one
/// instance per entry. The counts of all present rows come first, then each
/// child field's stream over the flattened instances.
fn encode_group(
    array: &dyn Array,
    field: &ParquetField,
    group: &ParquetGroup,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    match array.data_type() {
        DataType::Struct(_) => {
            let values = downcast_array::<StructArray>(&field.name, array)?;
            check_arity(field, values.num_columns(), group)?;
            let mut indices = Vec::new();
            for index in 0..values.len() {
                if values.is_valid(index) {
                    out.extend_from_slice(&1u32.to_le_bytes());
                    indices.push(instance_index(field, index)?);
                }
            }
            encode_group_children(values.columns(), field, group, indices, out)
        }
        DataType::Map(_, _) => {
            let values = downcast_array::<MapArray>(&field.name, array)?;
            let entries = values.entries();
            check_arity(field, entries.num_columns(), group)?;
            let offsets = values.value_offsets();
            let mut indices = Vec::new();
            for index in 0..values.len() {
                if values.is_valid(index) {
                    let (start, end) = (offsets[index], offsets[index + 1]);
                    let count = u32::try_from(end - start)
                        .map_err(|_| EncodeError::column(&field.name, "negative entry count"))?;
                    out.extend_from_slice(&count.to_le_bytes());
                    for entry in start..end {
                        indices.push(u32::try_from(entry).map_err(|_| {
                            EncodeError::column(&field.name, "entry index exceeds u32 range")
                        })?);
                    }
                }
            }
            encode_group_children(entries.columns(), field, group, indices, out)
        }
        other => Err(EncodeError::column(
            &field.name,
            format!("unexpected array type {other} for GROUP"),
        )),
    }
}

fn encode_group_children(
    columns: &[ArrayRef],
    field: &ParquetField,
    group: &ParquetGroup,
    indices: Vec<u32>,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    let indices = UInt32Array::from(indices);
    for (child_index, child) in group.fields.iter().enumerate() {
        let instances = compute::take(columns[child_index].as_ref(), &indices, None)
            .map_err(|error| EncodeError::column(&field.name, error.to_string()))?;
        encode_column(instances.as_ref(), child, out)?;
    }
    Ok(())
}

fn check_arity(field: &ParquetField, actual: usize, group: &ParquetGroup) -> Result<(), EncodeError> {
    if actual == group.fields.len() {
        Ok(())
    } else {
        Err(EncodeError::column(
            &field.name,
            format!(
                "group arity mismatch: schema has {} children, array has {actual}",
                group.fields.len()
            ),
        ))
    }
}

fn instance_index(field: &ParquetField, index: usize) -> Result<u32, EncodeError> {
    u32::try_from(index)
        .map_err(|_| EncodeError::column(&field.name, "row count exceeds u32 range"))
}

/// Decodes one column chunk back into `num_rows` optional values, inverting
/// [encode_column] exactly.
pub fn decode_column(
    reader: &mut ByteReader<'_>,
    field: &ParquetField,
    num_rows: usize,
) -> Result<Vec<Option<PlainValue>>, CorruptionError> {
    let validity = if field.nullable {
        Some(read_bitmap(reader, num_rows)?)
    } else {
        None
    };

    if let ParquetType::Group(group) = &field.parquet_type {
        return decode_group(reader, group, validity, num_rows);
    }

    let mut values = Vec::new();
    for index in 0..num_rows {
        let present = validity.as_ref().map_or(true, |bits| bits[index]);
        if present {
            values.push(Some(decode_leaf(reader, &field.parquet_type)?));
        } else {
            values.push(None);
        }
    }
    Ok(values)
}

fn decode_leaf(
    reader: &mut ByteReader<'_>,
    parquet_type: &ParquetType,
) -> Result<PlainValue, CorruptionError> {
    Ok(match parquet_type {
        ParquetType::Boolean => match reader.take_array::<1>()?[0] {
            0 => PlainValue::Bool(false),
            1 => PlainValue::Bool(true),
            other => {
                return Err(CorruptionError::msg(format!("invalid boolean byte {other}")));
            }
        },
        ParquetType::Int8 => PlainValue::Int8(i8::from_le_bytes(reader.take_array()?)),
        ParquetType::Int16 => PlainValue::Int16(i16::from_le_bytes(reader.take_array()?)),
        ParquetType::Int32 => PlainValue::Int32(i32::from_le_bytes(reader.take_array()?)),
        ParquetType::Int64 => PlainValue::Int64(i64::from_le_bytes(reader.take_array()?)),
        ParquetType::UInt8 => PlainValue::UInt8(u8::from_le_bytes(reader.take_array()?)),
        ParquetType::UInt16 => PlainValue::UInt16(u16::from_le_bytes(reader.take_array()?)),
        ParquetType::UInt32 => PlainValue::UInt32(u32::from_le_bytes(reader.take_array()?)),
        ParquetType::UInt64 => PlainValue::UInt64(u64::from_le_bytes(reader.take_array()?)),
        ParquetType::Float => PlainValue::Float(f32::from_le_bytes(reader.take_array()?)),
        ParquetType::Double => PlainValue::Double(f64::from_le_bytes(reader.take_array()?)),
        ParquetType::TimestampMillis => {
            PlainValue::TimestampMillis(i64::from_le_bytes(reader.take_array()?))
        }
        ParquetType::TimestampMicros => {
            PlainValue::TimestampMicros(i64::from_le_bytes(reader.take_array()?))
        }
        ParquetType::TimeMillis => PlainValue::TimeMillis(i32::from_le_bytes(reader.take_array()?)),
        ParquetType::TimeMicros => PlainValue::TimeMicros(i64::from_le_bytes(reader.take_array()?)),
        ParquetType::Utf8 => PlainValue::Utf8(decode_string(reader)?),
        ParquetType::ByteArray => PlainValue::Bytes(reader.read_length_prefixed()?.to_vec()),
        ParquetType::Json => {
            let text = decode_string(reader)?;
            PlainValue::Json(serde_json::from_str(&text).map_err(CorruptionError::new)?)
        }
        ParquetType::Group(_) => {
            return Err(CorruptionError::msg(
                "group values have no leaf representation",
            ));
        }
    })
}

fn decode_string(reader: &mut ByteReader<'_>) -> Result<String, CorruptionError> {
    String::from_utf8(reader.read_length_prefixed()?.to_vec()).map_err(CorruptionError::new)
}

fn decode_group(
    reader: &mut ByteReader<'_>,
    group: &ParquetGroup,
    validity: Option<Vec<bool>>,
    num_rows: usize,
) -> Result<Vec<Option<PlainValue>>, CorruptionError> {
    // num_rows is footer-controlled; never allocate proportionally to it
    // before the chunk bytes have backed it up.
    let is_present = |index: usize| validity.as_ref().map_or(true, |bits| bits[index]);

    let mut counts = Vec::new();
    let mut total: usize = 0;
    for index in 0..num_rows {
        if is_present(index) {
            let count = usize::try_from(reader.read_u32()?)
                .map_err(|_| CorruptionError::msg("instance count exceeds address space"))?;
            total = total
                .checked_add(count)
                .ok_or_else(|| CorruptionError::msg("group instance count overflows"))?;
            counts.push(count);
        }
    }

    let children = group
        .fields
        .iter()
        .map(|child| decode_column(reader, child, total))
        .collect::<Result<Vec<_>, CorruptionError>>()?;

    let mut instances = Vec::new();
    for instance in 0..total {
        let fields = group
            .fields
            .iter()
            .enumerate()
            .map(|(child_index, child)| (child.name.clone(), children[child_index][instance].clone()))
            .collect();
        instances.push(PlainValue::Group(fields));
    }

    let mut instances = instances.into_iter();
    let mut counts = counts.into_iter();
    let mut values = Vec::new();
    for index in 0..num_rows {
        if is_present(index) {
            let count = counts
                .next()
                .ok_or_else(|| CorruptionError::msg("missing group instance count"))?;
            values.push(Some(PlainValue::Repeated(
                instances.by_ref().take(count).collect(),
            )));
        } else {
            values.push(None);
        }
    }
    Ok(values)
}
