use crate::footer::{ColumnChunk, Footer, FORMAT_VERSION, MAGIC};
use datafusion::arrow::record_batch::RecordBatch;
use parquetry_encoding::{encode_column, EncodeError, ParquetSchema};

/// Encodes a table into a complete container, mapping its schema first.
///
/// The whole operation is a pure transform: it either returns the full
/// buffer or fails without side effects (encode-or-nothing).
pub fn encode_table(batch: &RecordBatch) -> Result<Vec<u8>, EncodeError> {
    let schema = ParquetSchema::try_from_arrow(batch.schema().as_ref())?;
    encode_table_with_schema(batch, &schema)
}

/// Encodes a table against an already-built target schema.
///
/// Columns are laid out in schema order as one row group: leading magic,
/// chunks, JSON footer, `u32` little-endian footer length, trailing magic.
pub fn encode_table_with_schema(
    batch: &RecordBatch,
    schema: &ParquetSchema,
) -> Result<Vec<u8>, EncodeError> {
    if schema.len() != batch.num_columns() {
        return Err(EncodeError::Schema(format!(
            "target schema has {} fields, table has {} columns",
            schema.len(),
            batch.num_columns()
        )));
    }

    let mut buffer = MAGIC.to_vec();
    let mut columns = Vec::with_capacity(schema.len());
    for (field, array) in schema.fields.iter().zip(batch.columns()) {
        let offset = to_u64(buffer.len())?;
        encode_column(array.as_ref(), field, &mut buffer)?;
        let length = to_u64(buffer.len())? - offset;
        columns.push(ColumnChunk {
            field: field.clone(),
            offset,
            length,
        });
    }

    let footer = Footer {
        version: FORMAT_VERSION,
        num_rows: to_u64(batch.num_rows())?,
        columns,
    };
    let footer_bytes = serde_json::to_vec(&footer)?;
    let footer_length = u32::try_from(footer_bytes.len())
        .map_err(|_| EncodeError::Schema("footer exceeds the u32 length field".into()))?;

    buffer.extend_from_slice(&footer_bytes);
    buffer.extend_from_slice(&footer_length.to_le_bytes());
    buffer.extend_from_slice(MAGIC);

    tracing::debug!(
        num_rows = batch.num_rows(),
        num_columns = batch.num_columns(),
        container_bytes = buffer.len(),
        "encoded table"
    );
    Ok(buffer)
}

fn to_u64(position: usize) -> Result<u64, EncodeError> {
    u64::try_from(position)
        .map_err(|_| EncodeError::Schema("container offset exceeds u64 range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{ArrayRef, Int32Array, StringArray};
    use datafusion::arrow::datatypes::{DataType, Field, Schema};
    use parquetry_encoding::{ParquetField, ParquetType};
    use std::sync::Arc;

    fn sample_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("int", DataType::Int32, false),
            Field::new("str", DataType::Utf8, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(vec![0, 1, 2])) as ArrayRef,
                Arc::new(StringArray::from(vec!["foo", "bar", "baz"])) as ArrayRef,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_container_is_framed_by_magic() {
        let buffer = encode_table(&sample_batch()).unwrap();
        assert_eq!(&buffer[..4], MAGIC);
        assert_eq!(&buffer[buffer.len() - 4..], MAGIC);
    }

    #[test]
    fn test_footer_describes_every_chunk() {
        let buffer = encode_table(&sample_batch()).unwrap();
        let footer_length = u32::from_le_bytes(
            buffer[buffer.len() - 8..buffer.len() - 4]
                .try_into()
                .unwrap(),
        ) as usize;
        let footer_start = buffer.len() - 8 - footer_length;
        let footer: Footer = serde_json::from_slice(&buffer[footer_start..buffer.len() - 8]).unwrap();

        assert_eq!(footer.version, FORMAT_VERSION);
        assert_eq!(footer.num_rows, 3);
        assert_eq!(footer.columns.len(), 2);
        assert_eq!(footer.columns[0].field.parquet_type, ParquetType::Int32);
        assert_eq!(footer.columns[1].field.name, "str");
        // Chunks tile the data section without gaps.
        assert_eq!(footer.columns[0].offset, 4);
        assert_eq!(
            footer.columns[0].offset + footer.columns[0].length,
            footer.columns[1].offset
        );
    }

    #[test]
    fn test_unsupported_field_fails_before_any_bytes() {
        let schema = Arc::new(Schema::new(vec![Field::new("h", DataType::Float16, false)]));
        let batch = RecordBatch::new_empty(schema);
        assert!(matches!(
            encode_table(&batch),
            Err(EncodeError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_schema_arity_mismatch_is_rejected() {
        let schema = ParquetSchema {
            fields: vec![ParquetField::new("only", ParquetType::Int32, false)],
        };
        assert!(matches!(
            encode_table_with_schema(&sample_batch(), &schema),
            Err(EncodeError::Schema(_))
        ));
    }
}
