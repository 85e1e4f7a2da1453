use parquetry_common::CorruptionError;
use parquetry_encoding::{ParquetField, ParquetSchema};
use serde::{Deserialize, Serialize};

/// The magic bytes framing a container at both ends.
pub const MAGIC: &[u8; 4] = b"PQR1";

/// The container format version recorded in every footer.
pub const FORMAT_VERSION: u32 = 1;

/// The location and target type of one encoded column chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnChunk {
    pub field: ParquetField,
    /// Byte offset of the chunk within the container.
    pub offset: u64,
    /// Byte length of the chunk.
    pub length: u64,
}

/// The trailing self-describing metadata block: schema, row count, and the
/// chunk index that makes column chunks addressable without a full scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub version: u32,
    pub num_rows: u64,
    pub columns: Vec<ColumnChunk>,
}

impl Footer {
    /// The target schema recorded in this footer, in storage order.
    pub fn schema(&self) -> ParquetSchema {
        ParquetSchema {
            fields: self
                .columns
                .iter()
                .map(|chunk| chunk.field.clone())
                .collect(),
        }
    }

    /// Checks the version and that every chunk lies inside
    /// `[data_start, data_end)`.
    pub fn validate(&self, data_start: u64, data_end: u64) -> Result<(), CorruptionError> {
        if self.version != FORMAT_VERSION {
            return Err(CorruptionError::msg(format!(
                "unsupported container version {}",
                self.version
            )));
        }
        for chunk in &self.columns {
            let end = chunk.offset.checked_add(chunk.length).ok_or_else(|| {
                CorruptionError::msg(format!(
                    "chunk range of column \"{}\" overflows",
                    chunk.field.name
                ))
            })?;
            if chunk.offset < data_start || end > data_end {
                return Err(CorruptionError::msg(format!(
                    "chunk range {}..{end} of column \"{}\" is outside the data section {data_start}..{data_end}",
                    chunk.offset, chunk.field.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parquetry_encoding::ParquetType;

    fn footer_with_chunk(offset: u64, length: u64) -> Footer {
        Footer {
            version: FORMAT_VERSION,
            num_rows: 1,
            columns: vec![ColumnChunk {
                field: ParquetField::new("c", ParquetType::Int32, false),
                offset,
                length,
            }],
        }
    }

    #[test]
    fn test_footer_json_roundtrip() {
        let footer = footer_with_chunk(4, 12);
        let json = serde_json::to_string(&footer).unwrap();
        let back: Footer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, footer);
    }

    #[test]
    fn test_chunk_outside_data_section_is_rejected() {
        assert!(footer_with_chunk(4, 12).validate(4, 16).is_ok());
        assert!(footer_with_chunk(0, 12).validate(4, 16).is_err());
        assert!(footer_with_chunk(4, 13).validate(4, 16).is_err());
        assert!(footer_with_chunk(u64::MAX, 2).validate(4, 16).is_err());
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let mut footer = footer_with_chunk(4, 12);
        footer.version = 2;
        assert!(footer.validate(4, 16).is_err());
    }
}
