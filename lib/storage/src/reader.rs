use crate::cursor::RowCursor;
use crate::footer::{Footer, MAGIC};
use parquetry_common::{ByteRangeSource, CorruptionError, StorageError};
use parquetry_encoding::{decode_column, ByteReader, ParquetSchema};
use parquetry_model::PlainValue;
use std::io;

/// The fixed-size pieces read before the footer: the 4-byte leading magic and
/// the trailing `u32` footer length plus 4-byte magic.
const HEADER_LENGTH: u64 = 4;
const TRAILER_LENGTH: u64 = 8;

type DecodedColumns = Vec<(String, Vec<Option<PlainValue>>)>;

/// A reader over one encoded container.
///
/// `open` validates the magic framing, parses the footer, and decodes every
/// column chunk into resident buffers, so cursors never touch the source
/// again. The source is closed exactly once: on every failure path of `open`,
/// or by [ContainerReader::close].
pub struct ContainerReader {
    source: Box<dyn ByteRangeSource>,
    footer: Footer,
    num_rows: usize,
    columns: DecodedColumns,
}

impl std::fmt::Debug for ContainerReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerReader")
            .field("footer", &self.footer)
            .field("num_rows", &self.num_rows)
            .finish_non_exhaustive()
    }
}

impl ContainerReader {
    /// Opens a container, consuming the source.
    ///
    /// Fails with [StorageError::Corruption] on a magic mismatch, an
    /// unparsable footer, or a chunk range outside the container bounds; I/O
    /// errors of the source are propagated verbatim. The source's `close` is
    /// invoked before any error surfaces.
    pub async fn open(source: Box<dyn ByteRangeSource>) -> Result<Self, StorageError> {
        match Self::try_open(source.as_ref()).await {
            Ok((footer, num_rows, columns)) => Ok(Self {
                source,
                footer,
                num_rows,
                columns,
            }),
            Err(error) => {
                source.close().await;
                Err(error)
            }
        }
    }

    async fn try_open(
        source: &dyn ByteRangeSource,
    ) -> Result<(Footer, usize, DecodedColumns), StorageError> {
        let container_length = source.len();
        if container_length < HEADER_LENGTH + TRAILER_LENGTH {
            return Err(CorruptionError::msg(format!(
                "container of {container_length} bytes is too small"
            ))
            .into());
        }

        let header = read_exact(source, 0, 4).await?;
        if header.as_slice() != MAGIC {
            return Err(CorruptionError::msg("leading magic mismatch").into());
        }

        let trailer = read_exact(source, container_length - TRAILER_LENGTH, 8).await?;
        if &trailer[4..] != MAGIC {
            return Err(CorruptionError::msg("trailing magic mismatch").into());
        }
        let footer_length = u64::from(u32::from_le_bytes(
            trailer[..4]
                .try_into()
                .map_err(|_| CorruptionError::msg("malformed footer length"))?,
        ));

        let footer_end = container_length - TRAILER_LENGTH;
        let footer_start = footer_end
            .checked_sub(footer_length)
            .filter(|&start| start >= HEADER_LENGTH)
            .ok_or_else(|| CorruptionError::msg("footer length exceeds container bounds"))?;

        let footer_bytes = read_exact(source, footer_start, checked_length(footer_length)?).await?;
        let footer: Footer =
            serde_json::from_slice(&footer_bytes).map_err(CorruptionError::new)?;
        footer.validate(HEADER_LENGTH, footer_start)?;
        let num_rows = usize::try_from(footer.num_rows)
            .map_err(|_| CorruptionError::msg("row count exceeds address space"))?;

        let mut columns = Vec::with_capacity(footer.columns.len());
        for chunk in &footer.columns {
            let bytes = read_exact(source, chunk.offset, checked_length(chunk.length)?).await?;
            let mut reader = ByteReader::new(&bytes);
            let values = decode_column(&mut reader, &chunk.field, num_rows)?;
            if reader.remaining() != 0 {
                return Err(CorruptionError::msg(format!(
                    "column \"{}\" has {} trailing bytes in its chunk",
                    chunk.field.name,
                    reader.remaining()
                ))
                .into());
            }
            columns.push((chunk.field.name.clone(), values));
        }

        tracing::debug!(
            num_rows,
            num_columns = columns.len(),
            "opened container"
        );
        Ok((footer, num_rows, columns))
    }

    /// The number of rows in the container.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// The target schema recorded in the footer, in storage order.
    pub fn schema(&self) -> ParquetSchema {
        self.footer.schema()
    }

    /// Returns a fresh forward-only cursor over the decoded rows.
    ///
    /// Cursors are not restartable; request a new one to re-read.
    pub fn cursor(&self) -> RowCursor<'_> {
        RowCursor::new(self)
    }

    /// Closes the reader, releasing the underlying source.
    pub async fn close(self) {
        self.source.close().await;
    }

    pub(crate) fn columns(&self) -> &DecodedColumns {
        &self.columns
    }
}

async fn read_exact(
    source: &dyn ByteRangeSource,
    offset: u64,
    length: usize,
) -> Result<Vec<u8>, StorageError> {
    let bytes = source.read(offset, length).await?;
    if bytes.len() == length {
        Ok(bytes)
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("source returned {} of {length} requested bytes", bytes.len()),
        )
        .into())
    }
}

fn checked_length(length: u64) -> Result<usize, StorageError> {
    usize::try_from(length)
        .map_err(|_| CorruptionError::msg("byte range exceeds address space").into())
}
