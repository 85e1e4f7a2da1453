use async_trait::async_trait;
use parquetry_common::{ByteRangeSource, StorageError};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A [ByteRangeSource] over an owned in-memory buffer.
///
/// Close calls are counted through a shared handle so callers can observe the
/// reader's close-exactly-once guarantee.
pub struct MemoryByteRangeSource {
    bytes: Vec<u8>,
    closes: Arc<AtomicUsize>,
}

impl MemoryByteRangeSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A handle to the close counter that stays valid after the source has
    /// been moved into a reader.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

#[async_trait]
impl ByteRangeSource for MemoryByteRangeSource {
    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read(&self, offset: u64, length: usize) -> Result<Vec<u8>, StorageError> {
        let start = usize::try_from(offset).map_err(|_| {
            StorageError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "offset exceeds address space",
            ))
        })?;
        let end = start
            .checked_add(length)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                StorageError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("range {offset}+{length} is outside the buffer"),
                ))
            })?;
        Ok(self.bytes[start..end].to_vec())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_range_reads() {
        let source = MemoryByteRangeSource::new(vec![1, 2, 3, 4]);
        assert_eq!(source.len(), 4);
        assert_eq!(source.read(1, 2).await.unwrap(), vec![2, 3]);
        assert_eq!(source.read(4, 0).await.unwrap(), Vec::<u8>::new());
        assert!(source.read(3, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_close_counting() {
        let source = MemoryByteRangeSource::new(Vec::new());
        let closes = source.close_counter();
        source.close().await;
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
