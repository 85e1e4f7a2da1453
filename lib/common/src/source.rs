use crate::StorageError;
use async_trait::async_trait;

/// Random-access reads over the bytes of an encoded container.
///
/// This is the seam between the container reader and whatever actually holds
/// the bytes (an in-memory buffer, a file, an object store...). Reads are
/// pure range reads with no shared cursor, so one source may back several
/// concurrently-open readers.
///
/// The container reader guarantees that [ByteRangeSource::close] is invoked
/// at most once per source: exactly once on every failure path of `open`, and
/// once when the reader itself is closed.
#[async_trait]
pub trait ByteRangeSource: Send + Sync {
    /// The total number of bytes available.
    fn len(&self) -> u64;

    /// Returns `true` if the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads exactly `length` bytes starting at `offset`.
    ///
    /// A source must either return exactly `length` bytes or fail; short
    /// reads are an error of the source, not of the caller.
    async fn read(&self, offset: u64, length: usize) -> Result<Vec<u8>, StorageError>;

    /// Releases the resources behind this source.
    async fn close(&self);
}
