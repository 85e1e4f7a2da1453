//! Shared infrastructure for [Parquetry](https://docs.rs/parquetry/): the
//! error taxonomy of the container layer and the [ByteRangeSource] trait that
//! abstracts random-access reads over an encoded container.

pub mod error;
mod source;

pub use error::{CorruptionError, StorageError};
pub use source::ByteRangeSource;
