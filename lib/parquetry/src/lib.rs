//! Parquetry converts an in-memory Arrow `RecordBatch` into a
//! self-describing, single-row-group Parquet-style container and back into
//! rows.
//!
//! The supported column types are a deliberate allow-list: every Arrow type
//! outside it fails schema building with
//! [UnsupportedTypeError](encoding::UnsupportedTypeError) before a single
//! byte is written.
//!
//! ```no_run
//! use parquetry::storage::{encode_table, ContainerReader, MemoryByteRangeSource};
//! # async fn example(batch: datafusion::arrow::record_batch::RecordBatch)
//! # -> Result<(), Box<dyn std::error::Error>> {
//! let buffer = encode_table(&batch)?;
//! let reader = ContainerReader::open(Box::new(MemoryByteRangeSource::new(buffer))).await?;
//! for row in reader.cursor() {
//!     println!("{row:?}");
//! }
//! reader.close().await;
//! # Ok(())
//! # }
//! ```

pub mod common {
    pub use parquetry_common::*;
}

pub mod encoding {
    pub use parquetry_encoding::*;
}

pub mod model {
    pub use parquetry_model::*;
}

pub mod storage {
    pub use parquetry_storage::*;
}
