//! The container layer of [Parquetry](https://docs.rs/parquetry/).
//!
//! [encode_table] turns an Arrow `RecordBatch` into a single-row-group,
//! uncompressed container: leading magic, one chunk per column in schema
//! order, a self-describing JSON footer, the footer length, and trailing
//! magic. [ContainerReader] inverts it over any [ByteRangeSource] and hands
//! out forward-only [RowCursor]s.

mod cursor;
mod footer;
mod memory;
mod reader;
mod writer;

pub use cursor::RowCursor;
pub use footer::{ColumnChunk, Footer, FORMAT_VERSION, MAGIC};
pub use memory::MemoryByteRangeSource;
pub use parquetry_common::ByteRangeSource;
pub use reader::ContainerReader;
pub use writer::{encode_table, encode_table_with_schema};
