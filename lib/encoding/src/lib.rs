//! The type-mapping and value-codec layer of
//! [Parquetry](https://docs.rs/parquetry/).
//!
//! This crate decides, for every Arrow column type, which target schema type
//! it becomes ([parquet_type_of]) and how its values are laid out on the wire
//! ([encode_column] / [decode_column]). Types outside the supported
//! allow-list fail loudly with [UnsupportedTypeError] instead of being mapped
//! best-effort.

mod bytes;
mod column;
mod error;
mod json;
mod mapper;
mod parquet_type;

pub use bytes::ByteReader;
pub use column::{decode_column, encode_column};
pub use error::{EncodeError, UnsupportedTypeError};
pub use mapper::parquet_type_of;
pub use parquet_type::{ParquetField, ParquetGroup, ParquetSchema, ParquetType};
