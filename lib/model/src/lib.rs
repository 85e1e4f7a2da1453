//! Decoded value model for [Parquetry](https://docs.rs/parquetry/).
//!
//! The container decoder materializes column chunks into [PlainValue]s and
//! yields them row-by-row as [Row]s. The vocabulary of [PlainValue] mirrors
//! the target schema types of the encoder, not the full Arrow type system.

mod row;
mod value;

pub use row::Row;
pub use value::PlainValue;
