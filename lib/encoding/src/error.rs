use datafusion::arrow::datatypes::DataType;
use thiserror::Error;

/// The schema contains an Arrow type with no target mapping.
///
/// Raised at schema-build time, before any bytes are produced. The offending
/// type is carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unsupported Arrow to Parquet type \"{0}\"")]
pub struct UnsupportedTypeError(pub DataType);

/// An error raised while encoding a table into a container.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    /// A field of the schema has no target mapping.
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),
    /// A value violates its column's declared type or an encoding bound.
    #[error("cannot encode column \"{field}\": {reason}")]
    Column { field: String, reason: String },
    /// The table shape disagrees with the target schema.
    #[error("schema mismatch: {0}")]
    Schema(String),
    /// The container metadata could not be serialized.
    #[error("cannot serialize container metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl EncodeError {
    pub fn column(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EncodeError::Column {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
