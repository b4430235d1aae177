use arrow::datatypes::DataType;
use thiserror::Error;

/// Errors that can be raised by [crate::BatchRows].
#[derive(Error, Debug)]
pub enum RowsError {
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Result data does not match the schema: {0}")]
    DataSchemaMismatch(String),

    #[error("Rows are not positioned on a row, call next() first")]
    NoCurrentRow,

    #[error("Result does not contain a totals row")]
    NoTotals,

    #[error("Expected {expected} destination arguments in scan, not {got}")]
    ColumnCount { expected: usize, got: usize },

    #[error("Missing destination for column {column:?}")]
    MissingDestination { column: String },

    #[error("Cannot read values of type {0}")]
    UnsupportedType(DataType),

    #[error("Cannot scan column {column:?}: {source}")]
    Scan {
        column: String,
        #[source]
        source: ScanError,
    },
}

/// Errors of writing a single value into a [crate::types::ScanDest].
#[derive(Error, Debug, PartialEq)]
pub enum ScanError {
    #[error("cannot scan {value} into {target}")]
    TypeMismatch {
        value: &'static str,
        target: &'static str,
    },

    #[error("cannot scan NULL into {target}")]
    UnexpectedNull { target: &'static str },
}
