use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while reading or validating the input tables. Any of these
/// aborts the run before partial output is written.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error("{file}: missing required column '{column}'")]
    MissingColumn { file: String, column: String },

    #[error("{file}: column '{column}' has {count} value(s) that are not valid integers")]
    BadCoordinate {
        file: String,
        column: String,
        count: usize,
    },

    #[error("{file}: column 'seqnames' has {count} empty value(s)")]
    MissingSeqname { file: String, count: usize },
}

pub type Result<T> = std::result::Result<T, ShapeError>;
