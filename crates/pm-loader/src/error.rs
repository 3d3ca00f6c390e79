use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid {what} at token {position}: {token:?}")]
    Parse {
        what: String,
        position: usize,
        token: String,
    },
    #[error("truncated input: {what} needs {expected} values, found {found}")]
    Truncated {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("matrix error: {0}")]
    Matrix(#[from] pm_matrix::MatrixError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
