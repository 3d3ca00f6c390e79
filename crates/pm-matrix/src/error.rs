use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("invalid matrix dimensions {rows}x{cols}: both must be greater than zero")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("data length {got} does not match {rows}x{cols} (expected {expected})")]
    DataLength {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    DimensionMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("failed to allocate a {rows}x{cols} matrix")]
    Allocation { rows: usize, cols: usize },
    #[error("{backend} backend failed: {message}")]
    Backend { backend: String, message: String },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
