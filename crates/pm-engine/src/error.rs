use pm_matrix::MatrixError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("failed to start worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
    #[error("failed to allocate {units} work units")]
    UnitAllocation { units: usize },
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
    #[error("multiplication cancelled ({skipped} of {total} work units skipped)")]
    Cancelled { skipped: usize, total: usize },
}

impl From<EngineError> for MatrixError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Matrix(inner) => inner,
            other => MatrixError::Backend {
                backend: "parallel".to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid chunk policy '{0}': expected 'auto', 'cell', 'row' or a positive cell count")]
pub struct ParseChunkPolicyError(pub String);

pub type Result<T> = std::result::Result<T, EngineError>;
