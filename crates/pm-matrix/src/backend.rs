use std::fmt::Debug;

use crate::error::Result;
use crate::matrix::Matrix;

/// Trait for pluggable multiplication backends (sequential, thread pool, ...).
///
/// Callers normally go through [`Matrix::matmul`], which checks the inner
/// dimensions before dispatching. Implementations must still reject
/// mismatched operands themselves since they can be called directly.
pub trait MultiplyBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "reference", "parallel").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`: matrix of shape [m, k]
    /// - `b`: matrix of shape [k, n]
    /// - Returns: matrix of shape [m, n]
    fn matmul(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;
}
