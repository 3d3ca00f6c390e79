use std::ops::Index;

use crate::backend::MultiplyBackend;
use crate::error::{MatrixError, Result};

/// A dense matrix of `f64` values.
///
/// Owns a contiguous, row-major buffer: element `(r, c)` lives at
/// `r * cols + c`. Dimensions are fixed at construction and the buffer
/// length always equals `rows * cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` if either dimension is zero and
    /// `DataLength` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let expected = checked_len(rows, cols)?;
        if data.len() != expected {
            return Err(MatrixError::DataLength {
                rows,
                cols,
                expected,
                got: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Create a zero-filled matrix.
    ///
    /// The buffer is reserved fallibly, so an allocation the system cannot
    /// satisfy is reported as `Allocation` instead of aborting the process.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let n = checked_len(rows, cols)?;
        let mut data = Vec::new();
        data.try_reserve_exact(n)
            .map_err(|_| MatrixError::Allocation { rows, cols })?;
        data.resize(n, 0.0);
        Ok(Matrix { rows, cols, data })
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Matrix::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements (`rows * cols`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: a constructed matrix has at least one element.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at `(row, col)`, or `None` outside the bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Returns row `r` as a slice.
    ///
    /// # Panics
    /// Panics if `r >= rows()`.
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row {} out of range for {} rows", r, self.rows);
        let start = r * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns the underlying row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the underlying row-major data mutably.
    ///
    /// The slice length is fixed, so the matrix dimensions cannot change
    /// through it.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the matrix, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Matrix multiplication `self @ other` using the given backend.
    ///
    /// self is [m, k], other is [k, n], result is [m, n].
    pub fn matmul(&self, other: &Matrix, backend: &dyn MultiplyBackend) -> Result<Matrix> {
        self.check_matmul(other)?;
        backend.matmul(self, other)
    }

    /// Verifies that `self @ other` is defined (`self.cols == other.rows`).
    pub fn check_matmul(&self, other: &Matrix) -> Result<()> {
        if self.cols != other.rows {
            return Err(MatrixError::DimensionMismatch {
                m: self.rows,
                k: self.cols,
                k2: other.rows,
                n: other.cols,
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::InvalidDimensions { rows, cols });
    }
    rows.checked_mul(cols)
        .ok_or(MatrixError::Allocation { rows, cols })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceBackend;

    #[test]
    fn test_new_matrix() {
        let m = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.len(), 6);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_new_length_mismatch() {
        let err = Matrix::new(2, 2, vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            MatrixError::DataLength {
                rows: 2,
                cols: 2,
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            Matrix::zeros(0, 3),
            Err(MatrixError::InvalidDimensions { rows: 0, cols: 3 })
        ));
        assert!(matches!(
            Matrix::new(3, 0, vec![]),
            Err(MatrixError::InvalidDimensions { rows: 3, cols: 0 })
        ));
    }

    #[test]
    fn test_overflowing_dimensions() {
        assert!(matches!(
            Matrix::zeros(usize::MAX, 2),
            Err(MatrixError::Allocation { .. })
        ));
    }

    #[test]
    fn test_unsatisfiable_allocation() {
        // Fits in usize but not in any address space.
        assert!(matches!(
            Matrix::zeros(1 << 31, 1 << 31),
            Err(MatrixError::Allocation { .. })
        ));
    }

    #[test]
    fn test_get_bounds() {
        let m = Matrix::new(1, 2, vec![7.0, 8.0]).unwrap();
        assert_eq!(m.get(0, 1), Some(8.0));
        assert_eq!(m.get(1, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_bounds_panics() {
        let m = Matrix::zeros(2, 2).unwrap();
        let _ = m[(0, 2)];
    }

    #[test]
    fn test_identity() {
        let i = Matrix::identity(3).unwrap();
        assert_eq!(
            i.as_slice(),
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_matmul() {
        let backend = ReferenceBackend::new();
        let a = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::new(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = a.matmul(&b, &backend).unwrap();
        assert_eq!((c.rows(), c.cols()), (2, 2));
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_dimension_mismatch() {
        let backend = ReferenceBackend::new();
        let a = Matrix::new(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        let b = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            a.matmul(&b, &backend).unwrap_err(),
            MatrixError::DimensionMismatch {
                m: 1,
                k: 3,
                k2: 2,
                n: 2
            }
        );
    }
}
