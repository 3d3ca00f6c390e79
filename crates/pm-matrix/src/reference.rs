use crate::backend::MultiplyBackend;
use crate::error::Result;
use crate::matrix::Matrix;

/// Computes a single output cell `sum_i a[row][i] * b[i][col]`.
///
/// The sum runs left to right over the shared dimension starting from
/// `0.0`, with a separate multiply and add per term. Every backend goes
/// through this function, which is what makes their results bit-identical.
#[inline]
pub fn dot_cell(a: &Matrix, b: &Matrix, row: usize, col: usize) -> f64 {
    let n = b.cols();
    let a_row = a.row(row);
    let b_data = b.as_slice();
    let mut sum = 0.0f64;
    for (i, &x) in a_row.iter().enumerate() {
        sum += x * b_data[i * n + col];
    }
    sum
}

/// Single-threaded multiplication backend.
///
/// Straightforward i-j loop over the output, computing each cell with
/// [`dot_cell`]. Serves as the correctness baseline for the parallel engine.
#[derive(Debug, Clone)]
pub struct ReferenceBackend;

impl ReferenceBackend {
    pub fn new() -> Self {
        ReferenceBackend
    }
}

impl Default for ReferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiplyBackend for ReferenceBackend {
    fn name(&self) -> &str {
        "reference"
    }

    fn matmul(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        a.check_matmul(b)?;

        let (m, n) = (a.rows(), b.cols());
        let mut c = Matrix::zeros(m, n)?;
        let out = c.as_mut_slice();
        for i in 0..m {
            for j in 0..n {
                out[i * n + j] = dot_cell(a, b, i, j);
            }
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn backend() -> ReferenceBackend {
        ReferenceBackend::new()
    }

    #[test]
    fn test_matmul_identity() {
        let b = backend();
        let i = Matrix::identity(2).unwrap();
        let x = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(b.matmul(&i, &x).unwrap(), x);
        assert_eq!(b.matmul(&x, &i).unwrap(), x);
    }

    #[test]
    fn test_matmul_basic() {
        let b = backend();
        // [1,2,3;4,5,6] @ [7,8;9,10;11,12] = [58,64;139,154]
        let x = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let y = Matrix::new(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        let c = b.matmul(&x, &y).unwrap();
        assert_eq!((c.rows(), c.cols()), (2, 2));
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matmul_scalar() {
        let b = backend();
        let x = Matrix::new(1, 1, vec![3.0]).unwrap();
        let y = Matrix::new(1, 1, vec![4.0]).unwrap();
        assert_eq!(b.matmul(&x, &y).unwrap().as_slice(), &[12.0]);
    }

    #[test]
    fn test_dot_cell_fractional() {
        let x = Matrix::new(1, 3, vec![0.1, 0.2, 0.3]).unwrap();
        let y = Matrix::new(3, 1, vec![0.4, 0.5, 0.6]).unwrap();
        assert_relative_eq!(dot_cell(&x, &y, 0, 0), 0.32, epsilon = 1e-12);
    }

    #[test]
    fn test_matmul_mismatch() {
        let b = backend();
        let x = Matrix::zeros(2, 3).unwrap();
        let y = Matrix::zeros(2, 3).unwrap();
        assert!(b.matmul(&x, &y).is_err());
    }
}
