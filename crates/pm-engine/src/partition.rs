use pm_matrix::Matrix;

use crate::error::{EngineError, Result};
use crate::work_unit::WorkUnit;

/// Split the result buffer `out` into work units of `chunk_len` cells.
///
/// Units are carved with `chunks_mut`, so their write targets are disjoint
/// and together cover every cell of `out` exactly once. The last unit may be
/// shorter than `chunk_len`.
pub fn partition<'a>(
    a: &'a Matrix,
    b: &'a Matrix,
    out: &'a mut [f64],
    chunk_len: usize,
) -> Result<Vec<WorkUnit<'a>>> {
    if chunk_len == 0 {
        return Err(EngineError::InvariantViolation(
            "chunk length must be at least 1".to_string(),
        ));
    }
    if out.len() != a.rows() * b.cols() {
        return Err(EngineError::InvariantViolation(format!(
            "result buffer holds {} cells, expected {}x{}",
            out.len(),
            a.rows(),
            b.cols()
        )));
    }

    let count = out.len().div_ceil(chunk_len);
    let mut units = Vec::new();
    units
        .try_reserve_exact(count)
        .map_err(|_| EngineError::UnitAllocation { units: count })?;

    for (i, chunk) in out.chunks_mut(chunk_len).enumerate() {
        units.push(WorkUnit::new(i * chunk_len, a, b, chunk)?);
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_cover_output_exactly_once() {
        let a = Matrix::zeros(3, 4).unwrap();
        let b = Matrix::zeros(4, 5).unwrap();
        let mut out = vec![0.0; 15];
        for chunk_len in [1, 2, 4, 5, 7, 15, 100] {
            let units = partition(&a, &b, &mut out, chunk_len).unwrap();
            assert_eq!(units.len(), 15usize.div_ceil(chunk_len));

            let mut seen = vec![0u32; 15];
            for unit in &units {
                for cell in unit.cells() {
                    seen[cell.row * 5 + cell.col] += 1;
                }
            }
            assert!(seen.iter().all(|&n| n == 1), "chunk_len={}", chunk_len);
        }
    }

    #[test]
    fn test_last_unit_is_remainder() {
        let a = Matrix::zeros(2, 1).unwrap();
        let b = Matrix::zeros(1, 5).unwrap();
        let mut out = vec![0.0; 10];
        let units = partition(&a, &b, &mut out, 4).unwrap();
        let lens: Vec<usize> = units.iter().map(WorkUnit::len).collect();
        let starts: Vec<usize> = units.iter().map(WorkUnit::start).collect();
        assert_eq!(lens, vec![4, 4, 2]);
        assert_eq!(starts, vec![0, 4, 8]);
    }

    #[test]
    fn test_zero_chunk_rejected() {
        let a = Matrix::zeros(1, 1).unwrap();
        let b = Matrix::zeros(1, 1).unwrap();
        let mut out = vec![0.0; 1];
        assert!(matches!(
            partition(&a, &b, &mut out, 0),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_wrong_buffer_size_rejected() {
        let a = Matrix::zeros(2, 2).unwrap();
        let b = Matrix::zeros(2, 2).unwrap();
        let mut out = vec![0.0; 3];
        assert!(partition(&a, &b, &mut out, 1).is_err());
    }
}
