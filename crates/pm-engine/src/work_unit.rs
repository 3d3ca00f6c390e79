use pm_matrix::{dot_cell, Matrix};

use crate::error::{EngineError, Result};

/// Coordinates of one output cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// A contiguous run of output cells assigned to exactly one worker.
///
/// Covers the flat row-major indices `[start, start + len)` of the result.
/// Operands are shared read-only; `out` is the unit's exclusive slice of the
/// result buffer, so two units can never write the same cell.
#[derive(Debug)]
pub struct WorkUnit<'a> {
    start: usize,
    a: &'a Matrix,
    b: &'a Matrix,
    out: &'a mut [f64],
}

impl<'a> WorkUnit<'a> {
    /// Create a unit covering `out.len()` cells starting at flat index `start`.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the operands do not chain or the range
    /// falls outside the `a.rows() x b.cols()` output.
    pub fn new(start: usize, a: &'a Matrix, b: &'a Matrix, out: &'a mut [f64]) -> Result<Self> {
        if a.cols() != b.rows() {
            return Err(EngineError::InvariantViolation(format!(
                "work unit operands do not chain: {}x{} @ {}x{}",
                a.rows(),
                a.cols(),
                b.rows(),
                b.cols()
            )));
        }
        let cells = a.rows() * b.cols();
        if out.is_empty() || start >= cells || out.len() > cells - start {
            return Err(EngineError::InvariantViolation(format!(
                "work unit [{}, {}) outside output of {} cells",
                start,
                start + out.len(),
                cells
            )));
        }
        Ok(WorkUnit { start, a, b, out })
    }

    /// Flat index of the first cell.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of cells in this unit.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// Always false: units are never empty.
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// The cells this unit writes, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let n = self.b.cols();
        (self.start..self.start + self.out.len()).map(move |idx| Cell {
            row: idx / n,
            col: idx % n,
        })
    }

    /// Compute every cell of the unit and write it into the result buffer.
    pub fn execute(self) {
        let n = self.b.cols();
        for (slot, idx) in self.out.iter_mut().zip(self.start..) {
            *slot = dot_cell(self.a, self.b, idx / n, idx % n);
        }
    }
}
