use std::io::{self, Write};

use pm_matrix::Matrix;

/// Decimal places printed for every element.
pub const PRECISION: usize = 5;

/// Write `matrix` as `rows` lines of space-separated values.
pub fn write_matrix<W: Write>(out: &mut W, matrix: &Matrix) -> io::Result<()> {
    for r in 0..matrix.rows() {
        for (j, value) in matrix.row(r).iter().enumerate() {
            if j > 0 {
                out.write_all(b" ")?;
            }
            write!(out, "{:.*}", PRECISION, value)?;
        }
        out.write_all(b"\n")?;
    }
    Ok(())
}
