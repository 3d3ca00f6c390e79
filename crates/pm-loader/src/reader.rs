use std::io::Read;
use std::path::Path;
use std::str::SplitWhitespace;

use pm_matrix::{Matrix, MatrixError};

use crate::error::{LoadError, Result};

/// Operand dimensions from the file header: A is `m x k`, B is `k x n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub m: usize,
    pub k: usize,
    pub n: usize,
}

/// Open a matrix file and parse both operands.
///
/// The file holds whitespace-separated tokens: the integers `m k n`, then
/// `m*k` values of A in row-major order, then `k*n` values of B.
pub fn load_matrices(path: &Path) -> Result<(Matrix, Matrix)> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "opened matrix file");
    read_matrices(file)
}

/// Read both operands from any reader.
pub fn read_matrices(mut reader: impl Read) -> Result<(Matrix, Matrix)> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    tracing::debug!(bytes = text.len(), "read matrix text");
    parse_matrices(&text)
}

/// Parse both operands from the text of a matrix file.
///
/// Tokens left over after B are ignored with a warning.
pub fn parse_matrices(text: &str) -> Result<(Matrix, Matrix)> {
    let mut tokens = Tokens::new(text);

    let dims = Dimensions {
        m: tokens.next_dim(0)?,
        k: tokens.next_dim(1)?,
        n: tokens.next_dim(2)?,
    };

    let a = tokens.next_matrix("A", dims.m, dims.k)?;
    let b = tokens.next_matrix("B", dims.k, dims.n)?;

    let trailing = tokens.remaining();
    if trailing > 0 {
        tracing::warn!(trailing, "ignoring tokens after matrix B");
    }
    tracing::debug!(m = dims.m, k = dims.k, n = dims.n, "parsed operands");

    Ok((a, b))
}

/// Whitespace tokenizer that remembers how many tokens it has handed out.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.inner.next()?;
        self.position += 1;
        Some(token)
    }

    fn next_dim(&mut self, index: usize) -> Result<usize> {
        const NAMES: [&str; 3] = ["m", "k", "n"];
        let token = self.next_token().ok_or_else(|| LoadError::Truncated {
            what: "header".to_string(),
            expected: NAMES.len(),
            found: index,
        })?;
        token.parse::<usize>().map_err(|_| LoadError::Parse {
            what: format!("dimension '{}'", NAMES[index]),
            position: self.position,
            token: token.to_string(),
        })
    }

    /// Read a `rows x cols` matrix.
    ///
    /// The buffer grows with the tokens actually present, so a header that
    /// declares more values than the input holds is reported as `Truncated`
    /// without first allocating the declared size.
    fn next_matrix(&mut self, name: &str, rows: usize, cols: usize) -> Result<Matrix> {
        let expected = rows
            .checked_mul(cols)
            .ok_or(MatrixError::Allocation { rows, cols })?;
        let mut values: Vec<f64> = Vec::new();
        while values.len() < expected {
            let token = self.next_token().ok_or_else(|| LoadError::Truncated {
                what: format!("matrix {}", name),
                expected,
                found: values.len(),
            })?;
            let value = token.parse::<f64>().map_err(|_| LoadError::Parse {
                what: format!("value of matrix {}", name),
                position: self.position,
                token: token.to_string(),
            })?;
            values
                .try_reserve(1)
                .map_err(|_| MatrixError::Allocation { rows, cols })?;
            values.push(value);
        }
        Ok(Matrix::new(rows, cols, values)?)
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}
