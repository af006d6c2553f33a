//! Compressed-row sparse matrix used for filterbanks and CQT kernels.
//!
//! Both the mel filterbank and the constant-Q kernel are built once and then
//! applied to many frames, and both are mostly zeros: a triangle per mel row,
//! a thresholded band per CQT channel. Storing only the surviving entries
//! keeps per-frame application proportional to the non-zero support.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};
use num_traits::Zero;
use std::ops::{Add, Mul};

/// Row-major sparse matrix in compressed sparse row (CSR) form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    cols: usize,
    /// `row_offsets[r]..row_offsets[r + 1]` indexes row `r` in `indices`/`values`.
    row_offsets: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy + Zero> SparseMatrix<T> {
    /// Create an empty matrix with no rows and `cols` columns.
    pub fn with_columns(cols: usize) -> Self {
        Self {
            cols,
            row_offsets: vec![0],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a row given as `(column, value)` pairs in increasing column order.
    ///
    /// Exact zeros are dropped; columns at or beyond the column count are ignored.
    pub fn push_row<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        for (col, value) in entries {
            if col < self.cols && !value.is_zero() {
                debug_assert!(
                    self.indices.len() == *self.row_offsets.last().unwrap_or(&0)
                        || self.indices.last().is_some_and(|&last| last < col),
                    "row entries must be in increasing column order"
                );
                self.indices.push(col);
                self.values.push(value);
            }
        }
        self.row_offsets.push(self.indices.len());
    }

    /// Append a dense row, keeping only its non-zero entries.
    pub fn push_dense_row(&mut self, row: &[T]) {
        self.push_row(row.iter().copied().enumerate());
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.row_offsets.len() - 1
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols)
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate the stored `(column, value)` entries of row `r`.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let (start, end) = self.row_bounds(r);
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    fn row_bounds(&self, r: usize) -> (usize, usize) {
        match (self.row_offsets.get(r), self.row_offsets.get(r + 1)) {
            (Some(&start), Some(&end)) => (start, end),
            _ => (0, 0),
        }
    }

    /// Entry at `(r, c)`, zero when not stored.
    pub fn get(&self, r: usize, c: usize) -> T {
        let (start, end) = self.row_bounds(r);
        match self.indices[start..end].binary_search(&c) {
            Ok(pos) => self.values[start + pos],
            Err(_) => T::zero(),
        }
    }

    /// All stored values, row by row.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Expand into a dense matrix.
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::zeros((self.rows(), self.cols));
        for r in 0..self.rows() {
            for (c, v) in self.row(r) {
                dense[[r, c]] = v;
            }
        }
        dense
    }
}

impl<T> SparseMatrix<T>
where
    T: Copy + Zero + Mul<Output = T> + Add<Output = T>,
{
    /// Sparse matrix–vector product `self · x`.
    pub fn mul_vec(&self, x: &[T]) -> Result<Vec<T>> {
        if x.len() != self.cols {
            return Err(Error::shape("sparse matrix columns vs vector length", self.cols, x.len()));
        }
        Ok((0..self.rows())
            .map(|r| self.row(r).fold(T::zero(), |acc, (c, v)| acc + v * x[c]))
            .collect())
    }

    /// Sparse–dense product `self · dense`, column by column.
    pub fn mul_dense(&self, dense: ArrayView2<'_, T>) -> Result<Array2<T>> {
        if dense.nrows() != self.cols {
            return Err(Error::shape(
                "sparse matrix columns vs dense rows",
                self.cols,
                dense.nrows(),
            ));
        }
        let mut out = Array2::zeros((self.rows(), dense.ncols()));
        for r in 0..self.rows() {
            for (c, v) in self.row(r) {
                for (j, &d) in dense.row(c).iter().enumerate() {
                    out[[r, j]] = out[[r, j]] + v * d;
                }
            }
        }
        Ok(out)
    }
}
