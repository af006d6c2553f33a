//! Dense matrix aliases shared by every transform.
//!
//! All matrices are indexed `[row, column]` where rows are frequency bins
//! (or filters, channels, coefficients) and columns are time frames.

use ndarray::{Array2, ArrayView2};
use rustfft::num_complex::Complex;

/// Complex spectrogram `[frequency_bin, time_frame]`; bin 0 is DC.
pub type ComplexMatrix = Array2<Complex<f64>>;

/// Real-valued time-frequency matrix `[row, time_frame]`.
pub type RealMatrix = Array2<f64>;

/// Elementwise magnitude of rows `rows.start..rows.end` of a complex matrix.
pub fn magnitude_rows(
    matrix: ArrayView2<'_, Complex<f64>>,
    rows: std::ops::Range<usize>,
) -> RealMatrix {
    matrix.slice(ndarray::s![rows, ..]).mapv(|c| c.norm())
}

/// Elementwise squared magnitude of rows `rows.start..rows.end` of a complex matrix.
pub fn power_rows(
    matrix: ArrayView2<'_, Complex<f64>>,
    rows: std::ops::Range<usize>,
) -> RealMatrix {
    matrix.slice(ndarray::s![rows, ..]).mapv(|c| c.norm_sqr())
}

/// Assemble a matrix from per-frame columns of equal length.
pub(crate) fn from_columns<T: Clone + num_traits::Zero>(
    rows: usize,
    columns: &[Vec<T>],
) -> Array2<T> {
    let mut matrix = Array2::zeros((rows, columns.len()));
    for (j, column) in columns.iter().enumerate() {
        for (i, value) in column.iter().take(rows).enumerate() {
            matrix[[i, j]] = value.clone();
        }
    }
    matrix
}
