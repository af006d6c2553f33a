//! Orthonormal DCT and DST, types I–IV, computed with a single FFT.
//!
//! Each transform embeds the length-`L` input into a longer real buffer
//! (`2L − 2`, `2L + 2`, `4L` or `8L` samples) whose symmetry makes its DFT a
//! pure cosine or sine sum, takes one full-length FFT, reads a strided slice of
//! the real part (DCT) or negated imaginary part (DST), and rescales so the
//! transform matrix is orthonormal.
//!
//! All eight variants share one routine driven by a [`Layout`] table: the
//! embedding segments, which bins to read, and which boundary samples get the
//! `√2` treatment. Inverses:
//!
//! | forward | inverse |
//! |---|---|
//! | DCT-I, DCT-IV, DST-I, DST-IV | themselves |
//! | DCT-II / DST-II | DCT-III / DST-III |
//! | DCT-III / DST-III | DCT-II / DST-II |
//!
//! # Example
//!
//! ```rust
//! use timbre_analysis::trig::{dct, TrigType};
//!
//! let v = [1.0, 2.0, 3.0, 4.0];
//! let coeffs = dct(&v, TrigType::II).unwrap();
//! let back = dct(&coeffs, TrigType::III).unwrap();
//! assert!(v.iter().zip(&back).all(|(a, b)| (a - b).abs() < 1e-12));
//! ```

use crate::error::{Error, Result};
use crate::fft::Fft;
use rustfft::num_complex::Complex;
use std::f64::consts::SQRT_2;
use std::fmt;

/// Cosine or sine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigKind {
    /// Discrete cosine transform.
    Cosine,
    /// Discrete sine transform.
    Sine,
}

/// Transform type (boundary symmetry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigType {
    /// Type I.
    I,
    /// Type II (the "DCT" of most codecs and of MFCC).
    II,
    /// Type III, the inverse of type II.
    III,
    /// Type IV.
    IV,
}

impl TrigType {
    /// The type whose orthonormal transform inverts this one.
    pub fn inverse(self) -> Self {
        match self {
            TrigType::II => TrigType::III,
            TrigType::III => TrigType::II,
            other => other,
        }
    }

    /// Parse `1..=4` into a type.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(TrigType::I),
            2 => Some(TrigType::II),
            3 => Some(TrigType::III),
            4 => Some(TrigType::IV),
            _ => None,
        }
    }
}

impl fmt::Display for TrigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrigType::I => "I",
            TrigType::II => "II",
            TrigType::III => "III",
            TrigType::IV => "IV",
        })
    }
}

/// Boundary samples that are scaled by `√2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edges {
    None,
    First,
    Last,
    Both,
}

impl Edges {
    fn apply(self, values: &mut [f64], factor: f64) {
        let n = values.len();
        if n == 0 {
            return;
        }
        if matches!(self, Edges::First | Edges::Both) {
            values[0] *= factor;
        }
        if matches!(self, Edges::Last | Edges::Both) && (n > 1 || self == Edges::Last) {
            values[n - 1] *= factor;
        }
    }
}

/// One run of input samples copied into the embedding buffer.
///
/// Input samples `from..to` (reversed if `reversed`) are written, multiplied by
/// `sign`, to buffer positions `start, start + stride, …`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: usize,
    stride: usize,
    from: usize,
    to: usize,
    reversed: bool,
    sign: f64,
}

impl Segment {
    fn forward(start: usize, stride: usize, from: usize, to: usize, sign: f64) -> Self {
        Self { start, stride, from, to, reversed: false, sign }
    }

    fn reversed(start: usize, stride: usize, from: usize, to: usize, sign: f64) -> Self {
        Self { start, stride, from, to, reversed: true, sign }
    }

    fn write(&self, input: &[f64], buffer: &mut [Complex<f64>]) {
        let source = &input[self.from..self.to];
        let mut pos = self.start;
        let mut put = |x: f64| {
            buffer[pos] = Complex::new(self.sign * x, 0.0);
            pos += self.stride;
        };
        if self.reversed {
            source.iter().rev().for_each(|&x| put(x));
        } else {
            source.iter().for_each(|&x| put(x));
        }
    }
}

/// Everything that distinguishes one transform variant from another.
#[derive(Debug, Clone)]
struct Layout {
    embed_len: usize,
    segments: Vec<Segment>,
    first_bin: usize,
    bin_stride: usize,
    divisor: f64,
    pre: Edges,
    post: Edges,
    scale: f64,
}

impl Layout {
    fn new(kind: TrigKind, ty: TrigType, n: usize) -> Self {
        let nf = n as f64;
        let half_scale = (2.0 / nf).sqrt();
        // Types II share a 4L buffer with interleaved samples, types IV an 8L
        // buffer with four interleaved quarter-blocks; only the signs differ.
        let interleaved = |blocks: &[f64]| -> Vec<Segment> {
            blocks
                .iter()
                .enumerate()
                .map(|(b, &sign)| {
                    if b % 2 == 0 {
                        Segment::forward(2 * n * b + 1, 2, 0, n, sign)
                    } else {
                        Segment::reversed(2 * n * b + 1, 2, 0, n, sign)
                    }
                })
                .collect()
        };

        match (kind, ty) {
            (TrigKind::Cosine, TrigType::I) => Layout {
                embed_len: 2 * n - 2,
                segments: vec![
                    Segment::forward(0, 1, 0, n, 1.0),
                    Segment::reversed(n, 1, 1, n - 1, 1.0),
                ],
                first_bin: 0,
                bin_stride: 1,
                divisor: 2.0,
                pre: Edges::Both,
                post: Edges::Both,
                scale: (2.0 / (nf - 1.0)).sqrt(),
            },
            (TrigKind::Cosine, TrigType::II) => Layout {
                embed_len: 4 * n,
                segments: interleaved(&[1.0, 1.0]),
                first_bin: 0,
                bin_stride: 1,
                divisor: 2.0,
                pre: Edges::None,
                post: Edges::First,
                scale: half_scale,
            },
            (TrigKind::Cosine, TrigType::III) => Layout {
                embed_len: 4 * n,
                segments: vec![
                    Segment::forward(0, 1, 0, n, 1.0),
                    Segment::reversed(n + 1, 1, 0, n, -1.0),
                    Segment::forward(2 * n + 1, 1, 1, n, -1.0),
                    Segment::reversed(3 * n + 1, 1, 1, n, 1.0),
                ],
                first_bin: 1,
                bin_stride: 2,
                divisor: 4.0,
                pre: Edges::First,
                post: Edges::None,
                scale: half_scale,
            },
            (TrigKind::Cosine, TrigType::IV) => Layout {
                embed_len: 8 * n,
                segments: interleaved(&[1.0, -1.0, -1.0, 1.0]),
                first_bin: 1,
                bin_stride: 2,
                divisor: 4.0,
                pre: Edges::None,
                post: Edges::None,
                scale: half_scale,
            },
            (TrigKind::Sine, TrigType::I) => Layout {
                embed_len: 2 * n + 2,
                segments: vec![
                    Segment::forward(1, 1, 0, n, 1.0),
                    Segment::reversed(n + 2, 1, 0, n, -1.0),
                ],
                first_bin: 1,
                bin_stride: 1,
                divisor: 2.0,
                pre: Edges::None,
                post: Edges::None,
                scale: (2.0 / (nf + 1.0)).sqrt(),
            },
            (TrigKind::Sine, TrigType::II) => Layout {
                embed_len: 4 * n,
                segments: interleaved(&[1.0, -1.0]),
                first_bin: 1,
                bin_stride: 1,
                divisor: 2.0,
                pre: Edges::None,
                post: Edges::Last,
                scale: half_scale,
            },
            (TrigKind::Sine, TrigType::III) => Layout {
                embed_len: 4 * n,
                segments: vec![
                    Segment::forward(1, 1, 0, n, 1.0),
                    Segment::reversed(n + 1, 1, 0, n - 1, 1.0),
                    Segment::forward(2 * n + 1, 1, 0, n, -1.0),
                    Segment::reversed(3 * n + 1, 1, 0, n - 1, -1.0),
                ],
                first_bin: 1,
                bin_stride: 2,
                divisor: 4.0,
                pre: Edges::Last,
                post: Edges::None,
                scale: half_scale,
            },
            (TrigKind::Sine, TrigType::IV) => Layout {
                embed_len: 8 * n,
                segments: interleaved(&[1.0, 1.0, -1.0, -1.0]),
                first_bin: 1,
                bin_stride: 2,
                divisor: 4.0,
                pre: Edges::None,
                post: Edges::None,
                scale: half_scale,
            },
        }
    }
}

/// A planned DCT or DST of fixed kind, type and length.
///
/// Plans the embedding FFT once; reuse it when transforming many vectors of
/// the same length (e.g. every frame of a log-mel spectrogram).
#[derive(Debug)]
pub struct TrigTransform {
    kind: TrigKind,
    ty: TrigType,
    len: usize,
    layout: Layout,
    fft: Fft,
}

impl TrigTransform {
    /// Plan a transform for inputs of length `len`.
    ///
    /// DCT-I needs at least two samples; every other variant needs one.
    pub fn new(kind: TrigKind, ty: TrigType, len: usize) -> Result<Self> {
        let min_len = if (kind, ty) == (TrigKind::Cosine, TrigType::I) { 2 } else { 1 };
        if len < min_len {
            return Err(Error::invalid(
                "len",
                format!("{kind:?} type {ty} needs at least {min_len} samples, got {len}"),
            ));
        }

        let layout = Layout::new(kind, ty, len);
        let fft = Fft::new(layout.embed_len);
        Ok(Self { kind, ty, len, layout, fft })
    }

    /// Transform family.
    pub fn kind(&self) -> TrigKind {
        self.kind
    }

    /// Transform type.
    pub fn trig_type(&self) -> TrigType {
        self.ty
    }

    /// Input (and output) length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a planned transform has at least one sample.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Transform one vector. The input is never modified.
    pub fn process(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.len {
            return Err(Error::shape("trig transform input length", self.len, input.len()));
        }
        let layout = &self.layout;

        let mut source = input.to_vec();
        layout.pre.apply(&mut source, SQRT_2);

        let mut buffer = vec![Complex::new(0.0, 0.0); layout.embed_len];
        for segment in &layout.segments {
            segment.write(&source, &mut buffer);
        }
        self.fft.forward_complex(&mut buffer);

        let mut output: Vec<f64> = buffer
            .iter()
            .skip(layout.first_bin)
            .step_by(layout.bin_stride)
            .take(self.len)
            .map(|c| {
                let part = match self.kind {
                    TrigKind::Cosine => c.re,
                    TrigKind::Sine => -c.im,
                };
                part / layout.divisor
            })
            .collect();

        layout.post.apply(&mut output, 1.0 / SQRT_2);
        for value in &mut output {
            *value *= layout.scale;
        }
        Ok(output)
    }
}

/// Orthonormal discrete cosine transform of the given type.
pub fn dct(signal: &[f64], ty: TrigType) -> Result<Vec<f64>> {
    TrigTransform::new(TrigKind::Cosine, ty, signal.len())?.process(signal)
}

/// Orthonormal discrete sine transform of the given type.
pub fn dst(signal: &[f64], ty: TrigType) -> Result<Vec<f64>> {
    TrigTransform::new(TrigKind::Sine, ty, signal.len())?.process(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TYPES: [TrigType; 4] = [TrigType::I, TrigType::II, TrigType::III, TrigType::IV];

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!((x - y).abs() < tol, "index {}: {} vs {}", i, x, y);
        }
    }

    /// Direct O(L²) orthonormal DCT-II.
    fn naive_dct2(x: &[f64]) -> Vec<f64> {
        let n = x.len() as f64;
        (0..x.len())
            .map(|k| {
                let sum: f64 = x
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| v * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos())
                    .sum();
                let norm = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
                norm * sum
            })
            .collect()
    }

    /// Direct O(L²) orthonormal DST-IV.
    fn naive_dst4(x: &[f64]) -> Vec<f64> {
        let n = x.len() as f64;
        (0..x.len())
            .map(|k| {
                (2.0 / n).sqrt()
                    * x.iter()
                        .enumerate()
                        .map(|(i, &v)| {
                            v * (PI * (2.0 * i as f64 + 1.0) * (2.0 * k as f64 + 1.0) / (4.0 * n))
                                .sin()
                        })
                        .sum::<f64>()
            })
            .collect()
    }

    #[test]
    fn dct2_known_values() {
        let y = dct(&[1.0, 2.0, 3.0, 4.0], TrigType::II).unwrap();
        assert_close(&y, &[5.0, -2.230442497387664, 0.0, -0.15851266778110956], 1e-12);
    }

    #[test]
    fn dst_known_values() {
        let y2 = dst(&[1.0, 2.0, 3.0, 4.0], TrigType::II).unwrap();
        assert_close(&y2, &[4.619397662556434, -2.0, 1.9134171618254503, -1.0], 1e-12);
        let y1 = dst(&[1.0, 2.0, 3.0, 4.0], TrigType::I).unwrap();
        assert_close(
            &y1,
            &[4.866244947338651, -2.176250899482822, 1.148764602736806, -0.5137431483730079],
            1e-12,
        );
    }

    #[test]
    fn dct2_matches_direct_sum() {
        let x: Vec<f64> = (0..13)
            .map(|i| (i as f64 * 0.7).sin() + 0.1 * i as f64)
            .collect();
        assert_close(&dct(&x, TrigType::II).unwrap(), &naive_dct2(&x), 1e-12);
    }

    #[test]
    fn dst4_matches_direct_sum() {
        let x: Vec<f64> = (0..10).map(|i| (i as f64 * 1.3).cos()).collect();
        assert_close(&dst(&x, TrigType::IV).unwrap(), &naive_dst4(&x), 1e-12);
    }

    #[test]
    fn every_pair_inverts() {
        let x: Vec<f64> = (0..9).map(|i| ((i * 7 % 5) as f64) - 2.0).collect();
        for ty in TYPES {
            let c = dct(&dct(&x, ty).unwrap(), ty.inverse()).unwrap();
            assert_close(&c, &x, 1e-12);
            let s = dst(&dst(&x, ty).unwrap(), ty.inverse()).unwrap();
            assert_close(&s, &x, 1e-12);
        }
    }

    #[test]
    fn orthonormal_preserves_energy() {
        let x: Vec<f64> = (0..16).map(|i| (i as f64).sqrt() - 2.0).collect();
        let energy: f64 = x.iter().map(|v| v * v).sum();
        for ty in TYPES {
            for y in [dct(&x, ty).unwrap(), dst(&x, ty).unwrap()] {
                let e: f64 = y.iter().map(|v| v * v).sum();
                assert!((e - energy).abs() < 1e-9, "type {}: {} vs {}", ty, e, energy);
            }
        }
    }

    #[test]
    fn input_is_not_modified() {
        let x = vec![1.0, -2.0, 3.0, 0.5];
        let copy = x.clone();
        for ty in TYPES {
            let _ = dct(&x, ty).unwrap();
            let _ = dst(&x, ty).unwrap();
        }
        assert_eq!(x, copy);
    }

    #[test]
    fn single_sample_variants() {
        for ty in [TrigType::II, TrigType::III, TrigType::IV] {
            let c = dct(&[3.0], ty).unwrap();
            assert_close(&dct(&c, ty.inverse()).unwrap(), &[3.0], 1e-12);
        }
        for ty in TYPES {
            let s = dst(&[3.0], ty).unwrap();
            assert_close(&dst(&s, ty.inverse()).unwrap(), &[3.0], 1e-12);
        }
    }

    #[test]
    fn dct1_rejects_single_sample() {
        assert!(matches!(dct(&[1.0], TrigType::I), Err(Error::InvalidParameter { .. })));
        assert!(dct(&[], TrigType::II).is_err());
    }

    #[test]
    fn planned_transform_checks_length() {
        let plan = TrigTransform::new(TrigKind::Cosine, TrigType::II, 8).unwrap();
        assert_eq!(plan.len(), 8);
        assert!(matches!(
            plan.process(&[0.0; 4]),
            Err(Error::ShapeMismatch { expected: 8, actual: 4, .. })
        ));
    }

    #[test]
    fn type_numbers() {
        assert_eq!(TrigType::from_number(3), Some(TrigType::III));
        assert_eq!(TrigType::from_number(5), None);
        assert_eq!(TrigType::II.inverse(), TrigType::III);
        assert_eq!(TrigType::IV.inverse(), TrigType::IV);
    }
}
