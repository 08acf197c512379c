//! 8-bit affine quantization of embedding matrices.
//!
//! A corpus stores each coordinate as one byte `q` and a single store-wide
//! range `[min, max]`; the float value is `q / 255 * (max - min) + min`.
//! The range is fixed when the corpus is built and must be reproduced exactly
//! when loading, so it travels with the corpus manifest.

use crate::error::{Result, VectorStoreError};
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Number of `alpha` values tried by [`fit_range`].
pub const ALPHA_STEPS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizationRange {
    pub min: f64,
    pub max: f64,
}

impl QuantizationRange {
    /// Range of the published 300-dimensional GloVe corpus.
    pub const PUBLISHED: Self = Self {
        min: -2.645_588_700_353_074,
        max: 2.633_396_402_416_419_6,
    };

    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(VectorStoreError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn dequantize_byte(&self, byte: u8) -> f32 {
        (f64::from(byte) / 255.0 * (self.max - self.min) + self.min) as f32
    }

    #[must_use]
    pub fn dequantize(&self, bytes: &[u8]) -> Vec<f32> {
        bytes.iter().map(|&b| self.dequantize_byte(b)).collect()
    }

    /// Clips to the range and truncates to a byte.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn quantize_value(&self, value: f32) -> u8 {
        let clipped = f64::from(value).clamp(self.min, self.max);
        let normalized = (clipped - self.min) / (self.max - self.min);
        (normalized * 255.0) as u8
    }

    #[must_use]
    pub fn quantize(&self, values: &[f32]) -> Vec<u8> {
        values.iter().map(|&v| self.quantize_value(v)).collect()
    }
}

impl Default for QuantizationRange {
    fn default() -> Self {
        Self::PUBLISHED
    }
}

/// Outcome of [`fit_range`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedRange {
    pub range: QuantizationRange,
    pub alpha: f64,
    pub mean_error: f64,
}

/// Picks the quantization range for `matrix`.
///
/// The full `[min, max]` of the data wastes most byte levels on a few
/// outliers, so the range is shrunk by a factor `alpha` and the outliers are
/// clipped. `alpha` is searched over [`ALPHA_STEPS`] evenly spaced values in
/// `[std / max|x|, 1]`, keeping the one with the lowest mean relative
/// reconstruction error per row.
pub fn fit_range(matrix: ArrayView2<'_, f32>) -> Result<FittedRange> {
    if matrix.is_empty() {
        return Err(VectorStoreError::EmptyVocabulary);
    }

    let data_min = f64::from(matrix.fold(f32::INFINITY, |acc, &v| acc.min(v)));
    let data_max = f64::from(matrix.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v)));
    let abs_max = data_min.abs().max(data_max.abs());
    if abs_max == 0.0 || data_max <= data_min {
        return Err(VectorStoreError::InvalidRange {
            min: data_min,
            max: data_max,
        });
    }

    let mean = matrix.iter().map(|&v| f64::from(v)).sum::<f64>() / matrix.len() as f64;
    let variance = matrix
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / matrix.len() as f64;
    let start = variance.sqrt() / abs_max;

    let mut best: Option<FittedRange> = None;
    for step in 0..ALPHA_STEPS {
        let alpha = start + (1.0 - start) * step as f64 / (ALPHA_STEPS - 1) as f64;
        let Ok(range) = QuantizationRange::new(data_min * alpha, data_max * alpha) else {
            continue;
        };
        let mean_error = mean_relative_error(matrix, &range);
        if best.map_or(true, |b| mean_error < b.mean_error) {
            best = Some(FittedRange {
                range,
                alpha,
                mean_error,
            });
        }
    }

    best.ok_or(VectorStoreError::InvalidRange {
        min: data_min,
        max: data_max,
    })
}

/// Quantizes a whole matrix row-major.
#[must_use]
pub fn quantize_matrix(matrix: ArrayView2<'_, f32>, range: &QuantizationRange) -> Vec<u8> {
    matrix.iter().map(|&v| range.quantize_value(v)).collect()
}

/// Mean over rows of `|x - dequantize(quantize(x))| / |x|`. Zero rows are
/// skipped.
#[must_use]
pub fn mean_relative_error(matrix: ArrayView2<'_, f32>, range: &QuantizationRange) -> f64 {
    let mut total = 0.0;
    let mut counted = 0usize;
    for row in matrix.axis_iter(Axis(0)) {
        let mut norm = 0.0f64;
        let mut err = 0.0f64;
        for &v in row {
            let restored = range.dequantize_byte(range.quantize_value(v));
            norm += f64::from(v).powi(2);
            err += (f64::from(v) - f64::from(restored)).powi(2);
        }
        if norm > 0.0 {
            total += err.sqrt() / norm.sqrt();
            counted += 1;
        }
    }
    if counted == 0 {
        0.0
    } else {
        total / counted as f64
    }
}

/// Rebuilds a float matrix from quantized row-major bytes.
pub fn dequantize_matrix(
    bytes: &[u8],
    rows: usize,
    dimension: usize,
    range: &QuantizationRange,
) -> Result<Array2<f32>> {
    let expected = rows.saturating_mul(dimension);
    if bytes.len() != expected {
        return Err(VectorStoreError::InvalidDimension {
            expected,
            actual: bytes.len(),
        });
    }
    Array2::from_shape_vec((rows, dimension), range.dequantize(bytes)).map_err(|_| {
        VectorStoreError::InvalidDimension {
            expected,
            actual: bytes.len(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn dequantizes_endpoints_to_range() {
        let range = QuantizationRange::PUBLISHED;
        assert!((f64::from(range.dequantize_byte(0)) - range.min).abs() < 1e-6);
        assert!((f64::from(range.dequantize_byte(255)) - range.max).abs() < 1e-6);
    }

    #[test]
    fn dequantize_matches_affine_map() {
        let range = QuantizationRange::new(-2.0, 2.0).unwrap();
        let values = range.dequantize(&[0, 51, 255]);
        assert!((values[0] + 2.0).abs() < 1e-6);
        assert!((values[1] - (51.0 / 255.0 * 4.0 - 2.0)).abs() < 1e-6);
        assert!((values[2] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn quantize_clips_out_of_range_values() {
        let range = QuantizationRange::new(-1.0, 1.0).unwrap();
        assert_eq!(range.quantize(&[-5.0, 5.0, 0.0]), vec![0, 255, 127]);
    }

    #[test]
    fn rejects_degenerate_range() {
        assert!(QuantizationRange::new(1.0, 1.0).is_err());
        assert!(QuantizationRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn dequantize_matrix_checks_shape() {
        let range = QuantizationRange::new(-1.0, 1.0).unwrap();
        let err = dequantize_matrix(&[0, 1, 2], 2, 2, &range).unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::InvalidDimension {
                expected: 4,
                actual: 3
            }
        ));
        let matrix = dequantize_matrix(&[0, 255, 255, 0], 2, 2, &range).unwrap();
        assert_eq!(matrix.shape(), &[2, 2]);
        assert!((matrix[[0, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fitted_range_is_no_worse_than_full_range() {
        let matrix = array![
            [0.1f32, -0.2, 0.3, 0.05],
            [-0.1, 0.2, -0.3, 0.15],
            [0.25, 0.1, -0.05, 8.0],
        ];
        let fitted = fit_range(matrix.view()).unwrap();
        assert!(fitted.alpha > 0.0 && fitted.alpha <= 1.0 + 1e-9);
        assert!(fitted.range.max <= 8.0 + 1e-6);
        // same f32 extremes the fit sees
        let full = QuantizationRange::new(f64::from(-0.3f32), f64::from(8.0f32)).unwrap();
        assert!(fitted.mean_error <= mean_relative_error(matrix.view(), &full) + 1e-6);
    }

    #[test]
    fn fit_range_rejects_constant_matrix() {
        let matrix = Array2::<f32>::zeros((2, 3));
        assert!(fit_range(matrix.view()).is_err());
    }

    proptest! {
        #[test]
        fn proptest_requantization_error_is_bounded(byte in any::<u8>()) {
            let range = QuantizationRange::new(-2.5, 2.5).unwrap();
            let value = range.dequantize_byte(byte);
            let restored = range.dequantize_byte(range.quantize_value(value));
            let step = (range.max - range.min) / 255.0;
            prop_assert!(f64::from((value - restored).abs()) <= step + 1e-5);
        }
    }
}
