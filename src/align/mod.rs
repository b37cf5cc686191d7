//! # Sign Alignment
//!
//! Eigenvectors are defined only up to sign, so two correct reductions of the
//! same samples can disagree on the direction of any component. The aligner
//! negates each column of the target whose similarity with the matching
//! reference column is negative.
//!
//! When the similarity is undefined (fewer than two samples, or a constant
//! column in either matrix) the column is left as it is.

use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{ReduceError, Result};
use crate::similarity::{PearsonSimilarity, SimilarityMeasure};

#[derive(Debug, Clone, Copy, Default)]
pub struct SignAligner<M: SimilarityMeasure = PearsonSimilarity> {
    measure: M,
}

impl<M: SimilarityMeasure> SignAligner<M> {
    pub fn new(measure: M) -> Self {
        Self { measure }
    }

    /// For every column, whether `align` would negate it.
    pub fn flips(&self, reference: ArrayView2<f64>, target: ArrayView2<f64>) -> Result<Vec<bool>> {
        if reference.shape() != target.shape() {
            return Err(ReduceError::InvalidShape(format!(
                "reference is {:?} but target is {:?}",
                reference.shape(),
                target.shape()
            )));
        }

        Ok(reference
            .axis_iter(Axis(1))
            .zip(target.axis_iter(Axis(1)))
            .map(|(r, t)| matches!(self.measure.calculate(r, t), Some(c) if c < 0.0))
            .collect())
    }

    /// Returns a copy of `target` with the negatively correlated columns negated.
    /// Neither input is modified.
    pub fn align(&self, reference: ArrayView2<f64>, target: ArrayView2<f64>) -> Result<Array2<f64>> {
        let flips = self.flips(reference, target)?;

        let mut aligned = target.to_owned();
        for (mut column, flip) in aligned.axis_iter_mut(Axis(1)).zip(flips) {
            if flip {
                column.mapv_inplace(|v| -v);
            }
        }
        Ok(aligned)
    }
}

/// Aligns `target` to `reference` with Pearson correlation.
pub fn align(reference: ArrayView2<f64>, target: ArrayView2<f64>) -> Result<Array2<f64>> {
    SignAligner::<PearsonSimilarity>::default().align(reference, target)
}
