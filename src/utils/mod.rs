use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

use crate::error::{ReduceError, Result};

/// Column means and the centred copy of `x`.
///
/// `x` must have at least one row.
pub(crate) fn center_columns(x: ArrayView2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    let mean = x
        .mean_axis(Axis(0))
        .ok_or_else(|| ReduceError::InvalidShape("input matrix has no rows".to_string()))?;

    let mut centered = x.to_owned();
    subtract_mean(&mut centered, mean.view());
    Ok((mean, centered))
}

pub(crate) fn subtract_mean(x: &mut Array2<f64>, mean: ArrayView1<f64>) {
    x.axis_iter_mut(Axis(0))
        .into_par_iter()
        .for_each(|mut row| {
            row -= &mean;
        });
}

/// Unbiased sample variance of each column. Columns of a single-row matrix
/// have variance zero.
pub(crate) fn column_variances(x: ArrayView2<f64>) -> Array1<f64> {
    let ddof = if x.nrows() > 1 { 1.0 } else { 0.0 };
    if x.nrows() == 0 {
        return Array1::zeros(x.ncols());
    }
    x.var_axis(Axis(0), ddof)
}

pub(crate) fn check_not_empty(x: ArrayView2<f64>) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ReduceError::InvalidShape(
            "input matrix has no rows".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_components(requested: usize, available: usize) -> Result<()> {
    if requested == 0 || requested > available {
        return Err(ReduceError::Dimension {
            requested,
            available,
        });
    }
    Ok(())
}

/// Seeded uniform matrix in [-1, 1) for tests.
#[cfg(test)]
pub(crate) fn random_matrix(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.random_range(-1.0..1.0))
}
