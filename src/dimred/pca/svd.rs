//! PCA through a thin SVD of the centred data.
//!
//! Reaches the same subspace as the covariance route without forming the
//! covariance matrix. Each component is flipped so that its largest-magnitude
//! loading is positive, which is a different sign convention from the one the
//! eigensolver happens to produce.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView2};
use nshare::IntoNalgebra;

use crate::dimred::pca::descending_order;
use crate::dimred::Reduction;
use crate::error::{ReduceError, Result};
use crate::utils::{center_columns, check_components, check_not_empty, subtract_mean};

pub struct SvdPca {
    n_components: usize,
    components: Option<Array2<f64>>,
    mean: Option<Array1<f64>>,
    explained_variance: Option<Array1<f64>>,
}

impl SvdPca {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            components: None,
            mean: None,
            explained_variance: None,
        }
    }

    pub fn fit(&mut self, x: ArrayView2<f64>) -> Result<&mut Self> {
        check_not_empty(x)?;
        let (n_samples, n_features) = x.dim();
        check_components(self.n_components, n_samples.min(n_features))?;

        let (mean, centered) = center_columns(x)?;
        let matrix: DMatrix<f64> = centered.view().into_nalgebra().clone_owned();
        let svd = matrix.svd(false, true);
        let v_t = svd.v_t.ok_or_else(|| {
            ReduceError::InvalidShape("SVD did not produce right singular vectors".to_string())
        })?;

        let singular_values = Array1::from(svd.singular_values.as_slice().to_vec());
        let order = descending_order(singular_values.view());
        let top = &order[..self.n_components];

        let mut components = Array2::from_shape_fn((n_features, self.n_components), |(i, j)| {
            v_t[(top[j], i)]
        });
        flip_by_largest_loading(&mut components);

        let denominator = if n_samples > 1 {
            n_samples as f64 - 1.0
        } else {
            1.0
        };
        let explained_variance =
            Array1::from_iter(top.iter().map(|&idx| singular_values[idx].powi(2) / denominator));

        self.components = Some(components);
        self.mean = Some(mean);
        self.explained_variance = Some(explained_variance);

        Ok(self)
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (components, mean) = match (&self.components, &self.mean) {
            (Some(c), Some(m)) => (c, m),
            _ => {
                return Err(ReduceError::InvalidShape(
                    "SVD PCA has not been fitted yet".to_string(),
                ))
            }
        };

        if x.ncols() != components.nrows() {
            return Err(ReduceError::InvalidShape(format!(
                "fitted on {} features, got {}",
                components.nrows(),
                x.ncols()
            )));
        }

        let mut centered = x.to_owned();
        subtract_mean(&mut centered, mean.view());
        Ok(centered.dot(components))
    }

    pub fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Right singular vectors of the retained components, one per column (D×k).
    pub fn components(&self) -> Option<&Array2<f64>> {
        self.components.as_ref()
    }

    /// `s² / (N - 1)` for each retained component.
    pub fn explained_variance(&self) -> Option<&Array1<f64>> {
        self.explained_variance.as_ref()
    }
}

impl Reduction for SvdPca {
    fn name(&self) -> &str {
        "PCA (SVD)"
    }

    fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        SvdPca::fit_transform(self, x)
    }
}

fn flip_by_largest_loading(components: &mut Array2<f64>) {
    for mut column in components.columns_mut() {
        let pivot = column
            .iter()
            .copied()
            .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
        if pivot < 0.0 {
            column.mapv_inplace(|v| -v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align;
    use crate::dimred::pca::reduce;
    use crate::utils::random_matrix;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_matches_covariance_pca_up_to_sign() {
        let x = random_matrix(30, 6, 101);
        let eigen = reduce(x.view(), 3).unwrap();
        let svd = SvdPca::new(3).fit_transform(x.view()).unwrap();
        assert_eq!(svd.shape(), &[30, 3]);

        let aligned = align(eigen.view(), svd.view()).unwrap();
        for (a, b) in eigen.iter().zip(aligned.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_largest_loading_is_positive() {
        let x = random_matrix(20, 5, 7);
        let mut pca = SvdPca::new(3);
        pca.fit(x.view()).unwrap();

        for column in pca.components().unwrap().columns() {
            let pivot = column
                .iter()
                .copied()
                .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
            assert!(pivot > 0.0);
        }
    }

    #[test]
    fn test_explained_variance() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let mut pca = SvdPca::new(1);
        pca.fit(x.view()).unwrap();
        assert_abs_diff_eq!(pca.explained_variance().unwrap()[0], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn test_wide_matrix_limits_components() {
        let x = random_matrix(2, 5, 3);
        assert!(matches!(
            SvdPca::new(3).fit_transform(x.view()),
            Err(ReduceError::Dimension {
                requested: 3,
                available: 2
            })
        ));
        assert_eq!(SvdPca::new(2).fit_transform(x.view()).unwrap().shape(), &[2, 2]);
    }

    #[test]
    fn test_empty_input() {
        let x = Array2::<f64>::zeros((0, 4));
        assert!(matches!(
            SvdPca::new(3).fit_transform(x.view()),
            Err(ReduceError::InvalidShape(_))
        ));
    }
}
