//! # Covariance Principal Component Analysis
//!
//! Centres the data, builds the unbiased D×D covariance matrix, decomposes it with
//! an [`EigenSolver`] and projects the centred data onto the eigenvectors of the
//! `k` largest eigenvalues.
//!
//! The sign of every returned component is whatever the solver produced. Ties
//! between equal eigenvalues keep the solver's order.

use std::cmp::Ordering;
use std::sync::Arc;

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use nshare::{IntoNalgebra, IntoNdarray2};

use crate::dimred::Reduction;
use crate::error::{ReduceError, Result};
use crate::utils::{center_columns, check_components, check_not_empty, subtract_mean};

pub mod svd;

/// Eigendecomposition of a real symmetric matrix.
pub trait EigenSolver: Send + Sync {
    /// Returns the eigenvalues and the matching eigenvectors stored as columns,
    /// in whatever order the solver produces them.
    fn compute(&self, matrix: ArrayView2<f64>) -> (Array1<f64>, Array2<f64>);
}

/// Symmetric eigensolver from nalgebra. Produces real eigenpairs directly, so
/// there is no imaginary residue to discard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricEigenSolver;

impl EigenSolver for SymmetricEigenSolver {
    fn compute(&self, matrix: ArrayView2<f64>) -> (Array1<f64>, Array2<f64>) {
        let matrix: DMatrix<f64> = matrix.into_nalgebra().clone_owned();
        let eigen = matrix.symmetric_eigen();

        let values = Array1::from(eigen.eigenvalues.as_slice().to_vec());
        let vectors = eigen.eigenvectors.into_ndarray2().into_owned();
        (values, vectors)
    }
}

pub struct PcaBuilder<S: EigenSolver> {
    n_components: usize,
    solver: Arc<S>,
}

impl<S: EigenSolver> PcaBuilder<S> {
    pub fn new(solver: S) -> Self {
        PcaBuilder {
            n_components: 3,
            solver: Arc::new(solver),
        }
    }

    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    pub fn build(self) -> Pca<S> {
        Pca {
            n_components: self.n_components,
            solver: self.solver,
            components: None,
            mean: None,
            eigenvalues: None,
            total_variance: None,
        }
    }
}

pub struct Pca<S: EigenSolver> {
    n_components: usize,
    solver: Arc<S>,
    components: Option<Array2<f64>>,
    mean: Option<Array1<f64>>,
    eigenvalues: Option<Array1<f64>>,
    total_variance: Option<f64>,
}

impl<S: EigenSolver> Pca<S> {
    pub fn fit(&mut self, x: ArrayView2<f64>) -> Result<&mut Self> {
        check_not_empty(x)?;
        let n_features = x.ncols();
        check_components(self.n_components, n_features)?;

        let (mean, centered) = center_columns(x)?;
        let covariance = covariance(centered.view());
        let (values, vectors) = self.solver.compute(covariance.view());

        let order = descending_order(values.view());
        let top = &order[..self.n_components];

        let components = Array2::from_shape_fn((n_features, self.n_components), |(i, j)| {
            vectors[[i, top[j]]]
        });
        let eigenvalues = Array1::from_iter(top.iter().map(|&idx| values[idx]));

        self.components = Some(components);
        self.mean = Some(mean);
        self.eigenvalues = Some(eigenvalues);
        self.total_variance = Some(values.sum());

        Ok(self)
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (components, mean) = match (&self.components, &self.mean) {
            (Some(c), Some(m)) => (c, m),
            _ => {
                return Err(ReduceError::InvalidShape(
                    "PCA has not been fitted yet".to_string(),
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

    /// Projection basis, one component per column (D×k).
    pub fn components(&self) -> Option<&Array2<f64>> {
        self.components.as_ref()
    }

    /// Eigenvalues of the retained components, largest first.
    pub fn eigenvalues(&self) -> Option<&Array1<f64>> {
        self.eigenvalues.as_ref()
    }

    /// Sum of all covariance eigenvalues, retained or not.
    pub fn total_variance(&self) -> Option<f64> {
        self.total_variance
    }

    pub fn explained_variance_ratio(&self) -> Option<Array1<f64>> {
        let eigenvalues = self.eigenvalues.as_ref()?;
        let total = self.total_variance?;
        if total > 0.0 {
            Some(eigenvalues.mapv(|v| v / total))
        } else {
            Some(Array1::zeros(eigenvalues.len()))
        }
    }
}

impl<S: EigenSolver> Reduction for Pca<S> {
    fn name(&self) -> &str {
        "PCA (covariance eigendecomposition)"
    }

    fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        Pca::fit_transform(self, x)
    }
}

/// Projects `data` onto its top-`k` covariance eigenvectors.
///
/// Fails with [`ReduceError::InvalidShape`] for an empty matrix and with
/// [`ReduceError::Dimension`] when `k` exceeds the column count. The column
/// means are not retained.
pub fn reduce(data: ArrayView2<f64>, k: usize) -> Result<Array2<f64>> {
    PcaBuilder::new(SymmetricEigenSolver)
        .n_components(k)
        .build()
        .fit_transform(data)
}

/// Unbiased covariance of already centred data. A single sample has zero
/// covariance.
fn covariance(centered: ArrayView2<f64>) -> Array2<f64> {
    let n_samples = centered.nrows();
    let n_features = centered.ncols();
    if n_samples < 2 {
        return Array2::zeros((n_features, n_features));
    }
    centered.t().dot(&centered) / (n_samples as f64 - 1.0)
}

/// Indices of `values` from largest to smallest. NaN sorts last; the sort is
/// stable so ties keep their input order.
pub(crate) fn descending_order(values: ArrayView1<f64>) -> Vec<usize> {
    let rank = |v: f64| if v.is_nan() { f64::NEG_INFINITY } else { v };
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        rank(values[b])
            .partial_cmp(&rank(values[a]))
            .unwrap_or(Ordering::Equal)
    });
    order
}
