//! # Dimensionality Reduction
//!
//! Reducers that map an N×D sample matrix to an N×k matrix while keeping row
//! order, so that row `i` of every result still belongs to sample `i`.
//!
//! ## Available Methods
//! - **Covariance PCA** ([`pca::Pca`], [`pca::reduce`]): eigendecomposition of the
//!   sample covariance matrix, components ordered by descending variance
//! - **SVD PCA** ([`pca::svd::SvdPca`]): thin SVD of the centred data, an independent
//!   route to the same subspace with its own sign convention
//! - **t-SNE** (`tsne::Tsne`, feature `tsne`): non-linear embedding through the
//!   `bhtsne` crate
//!
//! Eigenvectors are only defined up to sign, so the two PCA routes can disagree
//! per component. Use [`crate::align`] before comparing them.

use ndarray::{Array2, ArrayView2};

use crate::error::Result;

pub mod pca;
#[cfg(feature = "tsne")]
pub mod tsne;

/// Call/result contract shared by every reducer.
pub trait Reduction {
    /// Human readable name used in logs and the runtime file.
    fn name(&self) -> &str;

    /// Fits the reducer to `x` and returns the N×k embedding of the same rows.
    fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>>;
}
