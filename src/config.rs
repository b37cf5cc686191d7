//! # Configuration
//!
//! Explicit configuration values for the reducers, the vector store and the
//! pipeline. Every routine receives what it needs through these structs instead
//! of reading shared constants.

use std::path::{Path, PathBuf};

/// Parameters shared by the linear reducers and the vector store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionConfig {
    /// Target dimensionality `k`.
    pub n_components: usize,
    /// Digits after the decimal point when vectors are written to disk.
    pub precision: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            n_components: 3,
            precision: 6,
        }
    }
}

impl ReductionConfig {
    pub fn n_components(mut self, n_components: usize) -> Self {
        self.n_components = n_components;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

/// t-SNE parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsneConfig {
    pub output_dim: u8,
    pub perplexity: f64,
    pub epochs: usize,
    /// Barnes-Hut accuracy/speed trade-off.
    pub theta: f64,
}

impl Default for TsneConfig {
    fn default() -> Self {
        Self {
            output_dim: 3,
            perplexity: 10.0,
            epochs: 1000,
            theta: 0.5,
        }
    }
}

impl TsneConfig {
    pub fn output_dim(mut self, output_dim: u8) -> Self {
        self.output_dim = output_dim;
        self
    }

    pub fn perplexity(mut self, perplexity: f64) -> Self {
        self.perplexity = perplexity;
        self
    }

    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }
}

/// File layout and parameters for the PCA and t-SNE workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    /// Input vectors. Relative paths are resolved against `output_dir`.
    pub vectors_file: PathBuf,
    pub pca_eigen_vectors_file: PathBuf,
    pub pca_svd_vectors_file: PathBuf,
    pub tsne_vectors_file: PathBuf,
    pub runtime_file: PathBuf,
    pub reduction: ReductionConfig,
    pub tsne: TsneConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new("output")
    }
}

impl PipelineConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            vectors_file: PathBuf::from("vectors.txt"),
            pca_eigen_vectors_file: PathBuf::from("PCA_numpy_vectors.txt"),
            pca_svd_vectors_file: PathBuf::from("PCA_sklearn_vectors.txt"),
            tsne_vectors_file: PathBuf::from("Tsne_vectors.txt"),
            runtime_file: PathBuf::from("runtime.txt"),
            reduction: ReductionConfig::default(),
            tsne: TsneConfig::default(),
        }
    }

    pub fn vectors_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectors_file = path.into();
        self
    }

    pub fn reduction(mut self, reduction: ReductionConfig) -> Self {
        self.reduction = reduction;
        self
    }

    pub fn tsne(mut self, tsne: TsneConfig) -> Self {
        self.tsne = tsne;
        self
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.output_dir.join(file)
        }
    }

    pub fn vectors_path(&self) -> PathBuf {
        self.resolve(&self.vectors_file)
    }

    pub fn pca_eigen_vectors_path(&self) -> PathBuf {
        self.resolve(&self.pca_eigen_vectors_file)
    }

    pub fn pca_svd_vectors_path(&self) -> PathBuf {
        self.resolve(&self.pca_svd_vectors_file)
    }

    pub fn tsne_vectors_path(&self) -> PathBuf {
        self.resolve(&self.tsne_vectors_file)
    }

    pub fn runtime_path(&self) -> PathBuf {
        self.resolve(&self.runtime_file)
    }
}
