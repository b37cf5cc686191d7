//! # Workflows
//!
//! Loads the stored sentence vectors, runs the reducers through the
//! [`Reduction`] contract, records each runtime and persists the results.
//! Row order is preserved from the input file to every output file.

use anyhow::Context;
use log::info;
use ndarray::{Array2, ArrayView2};
use std::path::Path;

use crate::align::align;
use crate::config::PipelineConfig;
use crate::dimred::pca::svd::SvdPca;
use crate::dimred::pca::{PcaBuilder, SymmetricEigenSolver};
use crate::dimred::Reduction;
use crate::io::{load_vectors, save_vectors, unique_categories};
use crate::timing::{time, RuntimeLog};
use crate::utils::column_variances;

/// Results of the PCA workflow, both with rows in input order.
#[derive(Debug)]
pub struct PcaReport {
    pub categories: Vec<String>,
    pub eigen: Array2<f64>,
    /// SVD result after sign alignment to `eigen`.
    pub svd_aligned: Array2<f64>,
}

pub fn run_pca(config: &PipelineConfig) -> anyhow::Result<PcaReport> {
    info!("Running PCA");
    let (vectors, categories) = load_input(config)?;
    let runtime = RuntimeLog::new(config.runtime_path());
    let k = config.reduction.n_components;
    let precision = config.reduction.precision;

    let mut eigen_pca = PcaBuilder::new(SymmetricEigenSolver).n_components(k).build();
    let eigen = run_timed(&mut eigen_pca, vectors.view(), &runtime)?;
    info!(
        "Component variances: {:.6}",
        column_variances(eigen.view())
    );
    persist(&config.pca_eigen_vectors_path(), &categories, eigen.view(), precision)?;

    let mut svd_pca = SvdPca::new(k);
    let svd = run_timed(&mut svd_pca, vectors.view(), &runtime)?;

    info!("Aligning SVD components to the covariance PCA result");
    let svd_aligned = align(eigen.view(), svd.view()).context("Failed to align PCA results")?;
    persist(&config.pca_svd_vectors_path(), &categories, svd_aligned.view(), precision)?;

    info!("PCA complete");
    Ok(PcaReport {
        categories,
        eigen,
        svd_aligned,
    })
}

#[cfg(feature = "tsne")]
pub fn run_tsne(config: &PipelineConfig) -> anyhow::Result<Array2<f64>> {
    use crate::dimred::tsne::Tsne;

    info!("Running t-SNE");
    let (vectors, categories) = load_input(config)?;
    let runtime = RuntimeLog::new(config.runtime_path());

    let mut tsne = Tsne::new(config.tsne);
    let embedding = run_timed(&mut tsne, vectors.view(), &runtime)?;
    persist(
        &config.tsne_vectors_path(),
        &categories,
        embedding.view(),
        config.reduction.precision,
    )?;

    info!("t-SNE complete");
    Ok(embedding)
}

/// Starts a fresh runtime log, then runs every workflow.
pub fn run_all(config: &PipelineConfig) -> anyhow::Result<()> {
    init_runtime_log(config)?;
    run_pca(config)?;
    #[cfg(feature = "tsne")]
    run_tsne(config)?;
    Ok(())
}

pub fn init_runtime_log(config: &PipelineConfig) -> anyhow::Result<()> {
    let runtime = RuntimeLog::new(config.runtime_path());
    runtime
        .initialize()
        .with_context(|| format!("Failed to initialise {}", runtime.path().display()))?;
    info!("Runtime log: {}", runtime.path().display());
    Ok(())
}

fn load_input(config: &PipelineConfig) -> anyhow::Result<(Array2<f64>, Vec<String>)> {
    let path = config.vectors_path();
    info!("Loading vectors from: {}", path.display());
    let (vectors, categories) = load_vectors(&path)
        .with_context(|| format!("Failed to load vectors from {}", path.display()))?;
    info!(
        "Loaded {} vectors of dimension {} from {} categories",
        vectors.nrows(),
        vectors.ncols(),
        unique_categories(&categories).len()
    );
    Ok((vectors, categories))
}

fn run_timed<R: Reduction>(
    reducer: &mut R,
    vectors: ArrayView2<f64>,
    runtime: &RuntimeLog,
) -> anyhow::Result<Array2<f64>> {
    let name = reducer.name().to_string();
    info!("Running {}", name);
    let (result, elapsed) = time(|| reducer.fit_transform(vectors));
    let result = result.with_context(|| format!("{} failed", name))?;
    runtime
        .record(&name, elapsed)
        .with_context(|| format!("Failed to write {}", runtime.path().display()))?;
    Ok(result)
}

fn persist(
    path: &Path,
    categories: &[String],
    vectors: ArrayView2<f64>,
    precision: usize,
) -> anyhow::Result<()> {
    save_vectors(path, categories, vectors, precision)
        .with_context(|| format!("Failed to save vectors to {}", path.display()))?;
    info!("Vectors saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReductionConfig;
    use crate::similarity::{PearsonSimilarity, SimilarityMeasure};
    use crate::utils::{column_variances, random_matrix};

    fn write_input(dir: &Path, rows: usize, cols: usize) -> PipelineConfig {
        let config = PipelineConfig::new(dir);
        let vectors = random_matrix(rows, cols, 77);
        let categories: Vec<String> = (0..rows).map(|i| format!("cat{}", i % 3)).collect();
        save_vectors(config.vectors_path(), &categories, vectors.view(), 6).unwrap();
        config
    }

    #[test]
    fn test_run_pca_writes_aligned_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_input(dir.path(), 24, 8);
        init_runtime_log(&config).unwrap();

        let report = run_pca(&config).unwrap();
        assert_eq!(report.eigen.shape(), &[24, 3]);
        assert_eq!(report.svd_aligned.shape(), &[24, 3]);
        assert_eq!(report.categories.len(), 24);
        assert_eq!(report.categories[4], "cat1");

        let variances = column_variances(report.eigen.view());
        assert!(variances[0] + 1e-9 >= variances[1] && variances[1] + 1e-9 >= variances[2]);

        for j in 0..3 {
            let r = PearsonSimilarity
                .calculate(report.eigen.column(j), report.svd_aligned.column(j))
                .unwrap();
            assert!(r > 0.99, "component {j} correlation {r}");
        }

        let (eigen, categories) = load_vectors(config.pca_eigen_vectors_path()).unwrap();
        assert_eq!(categories, report.categories);
        assert_eq!(eigen.shape(), &[24, 3]);
        let (svd, _) = load_vectors(config.pca_svd_vectors_path()).unwrap();
        assert_eq!(svd.shape(), &[24, 3]);

        let runtime = std::fs::read_to_string(config.runtime_path()).unwrap();
        assert!(runtime.contains("PCA (covariance eigendecomposition)"));
        assert!(runtime.contains("PCA (SVD)"));
    }

    #[test]
    fn test_run_pca_respects_component_count() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_input(dir.path(), 10, 5)
            .reduction(ReductionConfig::default().n_components(2).precision(3));

        let report = run_pca(&config).unwrap();
        assert_eq!(report.eigen.shape(), &[10, 2]);

        let text = std::fs::read_to_string(config.pca_eigen_vectors_path()).unwrap();
        let first = text.lines().next().unwrap();
        let value = first.split(": [").nth(1).unwrap().split(", ").next().unwrap();
        assert_eq!(value.split('.').nth(1).unwrap().len(), 3);
    }

    #[test]
    fn test_run_pca_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(dir.path());
        assert!(run_pca(&config).is_err());
    }

    #[test]
    fn test_run_pca_too_few_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_input(dir.path(), 10, 2);
        let err = run_pca(&config).unwrap_err();
        assert!(matches!(
            err.root_cause().downcast_ref::<crate::ReduceError>(),
            Some(crate::ReduceError::Dimension { .. })
        ));
    }
}
