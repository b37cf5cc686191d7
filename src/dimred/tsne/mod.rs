// Barnes-Hut t-SNE through the bhtsne crate. The embedding is randomly
// initialised, so results differ between runs.

use ndarray::{Array2, ArrayView2};

use crate::config::TsneConfig;
use crate::dimred::Reduction;
use crate::error::{ReduceError, Result};
use crate::utils::check_not_empty;

pub struct Tsne {
    config: TsneConfig,
}

impl Tsne {
    pub fn new(config: TsneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TsneConfig {
        &self.config
    }

    fn validate(&self, n_obs: usize, n_dim: usize) -> Result<()> {
        if n_dim == 0 {
            return Err(ReduceError::InvalidShape(
                "input matrix has no columns".to_string(),
            ));
        }
        if self.config.output_dim == 0 {
            return Err(ReduceError::InvalidParameter(
                "output dimension must be at least 1".to_string(),
            ));
        }
        if self.config.epochs == 0 {
            return Err(ReduceError::InvalidParameter(
                "epochs must be at least 1".to_string(),
            ));
        }
        if !(self.config.perplexity > 0.0) {
            return Err(ReduceError::InvalidParameter(format!(
                "perplexity must be positive, got {}",
                self.config.perplexity
            )));
        }
        if !(self.config.theta > 0.0) {
            return Err(ReduceError::InvalidParameter(format!(
                "theta must be positive, got {}",
                self.config.theta
            )));
        }
        if (n_obs as f64 - 1.0) < 3.0 * self.config.perplexity {
            return Err(ReduceError::InvalidParameter(format!(
                "perplexity {} is too large for {} samples",
                self.config.perplexity, n_obs
            )));
        }
        Ok(())
    }
}

impl Reduction for Tsne {
    fn name(&self) -> &str {
        "t-SNE"
    }

    fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        check_not_empty(x)?;
        let (n_obs, n_dim) = x.dim();
        self.validate(n_obs, n_dim)?;

        let x = x.as_standard_layout();
        let x_slice = x.as_slice().ok_or_else(|| {
            ReduceError::InvalidShape("input matrix is not contiguous".to_string())
        })?;
        let samples: Vec<&[f64]> = x_slice.chunks(n_dim).collect();

        let mut tsne = bhtsne::tSNE::new(&samples);
        tsne.embedding_dim(self.config.output_dim)
            .perplexity(self.config.perplexity)
            .epochs(self.config.epochs)
            .barnes_hut(self.config.theta, |sample_a, sample_b| {
                sample_a
                    .iter()
                    .zip(sample_b.iter())
                    .map(|(&a, &b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            });
        let embedding = tsne.embedding();

        Array2::from_shape_vec((n_obs, self.config.output_dim as usize), embedding)
            .map_err(|e| ReduceError::InvalidShape(e.to_string()))
    }
}
