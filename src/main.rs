use std::path::PathBuf;

use anyhow::bail;
use clap::{CommandFactory, Parser};
use log::info;

use dimred_viz::config::{PipelineConfig, ReductionConfig, TsneConfig};
use dimred_viz::pipeline;

#[derive(Parser, Debug)]
#[command(name = "dimred-viz")]
#[command(about = "Dimension reduction for sentence vectors (PCA and t-SNE)")]
#[command(version)]
struct Args {
    /// Run both PCA implementations and align them
    #[arg(long)]
    pca: bool,

    /// Run t-SNE
    #[arg(long)]
    tsne: bool,

    /// Run every step
    #[arg(long)]
    all: bool,

    /// Directory for inputs, reduced vectors and the runtime log
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Input vectors file (default: <output-dir>/vectors.txt)
    #[arg(long)]
    vectors: Option<PathBuf>,

    /// Number of output components for PCA
    #[arg(long, default_value_t = 3)]
    components: usize,

    /// t-SNE perplexity
    #[arg(long, default_value_t = 10.0)]
    perplexity: f64,

    /// t-SNE iterations
    #[arg(long, default_value_t = 1000)]
    epochs: usize,
}

impl Args {
    fn runs_tsne(&self) -> bool {
        self.tsne || self.all
    }

    fn to_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut tsne = TsneConfig::default()
            .perplexity(self.perplexity)
            .epochs(self.epochs);
        // t-SNE stores its output dimension as u8; PCA has no such limit.
        if self.runs_tsne() {
            let Ok(output_dim) = u8::try_from(self.components) else {
                bail!("--components must be at most {} for t-SNE", u8::MAX);
            };
            tsne = tsne.output_dim(output_dim);
        }

        let mut config = PipelineConfig::new(&self.output_dir)
            .reduction(ReductionConfig::default().n_components(self.components))
            .tsne(tsne);
        if let Some(vectors) = &self.vectors {
            config = config.vectors_file(vectors);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if !(args.pca || args.tsne || args.all) {
        Args::command().print_help()?;
        return Ok(());
    }

    let config = args.to_config()?;
    info!("Output directory: {}", config.output_dir.display());

    if args.all {
        return pipeline::run_all(&config);
    }

    if args.pca {
        pipeline::run_pca(&config)?;
    }
    if args.runs_tsne() {
        run_tsne(&config)?;
    }
    Ok(())
}

#[cfg(feature = "tsne")]
fn run_tsne(config: &PipelineConfig) -> anyhow::Result<()> {
    pipeline::run_tsne(config).map(|_| ())
}

#[cfg(not(feature = "tsne"))]
fn run_tsne(_config: &PipelineConfig) -> anyhow::Result<()> {
    bail!("t-SNE support was not compiled in; rebuild with the `tsne` feature")
}
