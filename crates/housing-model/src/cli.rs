//! Shared command-line surface of the training binaries.
//!
//! Both binaries take the same optional flags and print the same report
//! shape; only the model differs. Logs go to stderr so stdout carries
//! nothing but the result lines.

use crate::config::PipelineConfig;
use crate::dataset::BOSTON_DATA_URL;
use crate::model::Regressor;
use crate::pipeline::run_pipeline;
use anyhow::{Context, Result};
use clap::Args;
use std::io;
use tracing_subscriber::EnvFilter;

/// Flags shared by `train-tree` and `train-kernel-ridge`. All are optional.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Seed for the train/test split and fold shuffling.
    #[arg(long, env = "HOUSING_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Fraction of rows held out for testing.
    #[arg(long, env = "HOUSING_TEST_SIZE", default_value_t = 0.2)]
    pub test_size: f64,

    /// Also report k-fold cross-validated MSE on the training rows.
    #[arg(long, env = "HOUSING_CV_FOLDS")]
    pub cv_folds: Option<usize>,

    /// Dataset URL.
    #[arg(long, env = "HOUSING_DATA_URL", default_value = BOSTON_DATA_URL)]
    pub data_url: String,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "HOUSING_DOWNLOAD_TIMEOUT", default_value_t = 60)]
    pub download_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "HOUSING_VERBOSE")]
    pub verbose: bool,
}

impl TrainArgs {
    /// Map flags to a validated [`PipelineConfig`].
    pub fn to_config(&self) -> Result<PipelineConfig> {
        let mut builder = PipelineConfig::builder()
            .seed(self.seed)
            .test_size(self.test_size)
            .dataset_url(self.data_url.clone())
            .download_timeout_secs(self.download_timeout);
        if let Some(k) = self.cv_folds {
            builder = builder.cv_folds(k);
        }
        builder.build().context("Invalid configuration")
    }
}

/// Install a stderr subscriber; `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Run the pipeline for `model` and print the report lines.
pub fn run_training<M>(model: &mut M, args: &TrainArgs) -> Result<()>
where
    M: Regressor + ?Sized,
{
    init_tracing(args.verbose);
    let config = args.to_config()?;

    let report = run_pipeline(model, &config).context("Training run failed")?;

    println!("{} MSE: {:.4}", report.model_name, report.test_mse);
    if let Some(cv) = &report.cross_validation {
        println!(
            "{} CV MSE: {:.4} over {} folds",
            report.model_name,
            cv.mean,
            cv.scores.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: TrainArgs,
    }

    #[test]
    fn no_arguments_gives_reference_config() {
        let h = Harness::try_parse_from(["train"]).unwrap();
        let config = h.args.to_config().unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.dataset_url, BOSTON_DATA_URL);
        assert!(config.cv_folds.is_none());
    }

    #[test]
    fn cv_flag_is_validated() {
        let h = Harness::try_parse_from(["train", "--cv-folds", "1"]).unwrap();
        assert!(h.args.to_config().is_err());
    }
}
