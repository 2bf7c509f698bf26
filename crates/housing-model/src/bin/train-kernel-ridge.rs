//! Train an RBF kernel ridge model on the Boston housing dataset and print
//! its test MSE.

use anyhow::{Context, Result};
use clap::Parser;
use housing_model::cli::{run_training, TrainArgs};
use housing_model::{Kernel, KernelRidge};

/// Fit kernel ridge regression and report held-out mean-squared error.
#[derive(Parser, Debug)]
#[command(name = "train-kernel-ridge", version)]
struct Cli {
    #[command(flatten)]
    args: TrainArgs,

    /// Regularisation strength.
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,

    /// RBF kernel width; defaults to 1 / number of features.
    #[arg(long)]
    gamma: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut model = KernelRidge::new(cli.alpha, Kernel::Rbf { gamma: cli.gamma })
        .context("Invalid model parameters")?;
    run_training(&mut model, &cli.args)
}
