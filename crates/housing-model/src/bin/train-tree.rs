//! Train a decision tree on the Boston housing dataset and print its test MSE.

use anyhow::Result;
use clap::Parser;
use housing_model::cli::{run_training, TrainArgs};
use housing_model::DecisionTreeRegressor;

/// Fit a fully grown regression tree and report held-out mean-squared error.
#[derive(Parser, Debug)]
#[command(name = "train-tree", version)]
struct Cli {
    #[command(flatten)]
    args: TrainArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut model = DecisionTreeRegressor::new();
    run_training(&mut model, &cli.args)
}
