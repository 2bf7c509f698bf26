//! # housing-model
//!
//! Train and evaluate regressors on the Boston housing dataset.
//!
//! ## Pipeline Overview
//!
//! ```text
//! StatLib text file
//!  │
//!  ├─ 1. Load     download + parse the two-line record format
//!  ├─ 2. Split    features / MEDV target, then seeded train/test permutation
//!  ├─ 3. Scale    StandardScaler fitted on training rows only
//!  ├─ 4. Fit      DecisionTreeRegressor or KernelRidge (any `Regressor`)
//!  └─ 5. Score    test-set MSE, optionally k-fold cross-validation
//! ```
//!
//! Everything runs synchronously on the calling thread and every failure is
//! fatal: there is no retry and no partial report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use housing_model::{run_pipeline, DecisionTreeRegressor, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let mut model = DecisionTreeRegressor::new();
//! let report = run_pipeline(&mut model, &config)?;
//! println!("{} MSE: {:.4}", report.model_name, report.test_mse);
//! # Ok::<(), housing_model::ModelError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `train-tree` and `train-kernel-ridge` binaries |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod cross_validation;
pub mod dataset;
pub mod error;
pub mod kernel_ridge;
pub mod linalg;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod preprocessing;
pub mod tree;

#[cfg(feature = "cli")]
pub mod cli;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use cross_validation::{cross_val_score_avg, evaluate_model, CrossValScore, Fold, KFold};
pub use dataset::{load_data, parse_boston, split_features_target, split_features_target_by, Dataset};
pub use error::ModelError;
pub use kernel_ridge::{Kernel, KernelRidge};
pub use metrics::Scorer;
pub use model::Regressor;
pub use pipeline::{run_on_dataset, run_pipeline, PipelineReport};
pub use preprocessing::{scale_data, train_test_split_data, ScaledData, StandardScaler, TrainTestSplit};
pub use tree::DecisionTreeRegressor;
