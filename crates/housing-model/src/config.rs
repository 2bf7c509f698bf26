//! Configuration for a training run.
//!
//! All knobs live in [`PipelineConfig`], built via [`PipelineConfigBuilder`]
//! so callers set only what they care about and rely on the defaults for the
//! rest.

use crate::dataset::BOSTON_DATA_URL;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::pipeline::run_pipeline`].
///
/// # Example
/// ```rust
/// use housing_model::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .seed(7)
///     .test_size(0.25)
///     .cv_folds(5)
///     .build()
///     .unwrap();
/// assert_eq!(config.cv_folds, Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Where the raw dataset is downloaded from.
    pub dataset_url: String,

    /// HTTP timeout for the dataset download, in seconds. Default: 60.
    pub download_timeout_secs: u64,

    /// Fraction of rows held out for testing, in (0, 1). Default: 0.2.
    pub test_size: f64,

    /// Seed for the train/test permutation and fold shuffling. Default: 42.
    pub seed: u64,

    /// Run k-fold cross-validation on the training rows when set.
    pub cv_folds: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_url: BOSTON_DATA_URL.to_string(),
            download_timeout_secs: 60,
            test_size: 0.2,
            seed: 42,
            cv_folds: None,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn dataset_url(mut self, url: impl Into<String>) -> Self {
        self.config.dataset_url = url.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn test_size(mut self, ratio: f64) -> Self {
        self.config.test_size = ratio;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn cv_folds(mut self, folds: usize) -> Self {
        self.config.cv_folds = Some(folds);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, ModelError> {
        let c = &self.config;
        if !(c.test_size > 0.0 && c.test_size < 1.0) {
            return Err(ModelError::InvalidConfig(format!(
                "test_size must be in (0, 1), got {}",
                c.test_size
            )));
        }
        if c.download_timeout_secs == 0 {
            return Err(ModelError::InvalidConfig(
                "download timeout must be at least 1s".into(),
            ));
        }
        if matches!(c.cv_folds, Some(k) if k < 2) {
            return Err(ModelError::InvalidConfig(
                "cross-validation needs at least 2 folds".into(),
            ));
        }
        if !(c.dataset_url.starts_with("http://") || c.dataset_url.starts_with("https://")) {
            return Err(ModelError::InvalidConfig(format!(
                "dataset URL must be http(s), got '{}'",
                c.dataset_url
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let c = PipelineConfig::default();
        assert_eq!(c.seed, 42);
        assert_eq!(c.test_size, 0.2);
        assert_eq!(c.dataset_url, BOSTON_DATA_URL);
        assert!(c.cv_folds.is_none());
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(PipelineConfig::builder().test_size(1.5).build().is_err());
        assert!(PipelineConfig::builder().cv_folds(1).build().is_err());
        assert!(PipelineConfig::builder()
            .download_timeout_secs(0)
            .build()
            .is_err());
        assert!(PipelineConfig::builder()
            .dataset_url("ftp://example.com/boston")
            .build()
            .is_err());
    }

    #[test]
    fn builder_sets_fields() {
        let c = PipelineConfig::builder()
            .seed(3)
            .test_size(0.5)
            .dataset_url("https://example.com/boston")
            .build()
            .unwrap();
        assert_eq!(c.seed, 3);
        assert_eq!(c.test_size, 0.5);
        assert_eq!(c.dataset_url, "https://example.com/boston");
    }
}
