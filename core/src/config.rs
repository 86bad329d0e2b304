use crate::error::ConfigError;
use crate::snippet::DEFAULT_WINDOW;
use crate::svm::SvmConfig;
use crate::vector_space::TfIdfConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Tunables for the engine. Every field has a default, so a partial JSON file is fine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Characters of context either side of a snippet match.
    pub snippet_window: usize,
    pub tfidf: TfIdfConfig,
    pub svm: SvmConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { snippet_window: DEFAULT_WINDOW, tfidf: TfIdfConfig::default(), svm: SvmConfig::default() }
    }
}

impl EngineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let config: EngineConfig = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate().with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that would train a meaningless classifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let svm = &self.svm;
        if !(svm.c.is_finite() && svm.c > 0.0) {
            return Err(ConfigError::OutOfRange { field: "svm.c", expected: "finite and positive", value: svm.c });
        }
        if svm.max_iter == 0 {
            return Err(ConfigError::OutOfRange { field: "svm.max_iter", expected: "at least 1", value: 0.0 });
        }
        if !(svm.tol.is_finite() && svm.tol >= 0.0) {
            return Err(ConfigError::OutOfRange { field: "svm.tol", expected: "finite and non-negative", value: svm.tol });
        }
        if !(svm.intercept_scaling.is_finite() && svm.intercept_scaling > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "svm.intercept_scaling",
                expected: "finite and positive",
                value: svm.intercept_scaling,
            });
        }
        Ok(())
    }
}
