//! Configuration for screen matching operations

use crate::error::{MatchError, MatchResult};
use std::path::{Path, PathBuf};

/// Default directory receiving failure reports, relative to the working directory
pub const DEFAULT_REPORT_ROOT: &str = "vncmatch_fails";

pub const ENV_REPORT_DIR: &str = "VNCMATCH_REPORT_DIR";
pub const ENV_THRESHOLD: &str = "VNCMATCH_THRESHOLD";
pub const ENV_IMAGES_DIR: &str = "VNCMATCH_IMAGES_DIR";

#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// A position is a hit if its squared difference sum is at most
    /// `threshold_factor * template_width * template_height`
    pub threshold_factor: f64,
    /// Sleep between polls as a fraction of the total timeout
    pub poll_fraction: f64,
    /// Directory under which failure reports are created
    pub report_root: PathBuf,
    /// Base directory for relative template paths (`None` = working directory)
    pub images_dir: Option<PathBuf>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold_factor: 0.5,
            poll_fraction: 0.1,
            report_root: PathBuf::from(DEFAULT_REPORT_ROOT),
            images_dir: None,
        }
    }
}

impl MatchConfig {
    /// Configuration for a test suite that keeps its templates under `images/`
    pub fn with_images_dir(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: Some(images_dir.into()),
            ..Self::default()
        }
    }

    /// Default configuration with `VNCMATCH_*` environment overrides applied
    pub fn from_env() -> MatchResult<Self> {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment or otherwise)
    pub fn apply_overrides<F>(mut self, lookup: F) -> MatchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_REPORT_DIR).filter(|v| !v.is_empty()) {
            self.report_root = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_IMAGES_DIR).filter(|v| !v.is_empty()) {
            self.images_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup(ENV_THRESHOLD) {
            self.threshold_factor = match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => v,
                _ => {
                    return Err(MatchError::InvalidConfig {
                        key: ENV_THRESHOLD,
                        value: raw,
                    });
                }
            };
        }
        Ok(self)
    }

    /// Resolve a template path against `images_dir`
    pub fn template_path(&self, path: &Path) -> PathBuf {
        match &self.images_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
