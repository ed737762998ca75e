//! Report directory writer for failed expectations

use super::overlay::compose_overlay;
use crate::config::MatchConfig;
use crate::error::{MatchError, MatchResult};
use crate::template_matching::FindResult;
use chrono::{Local, NaiveDateTime};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

pub const TEMPLATE_IMAGE_FILE: &str = "img.png";
pub const SCREEN_IMAGE_FILE: &str = "screen.png";
pub const COORD_LIST_FILE: &str = "coord_list.json";
pub const FOUND_IMAGE_FILE: &str = "found.png";

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Replace every non-alphanumeric character with `_`
pub fn sanitize(message: &str) -> String {
    message
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// `<sanitized message>_<YYYYMMDD-HHMMSS>`
pub fn report_dir_name(message: &str, timestamp: NaiveDateTime) -> String {
    format!("{}_{}", sanitize(message), timestamp.format(TIMESTAMP_FORMAT))
}

/// Persists the artifacts of a failed search below a report root.
///
/// Reports are never cleaned up. Two failures with the same message within
/// the same second share a directory; the later one overwrites.
#[derive(Debug, Clone)]
pub struct DiagnosticsWriter {
    report_root: PathBuf,
}

impl DiagnosticsWriter {
    pub fn new(report_root: impl Into<PathBuf>) -> Self {
        Self {
            report_root: report_root.into(),
        }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.report_root.clone())
    }

    pub fn report_root(&self) -> &Path {
        &self.report_root
    }

    /// Write the report and turn it into a [`MatchError::TestFailed`].
    ///
    /// If the report itself cannot be written, that error is returned instead.
    pub fn fail(&self, message: &str, result: &FindResult) -> MatchError {
        match self.write_report(message, result) {
            Ok(report_dir) => {
                log::warn!("❌ {}, see {}", message, report_dir.display());
                MatchError::TestFailed {
                    message: message.to_string(),
                    report_dir,
                }
            }
            Err(e) => {
                log::error!("Failed to write report for '{}': {}", message, e);
                e
            }
        }
    }

    /// Write the report into a new directory named after `message` and the
    /// current local time. Returns the directory path.
    pub fn write_report(&self, message: &str, result: &FindResult) -> MatchResult<PathBuf> {
        self.write_report_at(message, result, Local::now().naive_local())
    }

    pub(crate) fn write_report_at(
        &self,
        message: &str,
        result: &FindResult,
        timestamp: NaiveDateTime,
    ) -> MatchResult<PathBuf> {
        let dir = self.report_root.join(report_dir_name(message, timestamp));
        fs::create_dir_all(&dir).map_err(|source| MatchError::ReportIo {
            path: dir.clone(),
            source,
        })?;

        write_image(&dir.join(TEMPLATE_IMAGE_FILE), result.template())?;
        write_image(&dir.join(SCREEN_IMAGE_FILE), Some(result.frame()))?;

        let coord_path = dir.join(COORD_LIST_FILE);
        let json = serde_json::to_string_pretty(result.boxes()).map_err(|source| {
            MatchError::ReportJson {
                path: coord_path.clone(),
                source,
            }
        })?;
        fs::write(&coord_path, json).map_err(|source| MatchError::ReportIo {
            path: coord_path.clone(),
            source,
        })?;

        let found = match (result.template(), result.mask()) {
            (Some(template), Some(mask)) => {
                Some(compose_overlay(result.frame(), mask, template.dimensions()))
            }
            _ => None,
        };
        write_image(&dir.join(FOUND_IMAGE_FILE), found.as_ref())?;

        log::debug!(
            "📁 Report written to {} ({} boxes)",
            dir.display(),
            result.boxes().len()
        );
        Ok(dir)
    }
}

/// Write `image` to `path`, or delete a stale file there when there is no image
fn write_image(path: &Path, image: Option<&RgbImage>) -> MatchResult<()> {
    match image {
        Some(img) => img.save(path).map_err(|source| MatchError::ReportImage {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            if path.exists() {
                fs::remove_file(path).map_err(|source| MatchError::ReportIo {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
            Ok(())
        }
    }
}
