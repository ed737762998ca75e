use std::path::PathBuf;
use thiserror::Error;

/// Error raised by the remote-desktop collaborators ([`FrameSource`](crate::remote::FrameSource),
/// [`PointerInput`](crate::remote::PointerInput)). Kept opaque so backends can
/// surface their own errors unchanged.
pub type RemoteError = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for screen matching operations.
pub type MatchResult<T> = Result<T, MatchError>;

/// The error type for all screen matching operations.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("image file {path:?} is missing")]
    TemplateMissing { path: PathBuf },

    #[error("Failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Screen capture failed: {0}")]
    Capture(RemoteError),

    #[error("Pointer input failed: {0}")]
    Input(RemoteError),

    #[error("Failed to write report artifact {path:?}: {source}")]
    ReportIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode report image {path:?}: {source}")]
    ReportImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to serialize coordinate list {path:?}: {source}")]
    ReportJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },

    /// Terminal assertion failure. The report directory holds the artifacts of
    /// the last search attempt.
    #[error("{message}, see {}", .report_dir.display())]
    TestFailed { message: String, report_dir: PathBuf },
}

impl MatchError {
    /// Check if this error is an assertion failure (as opposed to an infrastructure error)
    pub fn is_test_failure(&self) -> bool {
        matches!(self, MatchError::TestFailed { .. })
    }

    /// Report directory of a failed expectation, if any
    pub fn report_dir(&self) -> Option<&std::path::Path> {
        match self {
            MatchError::TestFailed { report_dir, .. } => Some(report_dir.as_path()),
            _ => None,
        }
    }
}
