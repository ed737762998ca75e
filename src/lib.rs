//! Find reference images on a remote-desktop screen and assert on them in UI tests.
//!
//! A [`ScreenMatch`] captures frames from a [`FrameSource`], searches a template
//! in them with [`TemplateMatcher`], and on a failed expectation writes a report
//! through [`DiagnosticsWriter`].

pub mod args;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod remote;
pub mod screen_match;
pub mod template_matching;

pub use config::MatchConfig;
pub use diagnostics::DiagnosticsWriter;
pub use error::{MatchError, MatchResult, RemoteError};
pub use remote::{FileFrameSource, FrameSource, PointerInput};
pub use screen_match::{ScreenMatch, load_template};
pub use template_matching::{BoundingBox, FindResult, TemplateMatcher};
