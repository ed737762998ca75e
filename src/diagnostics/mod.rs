//! Failure diagnostics for screen expectations
//!
//! Writes the search template, the captured screen, the list of found boxes
//! and a highlight overlay into a timestamped report directory.

pub mod overlay;
pub mod writer;

pub use overlay::{HIGHLIGHT, compose_overlay};
pub use writer::{
    COORD_LIST_FILE, DiagnosticsWriter, FOUND_IMAGE_FILE, SCREEN_IMAGE_FILE, TEMPLATE_IMAGE_FILE,
    report_dir_name, sanitize,
};
