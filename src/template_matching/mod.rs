/// Template matching module for locating reference images in screen captures
///
/// This module provides:
/// - Exact-integer squared-difference scoring with early exit
/// - Thresholding into a frame-sized hit mask
/// - Clustering of adjacent hits into one box per on-screen instance
pub mod matcher;
pub mod types;


pub use matcher::{TemplateMatcher, footprint_mask, resolve_boxes};
pub use types::{BoundingBox, FindResult, RawHit};
