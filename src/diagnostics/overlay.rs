//! "Found" overlay: darkened screen with every detected footprint highlighted

use crate::template_matching::footprint_mask;
use image::{GrayImage, RgbImage};

/// Added to every channel inside a footprint
pub const HIGHLIGHT: u8 = 128;

/// Compose `frame / 2 + HIGHLIGHT * footprints`, where the footprints are the
/// template-sized rectangles at every raw hit of `mask`.
///
/// `mask` must have the frame's dimensions.
pub fn compose_overlay(frame: &RgbImage, mask: &GrayImage, template_size: (u32, u32)) -> RgbImage {
    let footprints = footprint_mask(mask, template_size);

    let mut found = frame.clone();
    for (x, y, pixel) in found.enumerate_pixels_mut() {
        let lit = footprints.get_pixel(x, y)[0] != 0;
        for c in pixel.0.iter_mut() {
            // 127 + 128 cannot overflow
            *c = *c / 2 + if lit { HIGHLIGHT } else { 0 };
        }
    }
    found
}
