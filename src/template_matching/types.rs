/// Template matching data types
use image::{GrayImage, RgbImage};
use serde::Serialize;

/// A single alignment passing the similarity threshold, before clustering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawHit {
    /// X coordinate of the template's top-left corner in the frame
    pub x: u32,
    /// Y coordinate of the template's top-left corner in the frame
    pub y: u32,
    /// Sum of squared per-channel differences (0 = identical)
    pub score: u64,
}

/// One deduplicated, template-sized detection.
///
/// Coordinates are inclusive: `right - left + 1` is the template width and
/// `bottom - top + 1` the template height. Serializes as `[left, top, right, bottom]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "[u32; 4]")]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    /// Box of a `width`x`height` template whose top-left corner is at (`x`, `y`)
    pub fn from_top_left(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width - 1,
            bottom: y + height - 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Integer midpoint, suitable as a click target
    pub fn centroid(&self) -> (u32, u32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.left, b.top, b.right, b.bottom]
    }
}

impl From<(u32, u32, u32, u32)> for BoundingBox {
    fn from((left, top, right, bottom): (u32, u32, u32, u32)) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Outcome of a single search on a captured frame.
///
/// Built once per search and never modified afterwards.
#[derive(Clone, Debug)]
pub struct FindResult {
    template: Option<RgbImage>,
    frame: RgbImage,
    mask: Option<GrayImage>,
    boxes: Vec<BoundingBox>,
}

impl FindResult {
    /// Result of a capture without a search
    pub fn capture_only(frame: RgbImage) -> Self {
        Self {
            template: None,
            frame,
            mask: None,
            boxes: Vec::new(),
        }
    }

    pub(crate) fn new(
        template: RgbImage,
        frame: RgbImage,
        mask: GrayImage,
        boxes: Vec<BoundingBox>,
    ) -> Self {
        debug_assert_eq!(mask.dimensions(), frame.dimensions());
        Self {
            template: Some(template),
            frame,
            mask: Some(mask),
            boxes,
        }
    }

    /// The image that has been searched for
    pub fn template(&self) -> Option<&RgbImage> {
        self.template.as_ref()
    }

    /// The captured screen
    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    /// Frame-sized mask with 1 at every raw-hit top-left position
    pub fn mask(&self) -> Option<&GrayImage> {
        self.mask.as_ref()
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    /// The only box, if exactly one instance was found
    pub fn single(&self) -> Option<&BoundingBox> {
        match self.boxes.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Message describing why this result does not hold exactly one match
    pub fn failure_message(&self) -> &'static str {
        if self.boxes.len() > 1 {
            "image found multiple times"
        } else {
            "image not found"
        }
    }
}
