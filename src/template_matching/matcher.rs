/// Template matching implementation
///
/// Squared-difference matching with early exit, followed by clustering of
/// adjacent hits into one box per on-screen instance
use super::types::{BoundingBox, FindResult, RawHit};
use crate::config::MatchConfig;
use image::{GrayImage, Luma, RgbImage};
use imageproc::rect::Rect;
use imageproc::region_labelling::{Connectivity, connected_components};
use std::collections::BTreeMap;

const CHANNELS: usize = 3;

/// Template matcher locating every instance of a template in a frame
#[derive(Clone, Debug)]
pub struct TemplateMatcher {
    threshold_factor: f64,
}

impl TemplateMatcher {
    /// Create a matcher accepting positions whose squared difference sum is at
    /// most `threshold_factor * template_width * template_height`
    pub fn new(threshold_factor: f64) -> Self {
        Self { threshold_factor }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.threshold_factor)
    }

    /// Search `template` in `frame`.
    ///
    /// Without a template the result only carries the frame. An empty box list
    /// is a normal outcome, not an error.
    pub fn find(&self, frame: RgbImage, template: Option<&RgbImage>) -> FindResult {
        let Some(template) = template else {
            return FindResult::capture_only(frame);
        };

        let hits = self.raw_hits(&frame, template);
        let mut mask = GrayImage::new(frame.width(), frame.height());
        for hit in &hits {
            mask.put_pixel(hit.x, hit.y, Luma([1]));
        }
        let boxes = resolve_boxes(&hits, frame.dimensions(), template.dimensions());

        log::debug!(
            "🔍 {}x{} template in {}x{} frame: {} raw hits, {} boxes",
            template.width(),
            template.height(),
            frame.width(),
            frame.height(),
            hits.len(),
            boxes.len()
        );

        FindResult::new(template.clone(), frame, mask, boxes)
    }

    /// Every top-left position where the template fits and passes the threshold,
    /// in row-major order
    pub fn raw_hits(&self, frame: &RgbImage, template: &RgbImage) -> Vec<RawHit> {
        let (frame_w, frame_h) = frame.dimensions();
        let (tpl_w, tpl_h) = template.dimensions();

        if tpl_w == 0 || tpl_h == 0 || tpl_w > frame_w || tpl_h > frame_h {
            log::debug!(
                "⚠️ Template {}x{} cannot fit in frame {}x{}",
                tpl_w,
                tpl_h,
                frame_w,
                frame_h
            );
            return Vec::new();
        }

        let Some(limit) = self.score_limit(tpl_w, tpl_h) else {
            log::debug!(
                "⚠️ Threshold factor {} accepts no position",
                self.threshold_factor
            );
            return Vec::new();
        };
        let y_max = frame_h - tpl_h;
        let x_max = frame_w - tpl_w;
        let report_interval = ((y_max + 1) / 10).max(1);

        let mut hits = Vec::new();
        for y in 0..=y_max {
            for x in 0..=x_max {
                if let Some(score) = squared_difference_at(frame, template, x, y, limit) {
                    hits.push(RawHit { x, y, score });
                }
            }

            if (y + 1) % report_interval == 0 {
                log::trace!("  ⏳ Scanning rows: {}%", (y + 1) * 100 / (y_max + 1));
            }
        }

        hits
    }

    /// Largest squared difference sum still counted as a hit.
    ///
    /// `None` when no score can pass (negative or NaN factor); an infinite
    /// factor saturates to `u64::MAX`.
    fn score_limit(&self, tpl_w: u32, tpl_h: u32) -> Option<u64> {
        let limit = self.threshold_factor * tpl_w as f64 * tpl_h as f64;
        if limit.is_nan() || limit < 0.0 {
            None
        } else {
            Some(limit.floor() as u64)
        }
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::from_config(&MatchConfig::default())
    }
}

/// Sum of squared per-channel differences between the template and the frame
/// region at (`x`, `y`).
///
/// Returns `None` as soon as the running sum exceeds `limit`. The template
/// must fit at the given position.
fn squared_difference_at(
    frame: &RgbImage,
    template: &RgbImage,
    x: u32,
    y: u32,
    limit: u64,
) -> Option<u64> {
    let frame_stride = frame.width() as usize * CHANNELS;
    let row_len = template.width() as usize * CHANNELS;
    let frame_raw = frame.as_raw();
    let tpl_raw = template.as_raw();

    let mut sum = 0u64;
    for (ty, tpl_row) in tpl_raw.chunks_exact(row_len).enumerate() {
        let start = (y as usize + ty) * frame_stride + x as usize * CHANNELS;
        let frame_row = &frame_raw[start..start + row_len];

        sum += frame_row
            .iter()
            .zip(tpl_row)
            .map(|(&a, &b)| {
                let diff = a as i64 - b as i64;
                (diff * diff) as u64
            })
            .sum::<u64>();

        // Early exit: this alignment can no longer pass
        if sum > limit {
            return None;
        }
    }

    Some(sum)
}

/// Merge raw hits into one box per physical template instance.
///
/// Each hit stands for a template-sized rectangle at its position. Rectangles
/// that overlap or touch form one cluster; every cluster yields a single box
/// anchored at its lowest-score hit (first in row-major order on ties).
/// Boxes are returned in row-major order of their anchors.
pub fn resolve_boxes(
    hits: &[RawHit],
    frame_size: (u32, u32),
    template_size: (u32, u32),
) -> Vec<BoundingBox> {
    let (tpl_w, tpl_h) = template_size;
    if hits.is_empty() || tpl_w == 0 || tpl_h == 0 {
        return Vec::new();
    }

    let footprints = paint_footprints(frame_size, hits.iter().map(|h| (h.x, h.y)), template_size);
    let labels = connected_components(&footprints, Connectivity::Four, Luma([0u8]));

    let mut anchors: BTreeMap<u32, RawHit> = BTreeMap::new();
    for hit in hits {
        let label = labels.get_pixel(hit.x, hit.y)[0];
        anchors
            .entry(label)
            .and_modify(|best| {
                if hit.score < best.score {
                    *best = *hit;
                }
            })
            .or_insert(*hit);
    }

    let mut boxes: Vec<BoundingBox> = anchors
        .into_values()
        .map(|hit| BoundingBox::from_top_left(hit.x, hit.y, tpl_w, tpl_h))
        .collect();
    boxes.sort_by_key(|b| (b.top, b.left));
    boxes
}

/// Union of the template-sized footprints of every set pixel in `mask`.
///
/// The result has the mask's dimensions with value 1 inside any footprint.
pub fn footprint_mask(mask: &GrayImage, template_size: (u32, u32)) -> GrayImage {
    let positions = mask
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] != 0)
        .map(|(x, y, _)| (x, y));
    paint_footprints(mask.dimensions(), positions, template_size)
}

fn paint_footprints(
    size: (u32, u32),
    positions: impl Iterator<Item = (u32, u32)>,
    (tpl_w, tpl_h): (u32, u32),
) -> GrayImage {
    let mut canvas = GrayImage::new(size.0, size.1);
    if tpl_w == 0 || tpl_h == 0 {
        return canvas;
    }
    for (x, y) in positions {
        // Clipped to the canvas by imageproc
        let rect = Rect::at(x as i32, y as i32).of_size(tpl_w, tpl_h);
        imageproc::drawing::draw_filled_rect_mut(&mut canvas, rect, Luma([1u8]));
    }
    canvas
}
