//! Composite Loop
//!
//! Writes a paint through a coverage mask (and optional clip) into the
//! pixel buffer.

use tracing::trace;

use crate::blend::{blend, CompositeOp};
use crate::mask::CoverageMask;
use crate::paint::PaintSource;
use crate::surface::PixelBuffer;
use crate::Color;

/// Composite `paint` into every pixel covered by `mask` (and `clip`).
///
/// The paint is sampled at pixel centers and its alpha scaled by
/// `global_alpha` before blending.
pub fn composite_mask(
    buffer: &mut PixelBuffer,
    mask: &CoverageMask,
    clip: Option<&CoverageMask>,
    paint: &PaintSource,
    global_alpha: f64,
    op: CompositeOp,
) {
    let alpha = global_alpha.clamp(0.0, 1.0);
    if alpha == 0.0 {
        return;
    }
    trace!(op = op.as_str(), "compositing mask");

    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if !mask.covered(x, y) {
                continue;
            }
            if let Some(clip) = clip {
                if !clip.covered(x, y) {
                    continue;
                }
            }

            let src = paint
                .sample(x as f64 + 0.5, y as f64 + 0.5)
                .scale_alpha(alpha);
            let dst = buffer.pixel(x as i64, y as i64);
            buffer.set_pixel(x as i64, y as i64, blend(src, dst, op));
        }
    }
}

/// Write transparent black through a coverage mask (and optional clip)
pub fn clear_mask(buffer: &mut PixelBuffer, mask: &CoverageMask, clip: Option<&CoverageMask>) {
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if !mask.covered(x, y) {
                continue;
            }
            if let Some(clip) = clip {
                if !clip.covered(x, y) {
                    continue;
                }
            }
            buffer.set_pixel(x as i64, y as i64, Color::TRANSPARENT);
        }
    }
}
