//! Image Drawing
//!
//! The drawImage compositor. All three call shapes normalize to the
//! nine-argument source-rect to dest-rect form; the dest rect goes through
//! the current transform and every destination pixel is inverse-mapped
//! back to a nearest-neighbor source sample.

use tracing::debug;

use vexel_raster::blend::blend;

use crate::context::CanvasContext;
use crate::image::Image;

/// Image drawing surface of the context
pub trait ImageDrawing {
    /// Draw at a position, natural size
    fn draw_image(&mut self, image: &Image, dx: f64, dy: f64);

    /// Draw scaled into a destination rectangle
    fn draw_image_scaled(&mut self, image: &Image, dx: f64, dy: f64, dw: f64, dh: f64);

    /// Draw a source sub-rectangle into a destination rectangle.
    ///
    /// Negative source or destination extents mirror the corresponding
    /// axis. Rectangles reaching outside their buffer clip to the overlap;
    /// a zero-size rectangle or an unready source draws nothing.
    #[allow(clippy::too_many_arguments)]
    fn draw_image_full(
        &mut self,
        image: &Image,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    );
}

impl ImageDrawing for CanvasContext {
    fn draw_image(&mut self, image: &Image, dx: f64, dy: f64) {
        self.draw_image_scaled(image, dx, dy, image.width() as f64, image.height() as f64);
    }

    fn draw_image_scaled(&mut self, image: &Image, dx: f64, dy: f64, dw: f64, dh: f64) {
        self.draw_image_full(
            image,
            0.0,
            0.0,
            image.width() as f64,
            image.height() as f64,
            dx,
            dy,
            dw,
            dh,
        );
    }

    fn draw_image_full(
        &mut self,
        image: &Image,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) {
        let Some(src) = image.buffer() else {
            debug!("drawImage source not ready, skipping");
            return;
        };
        if src.width() == 0 || src.height() == 0 {
            return;
        }
        if [sx, sy, sw, sh, dx, dy, dw, dh].iter().any(|v| !v.is_finite())
            || sw == 0.0
            || sh == 0.0
            || dw == 0.0
            || dh == 0.0
        {
            return;
        }

        let (buffer, state) = self.raster_parts();
        let matrix = state.matrix;
        let Some(inverse) = matrix.invert() else {
            return;
        };
        let alpha = state.global_alpha;
        if alpha == 0.0 {
            return;
        }
        let op = state.composite;
        let clip = state.clip.as_ref();

        // Device bounding box of the transformed destination quad
        let corners = [
            matrix.apply(dx, dy),
            matrix.apply(dx + dw, dy),
            matrix.apply(dx + dw, dy + dh),
            matrix.apply(dx, dy + dh),
        ];
        let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

        let x0 = min_x.floor().max(0.0) as i64;
        let y0 = min_y.floor().max(0.0) as i64;
        let x1 = (max_x.ceil() as i64).min(buffer.width() as i64);
        let y1 = (max_y.ceil() as i64).min(buffer.height() as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                if let Some(clip) = clip {
                    if !clip.covered(px as u32, py as u32) {
                        continue;
                    }
                }

                // Back to user space, then into the unit square of the
                // destination rect (negative extents flip the axis here)
                let (ux, uy) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                let tx = (ux - dx) / dw;
                let ty = (uy - dy) / dh;
                if !(0.0..1.0).contains(&tx) || !(0.0..1.0).contains(&ty) {
                    continue;
                }

                let src_x = (sx + tx * sw).floor() as i64;
                let src_y = (sy + ty * sh).floor() as i64;
                if src_x < 0
                    || src_y < 0
                    || src_x >= src.width() as i64
                    || src_y >= src.height() as i64
                {
                    continue;
                }

                let sample = src.pixel(src_x, src_y).scale_alpha(alpha);
                let dst = buffer.pixel(px, py);
                buffer.set_pixel(px, py, blend(sample, dst, op));
            }
        }
    }
}
