//! Canvas Context
//!
//! The stateful 2D drawing surface: one graphics state stack, one current
//! path, one pixel buffer. Every call either mutates state or pushes
//! pixels through the rasterizer.

use tracing::debug;

use vexel_codec::{encode_png_data_url, png};
use vexel_geom::{Matrix, Path};
use vexel_raster::{
    clear_mask, composite_mask, mask_for_polygons, point_in_polygons, stroke_polygons,
    CompositeOp, FillRule, PaintSource, PixelBuffer, RepeatMode,
};

use crate::gradient::{CanvasGradient, CanvasPattern};
use crate::image::Image;
use crate::image_data::{ImageData, ImageDataError};
use crate::state::DrawState;
use crate::style::parse_color;
use crate::text::{BoxMetrics, FontMetricsProvider, TextMetrics};

/// Canvas 2D rendering context
pub struct CanvasContext {
    width: u32,
    height: u32,
    buffer: PixelBuffer,
    states: Vec<DrawState>,
    path: Path,
    metrics: Box<dyn FontMetricsProvider + Send>,
}

impl CanvasContext {
    /// Create a context over a zeroed (transparent black) buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: PixelBuffer::new(width, height),
            states: vec![DrawState::default()],
            path: Path::new(),
            metrics: Box::new(BoxMetrics::default()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes of the backing buffer
    pub fn data(&self) -> &[u8] {
        self.buffer.data()
    }

    /// The backing buffer itself, e.g. to feed one canvas into another
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    // State management

    /// Push a copy of the current state frame
    pub fn save(&mut self) {
        if let Some(state) = self.states.last() {
            self.states.push(state.clone());
        }
    }

    /// Pop back to the previous frame; the bottom frame is never popped
    pub fn restore(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
        }
    }

    pub(crate) fn state(&self) -> &DrawState {
        self.states.last().unwrap()
    }

    fn state_mut(&mut self) -> &mut DrawState {
        self.states.last_mut().unwrap()
    }

    // Transforms

    pub fn scale(&mut self, sx: f64, sy: f64) {
        let m = self.state().matrix.scale(sx, sy);
        self.state_mut().matrix = m;
    }

    pub fn rotate(&mut self, theta: f64) {
        let m = self.state().matrix.rotate(theta);
        self.state_mut().matrix = m;
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        let m = self.state().matrix.translate(tx, ty);
        self.state_mut().matrix = m;
    }

    /// Multiply the current matrix on the right
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        let m = self.state().matrix.multiply(&Matrix::new(a, b, c, d, e, f));
        self.state_mut().matrix = m;
    }

    /// Replace the current matrix outright
    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.state_mut().matrix = Matrix::new(a, b, c, d, e, f);
    }

    pub fn reset_transform(&mut self) {
        self.state_mut().matrix = Matrix::identity();
    }

    // Styles

    /// Set the fill style from a CSS color string; unparsable strings
    /// leave the previous style in place
    pub fn set_fill_style(&mut self, style: &str) {
        if let Some(color) = parse_color(style) {
            self.state_mut().fill = PaintSource::Solid(color);
        }
    }

    pub fn set_fill_gradient(&mut self, gradient: &CanvasGradient) {
        self.state_mut().fill = gradient.to_paint();
    }

    pub fn set_fill_pattern(&mut self, pattern: &CanvasPattern) {
        self.state_mut().fill = pattern.to_paint();
    }

    /// Set the stroke style from a CSS color string; unparsable strings
    /// leave the previous style in place
    pub fn set_stroke_style(&mut self, style: &str) {
        if let Some(color) = parse_color(style) {
            self.state_mut().stroke = PaintSource::Solid(color);
        }
    }

    pub fn set_stroke_gradient(&mut self, gradient: &CanvasGradient) {
        self.state_mut().stroke = gradient.to_paint();
    }

    pub fn set_stroke_pattern(&mut self, pattern: &CanvasPattern) {
        self.state_mut().stroke = pattern.to_paint();
    }

    /// Set global alpha; assignments outside [0, 1] or non-finite are
    /// ignored and the previous value is retained
    pub fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state_mut().global_alpha = alpha;
        }
    }

    pub fn global_alpha(&self) -> f64 {
        self.state().global_alpha
    }

    /// Set line width; non-finite, zero and negative assignments are
    /// ignored
    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state_mut().line_width = width;
        }
    }

    pub fn line_width(&self) -> f64 {
        self.state().line_width
    }

    /// Set the composite operation from its canvas name; unknown names are
    /// ignored
    pub fn set_global_composite_operation(&mut self, op: &str) {
        if let Some(op) = CompositeOp::from_str(op) {
            self.state_mut().composite = op;
        }
    }

    pub fn global_composite_operation(&self) -> &'static str {
        self.state().composite.as_str()
    }

    // Gradient and pattern factories

    pub fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> CanvasGradient {
        CanvasGradient::linear(x0, y0, x1, y1)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_radial_gradient(
        &self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> CanvasGradient {
        CanvasGradient::radial(x0, y0, r0, x1, y1, r1)
    }

    /// Build a pattern from a ready image; `None` for a broken image or an
    /// unknown repetition keyword
    pub fn create_pattern(&self, image: &Image, repetition: &str) -> Option<CanvasPattern> {
        let repeat = RepeatMode::from_str(repetition)?;
        Some(CanvasPattern::new(image.buffer()?.clone(), repeat))
    }

    // Path building

    /// Discard all subpaths
    pub fn begin_path(&mut self) {
        self.path = Path::new();
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(x, y);
    }

    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.path.quadratic_to(cpx, cpy, x, y);
    }

    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.path.cubic_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) {
        self.path.arc(x, y, radius, start_angle, end_angle, counterclockwise);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) {
        self.path
            .ellipse(x, y, rx, ry, rotation, start_angle, end_angle, counterclockwise);
    }

    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        self.path.arc_to(x1, y1, x2, y2, radius);
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.path.rect(x, y, w, h);
    }

    pub fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        self.path.round_rect(x, y, w, h, radius);
    }

    // Path painting

    /// Fill the current path under the non-zero rule
    pub fn fill(&mut self) {
        self.fill_with_rule(FillRule::NonZero);
    }

    /// Fill the current path under an explicit winding rule.
    ///
    /// The transform is sampled now, not at path-build time, so transform
    /// calls between path construction and this call still move the
    /// geometry.
    pub fn fill_with_rule(&mut self, rule: FillRule) {
        let m = self.state().matrix;
        let polygons = device_polygons(&self.path, &m);
        self.composite_polygons(&polygons, rule, true);
    }

    /// Stroke the current path with the current line width
    pub fn stroke(&mut self) {
        let m = self.state().matrix;
        let half_width = self.state().line_width / 2.0;
        let polygons = stroke_outline(&self.path, &m, half_width);
        self.composite_polygons(&polygons, FillRule::NonZero, false);
    }

    /// Intersect the clip region with the current path (non-zero rule)
    pub fn clip(&mut self) {
        self.clip_with_rule(FillRule::NonZero);
    }

    /// Intersect the clip region with the current path
    pub fn clip_with_rule(&mut self, rule: FillRule) {
        let m = self.state().matrix;
        let polygons = device_polygons(&self.path, &m);
        let mask = mask_for_polygons(&polygons, rule, self.width, self.height);

        let state = self.state_mut();
        match &mut state.clip {
            Some(existing) => existing.intersect(&mask),
            None => state.clip = Some(mask),
        }
    }

    /// Winding test of a device-space point against the current path
    pub fn is_point_in_path(&self, x: f64, y: f64) -> bool {
        self.is_point_in_path_with_rule(x, y, FillRule::NonZero)
    }

    pub fn is_point_in_path_with_rule(&self, x: f64, y: f64, rule: FillRule) -> bool {
        let m = self.state().matrix;
        let polygons = device_polygons(&self.path, &m);
        point_in_polygons(&polygons, rule, x, y)
    }

    // Rectangle shortcuts (independent of the current path)

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let ring = self.transformed_rect(x, y, w, h);
        self.composite_polygons(&[ring], FillRule::NonZero, true);
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let ring = self.transformed_rect(x, y, w, h);
        let half_width = self.state().line_width / 2.0;
        let polygons = stroke_polygons(&ring, true, half_width);
        self.composite_polygons(&polygons, FillRule::NonZero, false);
    }

    /// Write transparent black through the transformed rectangle
    pub fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let ring = self.transformed_rect(x, y, w, h);
        let mask = mask_for_polygons(&[ring], FillRule::NonZero, self.width, self.height);
        let state = self.states.last().unwrap();
        clear_mask(&mut self.buffer, &mask, state.clip.as_ref());
    }

    // ImageData

    /// Allocate a zero-filled pixel array. Negative dimensions are taken by
    /// absolute value; zero dimensions fail.
    pub fn create_image_data(&self, w: i64, h: i64) -> Result<ImageData, ImageDataError> {
        ImageData::new(clamp_dim(w), clamp_dim(h))
    }

    /// Allocate a zero-filled array with another array's dimensions
    pub fn create_image_data_like(&self, other: &ImageData) -> ImageData {
        ImageData::new(other.width(), other.height()).expect("source ImageData has valid dimensions")
    }

    /// Copy a rectangle of the buffer out; pixels outside the buffer read
    /// as transparent black
    pub fn get_image_data(&self, x: i64, y: i64, w: i64, h: i64) -> Result<ImageData, ImageDataError> {
        let (x, w) = normalize_span(x, w);
        let (y, h) = normalize_span(y, h);
        if w == 0 || h == 0 {
            return Err(ImageDataError::InvalidDimensions);
        }
        let bytes = self.buffer.read_rect(x, y, w, h);
        ImageData::from_data(w, h, bytes)
    }

    /// Copy a pixel array into the buffer, clipping silently at the bounds.
    /// The transform, clip and global alpha do not apply.
    pub fn put_image_data(&mut self, data: &ImageData, dx: i64, dy: i64) {
        self.buffer.write_rect(
            dx,
            dy,
            data.data(),
            data.width(),
            0,
            0,
            data.width(),
            data.height(),
        );
    }

    /// Copy only the dirty rectangle of a pixel array into the buffer
    #[allow(clippy::too_many_arguments)]
    pub fn put_image_data_dirty(
        &mut self,
        data: &ImageData,
        dx: i64,
        dy: i64,
        dirty_x: i64,
        dirty_y: i64,
        dirty_w: i64,
        dirty_h: i64,
    ) {
        let (dirty_x, dirty_w) = normalize_span(dirty_x, dirty_w);
        let (dirty_y, dirty_h) = normalize_span(dirty_y, dirty_h);

        // Restrict the dirty rect to the source array
        let x0 = dirty_x.max(0);
        let y0 = dirty_y.max(0);
        let x1 = (dirty_x + dirty_w as i64).min(data.width() as i64);
        let y1 = (dirty_y + dirty_h as i64).min(data.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        self.buffer.write_rect(
            dx + x0,
            dy + y0,
            data.data(),
            data.width(),
            x0,
            y0,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        );
    }

    // Text

    /// Replace the metrics/shaping provider
    pub fn set_metrics_provider(&mut self, provider: impl FontMetricsProvider + Send + 'static) {
        self.metrics = Box::new(provider);
    }

    /// Measure text through the attached provider
    pub fn measure_text(&self, text: &str) -> TextMetrics {
        self.metrics.measure(text)
    }

    /// Fill a text run; draws nothing unless the provider supplies outlines
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let Some(outline) = self.metrics.outline(text, x, y) else {
            return;
        };
        let m = self.state().matrix;
        let polygons = device_polygons(&outline, &m);
        self.composite_polygons(&polygons, FillRule::NonZero, true);
    }

    /// Stroke a text run; draws nothing unless the provider supplies
    /// outlines
    pub fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        let Some(outline) = self.metrics.outline(text, x, y) else {
            return;
        };
        let m = self.state().matrix;
        let half_width = self.state().line_width / 2.0;
        let polygons = stroke_outline(&outline, &m, half_width);
        self.composite_polygons(&polygons, FillRule::NonZero, false);
    }

    // Export

    /// Encode the buffer as a `data:image/png;base64,` URI
    pub fn to_data_url(&self) -> String {
        if self.width == 0 || self.height == 0 {
            return "data:,".to_string();
        }
        let bytes = png::encode(self.width, self.height, self.buffer.data());
        debug!(bytes = bytes.len(), "encoded canvas to PNG");
        encode_png_data_url(&bytes)
    }

    // Internals

    fn transformed_rect(&self, x: f64, y: f64, w: f64, h: f64) -> Vec<(f64, f64)> {
        let m = self.state().matrix;
        vec![
            m.apply(x, y),
            m.apply(x + w, y),
            m.apply(x + w, y + h),
            m.apply(x, y + h),
        ]
    }

    fn composite_polygons(&mut self, polygons: &[Vec<(f64, f64)>], rule: FillRule, use_fill: bool) {
        let mask = mask_for_polygons(polygons, rule, self.width, self.height);
        let state = self.states.last().unwrap();
        let paint = if use_fill { &state.fill } else { &state.stroke };
        composite_mask(
            &mut self.buffer,
            &mask,
            state.clip.as_ref(),
            paint,
            state.global_alpha,
            state.composite,
        );
    }

    /// Split borrow for the image compositor: the buffer to write plus the
    /// state frame driving the draw
    pub(crate) fn raster_parts(&mut self) -> (&mut PixelBuffer, &DrawState) {
        (&mut self.buffer, self.states.last().unwrap())
    }
}

/// Transform a path's subpaths into device-space point rings
fn device_polygons(path: &Path, m: &Matrix) -> Vec<Vec<(f64, f64)>> {
    path.subpaths()
        .iter()
        .map(|sp| sp.points.iter().map(|p| m.apply(p.x, p.y)).collect())
        .collect()
}

/// Stroke outline polygons for a whole path under one transform
fn stroke_outline(path: &Path, m: &Matrix, half_width: f64) -> Vec<Vec<(f64, f64)>> {
    let mut polygons = Vec::new();
    for sp in path.subpaths() {
        let points: Vec<(f64, f64)> = sp.points.iter().map(|p| m.apply(p.x, p.y)).collect();
        polygons.extend(stroke_polygons(&points, sp.closed, half_width));
    }
    polygons
}

fn normalize_span(start: i64, len: i64) -> (i64, u32) {
    if len < 0 {
        (start + len, len.unsigned_abs().min(u32::MAX as u64) as u32)
    } else {
        (start, (len as u64).min(u32::MAX as u64) as u32)
    }
}

fn clamp_dim(v: i64) -> u32 {
    v.unsigned_abs().min(u32::MAX as u64) as u32
}
