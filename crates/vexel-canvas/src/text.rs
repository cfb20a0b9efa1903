//! Text Seam
//!
//! Text shaping and font metrics live outside this engine. The context
//! talks to a `FontMetricsProvider`; the built-in provider estimates
//! advance-width metrics and supplies no outlines, so `fill_text` /
//! `stroke_text` stay metric-accurate no-ops until a host wires a real
//! shaper in.

use vexel_geom::Path;

/// Text measurement result
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    pub width: f64,
    pub actual_bounding_box_left: f64,
    pub actual_bounding_box_right: f64,
    pub font_bounding_box_ascent: f64,
    pub font_bounding_box_descent: f64,
    pub actual_bounding_box_ascent: f64,
    pub actual_bounding_box_descent: f64,
}

/// External provider of metrics and (optionally) glyph outlines
pub trait FontMetricsProvider {
    /// Measure a run of text
    fn measure(&self, text: &str) -> TextMetrics;

    /// Glyph outlines for a run anchored at the alphabetic baseline.
    ///
    /// Providers without outline data return `None`; the context then
    /// draws nothing for that run.
    fn outline(&self, _text: &str, _x: f64, _y: f64) -> Option<Path> {
        None
    }
}

/// Fixed-advance estimator used when no shaper is attached
#[derive(Debug, Clone)]
pub struct BoxMetrics {
    pub advance: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl Default for BoxMetrics {
    fn default() -> Self {
        Self {
            advance: 8.0,
            ascent: 10.0,
            descent: 3.0,
        }
    }
}

impl FontMetricsProvider for BoxMetrics {
    fn measure(&self, text: &str) -> TextMetrics {
        let width = text.chars().count() as f64 * self.advance;
        TextMetrics {
            width,
            actual_bounding_box_left: 0.0,
            actual_bounding_box_right: width,
            font_bounding_box_ascent: self.ascent,
            font_bounding_box_descent: self.descent,
            actual_bounding_box_ascent: self.ascent,
            actual_bounding_box_descent: self.descent,
        }
    }
}
