//! Gradient and Pattern Handles
//!
//! The mutable builder objects the host assigns to `fillStyle` /
//! `strokeStyle`. Assignment snapshots the handle into a `PaintSource`,
//! so later stop additions never reach into an already-assigned style.

use vexel_raster::{Color, GradientStop, PaintSource, PixelBuffer, RepeatMode};

use crate::style::parse_color;

#[derive(Debug, Clone, Copy)]
enum GradientKind {
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    Radial { x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64 },
}

/// Gradient handle with ordered color stops
#[derive(Debug, Clone)]
pub struct CanvasGradient {
    kind: GradientKind,
    stops: Vec<GradientStop>,
}

impl CanvasGradient {
    pub(crate) fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            kind: GradientKind::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    pub(crate) fn radial(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        Self {
            kind: GradientKind::Radial { x0, y0, r0, x1, y1, r1 },
            stops: Vec::new(),
        }
    }

    /// Add a color stop from a CSS color string.
    ///
    /// Offsets outside [0, 1], non-finite offsets and unparsable colors are
    /// ignored.
    pub fn add_color_stop(&mut self, offset: f64, color: &str) {
        if let Some(c) = parse_color(color) {
            self.add_stop(offset, c);
        }
    }

    /// Add an already-parsed color stop
    pub fn add_stop(&mut self, offset: f64, color: Color) {
        if !offset.is_finite() || !(0.0..=1.0).contains(&offset) {
            return;
        }
        // Keep stops sorted; equal offsets stay in insertion order
        let at = self
            .stops
            .iter()
            .position(|s| s.offset > offset)
            .unwrap_or(self.stops.len());
        self.stops.insert(at, GradientStop { offset, color });
    }

    pub(crate) fn to_paint(&self) -> PaintSource {
        match self.kind {
            GradientKind::Linear { x0, y0, x1, y1 } => PaintSource::Linear {
                x0,
                y0,
                x1,
                y1,
                stops: self.stops.clone(),
            },
            GradientKind::Radial { x0, y0, r0, x1, y1, r1 } => PaintSource::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
                stops: self.stops.clone(),
            },
        }
    }
}

/// Pattern handle: a tile image plus its repetition mode
#[derive(Debug, Clone)]
pub struct CanvasPattern {
    image: PixelBuffer,
    repeat: RepeatMode,
}

impl CanvasPattern {
    pub(crate) fn new(image: PixelBuffer, repeat: RepeatMode) -> Self {
        Self { image, repeat }
    }

    pub(crate) fn to_paint(&self) -> PaintSource {
        PaintSource::Pattern {
            image: self.image.clone(),
            repeat: self.repeat,
        }
    }
}
