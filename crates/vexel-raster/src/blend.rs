//! Compositing Operations
//!
//! Per-pixel composite of a paint sample over the destination buffer.

use crate::Color;

/// Composite operation, canvas vocabulary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeOp {
    #[default]
    SourceOver,
    Lighter,
    DestinationOut,
    Copy,
    Multiply,
    Screen,
}

impl CompositeOp {
    /// Parse from the canvas operation string
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "source-over" => Self::SourceOver,
            "lighter" => Self::Lighter,
            "destination-out" => Self::DestinationOut,
            "copy" => Self::Copy,
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            _ => return None,
        })
    }

    /// Convert to the canvas operation string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::Lighter => "lighter",
            Self::DestinationOut => "destination-out",
            Self::Copy => "copy",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
        }
    }
}

/// Blend one source sample over one destination pixel
pub fn blend(src: Color, dst: Color, op: CompositeOp) -> Color {
    match op {
        CompositeOp::SourceOver => {
            let sa = src.a as f64 / 255.0;
            let over = |s: u8, d: u8| (s as f64 * sa + d as f64 * (1.0 - sa)).round() as u8;
            Color {
                r: over(src.r, dst.r),
                g: over(src.g, dst.g),
                b: over(src.b, dst.b),
                a: (src.a as f64 + dst.a as f64 * (1.0 - sa)).round() as u8,
            }
        }
        CompositeOp::Lighter => Color {
            r: src.r.saturating_add(dst.r),
            g: src.g.saturating_add(dst.g),
            b: src.b.saturating_add(dst.b),
            a: src.a.saturating_add(dst.a),
        },
        CompositeOp::DestinationOut => {
            let keep = 1.0 - src.a as f64 / 255.0;
            let fade = |d: u8| (d as f64 * keep).round() as u8;
            Color {
                r: fade(dst.r),
                g: fade(dst.g),
                b: fade(dst.b),
                a: fade(dst.a),
            }
        }
        CompositeOp::Copy => src,
        CompositeOp::Multiply => {
            let mul = |s: u8, d: u8| ((s as u16 * d as u16) / 255) as u8;
            Color {
                r: mul(src.r, dst.r),
                g: mul(src.g, dst.g),
                b: mul(src.b, dst.b),
                a: mul(src.a, dst.a),
            }
        }
        CompositeOp::Screen => {
            let scr = |s: u8, d: u8| 255 - (((255 - s) as u16 * (255 - d) as u16) / 255) as u8;
            Color {
                r: scr(src.r, dst.r),
                g: scr(src.g, dst.g),
                b: scr(src.b, dst.b),
                a: scr(src.a, dst.a),
            }
        }
    }
}
