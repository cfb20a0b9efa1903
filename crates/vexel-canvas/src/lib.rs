//! Vexel Canvas
//!
//! Canvas 2D drawing context over the Vexel rasterizer.
//!
//! Features:
//! - CanvasContext with the full path/transform/state surface
//! - Winding-rule fills, stroking, clipping
//! - Solid, gradient and pattern paints
//! - drawImage with cropping, scaling and mirroring
//! - ImageData snapshot/patch pixel access
//! - PNG export as a `data:` URI

pub mod context;
pub mod drawing;
pub mod gradient;
pub mod image;
pub mod image_data;
pub mod state;
pub mod style;
pub mod text;

pub use context::CanvasContext;
pub use drawing::ImageDrawing;
pub use gradient::{CanvasGradient, CanvasPattern};
pub use image::Image;
pub use image_data::{ImageData, ImageDataError};
pub use state::DrawState;
pub use style::parse_color;
pub use text::{BoxMetrics, FontMetricsProvider, TextMetrics};

pub use vexel_geom::{Matrix, Path};
pub use vexel_raster::{Color, CompositeOp, FillRule, PixelBuffer, RepeatMode};
