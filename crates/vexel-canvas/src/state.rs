//! Graphics State
//!
//! One frame of mutable drawing state and the save/restore stack
//! discipline. Frames are plain values: `save` clones, `restore` pops,
//! nothing is shared between a live frame and its snapshot.

use vexel_geom::Matrix;
use vexel_raster::{Color, CompositeOp, CoverageMask, PaintSource};

/// One frame of drawing state
#[derive(Debug, Clone)]
pub struct DrawState {
    pub matrix: Matrix,
    pub fill: PaintSource,
    pub stroke: PaintSource,
    pub line_width: f64,
    pub global_alpha: f64,
    pub composite: CompositeOp,
    pub clip: Option<CoverageMask>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            matrix: Matrix::identity(),
            fill: PaintSource::Solid(Color::BLACK),
            stroke: PaintSource::Solid(Color::BLACK),
            line_width: 1.0,
            global_alpha: 1.0,
            composite: CompositeOp::SourceOver,
            clip: None,
        }
    }
}
