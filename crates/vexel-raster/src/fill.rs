//! Scanline Fill
//!
//! Converts device-space polygons into coverage masks under the non-zero
//! or even-odd winding rule. Coverage is sampled at pixel centers; a pixel
//! is covered when its center lies inside the filled region.

use crate::mask::CoverageMask;

/// Winding rule for fill and clip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// Parse the canvas vocabulary ("nonzero" / "evenodd")
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "nonzero" => Some(Self::NonZero),
            "evenodd" => Some(Self::EvenOdd),
            _ => None,
        }
    }

    fn inside(self, winding: i32) -> bool {
        match self {
            Self::NonZero => winding != 0,
            Self::EvenOdd => winding % 2 != 0,
        }
    }
}

/// One non-horizontal polygon edge, normalized to point downward
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// +1 when the original segment pointed down, -1 when up
    dir: i32,
}

impl Edge {
    fn new(a: (f64, f64), b: (f64, f64)) -> Option<Self> {
        if a.1 == b.1 || !a.0.is_finite() || !a.1.is_finite() || !b.0.is_finite() || !b.1.is_finite()
        {
            return None;
        }
        if a.1 < b.1 {
            Some(Edge { x0: a.0, y0: a.1, x1: b.0, y1: b.1, dir: 1 })
        } else {
            Some(Edge { x0: b.0, y0: b.1, x1: a.0, y1: a.1, dir: -1 })
        }
    }

    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (self.x1 - self.x0) * (y - self.y0) / (self.y1 - self.y0)
    }
}

/// Rasterize polygons to a coverage mask restricted to `width` x `height`.
///
/// Each polygon is treated as a closed ring; the caller decides what a
/// "polygon" is (implicitly closed fill subpaths, stroke outline quads,
/// clip geometry), so fill, stroke and clip share one entry point.
pub fn mask_for_polygons(
    polygons: &[Vec<(f64, f64)>],
    rule: FillRule,
    width: u32,
    height: u32,
) -> CoverageMask {
    let mut mask = CoverageMask::new(width, height);
    let edges: Vec<Edge> = polygons
        .iter()
        .filter(|p| p.len() >= 2)
        .flat_map(|poly| {
            (0..poly.len()).filter_map(move |i| Edge::new(poly[i], poly[(i + 1) % poly.len()]))
        })
        .collect();

    if edges.is_empty() {
        return mask;
    }

    let mut crossings: Vec<(f64, i32)> = Vec::new();
    for row in 0..height {
        let yc = row as f64 + 0.5;

        crossings.clear();
        for e in &edges {
            // Half-open [y0, y1) so shared vertices count once
            if e.y0 <= yc && yc < e.y1 {
                crossings.push((e.x_at(yc), e.dir));
            }
        }
        if crossings.is_empty() {
            continue;
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        for i in 0..crossings.len() {
            winding += crossings[i].1;
            if !rule.inside(winding) {
                continue;
            }
            let span_start = crossings[i].0;
            let span_end = match crossings.get(i + 1) {
                Some(next) => next.0,
                None => break,
            };

            // Pixels whose center x + 0.5 falls inside [start, end)
            let col0 = (span_start - 0.5).ceil().max(0.0) as i64;
            let col1 = (span_end - 0.5).ceil().min(width as f64) as i64;
            if col0 < col1 {
                mask.set_span(row, col0 as u32, col1 as u32);
            }
        }
    }

    mask
}

/// Winding test of a single device point, for hit testing
pub fn point_in_polygons(polygons: &[Vec<(f64, f64)>], rule: FillRule, x: f64, y: f64) -> bool {
    let mut winding = 0;
    for poly in polygons {
        if poly.len() < 2 {
            continue;
        }
        for i in 0..poly.len() {
            let a = poly[i];
            let b = poly[(i + 1) % poly.len()];
            if let Some(e) = Edge::new(a, b) {
                if e.y0 <= y && y < e.y1 && e.x_at(y) <= x {
                    winding += e.dir;
                }
            }
        }
    }
    rule.inside(winding)
}
