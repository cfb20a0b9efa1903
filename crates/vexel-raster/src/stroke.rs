//! Stroke Outlining
//!
//! Expands device-space polylines into fillable outline polygons: one
//! offset quad per segment at half the line width, plus a square patch at
//! every join so adjacent quads meet without gaps. The union rasterizes
//! under the non-zero rule.

/// Outline polygons for one stroked polyline.
///
/// `closed` appends the closing segment. A run with fewer than two distinct
/// points produces no outline, so a point-only or close-only subpath
/// strokes to nothing.
pub fn stroke_polygons(
    points: &[(f64, f64)],
    closed: bool,
    half_width: f64,
) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    if points.len() < 2 || half_width <= 0.0 {
        return out;
    }

    let segment_count = if closed { points.len() } else { points.len() - 1 };
    let mut drew_segment = false;

    for i in 0..segment_count {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        let dx = q.0 - p.0;
        let dy = q.1 - p.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 1e-12 {
            continue;
        }

        // Left normal scaled to half width
        let nx = -dy / len * half_width;
        let ny = dx / len * half_width;

        out.push(vec![
            (p.0 + nx, p.1 + ny),
            (q.0 + nx, q.1 + ny),
            (q.0 - nx, q.1 - ny),
            (p.0 - nx, p.1 - ny),
        ]);
        drew_segment = true;
    }

    if !drew_segment {
        return Vec::new();
    }

    // Square join patches on interior vertices (and the shared vertex of a
    // closed ring). Orientation matches the segment quads so the non-zero
    // union never cancels.
    let join_range = if closed {
        0..points.len()
    } else {
        1..points.len() - 1
    };
    for i in join_range {
        let v = points[i];
        out.push(join_square(v, half_width));
    }

    out
}

fn join_square(v: (f64, f64), h: f64) -> Vec<(f64, f64)> {
    vec![
        (v.0 - h, v.1 - h),
        (v.0 - h, v.1 + h),
        (v.0 + h, v.1 + h),
        (v.0 + h, v.1 - h),
    ]
}
