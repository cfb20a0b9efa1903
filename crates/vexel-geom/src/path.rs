//! Path
//!
//! Canvas path construction over flattened subpaths.
//!
//! Curves, arcs and ellipses are flattened into line segments as they are
//! appended, so a built path is nothing but ordered point runs. Points stay
//! in user space; the draw-time transform is applied by the rasterizer.

use std::f64::consts::TAU;

/// Flattening tolerance in device pixels.
const TOLERANCE: f64 = 0.25;

/// Hard cap on segments produced for a single curve or sweep.
const MAX_SEGMENTS: usize = 256;

/// A user-space point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One run of connected points, optionally closed back to its first point
#[derive(Debug, Clone, Default)]
pub struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Ordered collection of subpaths
#[derive(Debug, Clone, Default)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// All subpaths, in build order
    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Check if no subpath holds any point
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|sp| sp.points.is_empty())
    }

    fn open_subpath(&mut self) -> Option<&mut Subpath> {
        self.subpaths.last_mut().filter(|sp| !sp.closed)
    }

    /// Current end point of the open subpath, if any
    pub fn current_point(&self) -> Option<Point> {
        self.subpaths
            .last()
            .filter(|sp| !sp.closed)
            .and_then(|sp| sp.points.last())
            .copied()
    }

    /// Start a new subpath at (x, y) without connecting to prior geometry
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(Subpath {
            points: vec![Point::new(x, y)],
            closed: false,
        });
    }

    /// Append a point to the open subpath; acts as `move_to` without one
    pub fn line_to(&mut self, x: f64, y: f64) {
        match self.open_subpath() {
            Some(sp) => sp.points.push(Point::new(x, y)),
            None => self.move_to(x, y),
        }
    }

    /// Close the last subpath.
    ///
    /// No-op when there is no subpath, the subpath holds fewer than two
    /// points, or it is already closed; a second consecutive call adds no
    /// segment and no point.
    pub fn close(&mut self) {
        if let Some(sp) = self.subpaths.last_mut() {
            if !sp.closed && sp.points.len() >= 2 {
                sp.closed = true;
            }
        }
    }

    /// Append a quadratic Bezier flattened to line segments
    pub fn quadratic_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        let p0 = match self.current_point() {
            Some(p) => p,
            None => {
                self.move_to(cpx, cpy);
                Point::new(cpx, cpy)
            }
        };

        let n = quad_segment_count(p0, Point::new(cpx, cpy), Point::new(x, y));
        for k in 1..=n {
            let t = k as f64 / n as f64;
            let mt = 1.0 - t;
            let qx = mt * mt * p0.x + 2.0 * mt * t * cpx + t * t * x;
            let qy = mt * mt * p0.y + 2.0 * mt * t * cpy + t * t * y;
            self.line_to(qx, qy);
        }
    }

    /// Append a cubic Bezier flattened to line segments
    pub fn cubic_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        let p0 = match self.current_point() {
            Some(p) => p,
            None => {
                self.move_to(cp1x, cp1y);
                Point::new(cp1x, cp1y)
            }
        };

        let n = cubic_segment_count(
            p0,
            Point::new(cp1x, cp1y),
            Point::new(cp2x, cp2y),
            Point::new(x, y),
        );
        for k in 1..=n {
            let t = k as f64 / n as f64;
            let mt = 1.0 - t;
            let a = mt * mt * mt;
            let b = 3.0 * mt * mt * t;
            let c = 3.0 * mt * t * t;
            let d = t * t * t;
            let bx = a * p0.x + b * cp1x + c * cp2x + d * x;
            let by = a * p0.y + b * cp1y + c * cp2y + d * y;
            self.line_to(bx, by);
        }
    }

    /// Append a circular arc flattened to line segments.
    ///
    /// Connects to the current point with a straight segment when the path
    /// already has one; otherwise starts a new subpath at the arc start.
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) {
        self.ellipse(x, y, radius, radius, 0.0, start_angle, end_angle, counterclockwise);
    }

    /// Append an elliptical arc flattened to line segments
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
        if rx < 0.0 || ry < 0.0 || !rx.is_finite() || !ry.is_finite() {
            return;
        }

        let sweep = arc_sweep(start_angle, end_angle, counterclockwise);
        let (rot_cos, rot_sin) = (rotation.cos(), rotation.sin());
        let point_at = |theta: f64| {
            let px = rx * theta.cos();
            let py = ry * theta.sin();
            Point::new(
                x + px * rot_cos - py * rot_sin,
                y + px * rot_sin + py * rot_cos,
            )
        };

        let start = point_at(start_angle);
        if self.current_point().is_some() {
            self.line_to(start.x, start.y);
        } else {
            self.move_to(start.x, start.y);
        }

        if sweep == 0.0 {
            return;
        }

        let n = arc_segment_count(rx.max(ry), sweep.abs());
        for k in 1..=n {
            let theta = start_angle + sweep * (k as f64 / n as f64);
            let p = point_at(theta);
            self.line_to(p.x, p.y);
        }
    }

    /// Append a tangent arc between the current point and (x2, y2).
    ///
    /// Falls back to a straight segment for a zero radius or collinear
    /// control points.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) {
        if radius < 0.0 || !radius.is_finite() {
            return;
        }

        let p0 = match self.current_point() {
            Some(p) => p,
            None => {
                self.move_to(x1, y1);
                return;
            }
        };

        let v1 = (p0.x - x1, p0.y - y1);
        let v2 = (x2 - x1, y2 - y1);
        let cross = v1.0 * v2.1 - v1.1 * v2.0;
        let len1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
        let len2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

        if radius == 0.0 || cross.abs() < 1e-12 || len1 < 1e-12 || len2 < 1e-12 {
            self.line_to(x1, y1);
            return;
        }

        let u1 = (v1.0 / len1, v1.1 / len1);
        let u2 = (v2.0 / len2, v2.1 / len2);
        let half = ((u1.0 * u2.0 + u1.1 * u2.1).clamp(-1.0, 1.0)).acos() / 2.0;
        let dist = radius / half.tan();

        // Tangent points on each leg
        let t1 = Point::new(x1 + u1.0 * dist, y1 + u1.1 * dist);
        let t2 = Point::new(x1 + u2.0 * dist, y1 + u2.1 * dist);

        // Center sits along the angle bisector
        let bis = (u1.0 + u2.0, u1.1 + u2.1);
        let bis_len = (bis.0 * bis.0 + bis.1 * bis.1).sqrt();
        let center_dist = radius / half.sin();
        let cx = x1 + bis.0 / bis_len * center_dist;
        let cy = y1 + bis.1 / bis_len * center_dist;

        let a1 = (t1.y - cy).atan2(t1.x - cx);
        let a2 = (t2.y - cy).atan2(t2.x - cx);

        self.line_to(t1.x, t1.y);
        // cross > 0 means the path bends left, which walks the arc clockwise
        self.arc(cx, cy, radius, a1, a2, cross > 0.0);
    }

    /// Append a closed rectangle as its own subpath
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.subpaths.push(Subpath {
            points: vec![
                Point::new(x, y),
                Point::new(x + w, y),
                Point::new(x + w, y + h),
                Point::new(x, y + h),
            ],
            closed: true,
        });
    }

    /// Append a closed rounded rectangle with a single corner radius
    pub fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        if w < 0.0 || h < 0.0 || radius <= 0.0 || !radius.is_finite() {
            self.rect(x, y, w, h);
            return;
        }

        let r = radius.min(w / 2.0).min(h / 2.0);
        self.move_to(x + r, y);
        self.line_to(x + w - r, y);
        self.arc(x + w - r, y + r, r, -TAU / 4.0, 0.0, false);
        self.line_to(x + w, y + h - r);
        self.arc(x + w - r, y + h - r, r, 0.0, TAU / 4.0, false);
        self.line_to(x + r, y + h);
        self.arc(x + r, y + h - r, r, TAU / 4.0, TAU / 2.0, false);
        self.line_to(x, y + r);
        self.arc(x + r, y + r, r, TAU / 2.0, 3.0 * TAU / 4.0, false);
        self.close();
    }
}

/// Signed sweep for the canvas arc angle rules: a difference of a full turn
/// or more walks the whole circumference, anything else reduces mod 2pi in
/// the travel direction.
fn arc_sweep(start: f64, end: f64, counterclockwise: bool) -> f64 {
    let delta = end - start;
    if !counterclockwise {
        if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    } else if -delta >= TAU {
        -TAU
    } else {
        -((-delta).rem_euclid(TAU))
    }
}

/// Segments so a uniform quadratic sampling stays within tolerance.
/// Bound: deviation <= |p0 - 2*p1 + p2| / (8 * n^2).
fn quad_segment_count(p0: Point, p1: Point, p2: Point) -> usize {
    let dx = p0.x - 2.0 * p1.x + p2.x;
    let dy = p0.y - 2.0 * p1.y + p2.y;
    let dev = (dx * dx + dy * dy).sqrt();
    ((dev / (8.0 * TOLERANCE)).sqrt().ceil() as usize).clamp(1, MAX_SEGMENTS)
}

/// Segments so a uniform cubic sampling stays within tolerance.
/// Bound: deviation <= 3 * max second difference / (8 * n^2).
fn cubic_segment_count(p0: Point, p1: Point, p2: Point, p3: Point) -> usize {
    let d1x = p0.x - 2.0 * p1.x + p2.x;
    let d1y = p0.y - 2.0 * p1.y + p2.y;
    let d2x = p1.x - 2.0 * p2.x + p3.x;
    let d2y = p1.y - 2.0 * p2.y + p3.y;
    let dev = (d1x * d1x + d1y * d1y)
        .max(d2x * d2x + d2y * d2y)
        .sqrt();
    ((3.0 * dev / (8.0 * TOLERANCE)).sqrt().ceil() as usize).clamp(1, MAX_SEGMENTS)
}

/// Segments so circular chords stay within tolerance of the arc
fn arc_segment_count(radius: f64, sweep: f64) -> usize {
    if radius <= TOLERANCE {
        return 2;
    }
    // chord deviation r * (1 - cos(step / 2)) <= tolerance
    let max_step = 2.0 * (1.0 - TOLERANCE / radius).acos();
    if max_step <= 0.0 {
        return 2;
    }
    ((sweep / max_step).ceil() as usize).clamp(2, MAX_SEGMENTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_line() {
        let mut path = Path::new();
        path.move_to(10.0, 10.0);
        path.line_to(100.0, 10.0);
        path.line_to(100.0, 100.0);

        assert_eq!(path.subpaths().len(), 1);
        assert_eq!(path.subpaths()[0].points.len(), 3);
        assert!(!path.subpaths()[0].closed);
    }

    #[test]
    fn test_line_to_without_subpath() {
        let mut path = Path::new();
        path.line_to(5.0, 6.0);

        assert_eq!(path.subpaths().len(), 1);
        assert_eq!(path.subpaths()[0].points.len(), 1);
    }

    #[test]
    fn test_close_requires_two_points() {
        let mut path = Path::new();
        path.close();
        assert!(path.subpaths().is_empty());

        path.move_to(1.0, 1.0);
        path.close();
        assert!(!path.subpaths()[0].closed);

        path.line_to(2.0, 2.0);
        path.close();
        assert!(path.subpaths()[0].closed);
    }

    #[test]
    fn test_close_idempotent() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.close();

        let count = path.subpaths()[0].points.len();
        path.close();

        assert_eq!(path.subpaths().len(), 1);
        assert_eq!(path.subpaths()[0].points.len(), count);
    }

    #[test]
    fn test_close_only_affects_last_subpath() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.move_to(20.0, 0.0);
        path.line_to(30.0, 0.0);
        path.close();

        assert!(!path.subpaths()[0].closed);
        assert!(path.subpaths()[1].closed);
    }

    #[test]
    fn test_rect_is_independent_closed_subpath() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(5.0, 5.0);
        path.rect(10.0, 10.0, 4.0, 3.0);

        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.subpaths()[1].points.len(), 4);
        assert!(path.subpaths()[1].closed);
        assert!(!path.subpaths()[0].closed);
    }

    #[test]
    fn test_arc_connects_to_current_point() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.arc(10.0, 0.0, 5.0, 0.0, TAU / 2.0, false);

        // Still one subpath: the arc joined with a straight segment
        assert_eq!(path.subpaths().len(), 1);
        let pts = &path.subpaths()[0].points;
        // Connecting segment lands on the arc start (15, 0)
        assert!((pts[1].x - 15.0).abs() < 1e-9);
        assert!(pts[1].y.abs() < 1e-9);
        // Sweep ends at (5, 0)
        let last = pts.last().unwrap();
        assert!((last.x - 5.0).abs() < 1e-6);
        assert!(last.y.abs() < 1e-6);
    }

    #[test]
    fn test_arc_without_current_point_starts_subpath() {
        let mut path = Path::new();
        path.arc(0.0, 0.0, 4.0, 0.0, TAU, false);

        assert_eq!(path.subpaths().len(), 1);
        let first = path.subpaths()[0].points[0];
        assert!((first.x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_circle_sweep() {
        // endAngle - startAngle >= 2pi walks the whole circumference
        assert_eq!(arc_sweep(0.0, 10.0, false), TAU);
        // clockwise wrap reduces mod 2pi
        let s = arc_sweep(TAU / 4.0, 0.0, false);
        assert!((s - 3.0 * TAU / 4.0).abs() < 1e-12);
        // counterclockwise mirrors
        assert_eq!(arc_sweep(10.0, 0.0, true), -TAU);
    }

    #[test]
    fn test_quadratic_flattens_within_tolerance() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.quadratic_to(50.0, 100.0, 100.0, 0.0);

        let pts = &path.subpaths()[0].points;
        assert!(pts.len() > 4);
        // Curve apex of this parabola is y = 50 at x = 50
        let apex = pts
            .iter()
            .map(|p| p.y)
            .fold(f64::MIN, f64::max);
        assert!((apex - 50.0).abs() < 1.0);
    }

    #[test]
    fn test_cubic_endpoint() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.cubic_to(0.0, 50.0, 100.0, 50.0, 100.0, 0.0);

        let last = path.subpaths()[0].points.last().copied().unwrap();
        assert!((last.x - 100.0).abs() < 1e-9);
        assert!(last.y.abs() < 1e-9);
    }

    #[test]
    fn test_negative_radius_is_noop() {
        let mut path = Path::new();
        path.arc(0.0, 0.0, -1.0, 0.0, 1.0, false);
        assert!(path.is_empty());
    }

    #[test]
    fn test_arc_to_collinear_falls_back_to_line() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.arc_to(10.0, 0.0, 20.0, 0.0, 5.0);

        let pts = &path.subpaths()[0].points;
        assert_eq!(pts.len(), 2);
        assert!((pts[1].x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_rect_closed() {
        let mut path = Path::new();
        path.round_rect(0.0, 0.0, 20.0, 10.0, 3.0);

        assert_eq!(path.subpaths().len(), 1);
        assert!(path.subpaths()[0].closed);
    }
}
