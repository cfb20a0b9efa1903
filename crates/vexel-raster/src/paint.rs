//! Paint Sources
//!
//! Resolves a device-space point to a color: solid color, linear or radial
//! gradient with ordered stops, or a tiled pattern image.

use crate::surface::PixelBuffer;
use crate::Color;

/// Pattern tiling mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

impl RepeatMode {
    /// Parse from the canvas repetition string (empty means repeat)
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "repeat" | "" => Some(Self::Repeat),
            "repeat-x" => Some(Self::RepeatX),
            "repeat-y" => Some(Self::RepeatY),
            "no-repeat" => Some(Self::NoRepeat),
            _ => None,
        }
    }
}

/// One gradient color stop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// Where a fill or stroke gets its color from
#[derive(Debug, Clone)]
pub enum PaintSource {
    Solid(Color),
    Linear {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        stops: Vec<GradientStop>,
    },
    Radial {
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
        stops: Vec<GradientStop>,
    },
    Pattern {
        image: PixelBuffer,
        repeat: RepeatMode,
    },
}

impl PaintSource {
    /// Color of this paint at a device-space point
    pub fn sample(&self, x: f64, y: f64) -> Color {
        match self {
            Self::Solid(c) => *c,
            Self::Linear { x0, y0, x1, y1, stops } => {
                let dx = x1 - x0;
                let dy = y1 - y0;
                let len2 = dx * dx + dy * dy;
                if len2 == 0.0 {
                    return stop_color(stops, 1.0);
                }
                let t = ((x - x0) * dx + (y - y0) * dy) / len2;
                stop_color(stops, t)
            }
            Self::Radial { x0, y0, r0, r1, stops, .. } => {
                if r1 == r0 {
                    return stop_color(stops, 1.0);
                }
                let d = ((x - x0) * (x - x0) + (y - y0) * (y - y0)).sqrt();
                stop_color(stops, (d - r0) / (r1 - r0))
            }
            Self::Pattern { image, repeat } => sample_pattern(image, *repeat, x, y),
        }
    }
}

/// Interpolate sorted stops at `t`, clamping past either end
fn stop_color(stops: &[GradientStop], t: f64) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };
    let last = stops.last().unwrap();

    if !t.is_finite() || t <= first.offset {
        return first.color;
    }
    if t >= last.offset {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.offset {
            let span = hi.offset - lo.offset;
            if span <= 0.0 {
                return hi.color;
            }
            return lo.color.lerp(hi.color, (t - lo.offset) / span);
        }
    }
    last.color
}

fn sample_pattern(image: &PixelBuffer, repeat: RepeatMode, x: f64, y: f64) -> Color {
    let w = image.width() as i64;
    let h = image.height() as i64;
    if w == 0 || h == 0 {
        return Color::TRANSPARENT;
    }

    let ix = x.floor() as i64;
    let iy = y.floor() as i64;

    let wrap_x = matches!(repeat, RepeatMode::Repeat | RepeatMode::RepeatX);
    let wrap_y = matches!(repeat, RepeatMode::Repeat | RepeatMode::RepeatY);

    let px = if wrap_x { ix.rem_euclid(w) } else { ix };
    let py = if wrap_y { iy.rem_euclid(h) } else { iy };

    if px < 0 || px >= w || py < 0 || py >= h {
        return Color::TRANSPARENT;
    }
    image.pixel(px, py)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(list: &[(f64, Color)]) -> Vec<GradientStop> {
        list.iter()
            .map(|&(offset, color)| GradientStop { offset, color })
            .collect()
    }

    #[test]
    fn test_solid() {
        let paint = PaintSource::Solid(Color::rgb(1, 2, 3));
        assert_eq!(paint.sample(100.0, -50.0), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_linear_axis_interpolation() {
        let paint = PaintSource::Linear {
            x0: 0.0,
            y0: 0.0,
            x1: 10.0,
            y1: 0.0,
            stops: stops(&[(0.0, Color::rgb(0, 0, 0)), (1.0, Color::rgb(255, 255, 255))]),
        };

        assert_eq!(paint.sample(0.0, 5.0), Color::rgb(0, 0, 0));
        assert_eq!(paint.sample(10.0, -3.0), Color::rgb(255, 255, 255));
        assert_eq!(paint.sample(5.0, 0.0).r, 128);
    }

    #[test]
    fn test_sampling_clamps_outside_stops() {
        let paint = PaintSource::Linear {
            x0: 0.0,
            y0: 0.0,
            x1: 10.0,
            y1: 0.0,
            stops: stops(&[(0.25, Color::rgb(10, 0, 0)), (0.75, Color::rgb(20, 0, 0))]),
        };

        // Before the first stop and past the last clamp to the end colors
        assert_eq!(paint.sample(-100.0, 0.0), Color::rgb(10, 0, 0));
        assert_eq!(paint.sample(0.0, 0.0), Color::rgb(10, 0, 0));
        assert_eq!(paint.sample(100.0, 0.0), Color::rgb(20, 0, 0));
    }

    #[test]
    fn test_gradient_without_stops_is_transparent() {
        let paint = PaintSource::Linear {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 0.0,
            stops: Vec::new(),
        };
        assert_eq!(paint.sample(0.5, 0.0), Color::TRANSPARENT);
    }

    #[test]
    fn test_radial_rings() {
        let paint = PaintSource::Radial {
            x0: 50.0,
            y0: 50.0,
            r0: 0.0,
            x1: 50.0,
            y1: 50.0,
            r1: 10.0,
            stops: stops(&[(0.0, Color::rgb(255, 0, 0)), (1.0, Color::rgb(0, 0, 255))]),
        };

        assert_eq!(paint.sample(50.0, 50.0), Color::rgb(255, 0, 0));
        assert_eq!(paint.sample(50.0, 65.0), Color::rgb(0, 0, 255));
        let mid = paint.sample(55.0, 50.0);
        assert!(mid.r > 0 && mid.b > 0);
    }

    #[test]
    fn test_pattern_repeat_modes() {
        let mut tile = PixelBuffer::new(2, 2);
        tile.set_pixel(0, 0, Color::rgb(255, 0, 0));
        tile.set_pixel(1, 1, Color::rgb(0, 255, 0));

        let repeat = PaintSource::Pattern { image: tile.clone(), repeat: RepeatMode::Repeat };
        assert_eq!(repeat.sample(4.5, 4.5), Color::rgb(255, 0, 0));
        assert_eq!(repeat.sample(-1.5, -1.5), Color::rgb(0, 255, 0));

        let no_repeat = PaintSource::Pattern { image: tile.clone(), repeat: RepeatMode::NoRepeat };
        assert_eq!(no_repeat.sample(0.5, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(no_repeat.sample(4.5, 4.5), Color::TRANSPARENT);

        let repeat_x = PaintSource::Pattern { image: tile, repeat: RepeatMode::RepeatX };
        assert_eq!(repeat_x.sample(4.5, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(repeat_x.sample(4.5, 4.5), Color::TRANSPARENT);
    }

    #[test]
    fn test_degenerate_gradients_use_last_stop() {
        let s = stops(&[(0.0, Color::rgb(1, 0, 0)), (1.0, Color::rgb(2, 0, 0))]);
        let line = PaintSource::Linear { x0: 3.0, y0: 3.0, x1: 3.0, y1: 3.0, stops: s.clone() };
        assert_eq!(line.sample(9.0, 9.0), Color::rgb(2, 0, 0));

        let ring = PaintSource::Radial {
            x0: 0.0, y0: 0.0, r0: 5.0, x1: 0.0, y1: 0.0, r1: 5.0, stops: s,
        };
        assert_eq!(ring.sample(9.0, 9.0), Color::rgb(2, 0, 0));
    }
}
