//! Style Parsing
//!
//! CSS color strings accepted by `fillStyle` / `strokeStyle`: hex forms,
//! rgb()/rgba() functional notation and a table of common keywords.
//! Anything unparsable yields `None` and the caller keeps the previous
//! style.

use vexel_raster::Color;

/// Parse a CSS color string
pub fn parse_color(input: &str) -> Option<Color> {
    let s = input.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        return parse_rgb_body(body, true);
    }
    if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        return parse_rgb_body(body, false);
    }
    keyword(&s)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |c: u8| (c as char).to_digit(16).map(|d| d as u8);

    match hex.len() {
        3 | 4 => {
            let mut v = [255u8; 4];
            for (i, &c) in hex.as_bytes().iter().enumerate() {
                let n = nibble(c)?;
                v[i] = n * 16 + n;
            }
            Some(Color::rgba(v[0], v[1], v[2], v[3]))
        }
        6 | 8 => {
            let mut v = [255u8; 4];
            for (i, pair) in hex.as_bytes().chunks(2).enumerate() {
                v[i] = nibble(pair[0])? * 16 + nibble(pair[1])?;
            }
            Some(Color::rgba(v[0], v[1], v[2], v[3]))
        }
        _ => None,
    }
}

fn parse_rgb_body(body: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != if with_alpha { 4 } else { 3 } {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        Some(v.clamp(0.0, 255.0).round() as u8)
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let a = if with_alpha {
        let v: f64 = parts[3].parse().ok()?;
        if !v.is_finite() {
            return None;
        }
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };

    Some(Color::rgba(r, g, b, a))
}

fn keyword(name: &str) -> Option<Color> {
    let c = |r, g, b| Some(Color::rgb(r, g, b));
    match name {
        "black" => c(0, 0, 0),
        "white" => c(255, 255, 255),
        "red" => c(255, 0, 0),
        "lime" => c(0, 255, 0),
        "green" => c(0, 128, 0),
        "blue" => c(0, 0, 255),
        "yellow" => c(255, 255, 0),
        "cyan" | "aqua" => c(0, 255, 255),
        "magenta" | "fuchsia" => c(255, 0, 255),
        "gray" | "grey" => c(128, 128, 128),
        "silver" => c(192, 192, 192),
        "maroon" => c(128, 0, 0),
        "olive" => c(128, 128, 0),
        "navy" => c(0, 0, 128),
        "teal" => c(0, 128, 128),
        "purple" => c(128, 0, 128),
        "orange" => c(255, 165, 0),
        "transparent" => Some(Color::TRANSPARENT),
        _ => None,
    }
}
