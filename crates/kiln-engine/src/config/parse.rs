use crate::coords::{AlignmentAnchor, ColorRgba, UnifiedVec2, Vec2, Vec3};

use super::ConfigError;

pub fn parse_bool(s: &str) -> Result<bool, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool(s.to_string())),
    }
}

pub fn parse_f32(s: &str) -> Result<f32, ConfigError> {
    s.trim()
        .parse::<f32>()
        .map_err(|_| ConfigError::InvalidNumber(s.to_string()))
}

/// Like [`parse_f32`] but rejects `inf` and `NaN`.
pub fn parse_finite_f32(s: &str) -> Result<f32, ConfigError> {
    parse_f32(s).and_then(|v| {
        if v.is_finite() {
            Ok(v)
        } else {
            Err(ConfigError::InvalidNumber(s.to_string()))
        }
    })
}

pub fn parse_u32(s: &str) -> Result<u32, ConfigError> {
    s.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber(s.to_string()))
}

/// Splits on commas and/or whitespace and parses each component.
fn components<const N: usize>(s: &str) -> Result<[f32; N], ConfigError> {
    let parts: Vec<&str> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != N {
        return Err(ConfigError::ComponentCount {
            expected: N,
            found: parts.len(),
            value: s.to_string(),
        });
    }

    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_f32(part)?;
    }
    Ok(out)
}

/// `"x, y"`
pub fn parse_vec2(s: &str) -> Result<Vec2, ConfigError> {
    let [x, y] = components::<2>(s)?;
    Ok(Vec2::new(x, y))
}

/// `"x, y, z"`
pub fn parse_vec3(s: &str) -> Result<Vec3, ConfigError> {
    let [x, y, z] = components::<3>(s)?;
    Ok(Vec3::new(x, y, z))
}

/// `"rel_x, rel_y, abs_x, abs_y"`
pub fn parse_unified_vec2(s: &str) -> Result<UnifiedVec2, ConfigError> {
    let [rx, ry, ax, ay] = components::<4>(s)?;
    Ok(UnifiedVec2::from_components(rx, ry, ax, ay))
}

/// `"r, g, b, a"` in `[0, 1]`, or `#RRGGBB` / `#RRGGBBAA`.
pub fn parse_colour(s: &str) -> Result<ColorRgba, ConfigError> {
    let t = s.trim();
    if let Some(hex) = t.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ConfigError::InvalidColour(s.to_string()));
    }
    let [r, g, b, a] = components::<4>(t)?;
    Ok(ColorRgba::new(r, g, b, a))
}

fn parse_hex(hex: &str) -> Option<ColorRgba> {
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(ColorRgba::from_u8([byte(0)?, byte(2)?, byte(4)?, a]))
}

pub fn parse_anchor(s: &str) -> Result<AlignmentAnchor, ConfigError> {
    s.trim()
        .parse::<AlignmentAnchor>()
        .map_err(|_| ConfigError::UnknownAnchor(s.to_string()))
}
