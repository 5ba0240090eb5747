//! Attribute value parsers
//!
//! Every parser returns the typed value or a human-readable error string.
//! `context` names where the value came from and ends up in the message.

use crate::document::Element;
use crate::foundation::math::{Color, Vec3, Vec4};

/// Float attribute
pub fn parse_float(element: &Element, name: &str, context: &str) -> Result<f32, String> {
    element
        .attr(name)
        .and_then(|raw| raw.trim().parse::<f32>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("unable to parse {name}: {context}"))
}

/// Integer attribute
pub fn parse_int(element: &Element, name: &str, context: &str) -> Result<i32, String> {
    element
        .attr(name)
        .and_then(|raw| raw.trim().parse::<i32>().ok())
        .ok_or_else(|| format!("unable to parse {name}: {context}"))
}

/// Non-negative integer attribute
pub fn parse_count(element: &Element, name: &str, context: &str) -> Result<u32, String> {
    element
        .attr(name)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .ok_or_else(|| format!("unable to parse {name}: {context}"))
}

/// Boolean attribute: `0`, `1`, `false` or `true`
pub fn parse_bool(element: &Element, name: &str, context: &str) -> Result<bool, String> {
    match element.attr(name).map(str::trim) {
        Some("1" | "true") => Ok(true),
        Some("0" | "false") => Ok(false),
        _ => Err(format!("unable to parse value component \"{context}\"")),
    }
}

/// Boolean attribute that falls back to `default` when absent or malformed
pub fn parse_bool_or(element: &Element, name: &str, context: &str, default: bool) -> bool {
    parse_bool(element, name, context).unwrap_or(default)
}

/// String attribute
pub fn parse_string(element: &Element, name: &str, context: &str) -> Result<String, String> {
    element
        .attr(name)
        .map(str::to_string)
        .ok_or_else(|| format!("unable to parse {name}: {context}"))
}

/// `id` attribute of an element that must have one
pub fn require_id(element: &Element, what: &str) -> Result<String, String> {
    element
        .id()
        .map(str::to_string)
        .ok_or_else(|| format!("no ID defined for {what}"))
}

/// `x`, `y`, `z` attributes
pub fn parse_coordinates_3d(element: &Element, context: &str) -> Result<Vec3, String> {
    let x = parse_float(element, "x", context)?;
    let y = parse_float(element, "y", context)?;
    let z = parse_float(element, "z", context)?;
    Ok(Vec3::new(x, y, z))
}

/// `x`, `y`, `z`, `w` attributes
pub fn parse_coordinates_4d(element: &Element, context: &str) -> Result<Vec4, String> {
    let xyz = parse_coordinates_3d(element, context)?;
    let w = parse_float(element, "w", context)?;
    Ok(Vec4::new(xyz.x, xyz.y, xyz.z, w))
}

/// `r`, `g`, `b`, `a` attributes, each in `[0, 1]`
///
/// Out-of-range components are errors, never clamped.
pub fn parse_color(element: &Element, context: &str) -> Result<Color, String> {
    let mut components = [0.0_f32; 4];
    for (slot, name) in components.iter_mut().zip(["r", "g", "b", "a"]) {
        let value = parse_float(element, name, context)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} component outside range: {context}"));
        }
        *slot = value;
    }
    let [r, g, b, a] = components;
    Ok(Color::new(r, g, b, a))
}
