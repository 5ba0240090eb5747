//! Global illumination and light sources

use crate::foundation::math::{Color, Vec3, Vec4};

/// Number of light slots the rendering context exposes
pub const MAX_LIGHTS: usize = 8;

/// Global ambient and background colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illumination {
    /// Global ambient light
    pub ambient: Color,
    /// Clear color
    pub background: Color,
}

impl Default for Illumination {
    fn default() -> Self {
        Self {
            ambient: Color::WHITE,
            background: Color::WHITE,
        }
    }
}

/// A light source bound to one of the context's light slots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Slot index in `0..MAX_LIGHTS`
    pub slot: usize,
    /// Whether the light contributes to shading
    pub enabled: bool,
    /// Homogeneous position; `w == 0` is a directional light
    pub position: Vec4,
    /// Ambient color
    pub ambient: Color,
    /// Diffuse color
    pub diffuse: Color,
    /// Specular color
    pub specular: Color,
}

impl Light {
    /// Light used when the document declares none
    pub fn fallback(slot: usize) -> Self {
        Self {
            slot,
            enabled: true,
            position: Vec4::new(0.0, 1.0, 0.0, 1.0),
            ambient: Color::WHITE,
            diffuse: Color::WHITE,
            specular: Color::WHITE,
        }
    }

    /// Move the light, keeping its `w` component
    pub fn set_position(&mut self, xyz: Vec3) {
        self.position = Vec4::new(xyz.x, xyz.y, xyz.z, self.position.w);
    }

    /// Whether the light is directional
    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_position_keeps_w() {
        let mut light = Light::fallback(0);
        light.position.w = 0.0;
        light.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(light.position, Vec4::new(1.0, 2.0, 3.0, 0.0));
        assert!(light.is_directional());
    }
}
