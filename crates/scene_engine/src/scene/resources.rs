//! Appearance resources referenced by id from nodes and leaves

use crate::foundation::math::Color;

/// Phong material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient reflectance
    pub ambient: Color,
    /// Diffuse reflectance
    pub diffuse: Color,
    /// Emitted color
    pub emissive: Color,
    /// Specular reflectance
    pub specular: Color,
    /// Specular exponent
    pub shininess: f32,
}

impl Material {
    /// Ambient used when a material omits `<ambient>`
    pub const DEFAULT_AMBIENT: Color = Color::BLACK;
    /// Diffuse used when a material omits `<diffuse>`
    pub const DEFAULT_DIFFUSE: Color = Color::WHITE;
    /// Emissive used when a material omits `<emissive>`
    pub const DEFAULT_EMISSIVE: Color = Color::BLACK;
    /// Specular used when a material omits `<specular>`
    pub const DEFAULT_SPECULAR: Color = Color::WHITE;

    /// Material with every color at its default and the given shininess
    pub fn with_shininess(shininess: f32) -> Self {
        Self {
            ambient: Self::DEFAULT_AMBIENT,
            diffuse: Self::DEFAULT_DIFFUSE,
            emissive: Self::DEFAULT_EMISSIVE,
            specular: Self::DEFAULT_SPECULAR,
            shininess,
        }
    }
}

/// Image texture; loading the image is up to the rendering backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Image path as written in the document
    pub path: String,
}

/// Texture split into an `M x N` grid of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    /// Image path as written in the document
    pub path: String,
    /// Cells per row
    pub size_m: u32,
    /// Cells per column
    pub size_n: u32,
}

impl SpriteSheet {
    /// Total number of cells
    pub fn cell_count(&self) -> u32 {
        self.size_m * self.size_n
    }

    /// Column and row of a cell index, row-major
    pub fn cell_position(&self, cell: u32) -> (u32, u32) {
        if self.size_m == 0 {
            return (0, 0);
        }
        (cell % self.size_m, cell / self.size_m)
    }
}
