//! Leaf primitives
//!
//! A leaf is a closed set of primitive kinds, each with its own parameter
//! record. The engine never tessellates anything: a [`GeometryProvider`]
//! turns the parameters into an opaque [`PrimitiveHandle`] once, and
//! traversal hands the leaf back to the rendering context to draw.
//!
//! [`GeometryProvider`]: super::GeometryProvider

use crate::animation::SpriteAnimation;
use crate::foundation::collections::SpriteSheetKey;
use crate::foundation::math::Vec3;

use super::context::PrimitiveHandle;

/// Texture coordinate amplification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplification {
    /// Repetitions along s
    pub afs: f32,
    /// Repetitions along t
    pub aft: f32,
}

impl Default for Amplification {
    fn default() -> Self {
        Self { afs: 1.0, aft: 1.0 }
    }
}

/// Axis-aligned rectangle in the xy plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleShape {
    /// First corner x
    pub x1: f32,
    /// First corner y
    pub y1: f32,
    /// Opposite corner x
    pub x2: f32,
    /// Opposite corner y
    pub y2: f32,
    /// Texture amplification of the owning node
    pub amplification: Amplification,
}

/// Triangle in the xy plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleShape {
    /// Vertices as `(x, y)` pairs
    pub vertices: [(f32, f32); 3],
    /// Texture amplification of the owning node
    pub amplification: Amplification,
}

/// Capped or open cylinder along z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderShape {
    pub bottom_radius: f32,
    pub top_radius: f32,
    pub height: f32,
    pub slices: u32,
    pub stacks: u32,
}

/// Sphere centred at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereShape {
    pub radius: f32,
    pub slices: u32,
    pub stacks: u32,
}

/// Torus around z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusShape {
    pub inner: f32,
    pub outer: f32,
    pub slices: u32,
    pub loops: u32,
}

/// Unit plane subdivided into parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneShape {
    pub parts_u: u32,
    pub parts_v: u32,
}

/// NURBS patch
#[derive(Debug, Clone, PartialEq)]
pub struct PatchShape {
    /// Subdivisions along u
    pub parts_u: u32,
    /// Subdivisions along v
    pub parts_v: u32,
    /// Control points along u
    pub points_u: u32,
    /// Control points along v
    pub points_v: u32,
    /// `points_u * points_v` control points, u-major
    pub control_points: Vec<Vec3>,
    /// Texture amplification of the owning node
    pub amplification: Amplification,
}

impl PatchShape {
    /// Control point at `(u, v)`
    pub fn control_point(&self, u: u32, v: u32) -> Option<&Vec3> {
        if u >= self.points_u || v >= self.points_v {
            return None;
        }
        self.control_points.get((u * self.points_v + v) as usize)
    }
}

/// Barrel built from two patches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrelShape {
    pub base: f32,
    pub middle: f32,
    pub height: f32,
    pub slices: u32,
    pub stacks: u32,
    /// Bulge angle in degrees, when given
    pub angle: Option<f32>,
}

/// Text drawn from a font sprite sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTextShape {
    /// Font sheet
    pub font: SpriteSheetKey,
    /// Text shown
    pub text: String,
    /// Name of a registered text source that replaces `text` every frame
    pub source: Option<String>,
    /// Format string with a `{}` placeholder for the source value
    pub format: Option<String>,
}

impl SpriteTextShape {
    /// Replace the shown text with a source value through the format string
    pub fn show_value(&mut self, value: &str) {
        self.text = match &self.format {
            Some(format) => format.replacen("{}", value, 1),
            None => value.to_string(),
        };
    }
}

/// Animated sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimShape {
    /// Sheet the cells come from
    pub sheet: SpriteSheetKey,
    /// Cell timing
    pub animation: SpriteAnimation,
}

/// Named point, used as an anchor by game logic
#[derive(Debug, Clone, PartialEq)]
pub struct VertexShape {
    pub id: String,
    pub position: Vec3,
}

/// External OBJ model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjShape {
    /// Model path relative to the scenes directory
    pub url: String,
}

/// Primitive kind with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rectangle(RectangleShape),
    Triangle(TriangleShape),
    Cylinder(CylinderShape),
    Sphere(SphereShape),
    Torus(TorusShape),
    Plane(PlaneShape),
    Patch(PatchShape),
    Barrel(BarrelShape),
    SpriteText(SpriteTextShape),
    SpriteAnim(SpriteAnimShape),
    Vertex(VertexShape),
    Obj(ObjShape),
}

impl Primitive {
    /// Document name of the kind (`type` attribute of `<leaf>`)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle(_) => "rectangle",
            Self::Triangle(_) => "triangle",
            Self::Cylinder(_) => "cylinder",
            Self::Sphere(_) => "sphere",
            Self::Torus(_) => "torus",
            Self::Plane(_) => "plane",
            Self::Patch(_) => "patch",
            Self::Barrel(_) => "defbarrel",
            Self::SpriteText(_) => "spritetext",
            Self::SpriteAnim(_) => "spriteanim",
            Self::Vertex(_) => "vertex",
            Self::Obj(_) => "obj",
        }
    }
}

/// A primitive owned by exactly one node
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Optional document id
    pub id: Option<String>,
    /// Kind and parameters
    pub primitive: Primitive,
    /// Geometry built by the provider, once prepared
    pub handle: Option<PrimitiveHandle>,
}

impl Leaf {
    /// Unprepared leaf
    pub fn new(id: Option<String>, primitive: Primitive) -> Self {
        Self {
            id,
            primitive,
            handle: None,
        }
    }

    /// Advance sprite animations to scene time `t`
    pub fn update(&mut self, t: f32) {
        if let Primitive::SpriteAnim(shape) = &mut self.primitive {
            shape.animation.update(t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_control_points_are_u_major() {
        let patch = PatchShape {
            parts_u: 4,
            parts_v: 4,
            points_u: 2,
            points_v: 3,
            control_points: (0..6).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect(),
            amplification: Amplification::default(),
        };
        assert_eq!(patch.control_point(1, 0), Some(&Vec3::new(3.0, 0.0, 0.0)));
        assert_eq!(patch.control_point(0, 2), Some(&Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(patch.control_point(2, 0), None);
    }

    #[test]
    fn test_sprite_text_format() {
        let mut sheets: slotmap::SlotMap<SpriteSheetKey, ()> = slotmap::SlotMap::with_key();
        let mut shape = SpriteTextShape {
            font: sheets.insert(()),
            text: String::new(),
            source: Some("score".into()),
            format: Some("Score: {}".into()),
        };
        shape.show_value("12");
        assert_eq!(shape.text, "Score: 12");
    }

    #[test]
    fn test_kind_names_match_document_types() {
        let leaf = Leaf::new(None, Primitive::Plane(PlaneShape { parts_u: 1, parts_v: 1 }));
        assert_eq!(leaf.primitive.kind(), "plane");
        assert!(leaf.handle.is_none());
    }
}
