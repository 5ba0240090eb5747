//! Math utilities and types
//!
//! Provides the vector/matrix aliases used by the scene graph together with
//! the small set of matrix builders the document transformations need.

pub use nalgebra::{Matrix4, Point3, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// RGBA color with every component in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Opaque white, the default for missing illumination colors
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components as an array in RGBA order
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Coordinate axis named by rotation elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Parse an axis name (`"x"`, `"y"` or `"z"`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Component-wise linear interpolation of two vectors
    pub fn lerp_vec3(a: &Vec3, b: &Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a rotation matrix around a named axis
    fn rotation_about(axis: Axis, angle: f32) -> Mat4;

    /// Create a look-at view matrix (right-handed)
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn rotation_about(axis: Axis, angle: f32) -> Mat4 {
        match axis {
            Axis::X => Self::rotation_x(angle),
            Axis::Y => Self::rotation_y(angle),
            Axis::Z => Self::rotation_z(angle),
        }
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_from_name() {
        assert_eq!(Axis::from_name("x"), Some(Axis::X));
        assert_eq!(Axis::from_name("z"), Some(Axis::Z));
        assert_eq!(Axis::from_name("w"), None);
    }

    #[test]
    fn test_rotation_about_z_quarter_turn() {
        let m = Mat4::rotation_about(Axis::Z, constants::PI / 2.0);
        let v = m.transform_vector(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_lerp_vec3_midpoint() {
        let a = Vec3::zeros();
        let b = Vec3::new(10.0, 4.0, -2.0);
        assert_relative_eq!(utils::lerp_vec3(&a, &b, 0.5), Vec3::new(5.0, 2.0, -1.0));
    }
}
