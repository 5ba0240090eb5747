//! Animation pose: translation, Euler rotation and scale

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Translation + rotation + scale tuple produced by keyframe interpolation
///
/// Rotation is three independent Euler angles in radians. Interpolating a
/// pose interpolates every axis on its own; nothing is converted to a
/// quaternion, so large multi-axis rotations show the usual Euler artifacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Translation
    pub translation: Vec3,
    /// Rotation about x, y and z in radians
    pub rotation: Vec3,
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Pose that leaves geometry untouched
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Pose with only a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Component-wise interpolation between two poses
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            translation: utils::lerp_vec3(&self.translation, &other.translation, t),
            rotation: utils::lerp_vec3(&self.rotation, &other.rotation, t),
            scale: utils::lerp_vec3(&self.scale, &other.scale, t),
        }
    }

    /// Matrix applying translation, then x/y/z rotations, then scale
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}
