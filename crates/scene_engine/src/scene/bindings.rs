//! Bindings: named values wired to lights and animation cursors
//!
//! A binding has no storage of its own beyond its last value. Writing a
//! value forwards it to whatever the binding is wired to: a light's enabled
//! flag, a light's position, and/or the cursor of its representation
//! animation. The driver performs the forwarding; this module only describes
//! the wiring.

use crate::foundation::collections::{AnimationKey, LightKey};
use crate::foundation::math::Vec3;

/// Value carried by a binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingValue {
    /// Toggle value
    Bool(bool),
    /// Scalar value
    Number(f32),
    /// Position value
    Vector(Vec3),
}

impl BindingValue {
    /// Scalar view used to drive animation cursors
    pub fn as_scalar(&self) -> Option<f32> {
        match *self {
            Self::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Self::Number(n) => Some(n),
            Self::Vector(_) => None,
        }
    }
}

/// Animation moved whenever the binding changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Representation {
    /// Animation whose cursor is driven
    pub animation: AnimationKey,
    /// Cursor scale: the animation moves to `value * t`
    pub t: f32,
}

/// What writing to a binding changes besides its representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingTarget {
    /// Nothing besides the representation
    #[default]
    Unbound,
    /// A light's enabled flag
    LightEnabled(LightKey),
    /// A light's xyz position
    LightPosition(LightKey),
}

/// A named indirection declared in `<bindings>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Binding {
    /// Representation animation, if declared
    pub representation: Option<Representation>,
    /// Wired target
    pub target: BindingTarget,
    /// Last value written
    pub value: Option<BindingValue>,
}

impl Binding {
    /// Binding with a representation animation
    pub fn with_representation(animation: AnimationKey, t: f32) -> Self {
        Self {
            representation: Some(Representation { animation, t }),
            ..Self::default()
        }
    }

    /// Animation cursor a value maps to, when the binding has a representation
    pub fn cursor_for(&self, value: &BindingValue) -> Option<(AnimationKey, f32)> {
        let representation = self.representation?;
        let scalar = value.as_scalar()?;
        Some((representation.animation, scalar * representation.t))
    }
}
