//! Easing curves applied to the local fraction between two keyframes

use crate::foundation::math::constants::PI;

/// Easing function tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// No easing
    #[default]
    Linear,
    /// Quadratic acceleration
    EaseIn,
    /// Quadratic deceleration
    EaseOut,
    /// Quadratic acceleration then deceleration
    EaseInOut,
    /// Cubic acceleration
    CubicIn,
    /// Cubic deceleration
    CubicOut,
    /// Cubic acceleration then deceleration
    CubicInOut,
    /// Half-cosine acceleration then deceleration
    Sine,
}

impl Easing {
    /// Parse an easing name as written in the `easing` attribute, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "ease-in" | "easein" | "quadin" => Some(Self::EaseIn),
            "ease-out" | "easeout" | "quadout" => Some(Self::EaseOut),
            "ease-in-out" | "easeinout" | "quadinout" => Some(Self::EaseInOut),
            "cubic-in" | "cubicin" => Some(Self::CubicIn),
            "cubic-out" | "cubicout" => Some(Self::CubicOut),
            "cubic-in-out" | "cubicinout" => Some(Self::CubicInOut),
            "sine" | "sin" => Some(Self::Sine),
            _ => None,
        }
    }

    /// Map a fraction in `[0, 1]` to an eased fraction in `[0, 1]`
    pub fn apply(self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Self::Linear => x,
            Self::EaseIn => x * x,
            Self::EaseOut => 1.0 - (1.0 - x) * (1.0 - x),
            Self::EaseInOut => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicIn => x * x * x,
            Self::CubicOut => 1.0 - (1.0 - x).powi(3),
            Self::CubicInOut => {
                if x < 0.5 {
                    4.0 * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
                }
            }
            Self::Sine => (1.0 - (PI * x).cos()) / 2.0,
        }
    }
}
