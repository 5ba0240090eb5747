//! Animation engine
//!
//! Time-based pose evaluation for scene nodes and cameras:
//!
//! - [`KeyframeAnimation`]: ordered `instant -> Pose` keyframes with easing and
//!   optional looping, advanced by global time or driven through a binding.
//! - [`CameraTransition`]: two camera endpoints interpolated over
//!   `[0, last_instant]`, plus the controller that switches between moving
//!   and static camera modes.
//! - [`SpriteAnimation`]: cell cycling for sprite-sheet leaves.

mod easing;
mod pose;
mod keyframe;
mod camera_transition;
mod sprite;

pub use easing::Easing;
pub use pose::Pose;
pub use keyframe::{AnimationEvent, AnimationPhase, KeyframeAnimation};
pub use camera_transition::{
    CameraMode, CameraPose, CameraStep, CameraTransition, CameraTransitionController,
};
pub use sprite::SpriteAnimation;
