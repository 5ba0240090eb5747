//! Camera transitions between two fixed eye/target endpoints
//!
//! A [`CameraTransition`] is queried over `[0, last_instant]` in seconds since
//! the transition started, clamped outside that range. The
//! [`CameraTransitionController`] owns at most one transition at a time and
//! falls back to static camera mode as soon as it completes.

use crate::foundation::math::{utils, Vec3};

/// Eye and target of a camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position
    pub eye: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
}

impl CameraPose {
    /// Create a new camera pose
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    /// Interpolate eye and target independently
    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            eye: utils::lerp_vec3(&self.eye, &other.eye, t),
            target: utils::lerp_vec3(&self.target, &other.target, t),
        }
    }
}

/// Two-endpoint camera move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    from: CameraPose,
    to: CameraPose,
    last_instant: f32,
}

impl CameraTransition {
    /// Create a transition lasting `last_instant` seconds
    pub fn new(from: CameraPose, to: CameraPose, last_instant: f32) -> Self {
        Self {
            from,
            to,
            last_instant: last_instant.max(0.0),
        }
    }

    /// Starting endpoint
    pub fn from(&self) -> &CameraPose {
        &self.from
    }

    /// Final endpoint
    pub fn to(&self) -> &CameraPose {
        &self.to
    }

    /// Duration in seconds
    pub fn last_instant(&self) -> f32 {
        self.last_instant
    }

    /// Interpolated pose at `t` seconds into the transition
    pub fn pose_at(&self, t: f32) -> CameraPose {
        if t >= self.last_instant {
            self.to
        } else if t <= 0.0 {
            self.from
        } else {
            self.from.lerp(&self.to, t / self.last_instant)
        }
    }

    /// Whether `t` lies at or past the final instant
    pub fn is_complete(&self, t: f32) -> bool {
        t >= self.last_instant
    }
}

/// Camera mode owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CameraMode {
    /// No transition in progress
    #[default]
    Static,
    /// Transition started at `start` seconds of scene time
    Moving {
        /// Scene time the transition started at
        start: f32,
        /// Transition being played
        transition: CameraTransition,
    },
}

/// What a controller update produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraStep {
    /// Static camera, nothing to do
    Idle,
    /// Transition in progress; the moving camera should take this pose
    Moving(CameraPose),
    /// Transition finished on this update with its final pose
    Completed(CameraPose),
}

/// Switches between static and moving camera modes
#[derive(Debug, Clone, Default)]
pub struct CameraTransitionController {
    mode: CameraMode,
}

impl CameraTransitionController {
    /// Create a controller in static mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode
    pub fn mode(&self) -> &CameraMode {
        &self.mode
    }

    /// Whether a transition is in progress
    pub fn is_moving(&self) -> bool {
        matches!(self.mode, CameraMode::Moving { .. })
    }

    /// Start a transition at scene time `now`, replacing any move in progress
    pub fn start(&mut self, transition: CameraTransition, now: f32) {
        self.mode = CameraMode::Moving {
            start: now,
            transition,
        };
    }

    /// Advance to scene time `now`
    pub fn update(&mut self, now: f32) -> CameraStep {
        let CameraMode::Moving { start, transition } = self.mode else {
            return CameraStep::Idle;
        };

        let elapsed = now - start;
        let pose = transition.pose_at(elapsed);
        if transition.is_complete(elapsed) {
            self.mode = CameraMode::Static;
            CameraStep::Completed(pose)
        } else {
            CameraStep::Moving(pose)
        }
    }
}
