//! Keyframe animation
//!
//! An animation is an ordered list of `(instant, Pose)` keyframes. Querying it
//! at a time `t` relative to the instants `[i0 < i1 < ... < iN]`:
//!
//! - `t <= i0`: the first keyframe's pose (before start)
//! - `ik <= t < ik+1`: eased interpolation between keyframes `k` and `k+1`
//! - `t >= iN`, not looping: the last keyframe's pose, reported finished once
//! - `t >= iN`, looping: `t` wraps to `((t - i0) mod (iN - i0)) + i0`

use crate::foundation::math::Mat4;

use super::{Easing, Pose};

/// Where a query time falls relative to the keyframe instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    /// At or before the first instant
    BeforeStart,
    /// Between the first and last instants
    Interpolating,
    /// Past the last instant of a non-looping animation
    FinishedClamped,
    /// Past the last instant of a looping animation
    FinishedLooping,
}

/// Caller-visible result of [`KeyframeAnimation::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// Pose changed or may still change
    Running,
    /// The animation reached its final pose on this update
    Finished,
    /// Already finished; pose is clamped
    Idle,
}

/// Keyframe animation with easing, looping and a current-time cursor
#[derive(Debug, Clone)]
pub struct KeyframeAnimation {
    keyframes: Vec<(f32, Pose)>,
    looping: bool,
    easing: Easing,
    time_update: bool,
    on_update: Option<String>,
    current_time: f32,
    pose: Pose,
    matrix: Mat4,
    finished: bool,
}

impl Default for KeyframeAnimation {
    fn default() -> Self {
        Self::new(false)
    }
}

impl KeyframeAnimation {
    /// Create an empty animation
    pub fn new(looping: bool) -> Self {
        Self {
            keyframes: Vec::new(),
            looping,
            easing: Easing::Linear,
            time_update: true,
            on_update: None,
            current_time: 0.0,
            pose: Pose::identity(),
            matrix: Mat4::identity(),
            finished: false,
        }
    }

    /// Builder: set the easing curve
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder: add a keyframe
    #[must_use]
    pub fn with_keyframe(mut self, instant: f32, pose: Pose) -> Self {
        self.add_keyframe(instant, pose);
        self
    }

    /// Insert a keyframe, keeping instants sorted
    ///
    /// A keyframe at an instant that already exists replaces it. The cached
    /// pose is re-evaluated at the current cursor.
    pub fn add_keyframe(&mut self, instant: f32, pose: Pose) {
        match self
            .keyframes
            .binary_search_by(|(i, _)| i.total_cmp(&instant))
        {
            Ok(index) => self.keyframes[index] = (instant, pose),
            Err(index) => self.keyframes.insert(index, (instant, pose)),
        }
        self.pose = self.pose_at(self.current_time);
        self.matrix = self.pose.to_matrix();
    }

    /// Set the easing curve
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Whether the animation advances with global scene time
    pub fn set_time_update(&mut self, enabled: bool) {
        self.time_update = enabled;
    }

    /// Name of the update callback invoked after each update
    pub fn set_on_update(&mut self, callback: Option<String>) {
        self.on_update = callback;
    }

    /// Keyframes in instant order
    pub fn keyframes(&self) -> &[(f32, Pose)] {
        &self.keyframes
    }

    /// Whether the animation loops
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Easing curve
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Whether the animation advances with global scene time
    pub fn time_update(&self) -> bool {
        self.time_update
    }

    /// Name of the update callback, if any
    pub fn on_update(&self) -> Option<&str> {
        self.on_update.as_deref()
    }

    /// First keyframe instant
    pub fn first_instant(&self) -> Option<f32> {
        self.keyframes.first().map(|(i, _)| *i)
    }

    /// Last keyframe instant
    pub fn last_instant(&self) -> Option<f32> {
        self.keyframes.last().map(|(i, _)| *i)
    }

    /// `iN - i0`, zero for fewer than two keyframes
    pub fn duration(&self) -> f32 {
        match (self.first_instant(), self.last_instant()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Phase of a query time
    pub fn phase_at(&self, t: f32) -> AnimationPhase {
        match (self.first_instant(), self.last_instant()) {
            (Some(first), _) if t <= first => AnimationPhase::BeforeStart,
            (_, Some(last)) if t >= last => {
                if self.looping && self.duration() > 0.0 {
                    AnimationPhase::FinishedLooping
                } else {
                    AnimationPhase::FinishedClamped
                }
            }
            (Some(_), Some(_)) => AnimationPhase::Interpolating,
            _ => AnimationPhase::BeforeStart,
        }
    }

    /// Pose at an arbitrary query time without touching the cursor
    pub fn pose_at(&self, t: f32) -> Pose {
        let (Some(&(first, first_pose)), Some(&(last, last_pose))) =
            (self.keyframes.first(), self.keyframes.last())
        else {
            return Pose::identity();
        };

        match self.phase_at(t) {
            AnimationPhase::BeforeStart => first_pose,
            AnimationPhase::FinishedClamped => last_pose,
            AnimationPhase::FinishedLooping => {
                let wrapped = (t - first).rem_euclid(last - first) + first;
                self.interpolate(wrapped)
            }
            AnimationPhase::Interpolating => self.interpolate(t),
        }
    }

    fn interpolate(&self, t: f32) -> Pose {
        // Number of instants at or before t; at least one here.
        let upper = self.keyframes.partition_point(|(i, _)| *i <= t);
        let k = upper.saturating_sub(1);
        let (start, start_pose) = self.keyframes[k];
        let Some(&(end, end_pose)) = self.keyframes.get(k + 1) else {
            return start_pose;
        };
        let span = end - start;
        if span <= 0.0 {
            return end_pose;
        }
        let fraction = self.easing.apply((t - start) / span);
        start_pose.lerp(&end_pose, fraction)
    }

    /// Move the cursor to `t` and recompute the current pose
    ///
    /// Returns [`AnimationEvent::Finished`] exactly once when a non-looping
    /// animation first reaches its last instant. Moving the cursor back
    /// before the last instant re-arms that report.
    pub fn update(&mut self, t: f32) -> AnimationEvent {
        self.current_time = t;
        self.pose = self.pose_at(t);
        self.matrix = self.pose.to_matrix();

        if self.phase_at(t) == AnimationPhase::FinishedClamped && !self.keyframes.is_empty() {
            if self.finished {
                AnimationEvent::Idle
            } else {
                self.finished = true;
                AnimationEvent::Finished
            }
        } else {
            self.finished = false;
            AnimationEvent::Running
        }
    }

    /// Current cursor time
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Pose at the current cursor
    pub fn current_pose(&self) -> &Pose {
        &self.pose
    }

    /// Matrix of the pose at the current cursor
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Whether a non-looping animation has reached its final pose
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    fn slide(looping: bool) -> KeyframeAnimation {
        KeyframeAnimation::new(looping)
            .with_keyframe(0.0, Pose::identity())
            .with_keyframe(2.0, Pose::from_translation(Vec3::new(10.0, 0.0, 0.0)))
    }

    #[test]
    fn test_midpoint_is_linear() {
        let anim = slide(false);
        assert_relative_eq!(anim.pose_at(1.0).translation.x, 5.0);
    }

    #[test]
    fn test_clamped_after_last_instant() {
        let anim = slide(false);
        assert_relative_eq!(anim.pose_at(5.0).translation.x, 10.0);
        assert_eq!(anim.phase_at(5.0), AnimationPhase::FinishedClamped);
    }

    #[test]
    fn test_before_start_is_first_keyframe() {
        let anim = slide(false);
        assert_eq!(anim.pose_at(-1.0), Pose::identity());
        assert_eq!(anim.phase_at(-1.0), AnimationPhase::BeforeStart);
    }

    #[test]
    fn test_looping_is_periodic() {
        let anim = slide(true);
        for t in [0.0_f32, 0.25, 0.7, 1.3, 1.99] {
            let a = anim.pose_at(t);
            let b = anim.pose_at(t + anim.duration());
            assert_relative_eq!(a.translation, b.translation, epsilon = 1e-4);
        }
        assert_eq!(anim.phase_at(3.0), AnimationPhase::FinishedLooping);
        assert_relative_eq!(anim.pose_at(3.0).translation.x, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_finished_reported_once() {
        let mut anim = slide(false);
        assert_eq!(anim.update(1.0), AnimationEvent::Running);
        assert_eq!(anim.update(2.5), AnimationEvent::Finished);
        assert!(anim.is_finished());
        assert_eq!(anim.update(3.0), AnimationEvent::Idle);
        assert_eq!(anim.update(4.0), AnimationEvent::Idle);
    }

    #[test]
    fn test_rewinding_rearms_finish() {
        let mut anim = slide(false);
        anim.update(2.0);
        assert_eq!(anim.update(1.0), AnimationEvent::Running);
        assert_eq!(anim.update(2.0), AnimationEvent::Finished);
    }

    #[test]
    fn test_keyframes_are_sorted_and_replaced() {
        let anim = KeyframeAnimation::new(false)
            .with_keyframe(4.0, Pose::identity())
            .with_keyframe(1.0, Pose::identity())
            .with_keyframe(4.0, Pose::from_translation(Vec3::new(1.0, 2.0, 3.0)));

        let instants: Vec<f32> = anim.keyframes().iter().map(|(i, _)| *i).collect();
        assert_eq!(instants, vec![1.0, 4.0]);
        assert_relative_eq!(anim.pose_at(10.0).translation, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_easing_changes_interior_only() {
        let anim = slide(false).with_easing(Easing::EaseIn);
        assert_relative_eq!(anim.pose_at(1.0).translation.x, 2.5);
        assert_relative_eq!(anim.pose_at(2.0).translation.x, 10.0);
    }

    #[test]
    fn test_three_keyframes_pick_the_right_segment() {
        let anim = slide(false).with_keyframe(4.0, Pose::from_translation(Vec3::new(10.0, 8.0, 0.0)));
        let pose = anim.pose_at(3.0);
        assert_relative_eq!(pose.translation, Vec3::new(10.0, 4.0, 0.0));
    }

    #[test]
    fn test_single_keyframe_is_constant() {
        let pose = Pose::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let anim = KeyframeAnimation::new(true).with_keyframe(3.0, pose);
        assert_eq!(anim.pose_at(0.0), pose);
        assert_eq!(anim.pose_at(100.0), pose);
    }

    #[test]
    fn test_empty_animation_is_identity() {
        let mut anim = KeyframeAnimation::new(false);
        assert_eq!(anim.update(5.0), AnimationEvent::Running);
        assert_relative_eq!(*anim.matrix(), Mat4::identity());
    }
}
