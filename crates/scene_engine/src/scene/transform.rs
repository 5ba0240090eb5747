//! Transform stack
//!
//! Tracks the accumulated model matrix alongside the rendering context's own
//! matrix stack so traversal can tell where things end up without asking the
//! host.

use crate::foundation::math::Mat4;

use super::context::RenderContext;

/// Restoration token returned by [`TransformStack::enter`]
#[must_use = "a transform token must be passed back to TransformStack::leave"]
#[derive(Debug)]
pub struct TransformToken {
    depth: usize,
}

/// Accumulated transform with push/pop counters
#[derive(Debug)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
    pushes: usize,
    pops: usize,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Stack starting at identity
    pub fn new() -> Self {
        Self {
            current: Mat4::identity(),
            saved: Vec::new(),
            pushes: 0,
            pops: 0,
        }
    }

    /// Accumulated model matrix
    pub fn current(&self) -> &Mat4 {
        &self.current
    }

    /// Saved entries
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Number of enters so far
    pub fn pushes(&self) -> usize {
        self.pushes
    }

    /// Number of leaves so far
    pub fn pops(&self) -> usize {
        self.pops
    }

    /// Compose a local transform onto the accumulated one
    pub fn enter(&mut self, local: &Mat4, ctx: &mut dyn RenderContext) -> TransformToken {
        self.saved.push(self.current);
        self.pushes += 1;
        self.current = self.current * local;
        ctx.push_transform(local);
        TransformToken {
            depth: self.saved.len(),
        }
    }

    /// Undo the matching [`enter`](Self::enter)
    pub fn leave(&mut self, token: TransformToken, ctx: &mut dyn RenderContext) {
        debug_assert_eq!(token.depth, self.saved.len(), "unbalanced transform stack");
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        }
        self.pops += 1;
        ctx.pop_transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::context::RecordingContext;
    use approx::assert_relative_eq;

    #[test]
    fn test_enter_leave_round_trip() {
        let mut ctx = RecordingContext::new();
        let mut stack = TransformStack::new();
        let t = Mat4::new_translation(&Vec3::new(0.0, 3.0, 0.0));

        let token = stack.enter(&t, &mut ctx);
        assert_relative_eq!(*stack.current(), t);
        assert_relative_eq!(ctx.model(), t);
        stack.leave(token, &mut ctx);

        assert_relative_eq!(*stack.current(), Mat4::identity());
        assert_eq!(stack.pushes(), 1);
        assert_eq!(stack.pops(), 1);
        assert_eq!(ctx.depth(), 0);
    }
}
