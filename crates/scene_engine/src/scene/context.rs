//! Rendering collaborators
//!
//! The engine drives a host graphics library through two narrow traits:
//! [`GeometryProvider`] builds primitive buffers once, and [`RenderContext`]
//! receives the per-frame transform, appearance and draw calls.
//! [`RecordingContext`] implements both by recording what it was asked to do,
//! which is what the headless viewer and the tests render into.

use crate::foundation::math::{Color, Mat4};

use super::appearance::Appearance;
use super::leaf::{Leaf, Primitive};
use super::lights::Light;
use super::views::View;

/// Opaque handle to geometry built by a [`GeometryProvider`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveHandle(pub u64);

/// Builds renderable geometry from primitive parameters
pub trait GeometryProvider {
    /// Build (or look up) the geometry for a primitive
    fn create_primitive(&mut self, primitive: &Primitive) -> PrimitiveHandle;
}

/// Per-frame drawing interface of the host graphics library
pub trait RenderContext {
    /// Multiply a local transform onto the current model matrix and save the
    /// previous one
    fn push_transform(&mut self, local: &Mat4);

    /// Restore the model matrix saved by the matching push
    fn pop_transform(&mut self);

    /// Make a material/texture pair current
    fn apply_appearance(&mut self, appearance: &Appearance);

    /// Draw a leaf with the current transform and appearance
    fn draw_primitive(&mut self, leaf: &Leaf);

    /// Apply the host's default appearance before traversal starts
    fn apply_default_appearance(&mut self) {}

    /// Set the clear color
    fn set_background(&mut self, _color: Color) {}

    /// Set the global ambient light
    fn set_global_ambient(&mut self, _color: Color) {}

    /// Upload a light into its slot
    fn update_light(&mut self, _light: &Light) {}

    /// Make a camera current
    fn set_camera(&mut self, _view: &View) {}

    /// Draw the x/y/z reference axis with arms of `length` units
    fn draw_axis(&mut self, _length: f32) {}

    /// Draw the loading placeholder quad rotated by `angle` radians about z
    fn draw_placeholder(&mut self, _angle: f32) {}
}

/// One recorded rendering call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    PushTransform(Mat4),
    PopTransform,
    ApplyAppearance(Appearance),
    DefaultAppearance,
    Draw {
        /// Leaf kind
        kind: &'static str,
        /// Model matrix at draw time
        model: Mat4,
    },
    Background(Color),
    GlobalAmbient(Color),
    Light {
        /// Light slot
        slot: usize,
        /// Enabled flag at upload time
        enabled: bool,
    },
    Camera(View),
    Axis(f32),
    Placeholder(f32),
}

/// Render context and geometry provider that records every call
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<RenderCommand>,
    model_stack: Vec<Mat4>,
    model: Option<Mat4>,
    next_handle: u64,
}

impl RecordingContext {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last clear
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Forget recorded commands; the model matrix stack is kept
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Current model matrix
    pub fn model(&self) -> Mat4 {
        self.model.unwrap_or_else(Mat4::identity)
    }

    /// Depth of the model matrix stack
    pub fn depth(&self) -> usize {
        self.model_stack.len()
    }

    /// Appearances applied, in order
    pub fn applied_appearances(&self) -> Vec<Appearance> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::ApplyAppearance(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    /// Kinds of the leaves drawn, in order
    pub fn drawn_kinds(&self) -> Vec<&'static str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Draw { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded commands matching a predicate
    pub fn count(&self, predicate: impl Fn(&RenderCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }
}

impl GeometryProvider for RecordingContext {
    fn create_primitive(&mut self, _primitive: &Primitive) -> PrimitiveHandle {
        self.next_handle += 1;
        PrimitiveHandle(self.next_handle)
    }
}

impl RenderContext for RecordingContext {
    fn push_transform(&mut self, local: &Mat4) {
        let current = self.model();
        self.model_stack.push(current);
        self.model = Some(current * local);
        self.commands.push(RenderCommand::PushTransform(*local));
    }

    fn pop_transform(&mut self) {
        self.model = self.model_stack.pop();
        self.commands.push(RenderCommand::PopTransform);
    }

    fn apply_appearance(&mut self, appearance: &Appearance) {
        self.commands.push(RenderCommand::ApplyAppearance(*appearance));
    }

    fn draw_primitive(&mut self, leaf: &Leaf) {
        self.commands.push(RenderCommand::Draw {
            kind: leaf.primitive.kind(),
            model: self.model(),
        });
    }

    fn apply_default_appearance(&mut self) {
        self.commands.push(RenderCommand::DefaultAppearance);
    }

    fn set_background(&mut self, color: Color) {
        self.commands.push(RenderCommand::Background(color));
    }

    fn set_global_ambient(&mut self, color: Color) {
        self.commands.push(RenderCommand::GlobalAmbient(color));
    }

    fn update_light(&mut self, light: &Light) {
        self.commands.push(RenderCommand::Light {
            slot: light.slot,
            enabled: light.enabled,
        });
    }

    fn set_camera(&mut self, view: &View) {
        self.commands.push(RenderCommand::Camera(*view));
    }

    fn draw_axis(&mut self, length: f32) {
        self.commands.push(RenderCommand::Axis(length));
    }

    fn draw_placeholder(&mut self, angle: f32) {
        self.commands.push(RenderCommand::Placeholder(angle));
    }
}
