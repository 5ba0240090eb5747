//! Scene graph
//!
//! Typed records produced by the descriptor parser and the machinery that
//! renders them:
//!
//! - [`SceneGraph`]: node arena keyed by id, children resolved in a second pass
//! - [`AppearanceStack`] / [`TransformStack`]: scoped save/restore with tokens
//! - [`traversal::render`]: depth-first walk issuing calls on a [`RenderContext`]
//! - lights, views, bindings, resources and game setup records

mod appearance;
mod bindings;
mod context;
mod description;
mod graph;
mod leaf;
mod lights;
mod node;
mod resources;
mod setup;
mod transform;
mod views;

pub mod traversal;

pub use appearance::{Appearance, AppearanceStack, AppearanceToken};
pub use bindings::{Binding, BindingTarget, BindingValue, Representation};
pub use context::{GeometryProvider, PrimitiveHandle, RecordingContext, RenderCommand, RenderContext};
pub use description::SceneDescription;
pub use graph::{GraphError, SceneGraph};
pub use leaf::{
    Amplification, BarrelShape, CylinderShape, Leaf, ObjShape, PatchShape, PlaneShape, Primitive,
    RectangleShape, SphereShape, SpriteAnimShape, SpriteTextShape, TorusShape, TriangleShape,
    VertexShape,
};
pub use lights::{Illumination, Light, MAX_LIGHTS};
pub use node::{Child, MaterialRef, Node, TextureRef};
pub use resources::{Material, SpriteSheet, Texture};
pub use setup::{
    AudioEntry, CellPosition, Gameboard, PiecesBox, PiecesSetup, SceneSetup, TransitionSetup,
    UserInterface, UserValue,
};
pub use transform::{TransformStack, TransformToken};
pub use traversal::{TraversalOptions, TraversalStats};
pub use views::{Projection, View, ViewRole, Views};

use thiserror::Error;

use crate::document::DocumentError;

/// Errors loading a scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// The document could not be read
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// A fatal parse error; `warnings` holds the minor errors reported before it
    #[error("Scene loading error: {message}")]
    Fatal {
        /// First fatal error
        message: String,
        /// Minor errors reported before the fatal one
        warnings: Vec<String>,
    },
}

impl SceneError {
    /// Minor errors reported before a fatal parse error
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Fatal { warnings, .. } => warnings,
            Self::Document(_) => &[],
        }
    }
}
