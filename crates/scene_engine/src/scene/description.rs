//! Parsed scene: every table the document declares plus the node graph

use crate::animation::KeyframeAnimation;
use crate::foundation::collections::{
    AnimationKey, BindingKey, LightKey, MaterialKey, Registry, SpriteSheetKey, TextureKey,
};
use crate::parser::Sections;

use super::bindings::Binding;
use super::graph::SceneGraph;
use super::lights::{Illumination, Light};
use super::resources::{Material, SpriteSheet, Texture};
use super::setup::SceneSetup;
use super::views::Views;

/// Result of parsing a scene document
#[derive(Debug)]
pub struct SceneDescription {
    /// `<initials>` records
    pub setup: SceneSetup,
    /// Keyframe animations
    pub animations: Registry<AnimationKey, KeyframeAnimation>,
    /// Bindings
    pub bindings: Registry<BindingKey, Binding>,
    /// Cameras
    pub views: Views,
    /// Global illumination
    pub illumination: Illumination,
    /// Lights, at most [`MAX_LIGHTS`](super::lights::MAX_LIGHTS)
    pub lights: Registry<LightKey, Light>,
    /// Textures
    pub textures: Registry<TextureKey, Texture>,
    /// Sprite sheets
    pub sprite_sheets: Registry<SpriteSheetKey, SpriteSheet>,
    /// Materials
    pub materials: Registry<MaterialKey, Material>,
    /// Node graph with resolved children and root
    pub graph: SceneGraph,
    /// Top-level sections the document contained
    pub sections: Sections,
    /// Minor errors reported while parsing
    pub warnings: Vec<String>,
}
