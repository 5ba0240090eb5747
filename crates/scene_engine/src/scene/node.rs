//! Scene graph nodes

use crate::foundation::collections::{AnimationKey, MaterialKey, NodeKey, TextureKey};
use crate::foundation::math::Mat4;

use super::leaf::{Amplification, Leaf};

/// Material reference of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialRef {
    /// Keep whatever material is active (`id="null"`)
    Inherit,
    /// Apply this material
    Material(MaterialKey),
}

/// Texture reference of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRef {
    /// Keep whatever texture is active (`id="null"`)
    Inherit,
    /// Disable texturing (`id="clear"`)
    Clear,
    /// Apply this texture
    Texture(TextureKey),
}

/// A node's child: another node, or a leaf it owns
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// Node reference not yet resolved
    Pending(String),
    /// Resolved node reference
    Node(NodeKey),
    /// Owned primitive
    Leaf(Leaf),
}

/// Graph vertex carrying local transform, appearance and children
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Document id
    pub id: String,
    /// Local transformation
    pub transform: Mat4,
    /// Material reference
    pub material: MaterialRef,
    /// Material substituted on this node's own leaves while selected
    pub selected_material: Option<MaterialRef>,
    /// Texture reference
    pub texture: TextureRef,
    /// Texture amplification handed to leaves
    pub amplification: Amplification,
    /// Animation composed after the local transform
    pub animation: Option<AnimationKey>,
    /// Children in document order
    pub children: Vec<Child>,
    /// Name of the registered click callback
    pub onclick: Option<String>,
    /// Mutually exclusive group tag
    pub dropbox: Option<String>,
    /// Disabled nodes and their subtrees are skipped during traversal
    pub enabled: bool,
    /// Selection flag toggled by picking
    pub selected: bool,
}

impl Node {
    /// Create a node; children may still be unresolved ids
    pub fn new(
        id: impl Into<String>,
        transform: Mat4,
        material: MaterialRef,
        texture: TextureRef,
        animation: Option<AnimationKey>,
        children: Vec<Child>,
    ) -> Self {
        Self {
            id: id.into(),
            transform,
            material,
            selected_material: None,
            texture,
            amplification: Amplification::default(),
            animation,
            children,
            onclick: None,
            dropbox: None,
            enabled: true,
            selected: false,
        }
    }

    /// Node with identity transform, inherited appearance and no children
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(
            id,
            Mat4::identity(),
            MaterialRef::Inherit,
            TextureRef::Inherit,
            None,
            Vec::new(),
        )
    }

    /// Builder: append a child node reference by id
    #[must_use]
    pub fn with_child_id(mut self, id: impl Into<String>) -> Self {
        self.children.push(Child::Pending(id.into()));
        self
    }

    /// Builder: append a leaf
    #[must_use]
    pub fn with_leaf(mut self, leaf: Leaf) -> Self {
        self.children.push(Child::Leaf(leaf));
        self
    }

    /// Builder: set the material reference
    #[must_use]
    pub fn with_material(mut self, material: MaterialRef) -> Self {
        self.material = material;
        self
    }

    /// Builder: set the texture reference
    #[must_use]
    pub fn with_texture(mut self, texture: TextureRef) -> Self {
        self.texture = texture;
        self
    }

    /// Whether any child is still an unresolved id
    pub fn has_pending_children(&self) -> bool {
        self.children.iter().any(|c| matches!(c, Child::Pending(_)))
    }

    /// Leaves owned by this node
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> + '_ {
        self.children.iter().filter_map(|c| match c {
            Child::Leaf(leaf) => Some(leaf),
            _ => None,
        })
    }

    /// Resolved child node keys
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.children.iter().filter_map(|c| match c {
            Child::Node(key) => Some(*key),
            _ => None,
        })
    }
}
