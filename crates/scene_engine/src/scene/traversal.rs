//! Depth-first scene traversal
//!
//! Pre-order walk from a root node. Every visited node enters the appearance
//! and transform stacks exactly once and leaves them exactly once, so after a
//! full traversal both stacks are back where they started.

use crate::animation::KeyframeAnimation;
use crate::foundation::collections::{AnimationKey, NodeKey, Registry};

use super::appearance::{Appearance, AppearanceStack};
use super::context::RenderContext;
use super::graph::SceneGraph;
use super::node::{Child, TextureRef};
use super::transform::TransformStack;

/// Traversal settings
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalOptions {
    /// Substitute selected materials on selected nodes
    pub selection_enabled: bool,
    /// Appearance active on the context before traversal
    pub initial: Appearance,
}

/// Counters collected during one traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes entered
    pub nodes_visited: usize,
    /// Leaves handed to the context
    pub leaves_drawn: usize,
    /// Appearance stack enters
    pub appearance_pushes: usize,
    /// Appearance stack leaves
    pub appearance_pops: usize,
    /// Appearance applies issued to the context
    pub appearance_applies: usize,
    /// Transform stack enters
    pub transform_pushes: usize,
    /// Transform stack leaves
    pub transform_pops: usize,
    /// Deepest nesting reached
    pub max_depth: usize,
    /// Appearance active once traversal finished
    pub final_appearance: Appearance,
}

impl TraversalStats {
    /// Whether every push had a matching pop
    pub fn is_balanced(&self) -> bool {
        self.appearance_pushes == self.appearance_pops && self.transform_pushes == self.transform_pops
    }
}

struct Traversal<'a> {
    graph: &'a SceneGraph,
    animations: &'a Registry<AnimationKey, KeyframeAnimation>,
    selection_enabled: bool,
    appearance: AppearanceStack,
    transforms: TransformStack,
    leaves_drawn: usize,
    nodes_visited: usize,
    depth: usize,
    max_depth: usize,
}

impl Traversal<'_> {
    fn visit(&mut self, key: NodeKey, ctx: &mut dyn RenderContext) {
        let Some(node) = self.graph.node(key) else {
            return;
        };
        if !node.enabled {
            return;
        }

        self.nodes_visited += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);

        let appearance = self.appearance.enter(node.material, node.texture, ctx);

        let local = match node.animation.and_then(|a| self.animations.get(a)) {
            Some(animation) => node.transform * animation.matrix(),
            None => node.transform,
        };
        let transform = self.transforms.enter(&local, ctx);

        let base = self.appearance.active();
        let leaf_appearance = match node.selected_material {
            Some(selected) if self.selection_enabled && node.selected => {
                base.resolve(selected, TextureRef::Inherit)
            }
            _ => base,
        };

        for child in &node.children {
            match child {
                Child::Leaf(leaf) => {
                    self.appearance.switch_to(leaf_appearance, ctx);
                    ctx.draw_primitive(leaf);
                    self.leaves_drawn += 1;
                }
                Child::Node(child_key) => {
                    self.appearance.switch_to(base, ctx);
                    self.visit(*child_key, ctx);
                }
                Child::Pending(id) => {
                    log::debug!("Skipping unresolved child \"{}\" of \"{}\"", id, node.id);
                }
            }
        }

        self.transforms.leave(transform, ctx);
        self.appearance.leave(appearance, ctx);
        self.depth -= 1;
    }
}

/// Render the subtree under `root`
///
/// Animated nodes use the pose their animation computed on its last update.
/// The graph must be acyclic; a cycle recurses without bound.
pub fn render(
    graph: &SceneGraph,
    animations: &Registry<AnimationKey, KeyframeAnimation>,
    root: NodeKey,
    options: TraversalOptions,
    ctx: &mut dyn RenderContext,
) -> TraversalStats {
    let mut traversal = Traversal {
        graph,
        animations,
        selection_enabled: options.selection_enabled,
        appearance: AppearanceStack::new(options.initial),
        transforms: TransformStack::new(),
        leaves_drawn: 0,
        nodes_visited: 0,
        depth: 0,
        max_depth: 0,
    };
    traversal.visit(root, ctx);

    TraversalStats {
        nodes_visited: traversal.nodes_visited,
        leaves_drawn: traversal.leaves_drawn,
        appearance_pushes: traversal.appearance.pushes(),
        appearance_pops: traversal.appearance.pops(),
        appearance_applies: traversal.appearance.applies(),
        transform_pushes: traversal.transforms.pushes(),
        transform_pops: traversal.transforms.pops(),
        max_depth: traversal.max_depth,
        final_appearance: traversal.appearance.active(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Pose;
    use crate::foundation::collections::MaterialKey;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::scene::context::{RecordingContext, RenderCommand};
    use crate::scene::leaf::{Leaf, PlaneShape, Primitive};
    use crate::scene::node::{MaterialRef, Node};
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn plane() -> Leaf {
        Leaf::new(None, Primitive::Plane(PlaneShape { parts_u: 1, parts_v: 1 }))
    }

    fn materials() -> (MaterialKey, MaterialKey) {
        let mut arena: SlotMap<MaterialKey, ()> = SlotMap::with_key();
        (arena.insert(()), arena.insert(()))
    }

    fn no_animations() -> Registry<AnimationKey, KeyframeAnimation> {
        Registry::new("animation")
    }

    #[test]
    fn test_push_pop_parity_and_restoration() {
        let (wood, metal) = materials();
        let mut graph = SceneGraph::new();
        graph
            .add_node(
                Node::empty("root")
                    .with_material(MaterialRef::Material(wood))
                    .with_child_id("a")
                    .with_child_id("b"),
            )
            .unwrap();
        graph
            .add_node(Node::empty("a").with_material(MaterialRef::Material(metal)).with_child_id("c"))
            .unwrap();
        graph.add_node(Node::empty("b").with_leaf(plane())).unwrap();
        graph.add_node(Node::empty("c").with_leaf(plane()).with_texture(TextureRef::Clear)).unwrap();
        graph.resolve_children().unwrap();
        let root = graph.set_root("root").unwrap();

        let mut ctx = RecordingContext::new();
        let stats = render(&graph, &no_animations(), root, TraversalOptions::default(), &mut ctx);

        assert_eq!(stats.nodes_visited, 4);
        assert_eq!(stats.appearance_pushes, 4);
        assert!(stats.is_balanced());
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.leaves_drawn, 2);
        assert_eq!(stats.final_appearance, Appearance::default());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_inherit_keeps_parent_material_without_reapply() {
        let (wood, _) = materials();
        let mut graph = SceneGraph::new();
        graph
            .add_node(Node::empty("parent").with_material(MaterialRef::Material(wood)).with_child_id("n"))
            .unwrap();
        graph.add_node(Node::empty("n").with_leaf(plane())).unwrap();
        graph.resolve_children().unwrap();
        let root = graph.set_root("parent").unwrap();

        let initial = Appearance {
            material: Some(wood),
            texture: None,
        };
        let mut ctx = RecordingContext::new();
        let stats = render(
            &graph,
            &no_animations(),
            root,
            TraversalOptions {
                selection_enabled: false,
                initial,
            },
            &mut ctx,
        );

        assert_eq!(stats.appearance_applies, 0);
        assert!(ctx.applied_appearances().is_empty());
        assert_eq!(stats.final_appearance, initial);
    }

    #[test]
    fn test_selected_material_applies_to_own_leaves_only() {
        let (wood, metal) = materials();
        let mut graph = SceneGraph::new();
        let mut piece = Node::empty("piece")
            .with_material(MaterialRef::Material(wood))
            .with_leaf(plane())
            .with_child_id("base");
        piece.selected_material = Some(MaterialRef::Material(metal));
        piece.selected = true;
        graph.add_node(piece).unwrap();
        graph.add_node(Node::empty("base").with_leaf(plane())).unwrap();
        graph.resolve_children().unwrap();
        let root = graph.set_root("piece").unwrap();

        let mut ctx = RecordingContext::new();
        render(
            &graph,
            &no_animations(),
            root,
            TraversalOptions {
                selection_enabled: true,
                initial: Appearance::default(),
            },
            &mut ctx,
        );

        let materials: Vec<Option<MaterialKey>> =
            ctx.applied_appearances().iter().map(|a| a.material).collect();
        // wood on enter, metal for the own leaf, wood again for the child
        // subtree, then back to the default on leave.
        assert_eq!(materials, vec![Some(wood), Some(metal), Some(wood), None]);
    }

    #[test]
    fn test_selection_disabled_ignores_selected_material() {
        let (wood, metal) = materials();
        let mut graph = SceneGraph::new();
        let mut piece = Node::empty("piece").with_material(MaterialRef::Material(wood)).with_leaf(plane());
        piece.selected_material = Some(MaterialRef::Material(metal));
        piece.selected = true;
        graph.add_node(piece).unwrap();
        let root = graph.set_root("piece").unwrap();

        let mut ctx = RecordingContext::new();
        render(&graph, &no_animations(), root, TraversalOptions::default(), &mut ctx);
        assert!(ctx.applied_appearances().iter().all(|a| a.material != Some(metal)));
    }

    #[test]
    fn test_disabled_subtree_is_skipped() {
        let mut graph = SceneGraph::new();
        graph.add_node(Node::empty("root").with_child_id("hidden")).unwrap();
        let mut hidden = Node::empty("hidden").with_leaf(plane());
        hidden.enabled = false;
        graph.add_node(hidden).unwrap();
        graph.resolve_children().unwrap();
        let root = graph.set_root("root").unwrap();

        let mut ctx = RecordingContext::new();
        let stats = render(&graph, &no_animations(), root, TraversalOptions::default(), &mut ctx);
        assert_eq!(stats.nodes_visited, 1);
        assert_eq!(stats.leaves_drawn, 0);
        assert!(stats.is_balanced());
    }

    #[test]
    fn test_animation_composes_after_local_transform() {
        let mut animations = no_animations();
        let mut slide = KeyframeAnimation::new(false)
            .with_keyframe(0.0, Pose::identity())
            .with_keyframe(2.0, Pose::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        slide.update(1.0);
        let key = animations.insert("slide", slide).unwrap();

        let mut graph = SceneGraph::new();
        let mut node = Node::empty("mover").with_leaf(plane());
        node.transform = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 2.0, 2.0));
        node.animation = Some(key);
        graph.add_node(node).unwrap();
        let root = graph.set_root("mover").unwrap();

        let mut ctx = RecordingContext::new();
        render(&graph, &animations, root, TraversalOptions::default(), &mut ctx);

        let model = ctx
            .commands()
            .iter()
            .find_map(|c| match c {
                RenderCommand::Draw { model, .. } => Some(*model),
                _ => None,
            })
            .unwrap();
        let origin = model.transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(origin.x, 10.0);
    }
}
