//! `<nodes>` and the resolution pass that follows it

use crate::document::Element;
use crate::foundation::collections::NodeKey;
use crate::scene::{
    Amplification, Child, GraphError, MaterialRef, Node, Primitive, SceneGraph, SceneSetup,
    TextureRef,
};

use super::transformations::parse_transformations;
use super::values::{parse_float, require_id};
use super::SceneParser;

impl SceneParser {
    pub(super) fn parse_nodes(&mut self, element: &Element) -> Result<(), String> {
        for node in element.children() {
            if node.name() != "node" {
                self.diagnostics
                    .warn(format!("unknown tag <{}>", node.name()));
                continue;
            }
            let parsed = self.parse_node(node)?;
            self.graph.add_node(parsed).map_err(|e| e.to_string())?;
        }

        self.graph.resolve_children().map_err(|e| e.to_string())?;

        let mut setup = self
            .setup
            .take()
            .ok_or_else(|| "tag <initials> missing".to_string())?;
        let resolved = self.resolve_setup(&mut setup);
        self.setup = Some(setup);
        resolved.map_err(|e| e.to_string())
    }

    fn parse_node(&mut self, element: &Element) -> Result<Node, String> {
        let id = require_id(element, "node")?;
        let transform = parse_transformations(element.child("transformations"), &id)?;

        let material = element
            .child("material")
            .ok_or_else(|| format!("<material> block is mandatory (node \"{id}\")"))?;
        let material_ref = self.material_ref(material.id().unwrap_or_default())?;
        let selected_material = material
            .attr("selectedid")
            .map(|selected| self.material_ref(selected))
            .transpose()?;

        let texture = element
            .child("texture")
            .ok_or_else(|| format!("<texture> block is mandatory (node \"{id}\")"))?;
        let texture_ref = self.texture_ref(texture.id().unwrap_or_default())?;
        let amplification = self.parse_amplification(texture, texture_ref, &id)?;

        let animation = element
            .child("animationref")
            .map(|reference| {
                let animation_id = reference.id().unwrap_or_default();
                self.animations
                    .key(animation_id)
                    .ok_or_else(|| format!("no such animation \"{animation_id}\""))
            })
            .transpose()?;

        let descendants = element
            .child("descendants")
            .ok_or_else(|| format!("<descendants> block is mandatory (node \"{id}\")"))?;
        let mut children = Vec::with_capacity(descendants.children().len());
        for descendant in descendants.children() {
            match descendant.name() {
                "noderef" => children.push(Child::Pending(require_id(descendant, "noderef")?)),
                "leaf" => children.push(Child::Leaf(self.parse_leaf(descendant, amplification, &id)?)),
                other => return Err(format!("no such descendant type \"{other}\"")),
            }
        }

        let mut node = Node::new(id, transform, material_ref, texture_ref, animation, children);
        node.selected_material = selected_material;
        node.amplification = amplification;
        node.onclick = element.attr("onclick").map(str::to_string);
        node.dropbox = element.attr("dropbox").map(str::to_string);
        Ok(node)
    }

    fn material_ref(&self, id: &str) -> Result<MaterialRef, String> {
        if id == "null" {
            return Ok(MaterialRef::Inherit);
        }
        self.materials
            .key(id)
            .map(MaterialRef::Material)
            .ok_or_else(|| format!("no such material \"{id}\""))
    }

    fn texture_ref(&self, id: &str) -> Result<TextureRef, String> {
        match id {
            "null" => Ok(TextureRef::Inherit),
            "clear" => Ok(TextureRef::Clear),
            _ => self
                .textures
                .key(id)
                .map(TextureRef::Texture)
                .ok_or_else(|| format!("no such texture \"{id}\"")),
        }
    }

    fn parse_amplification(
        &mut self,
        texture: &Element,
        texture_ref: TextureRef,
        owner: &str,
    ) -> Result<Amplification, String> {
        let mut amplification = None;
        for child in texture.children() {
            if child.name() != "amplification" {
                return Err(format!(
                    "block with tag \"{}\" not allowed inside <texture> block",
                    child.name()
                ));
            }
            let context = format!("<texture>, node {owner}");
            amplification = Some(Amplification {
                afs: parse_float(child, "afs", &context)?,
                aft: parse_float(child, "aft", &context)?,
            });
        }

        match (amplification, texture_ref) {
            (Some(_), TextureRef::Clear) => {
                self.diagnostics.warn(format!(
                    "node \"{owner}\": Texture \"clear\" does not require amplification"
                ));
                Ok(Amplification::default())
            }
            (Some(amplification), _) => Ok(amplification),
            (None, TextureRef::Clear) => Ok(Amplification::default()),
            (None, _) => {
                self.diagnostics
                    .warn(format!("node \"{owner}\": Undefined amplification, using defaults"));
                Ok(Amplification::default())
            }
        }
    }

    /// Attach node and animation keys to the game setup records
    fn resolve_setup(&mut self, setup: &mut SceneSetup) -> Result<(), GraphError> {
        let graph = &mut self.graph;
        graph.set_root(&setup.root_id)?;

        if let Some(board) = setup.gameboard.as_mut() {
            board.node = Some(graph.require("gameboard", &board.node_id)?);
            board.cell_node = Some(graph.require("cell", &board.cell_node_id)?);
        }

        if let Some(pieces) = setup.pieces.as_mut() {
            pieces.node = Some(graph.require("piece", &pieces.node_id)?);
        }

        for ui in &mut setup.uis {
            ui.panel = Some(graph.require("panel", &ui.panel_id)?);
            let value_node = graph.require("value", &ui.value_id)?;
            ui.value_node = Some(value_node);
            ui.value_leaf = first_sprite_text(graph, value_node);
            ui.buttons = ui
                .button_ids
                .iter()
                .map(|id| graph.require("button", id))
                .collect::<Result<_, _>>()?;
        }

        if let Some(pieces_box) = setup.pieces_box.as_mut() {
            pieces_box.node = Some(graph.require("pieces box", &pieces_box.node_id)?);
            match self.animations.key(&pieces_box.animation_id) {
                Some(key) => pieces_box.animation = Some(key),
                None => self.diagnostics.warn(format!(
                    "no such animation \"{}\" for the pieces box",
                    pieces_box.animation_id
                )),
            }
        }
        Ok(())
    }
}

/// Index of the first sprite text among a node's children
fn first_sprite_text(graph: &SceneGraph, key: NodeKey) -> Option<usize> {
    graph.node(key)?.children.iter().position(|child| {
        matches!(
            child,
            Child::Leaf(leaf) if matches!(leaf.primitive, Primitive::SpriteText(_))
        )
    })
}
