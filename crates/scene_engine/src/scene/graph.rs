//! Node arena and child resolution
//!
//! Nodes are inserted with their children still given as ids. Once every node
//! exists, [`SceneGraph::resolve_children`] swaps each id for the key of the
//! node it names, failing on the first id that names nothing. Cycles are not
//! detected: a cyclic graph traverses forever and is the caller's problem.

use thiserror::Error;

use crate::foundation::collections::{NodeKey, Registry};

use super::context::GeometryProvider;
use super::node::{Child, Node};

/// Graph construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A child reference names no node
    #[error("node \"{parent}\" references unknown child \"{child}\"")]
    UnresolvedChild {
        /// Id of the node holding the reference
        parent: String,
        /// The missing id
        child: String,
    },

    /// The configured root id names no node
    #[error("No such root node \"{0}\"")]
    MissingRoot(String),

    /// A game setup record names no node
    #[error("No such {role} node \"{id}\"")]
    MissingNode {
        /// What the node is used for
        role: &'static str,
        /// The missing id
        id: String,
    },

    /// Two nodes share an id
    #[error("{0}")]
    Duplicate(String),
}

/// Directed graph of nodes reachable from a root
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Registry<NodeKey, Node>,
    root: Option<NodeKey>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Empty graph
    pub fn new() -> Self {
        Self {
            nodes: Registry::new("node"),
            root: None,
        }
    }

    /// Insert a node; its id must be unique
    pub fn add_node(&mut self, node: Node) -> Result<NodeKey, GraphError> {
        let id = node.id.clone();
        self.nodes.insert(&id, node).map_err(GraphError::Duplicate)
    }

    /// Replace every pending child id with the key of the node it names
    pub fn resolve_children(&mut self) -> Result<(), GraphError> {
        let keys: Vec<NodeKey> = self.nodes.keys().collect();
        for key in keys {
            let Some(node) = self.nodes.get_mut(key) else {
                continue;
            };
            let parent = node.id.clone();
            let mut children = std::mem::take(&mut node.children);

            let mut result = Ok(());
            for child in &mut children {
                if let Child::Pending(id) = child {
                    match self.nodes.key(id) {
                        Some(resolved) => *child = Child::Node(resolved),
                        None => {
                            result = Err(GraphError::UnresolvedChild {
                                parent: parent.clone(),
                                child: id.clone(),
                            });
                            break;
                        }
                    }
                }
            }

            if let Some(node) = self.nodes.get_mut(key) {
                node.children = children;
            }
            result?;
        }
        Ok(())
    }

    /// Set the traversal root
    pub fn set_root(&mut self, id: &str) -> Result<NodeKey, GraphError> {
        let key = self
            .nodes
            .key(id)
            .ok_or_else(|| GraphError::MissingRoot(id.to_string()))?;
        self.root = Some(key);
        Ok(key)
    }

    /// Traversal root, once set
    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// Key of a node that some game record depends on
    pub fn require(&self, role: &'static str, id: &str) -> Result<NodeKey, GraphError> {
        self.nodes.key(id).ok_or_else(|| GraphError::MissingNode {
            role,
            id: id.to_string(),
        })
    }

    /// Key of a node id
    pub fn key(&self, id: &str) -> Option<NodeKey> {
        self.nodes.key(id)
    }

    /// Node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Mutable node by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Node by id
    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.get_by_id(id)
    }

    /// Nodes in document order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> + '_ {
        self.nodes.iter().map(|(_, key, node)| (key, node))
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes grouped by dropbox tag
    ///
    /// Groups and their members are both in document order.
    pub fn dropbox_groups(&self) -> Vec<(String, Vec<NodeKey>)> {
        let mut groups: Vec<(String, Vec<NodeKey>)> = Vec::new();
        for (_, key, node) in self.nodes.iter() {
            let Some(tag) = &node.dropbox else {
                continue;
            };
            match groups.iter_mut().find(|(name, _)| name == tag) {
                Some((_, members)) => members.push(key),
                None => groups.push((tag.clone(), vec![key])),
            }
        }
        groups
    }

    /// Build geometry for every leaf that has none yet
    pub fn prepare_leaves(&mut self, provider: &mut dyn GeometryProvider) -> usize {
        let mut prepared = 0;
        for (_, node) in self.nodes.values_mut() {
            for child in &mut node.children {
                if let Child::Leaf(leaf) = child {
                    if leaf.handle.is_none() {
                        leaf.handle = Some(provider.create_primitive(&leaf.primitive));
                        prepared += 1;
                    }
                }
            }
        }
        prepared
    }

    /// Advance time-dependent leaves to scene time `t`
    pub fn update_leaves(&mut self, t: f32) {
        for (_, node) in self.nodes.values_mut() {
            for child in &mut node.children {
                if let Child::Leaf(leaf) = child {
                    leaf.update(t);
                }
            }
        }
    }

    /// Mutable leaves in no particular order
    pub fn leaves_mut(&mut self) -> impl Iterator<Item = &mut super::leaf::Leaf> + '_ {
        self.nodes.values_mut().flat_map(|(_, node)| {
            node.children.iter_mut().filter_map(|child| match child {
                Child::Leaf(leaf) => Some(leaf),
                _ => None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::context::RecordingContext;
    use crate::scene::leaf::{Leaf, PlaneShape, Primitive};

    fn plane() -> Leaf {
        Leaf::new(None, Primitive::Plane(PlaneShape { parts_u: 2, parts_v: 2 }))
    }

    #[test]
    fn test_forward_references_resolve() {
        let mut graph = SceneGraph::new();
        graph.add_node(Node::empty("root").with_child_id("table")).unwrap();
        graph.add_node(Node::empty("table").with_leaf(plane())).unwrap();

        graph.resolve_children().unwrap();
        let root = graph.set_root("root").unwrap();
        let table = graph.key("table").unwrap();

        let children: Vec<NodeKey> = graph.node(root).unwrap().child_nodes().collect();
        assert_eq!(children, vec![table]);
        assert!(!graph.node(root).unwrap().has_pending_children());
    }

    #[test]
    fn test_dangling_reference_names_missing_id() {
        let mut graph = SceneGraph::new();
        graph.add_node(Node::empty("root").with_child_id("ghost")).unwrap();

        let err = graph.resolve_children().unwrap_err();
        assert_eq!(
            err,
            GraphError::UnresolvedChild {
                parent: "root".into(),
                child: "ghost".into()
            }
        );
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let mut graph = SceneGraph::new();
        graph.add_node(Node::empty("a")).unwrap();
        let err = graph.add_node(Node::empty("a")).unwrap_err();
        assert!(err.to_string().contains("conflict: ID = a"));
    }

    #[test]
    fn test_missing_root() {
        let mut graph = SceneGraph::new();
        assert_eq!(
            graph.set_root("nowhere"),
            Err(GraphError::MissingRoot("nowhere".into()))
        );
    }

    #[test]
    fn test_dropbox_groups_keep_document_order() {
        let mut graph = SceneGraph::new();
        for (id, tag) in [("a", "skin"), ("b", "board"), ("c", "skin")] {
            let mut node = Node::empty(id);
            node.dropbox = Some(tag.to_string());
            graph.add_node(node).unwrap();
        }
        graph.add_node(Node::empty("d")).unwrap();

        let groups = graph.dropbox_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "skin");
        assert_eq!(groups[0].1, vec![graph.key("a").unwrap(), graph.key("c").unwrap()]);
        assert_eq!(groups[1].0, "board");
    }

    #[test]
    fn test_prepare_leaves_once() {
        let mut graph = SceneGraph::new();
        graph.add_node(Node::empty("a").with_leaf(plane()).with_leaf(plane())).unwrap();
        let mut provider = RecordingContext::new();
        assert_eq!(graph.prepare_leaves(&mut provider), 2);
        assert_eq!(graph.prepare_leaves(&mut provider), 0);
    }
}
