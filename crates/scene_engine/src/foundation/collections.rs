//! Keyed registries for the id namespaces of a scene document
//!
//! Every namespace (nodes, materials, textures, ...) is a slot map of values
//! plus an index from document id to key. Keys are the opaque handles the
//! rest of the engine compares by identity.

use std::collections::HashMap;

use slotmap::{new_key_type, Key, SlotMap};

new_key_type! {
    /// Handle to a scene graph node
    pub struct NodeKey;
    /// Handle to a material
    pub struct MaterialKey;
    /// Handle to a texture
    pub struct TextureKey;
    /// Handle to a sprite sheet
    pub struct SpriteSheetKey;
    /// Handle to a keyframe animation
    pub struct AnimationKey;
    /// Handle to a binding
    pub struct BindingKey;
    /// Handle to a light
    pub struct LightKey;
    /// Handle to a view (camera)
    pub struct ViewKey;
}

struct Entry<V> {
    id: String,
    value: V,
}

/// Id-indexed arena that rejects duplicate ids
pub struct Registry<K: Key, V> {
    kind: &'static str,
    items: SlotMap<K, Entry<V>>,
    ids: HashMap<String, K>,
    order: Vec<K>,
}

impl<K: Key, V> Registry<K, V> {
    /// Create an empty registry; `kind` names the namespace in error messages
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: SlotMap::with_key(),
            ids: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Insert a value under a unique id
    ///
    /// A duplicate id is reported as an error string and leaves the registry
    /// unchanged.
    pub fn insert(&mut self, id: &str, value: V) -> Result<K, String> {
        if self.ids.contains_key(id) {
            return Err(format!(
                "ID must be unique for each {} (conflict: ID = {})",
                self.kind, id
            ));
        }
        let key = self.items.insert(Entry { id: id.to_string(), value });
        self.ids.insert(id.to_string(), key);
        self.order.push(key);
        Ok(key)
    }

    /// Look up the key registered for an id
    pub fn key(&self, id: &str) -> Option<K> {
        self.ids.get(id).copied()
    }

    /// Whether an id is registered
    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Get a value by key
    pub fn get(&self, key: K) -> Option<&V> {
        self.items.get(key).map(|e| &e.value)
    }

    /// Get a mutable value by key
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.items.get_mut(key).map(|e| &mut e.value)
    }

    /// Get a value by document id
    pub fn get_by_id(&self, id: &str) -> Option<&V> {
        self.key(id).and_then(|k| self.get(k))
    }

    /// Get a mutable value by document id
    pub fn get_by_id_mut(&mut self, id: &str) -> Option<&mut V> {
        let key = self.key(id)?;
        self.get_mut(key)
    }

    /// Document id of a key
    pub fn id_of(&self, key: K) -> Option<&str> {
        self.items.get(key).map(|e| e.id.as_str())
    }

    /// Keys in insertion (document) order
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Ids in insertion (document) order
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().filter_map(|k| self.id_of(*k))
    }

    /// `(id, key, value)` triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, K, &V)> + '_ {
        self.order
            .iter()
            .filter_map(|k| self.items.get(*k).map(|e| (e.id.as_str(), *k, &e.value)))
    }

    /// Mutable values in unspecified order
    pub fn values_mut(&mut self) -> impl Iterator<Item = (K, &mut V)> + '_ {
        self.items.iter_mut().map(|(k, e)| (k, &mut e.value))
    }

    /// First key in insertion order
    pub fn first_key(&self) -> Option<K> {
        self.order.first().copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Namespace name used in error messages
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<K: Key, V: std::fmt::Debug> std::fmt::Debug for Registry<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(id, _, v)| (id, v)))
            .finish()
    }
}
