//! Named callback table
//!
//! Documents name behavior (`onclick`, `onupdate`, sprite text `source`) by
//! string. The host registers a closure under each name before loading; the
//! driver looks names up here and never evaluates document text. An unknown
//! name is reported once and then ignored.

use std::collections::{HashMap, HashSet};

use crate::animation::Pose;

/// Runs when a node is picked; receives the node id
pub type ClickCallback = Box<dyn FnMut(&str)>;

/// Runs after a time-driven animation updates; receives its pose
pub type UpdateCallback = Box<dyn FnMut(&Pose)>;

/// Produces the value shown by a sprite text
pub type TextSource = Box<dyn FnMut() -> String>;

/// Callbacks registered by name
#[derive(Default)]
pub struct CallbackTable {
    clicks: HashMap<String, ClickCallback>,
    updates: HashMap<String, UpdateCallback>,
    text_sources: HashMap<String, TextSource>,
    reported: HashSet<String>,
}

impl std::fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackTable")
            .field("clicks", &self.clicks.keys().collect::<Vec<_>>())
            .field("updates", &self.updates.keys().collect::<Vec<_>>())
            .field("text_sources", &self.text_sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CallbackTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click callback, replacing any previous one with that name
    pub fn register_click(&mut self, name: impl Into<String>, callback: impl FnMut(&str) + 'static) {
        self.clicks.insert(name.into(), Box::new(callback));
    }

    /// Register an animation update callback
    pub fn register_update(&mut self, name: impl Into<String>, callback: impl FnMut(&Pose) + 'static) {
        self.updates.insert(name.into(), Box::new(callback));
    }

    /// Register a sprite text source
    pub fn register_text_source(
        &mut self,
        name: impl Into<String>,
        source: impl FnMut() -> String + 'static,
    ) {
        self.text_sources.insert(name.into(), Box::new(source));
    }

    /// Whether any callback of any kind has this name
    pub fn contains(&self, name: &str) -> bool {
        self.clicks.contains_key(name)
            || self.updates.contains_key(name)
            || self.text_sources.contains_key(name)
    }

    /// Run a click callback; `false` when the name is unknown
    pub fn click(&mut self, name: &str, node_id: &str) -> bool {
        match self.clicks.get_mut(name) {
            Some(callback) => {
                callback(node_id);
                true
            }
            None => {
                self.report("click", name);
                false
            }
        }
    }

    /// Run an update callback; `false` when the name is unknown
    pub fn update(&mut self, name: &str, pose: &Pose) -> bool {
        match self.updates.get_mut(name) {
            Some(callback) => {
                callback(pose);
                true
            }
            None => {
                self.report("update", name);
                false
            }
        }
    }

    /// Current value of a text source
    pub fn text(&mut self, name: &str) -> Option<String> {
        match self.text_sources.get_mut(name) {
            Some(source) => Some(source()),
            None => {
                self.report("text source", name);
                None
            }
        }
    }

    fn report(&mut self, kind: &str, name: &str) {
        if self.reported.insert(format!("{kind}:{name}")) {
            log::warn!("Warning: no {} callback registered as '{}'", kind, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_click_receives_node_id() {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        let mut table = CallbackTable::new();
        table.register_click("pickCell", move |id| sink.borrow_mut().push(id.to_string()));

        assert!(table.click("pickCell", "cell_3_4"));
        assert!(!table.click("missing", "cell_0_0"));
        assert_eq!(*picked.borrow(), vec!["cell_3_4".to_string()]);
    }

    #[test]
    fn test_unknown_names_are_reported_once() {
        let mut table = CallbackTable::new();
        assert!(!table.update("ghost", &Pose::identity()));
        assert!(!table.update("ghost", &Pose::identity()));
        assert_eq!(table.reported.len(), 1);
    }

    #[test]
    fn test_text_source_is_polled() {
        let mut counter = 0;
        let mut table = CallbackTable::new();
        table.register_text_source("turn", move || {
            counter += 1;
            counter.to_string()
        });
        assert_eq!(table.text("turn").as_deref(), Some("1"));
        assert_eq!(table.text("turn").as_deref(), Some("2"));
        assert!(table.contains("turn"));
        assert_eq!(table.text("score"), None);
    }
}
