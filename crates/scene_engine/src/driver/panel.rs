//! Control panel collaborator
//!
//! The driver registers its controls once the graph has loaded. Widgets and
//! their change events belong to the host, which reports changes back
//! through [`SceneDriver`](super::SceneDriver) methods.

/// One registered control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Selector over view ids
    ViewSelector {
        /// Selectable view ids
        views: Vec<String>,
        /// Initially selected view
        current: String,
    },
    /// Enable toggle for one light
    LightToggle {
        /// Light id
        light: String,
        /// Initial state
        enabled: bool,
    },
    /// Mutually exclusive choice among nodes sharing a dropbox tag
    Dropbox {
        /// Dropbox tag
        group: String,
        /// Member node ids, document order
        members: Vec<String>,
        /// Initially enabled member
        selected: String,
    },
}

/// Host control panel
pub trait ControlPanel {
    /// Register a control
    fn add_control(&mut self, control: Control);
}

/// Panel that shows nothing
#[derive(Debug, Default)]
pub struct NullPanel;

impl ControlPanel for NullPanel {
    fn add_control(&mut self, _control: Control) {}
}

/// Panel that keeps the registered controls
#[derive(Debug, Default)]
pub struct RecordingPanel {
    controls: Vec<Control>,
}

impl RecordingPanel {
    /// Empty panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls registered so far
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }
}

impl ControlPanel for RecordingPanel {
    fn add_control(&mut self, control: Control) {
        log::debug!("Registered control {:?}", control);
        self.controls.push(control);
    }
}
