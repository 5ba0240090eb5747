//! Scene driver
//!
//! Owns a loaded scene and runs it frame by frame:
//!
//! 1. [`SceneDriver::load`] parses a document. `loaded_ok` records the outcome.
//! 2. [`SceneDriver::on_graph_loaded`] performs the one-time setup (geometry,
//!    panel controls, dropboxes, bindings, audio) and flips to ready.
//! 3. Each host tick calls [`SceneDriver::update`] then
//!    [`SceneDriver::display`]. Until ready, display draws a rotating
//!    placeholder quad instead of the scene.
//!
//! Input from the host (picks, panel changes, turn changes) arrives through
//! the remaining methods.

mod panel;

pub use panel::{Control, ControlPanel, NullPanel, RecordingPanel};

use std::path::PathBuf;

use crate::animation::{
    AnimationEvent, CameraMode, CameraStep, CameraTransition, CameraTransitionController,
};
use crate::audio::{AudioHandle, AudioProvider, SilentAudio};
use crate::callbacks::CallbackTable;
use crate::config::ViewerConfig;
use crate::document::{load_document, Element};
use crate::foundation::collections::{NodeKey, ViewKey};
use crate::foundation::time::SceneClock;
use crate::parser::{parse_scene_with, ParseOptions};
use crate::scene::{
    traversal, Appearance, BindingTarget, BindingValue, GeometryProvider, Primitive,
    RenderContext, SceneDescription, SceneError, TransitionSetup, TraversalOptions,
    TraversalStats, View,
};

/// Camera move duration when the document gives none, in seconds
pub const DEFAULT_TRANSITION_SECONDS: f32 = 1.0;

/// Runs a parsed scene
pub struct SceneDriver {
    config: ViewerConfig,
    scene: Option<SceneDescription>,
    loaded_ok: Option<bool>,
    ready: bool,
    clock: SceneClock,
    frame: u64,
    callbacks: CallbackTable,
    audio: Box<dyn AudioProvider>,
    audio_handles: Vec<AudioHandle>,
    camera: CameraTransitionController,
    camera_destination: Option<ViewKey>,
    player: u8,
}

impl SceneDriver {
    /// Driver with silent audio and no scene
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            player: config.starting_player,
            config,
            scene: None,
            loaded_ok: None,
            ready: false,
            clock: SceneClock::new(),
            frame: 0,
            callbacks: CallbackTable::new(),
            audio: Box::new(SilentAudio::new()),
            audio_handles: Vec::new(),
            camera: CameraTransitionController::new(),
            camera_destination: None,
        }
    }

    /// Use another audio provider
    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioProvider>) -> Self {
        self.audio = audio;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Named callbacks; register them before the scene runs
    pub fn callbacks_mut(&mut self) -> &mut CallbackTable {
        &mut self.callbacks
    }

    /// Parse a scene document
    ///
    /// Any previous scene is dropped first, so a failed load leaves the
    /// driver without a scene and showing the placeholder.
    pub fn load(&mut self, root: &Element) -> Result<(), SceneError> {
        self.pause_audio();
        self.scene = None;
        self.ready = false;
        self.audio_handles.clear();
        self.camera = CameraTransitionController::new();
        self.camera_destination = None;
        self.player = self.config.starting_player;

        let options = ParseOptions {
            starting_player: self.config.starting_player,
            max_lights: self.config.max_lights,
        };
        match parse_scene_with(root, options) {
            Ok(scene) => {
                log::info!(
                    "Scene \"{}\" loaded with {} warning(s)",
                    scene.setup.root_id,
                    scene.warnings.len()
                );
                self.scene = Some(scene);
                self.loaded_ok = Some(true);
                Ok(())
            }
            Err(e) => {
                self.loaded_ok = Some(false);
                Err(e)
            }
        }
    }

    /// Read and parse the document named by the configuration
    pub fn load_file(&mut self) -> Result<(), SceneError> {
        let path = self.config.scene_path();
        match load_document(&path) {
            Ok(root) => self.load(&root),
            Err(e) => {
                log::error!("Scene loading error: {}", e);
                self.scene = None;
                self.ready = false;
                self.loaded_ok = Some(false);
                Err(e.into())
            }
        }
    }

    /// Outcome of the last load; `None` before any load
    pub fn loaded_ok(&self) -> Option<bool> {
        self.loaded_ok
    }

    /// Whether the scene is set up and rendering
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Loaded scene
    pub fn scene(&self) -> Option<&SceneDescription> {
        self.scene.as_ref()
    }

    /// Loaded scene, mutable
    pub fn scene_mut(&mut self) -> Option<&mut SceneDescription> {
        self.scene.as_mut()
    }

    /// One-time setup once the graph is loaded
    ///
    /// Returns `true` only on the call that flips the driver to ready.
    pub fn on_graph_loaded(
        &mut self,
        panel: &mut dyn ControlPanel,
        geometry: &mut dyn GeometryProvider,
    ) -> bool {
        if self.ready {
            return false;
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };

        let prepared = scene.graph.prepare_leaves(geometry);

        let views = scene.views.ids().map(str::to_string).collect();
        let current = scene
            .views
            .id_of(scene.views.current_key())
            .unwrap_or_default()
            .to_string();
        panel.add_control(Control::ViewSelector { views, current });

        for (id, _, light) in scene.lights.iter() {
            panel.add_control(Control::LightToggle {
                light: id.to_string(),
                enabled: light.enabled,
            });
        }

        for (group, members) in scene.graph.dropbox_groups() {
            let mut ids = Vec::with_capacity(members.len());
            for (index, key) in members.iter().enumerate() {
                if let Some(node) = scene.graph.node_mut(*key) {
                    node.enabled = index == 0;
                    ids.push(node.id.clone());
                }
            }
            if let Some(selected) = ids.first().cloned() {
                panel.add_control(Control::Dropbox {
                    group,
                    members: ids,
                    selected,
                });
            }
        }

        let cursors: Vec<_> = scene
            .bindings
            .iter()
            .filter_map(|(_, _, binding)| binding.value.and_then(|value| binding.cursor_for(&value)))
            .collect();
        for (key, cursor) in cursors {
            if let Some(animation) = scene.animations.get_mut(key) {
                animation.update(cursor);
            }
        }

        let base_dir = PathBuf::from(&self.config.scenes_dir);
        for entry in &scene.setup.audios {
            match self.audio.preload(entry, &base_dir) {
                Ok(handle) => self.audio_handles.push(handle),
                Err(e) => log::warn!("Warning: {}", e),
            }
        }

        self.ready = true;
        log::info!("Scene ready ({} leaves prepared)", prepared);
        self.play_audio();
        true
    }

    /// Advance to a host timestamp in milliseconds
    pub fn update(&mut self, time_ms: f64) {
        let t = self.clock.update(time_ms);
        if !self.ready {
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        for (_, animation) in scene.animations.values_mut() {
            if !animation.time_update() {
                continue;
            }
            if animation.update(t) == AnimationEvent::Idle {
                continue;
            }
            if let Some(name) = animation.on_update() {
                self.callbacks.update(name, animation.current_pose());
            }
        }

        match self.camera.update(t) {
            CameraStep::Idle => {}
            CameraStep::Moving(pose) => {
                if let Some(camera) = scene.views.move_camera().and_then(|key| scene.views.get_mut(key)) {
                    camera.set_pose(&pose);
                }
            }
            CameraStep::Completed(pose) => {
                if let Some(camera) = scene.views.move_camera().and_then(|key| scene.views.get_mut(key)) {
                    camera.set_pose(&pose);
                }
                if let Some(destination) = self.camera_destination.take() {
                    scene.views.set_current(destination);
                }
                log::debug!("Camera transition finished");
            }
        }

        scene.graph.update_leaves(t);
        for leaf in scene.graph.leaves_mut() {
            if let Primitive::SpriteText(text) = &mut leaf.primitive {
                let Some(source) = text.source.clone() else {
                    continue;
                };
                if let Some(value) = self.callbacks.text(&source) {
                    text.show_value(&value);
                }
            }
        }
    }

    /// Draw one frame
    ///
    /// Returns the traversal counters when the scene was drawn, `None` when
    /// the placeholder was.
    pub fn display(&mut self, ctx: &mut dyn RenderContext) -> Option<TraversalStats> {
        self.frame += 1;
        let scene = match self.scene.as_ref() {
            Some(scene) if self.ready => scene,
            _ => {
                #[allow(clippy::cast_precision_loss)]
                let angle = -(self.frame as f32) / 10.0;
                ctx.draw_placeholder(angle);
                return None;
            }
        };

        ctx.apply_default_appearance();
        ctx.set_background(scene.illumination.background);
        ctx.set_global_ambient(scene.illumination.ambient);
        for (_, _, light) in scene.lights.iter() {
            ctx.update_light(light);
        }
        if let Some(view) = scene.views.current() {
            ctx.set_camera(view);
        }
        if scene.setup.reference_length > 0.0 {
            ctx.draw_axis(scene.setup.reference_length);
        }

        let root = scene.graph.root()?;
        let options = TraversalOptions {
            selection_enabled: self.config.selection_enabled,
            initial: Appearance::default(),
        };
        Some(traversal::render(&scene.graph, &scene.animations, root, options, ctx))
    }

    /// Handle a pick on a node
    ///
    /// Runs the node's click callback and, when selection is enabled, toggles
    /// its selected flag. Returns `false` for unknown nodes.
    pub fn pick(&mut self, node_id: &str) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(node) = scene.graph.key(node_id).and_then(|key| scene.graph.node_mut(key)) else {
            log::warn!("Warning: picked unknown node \"{}\"", node_id);
            return false;
        };
        if self.config.selection_enabled {
            node.selected = !node.selected;
        }
        if let Some(name) = node.onclick.clone() {
            self.callbacks.click(&name, node_id);
        }
        true
    }

    /// Make a view current
    pub fn select_view(&mut self, id: &str) -> bool {
        self.scene.as_mut().is_some_and(|scene| scene.views.select(id))
    }

    /// Enable or disable a light
    pub fn set_light_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let Some(light) = self
            .scene
            .as_mut()
            .and_then(|scene| scene.lights.get_by_id_mut(id))
        else {
            return false;
        };
        light.enabled = enabled;
        true
    }

    /// Write a binding value and forward it to what the binding is wired to
    pub fn set_binding(&mut self, id: &str, value: BindingValue) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(binding) = scene.bindings.get_by_id_mut(id) else {
            log::warn!("Warning: Unknown binding '{}'", id);
            return false;
        };
        binding.value = Some(value);
        let target = binding.target;
        let cursor = binding.cursor_for(&value);

        match (target, value) {
            (BindingTarget::LightEnabled(key), value) => {
                if let (Some(light), Some(scalar)) = (scene.lights.get_mut(key), value.as_scalar()) {
                    light.enabled = scalar != 0.0;
                }
            }
            (BindingTarget::LightPosition(key), BindingValue::Vector(position)) => {
                if let Some(light) = scene.lights.get_mut(key) {
                    light.set_position(position);
                }
            }
            _ => {}
        }

        if let Some((key, t)) = cursor {
            if let Some(animation) = scene.animations.get_mut(key) {
                animation.update(t);
            }
        }
        true
    }

    /// Enable one member of a dropbox group and disable the others
    pub fn choose_dropbox(&mut self, node_id: &str) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(chosen) = scene.graph.key(node_id) else {
            return false;
        };
        let Some(tag) = scene.graph.node(chosen).and_then(|node| node.dropbox.clone()) else {
            return false;
        };
        let members: Vec<NodeKey> = scene
            .graph
            .dropbox_groups()
            .into_iter()
            .find(|(group, _)| *group == tag)
            .map(|(_, members)| members)
            .unwrap_or_default();
        for key in members {
            if let Some(node) = scene.graph.node_mut(key) {
                node.enabled = key == chosen;
            }
        }
        true
    }

    /// Hand the turn to the other player and move the camera over
    ///
    /// Returns `false` when a move is already running or the player cameras
    /// are missing.
    pub fn switch_player(&mut self) -> bool {
        if self.camera.is_moving() {
            return false;
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let next = if self.player == 1 { 2 } else { 1 };
        let views = &scene.views;
        let (Some(from_key), Some(to_key), Some(move_key)) = (
            views.player_camera(self.player),
            views.player_camera(next),
            views.move_camera(),
        ) else {
            log::warn!("Warning: Players cameras not defined properly");
            return false;
        };
        let (Some(from_view), Some(to_view)) = (
            views.get(from_key).map(View::pose),
            views.get(to_key).map(View::pose),
        ) else {
            return false;
        };

        let setup = scene.setup.transition_to(next);
        let last_instant = setup.map_or(DEFAULT_TRANSITION_SECONDS, |s| s.last_instant);
        let (from, to) = setup
            .and_then(TransitionSetup::endpoints)
            .unwrap_or((from_view, to_view));

        if let Some(camera) = scene.views.get_mut(move_key) {
            camera.set_pose(&from);
        }
        scene.views.set_current(move_key);
        self.camera
            .start(CameraTransition::new(from, to, last_instant), self.clock.time());
        self.camera_destination = Some(to_key);
        self.player = next;
        log::info!("Turn passes to player {}", next);
        true
    }

    /// Player whose turn it is
    pub fn current_player(&self) -> u8 {
        self.player
    }

    /// Camera controller mode
    pub fn camera_mode(&self) -> &CameraMode {
        self.camera.mode()
    }

    /// Start every preloaded audio track
    pub fn play_audio(&mut self) {
        for handle in &self.audio_handles {
            if let Err(e) = self.audio.start(*handle) {
                log::warn!("Warning: {}", e);
            }
        }
    }

    /// Stop every preloaded audio track
    pub fn pause_audio(&mut self) {
        for handle in &self.audio_handles {
            if let Err(e) = self.audio.stop(*handle) {
                log::warn!("Warning: {}", e);
            }
        }
    }

    /// Number of audio tracks currently playing
    pub fn playing_audio(&self) -> usize {
        self.audio_handles
            .iter()
            .filter(|handle| self.audio.is_playing(**handle))
            .count()
    }

    /// Scene time in seconds
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    /// Frames displayed so far
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
