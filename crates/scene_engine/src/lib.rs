//! # Scene Engine
//!
//! Loads declarative XML scene documents for board-game scenes and runs them.
//!
//! ## Features
//!
//! - **Scene Documents**: ordered sections for views, lights, textures,
//!   materials, animations and a node hierarchy with inherited appearance
//! - **Keyframe Animation**: looping, eased, time-driven or cursor-driven poses
//! - **Player Cameras**: smooth transitions between the two players' views
//! - **Headless Rendering**: every draw goes through a narrow [`scene::RenderContext`]
//! - **Audio**: optional `rodio` playback of background tracks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut driver = SceneDriver::new(ViewerConfig::new("board.xml"));
//!     driver.load_file()?;
//!
//!     let mut ctx = RecordingContext::new();
//!     driver.on_graph_loaded(&mut NullPanel, &mut ctx);
//!
//!     for frame in 0..60u32 {
//!         driver.update(f64::from(frame * 20));
//!         driver.display(&mut ctx);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod document;
pub mod animation;
pub mod scene;
pub mod parser;
pub mod callbacks;
pub mod audio;
pub mod driver;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{Easing, KeyframeAnimation, Pose},
        audio::{AudioProvider, SilentAudio},
        callbacks::CallbackTable,
        config::{Config, ConfigError, ViewerConfig},
        document::{load_document, parse_document, Element},
        driver::{Control, ControlPanel, NullPanel, RecordingPanel, SceneDriver},
        foundation::math::{Color, Mat4, Vec3},
        parser::{parse_scene, parse_scene_with, ParseOptions},
        scene::{
            BindingValue, RecordingContext, RenderCommand, RenderContext, SceneDescription,
            SceneError, TraversalStats,
        },
    };
}
