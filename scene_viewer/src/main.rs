//! Headless scene viewer
//!
//! Loads a scene document, runs a fixed number of frames against a recording
//! render context and logs what each frame drew. Halfway through the run the
//! turn passes to the other player so the camera transition gets exercised.
//!
//! Usage: `scene_viewer [config.toml|config.ron]`

use std::cell::Cell;
use std::rc::Rc;

use scene_engine::foundation::logging;
use scene_engine::prelude::*;

#[derive(thiserror::Error, Debug)]
enum ViewerError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Scene(#[from] SceneError),
}

fn load_config() -> Result<ViewerConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load_from_file(&path)?,
        None => ViewerConfig::default(),
    };
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}

fn register_callbacks(callbacks: &mut CallbackTable, score: &Rc<Cell<u32>>) {
    let clicks = Rc::clone(score);
    callbacks.register_click("pieceClicked", move |node| {
        clicks.set(clicks.get() + 1);
        log::info!("Piece clicked: {}", node);
    });
    callbacks.register_click("undo", |node| log::info!("Undo requested from {}", node));

    let shown = Rc::clone(score);
    callbacks.register_text_source("score", move || shown.get().to_string());
}

#[cfg(feature = "audio")]
fn create_driver(config: ViewerConfig) -> SceneDriver {
    match scene_engine::audio::RodioAudio::new() {
        Ok(audio) => SceneDriver::new(config).with_audio(Box::new(audio)),
        Err(e) => {
            log::warn!("Falling back to silent audio: {}", e);
            SceneDriver::new(config)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn create_driver(config: ViewerConfig) -> SceneDriver {
    SceneDriver::new(config)
}

fn run(config: &ViewerConfig) -> Result<(), ViewerError> {
    let score = Rc::new(Cell::new(0));
    let mut driver = create_driver(config.clone());
    register_callbacks(driver.callbacks_mut(), &score);

    let mut ctx = RecordingContext::new();
    let mut panel = RecordingPanel::new();

    driver.load_file()?;
    driver.on_graph_loaded(&mut panel, &mut ctx);
    for control in panel.controls() {
        log::info!("Control: {:?}", control);
    }

    let halfway = config.frames / 2;
    for frame in 0..config.frames {
        ctx.clear();
        driver.update(f64::from(frame) * f64::from(config.update_period_ms));

        if frame == halfway {
            driver.pick("piece");
            driver.switch_player();
        }

        match driver.display(&mut ctx) {
            Some(stats) => log::debug!(
                "Frame {} t={:.2}s: {} nodes, {} leaves, {} appearance changes, {} commands",
                driver.frame(),
                driver.time(),
                stats.nodes_visited,
                stats.leaves_drawn,
                stats.appearance_applies,
                ctx.commands().len()
            ),
            None => log::debug!("Frame {}: loading", driver.frame()),
        }
    }

    if let Some(scene) = driver.scene() {
        log::info!(
            "Finished {} frames: {} nodes, {} warnings, player {} to move, score {}",
            driver.frame(),
            scene.graph.len(),
            scene.warnings.len(),
            driver.current_player(),
            score.get()
        );
    }
    driver.pause_audio();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config().map_err(ViewerError::from)?;

    logging::init_with_level(&config.log_level);

    log::info!("Starting scene viewer on {}", config.scene_path().display());

    if let Err(e) = run(&config) {
        log::error!("Scene viewer failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
