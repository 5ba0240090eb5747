//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with an explicit level
///
/// Unknown level names fall back to `info`.
pub fn init_with_level(level: &str) {
    let filter = level.parse::<log::LevelFilter>().unwrap_or(log::LevelFilter::Info);
    // A second initialisation (tests, embedding hosts) is not an error here.
    let _ = env_logger::Builder::from_default_env()
        .filter_level(filter)
        .try_init();
}
