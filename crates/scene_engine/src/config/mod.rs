//! Configuration system
//!
//! Host-side settings for loading and driving a scene: which document to
//! open, how the frame loop ticks, and how the viewer logs. Files are TOML or
//! RON, picked by extension, and are validated as soon as they are read so a
//! bad file never reaches the driver.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

mod viewer;

pub use viewer::{ViewerConfig, MAX_SUPPORTED_LIGHTS};

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format named by a file extension, ignoring case
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Settings that can be read from and written to a file
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Check that the values make sense together
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Load and validate a configuration file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Toml => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            ConfigFormat::Ron => {
                ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
        };
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Write the configuration in the format its extension names
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML/RON for the settings type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Extension other than `.toml` or `.ron`
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that deserialized but make no sense together
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("viewer.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("viewer.RON")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("viewer.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_file_is_rejected_on_load() {
        let path: PathBuf = std::env::temp_dir().join("scene_engine_invalid_viewer_config.toml");
        std::fs::write(&path, "starting_player = 5\n").unwrap();
        let result = ViewerConfig::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Invalid(message)) if message.contains("player")));
    }
}
