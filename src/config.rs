//! Configuration types for the lark client.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Speech service endpoint settings.
    pub server: ServerConfig,
    /// Synthesis defaults.
    pub synthesis: SynthesisConfig,
    /// Local audio storage settings.
    pub audio: AudioConfig,
}

/// Speech service endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the speech service (scheme + host + port).
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // The service's development server listens here.
            url: "http://localhost:5500".to_owned(),
        }
    }
}

/// Synthesis defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Preset voice selected on startup.
    pub default_voice: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            default_voice: "longxiaochun_v2".to_owned(),
        }
    }
}

/// Local audio storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory where fetched audio files are saved.
    pub save_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            save_dir: crate::lark_dirs::audio_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::LarkError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LarkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`config_dir()/config.toml`).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::lark_dirs::config_file()
    }
}
