//! Centralized application directory paths for lark.
//!
//! Provides a single source of truth for all filesystem paths used by the
//! client. Uses the [`dirs`] crate for platform-appropriate directory
//! resolution, which is sandbox-transparent on macOS (returns
//! container-relative paths under App Sandbox automatically).
//!
//! # Directory Layout
//!
//! | Purpose | macOS (sandbox) | Linux |
//! |---------|----------------|-------|
//! | App data | `~/Library/Application Support/lark/` | `~/.local/share/lark/` |
//! | Config | `~/Library/Application Support/lark/` | `~/.config/lark/` |
//!
//! # Environment Overrides
//!
//! All paths can be overridden for testing or custom deployments:
//! - `LARK_DATA_DIR` — overrides [`data_dir`]
//! - `LARK_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Used for persistent user data: saved audio files.
///
/// Resolves to `dirs::data_dir()/lark/` by default. Override with
/// the `LARK_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("LARK_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("lark"))
        .unwrap_or_else(|| PathBuf::from("/tmp/lark-data"))
}

/// Application config directory.
///
/// Used for `config.toml` and the stored API key.
///
/// Resolves to `dirs::config_dir()/lark/` by default. Override with
/// the `LARK_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("LARK_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("lark"))
        .unwrap_or_else(|| PathBuf::from("/tmp/lark-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Stored API key path (`config_dir()/api_key`).
#[must_use]
pub fn api_key_file() -> PathBuf {
    config_dir().join("api_key")
}

/// Saved audio directory (`data_dir()/audio/`).
///
/// Synthesized audio fetched from the server is written here.
#[must_use]
pub fn audio_dir() -> PathBuf {
    data_dir().join("audio")
}
