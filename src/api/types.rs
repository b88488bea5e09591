//! Request and response payloads for the speech service API.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Preset voice catalog: voice ID mapped to a human-readable description.
///
/// A `BTreeMap` keeps iteration order stable, so rendered listings are
/// deterministic for a given catalog.
pub type VoiceCatalog = BTreeMap<String, String>;

/// Body for `POST /api/synthesize`.
///
/// Both `voice` and `custom_voice` are always sent; the server prefers
/// `custom_voice` whenever it is non-empty.
#[derive(Clone, Serialize)]
pub struct SynthesisRequest {
    /// Text to synthesize.
    pub text: String,
    /// Preset voice ID.
    pub voice: String,
    /// Custom (cloned) voice ID, or empty when a preset is active.
    pub custom_voice: String,
    /// Service API key.
    pub api_key: String,
}

impl fmt::Debug for SynthesisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynthesisRequest")
            .field("text", &self.text)
            .field("voice", &self.voice)
            .field("custom_voice", &self.custom_voice)
            .finish()
    }
}

/// Successful response from `POST /api/synthesize`.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisOutcome {
    /// Server-side filename of the generated audio.
    pub filename: String,
    /// Voice the server actually used.
    #[serde(default)]
    pub voice_name: String,
    /// Backend request ID, when the server reports one.
    #[serde(default)]
    pub request_id: Option<String>,
    /// First-package latency, when the server reports one.
    #[serde(default)]
    pub first_package_delay: Option<FirstPackageDelay>,
}

/// First-package latency as reported by the synthesis backend.
///
/// Older deployments send a bare millisecond number; newer ones may
/// preformat the value as text. Both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FirstPackageDelay {
    /// Milliseconds.
    Millis(f64),
    /// Preformatted text, shown as-is.
    Text(String),
}

impl fmt::Display for FirstPackageDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millis(ms) if ms.fract() == 0.0 => write!(f, "{ms:.0}ms"),
            Self::Millis(ms) => write!(f, "{ms}ms"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Body for `POST /api/clone-voice`.
#[derive(Clone, Serialize)]
pub struct CloneRequest {
    /// Publicly reachable URL of the sample audio to clone from.
    pub audio_url: String,
    /// Display name for the new voice.
    pub voice_name: String,
    /// Service API key.
    pub api_key: String,
}

impl fmt::Debug for CloneRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneRequest")
            .field("audio_url", &self.audio_url)
            .field("voice_name", &self.voice_name)
            .finish()
    }
}

/// Successful response from `POST /api/clone-voice`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloneOutcome {
    /// Service-assigned ID of the new voice, usable as a custom voice.
    pub voice_id: String,
    /// Display name echoed back by the server.
    #[serde(default)]
    pub voice_name: String,
    /// Backend request ID, when the server reports one.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// One entry from `GET /api/cloned-voices`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClonedVoice {
    /// Service-assigned voice ID.
    pub voice_id: String,
    /// Display name given at clone time.
    pub name: String,
    /// Creation timestamp (ISO 8601), when the server reports one.
    #[serde(default)]
    pub created_at: Option<String>,
}
