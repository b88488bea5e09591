//! In-memory session state: voice catalog, current selection, cloned
//! voices, and the last synthesis result.

use crate::api::types::{ClonedVoice, SynthesisOutcome, VoiceCatalog};

/// Which voice the next synthesis request will use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveVoice {
    /// A preset from the voice catalog.
    Preset(String),
    /// A custom (cloned) voice ID.
    Custom(String),
}

/// Current voice choice.
///
/// Keeps the last picked preset alongside a custom-ID slot. The custom
/// slot wins whenever it is non-empty; clearing it falls back to the
/// stored preset. Exactly one of the two is active at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    preset: String,
    custom: String,
}

impl VoiceSelection {
    /// Selection starting on the given preset with no custom voice.
    pub fn new(default_preset: impl Into<String>) -> Self {
        Self {
            preset: default_preset.into(),
            custom: String::new(),
        }
    }

    /// The voice a synthesis request would use right now.
    #[must_use]
    pub fn active(&self) -> ActiveVoice {
        if self.custom.is_empty() {
            ActiveVoice::Preset(self.preset.clone())
        } else {
            ActiveVoice::Custom(self.custom.clone())
        }
    }

    /// Pick a preset voice. Clears any custom voice ID.
    pub fn select_preset(&mut self, voice_id: impl Into<String>) {
        self.preset = voice_id.into();
        self.custom.clear();
    }

    /// Set the custom voice slot. Whitespace is trimmed; an empty value
    /// clears the slot, falling back to the stored preset.
    pub fn set_custom(&mut self, voice_id: &str) {
        self.custom = voice_id.trim().to_owned();
    }

    /// Clear the custom voice slot.
    pub fn clear_custom(&mut self) {
        self.custom.clear();
    }

    /// Stored preset ID (kept even while a custom voice is active).
    #[must_use]
    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// Custom voice slot, empty when a preset is active.
    #[must_use]
    pub fn custom(&self) -> &str {
        &self.custom
    }
}

/// Everything the frontends render from.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Preset voice catalog, empty until loaded.
    pub voices: VoiceCatalog,
    /// Current voice choice.
    pub selection: VoiceSelection,
    /// Cloned voices, newest state from the server.
    pub cloned: Vec<ClonedVoice>,
    /// Most recent successful synthesis.
    pub last_result: Option<SynthesisOutcome>,
}

impl SessionState {
    /// Fresh state selecting the given default preset.
    pub fn new(default_voice: impl Into<String>) -> Self {
        Self {
            voices: VoiceCatalog::new(),
            selection: VoiceSelection::new(default_voice),
            cloned: Vec::new(),
            last_result: None,
        }
    }

    /// Resolve a cloned-voice selector: a 1-based listing index, or a
    /// verbatim voice ID.
    #[must_use]
    pub fn resolve_cloned(&self, selector: &str) -> Option<&ClonedVoice> {
        if let Ok(n) = selector.parse::<usize>() {
            if n >= 1 {
                if let Some(voice) = self.cloned.get(n - 1) {
                    return Some(voice);
                }
            }
        }
        self.cloned.iter().find(|v| v.voice_id == selector)
    }
}
