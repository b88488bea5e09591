//! Plain-text rendering of session state for the terminal frontends.
//!
//! Every function here is a pure `state -> String` mapping, so the same
//! catalog and selection always render the same text.

use crate::api::types::{ClonedVoice, SynthesisOutcome, VoiceCatalog};
use crate::state::{ActiveVoice, VoiceSelection};

/// One-shot error notice.
#[must_use]
pub fn error_notice(message: impl std::fmt::Display) -> String {
    format!("❌ {message}")
}

/// One-shot success notice.
#[must_use]
pub fn success_notice(message: impl std::fmt::Display) -> String {
    format!("✅ {message}")
}

/// Preset voice listing. The active preset is marked with `>`; no entry
/// is marked while a custom voice is active.
#[must_use]
pub fn voice_grid(catalog: &VoiceCatalog, selection: &VoiceSelection) -> String {
    if catalog.is_empty() {
        return "  (no voices loaded)".to_owned();
    }

    let active_preset = match selection.active() {
        ActiveVoice::Preset(id) => Some(id),
        ActiveVoice::Custom(_) => None,
    };
    let width = catalog.keys().map(|id| id.chars().count()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(catalog.len());
    for (id, description) in catalog {
        let marker = if active_preset.as_deref() == Some(id) {
            '>'
        } else {
            ' '
        };
        lines.push(format!("{marker} {id:width$}  {description}"));
    }
    lines.join("\n")
}

/// Cloned voice listing, numbered for use with index selectors. The
/// active custom voice is marked with `>`.
#[must_use]
pub fn cloned_list(cloned: &[ClonedVoice], selection: &VoiceSelection) -> String {
    if cloned.is_empty() {
        return "  (no cloned voices yet)".to_owned();
    }

    let active_custom = match selection.active() {
        ActiveVoice::Custom(id) => Some(id),
        ActiveVoice::Preset(_) => None,
    };

    let mut lines = Vec::with_capacity(cloned.len());
    for (i, voice) in cloned.iter().enumerate() {
        let marker = if active_custom.as_deref() == Some(voice.voice_id.as_str()) {
            '>'
        } else {
            ' '
        };
        let created = voice
            .created_at
            .as_deref()
            .map(created_at_display)
            .unwrap_or_else(|| "-".to_owned());
        lines.push(format!(
            "{marker} {n}. {name}  [{id}]  created {created}",
            n = i + 1,
            name = voice.name,
            id = voice.voice_id,
        ));
    }
    lines.join("\n")
}

/// Details of a completed synthesis, with playback and download URLs.
#[must_use]
pub fn result_panel(outcome: &SynthesisOutcome, audio_url: &str, download_url: &str) -> String {
    let request_id = outcome.request_id.as_deref().unwrap_or("-");
    let delay = outcome
        .first_package_delay
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_owned());
    let lines = [
        format!("  voice:               {}", outcome.voice_name),
        format!("  request id:          {request_id}"),
        format!("  first package delay: {delay}"),
        format!("  play:                {audio_url}"),
        format!("  download:            {download_url}"),
    ];
    lines.join("\n")
}

/// Character counter shown while composing synthesis text.
///
/// Stays plain until the text nears the limit, then escalates.
#[must_use]
pub fn char_count_hint(len: usize, limit: usize) -> String {
    let base = format!("{len}/{limit}");
    if len > limit {
        format!("{base} (over the limit)")
    } else if len + 50 > limit {
        format!("{base} (nearly full)")
    } else if len + 100 > limit {
        format!("{base} (filling up)")
    } else {
        base
    }
}

/// Human-readable creation timestamp. Falls back to the raw server
/// string when it is not a recognizable ISO 8601 datetime.
#[must_use]
pub fn created_at_display(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(naive) = raw.parse::<chrono::NaiveDateTime>() {
        return naive.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_owned()
}
