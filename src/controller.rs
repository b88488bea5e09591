//! Client controller: owns the session state and drives every service
//! operation.
//!
//! All user-visible behavior funnels through here so the interactive
//! shell and the one-shot CLI subcommands act identically: the same
//! validation order, the same error text, the same state updates.
//! Operations take `&mut self`, which serializes them per session; a
//! synthesis and a clone can never run concurrently on one controller.
//!
//! Validation failures return before any request is built, so a missing
//! API key or empty text never touches the network.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use url::Url;

use crate::api::SpeechClient;
use crate::api::types::{
    CloneOutcome, CloneRequest, ClonedVoice, SynthesisOutcome, SynthesisRequest,
};
use crate::config::Config;
use crate::confirm::Confirmer;
use crate::error::{LarkError, Result};
use crate::keystore::KeyStore;
use crate::state::SessionState;

/// Maximum characters the service accepts per synthesis request.
/// Measured in Unicode scalar values; the server enforces the same cap.
pub const MAX_TEXT_CHARS: usize = 500;

/// Drives the speech service on behalf of a frontend.
pub struct Controller {
    client: SpeechClient,
    state: SessionState,
    keys: KeyStore,
    api_key: Option<String>,
    confirmer: Box<dyn Confirmer + Send>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("client", &self.client)
            .field("state", &self.state)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl Controller {
    /// Build a controller from its parts. Loads any stored API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key store exists but cannot be read.
    pub fn new(
        client: SpeechClient,
        keys: KeyStore,
        default_voice: &str,
        confirmer: Box<dyn Confirmer + Send>,
    ) -> Result<Self> {
        let api_key = keys.load()?;
        Ok(Self {
            client,
            state: SessionState::new(default_voice),
            keys,
            api_key,
            confirmer,
        })
    }

    /// Build a controller for the configured server and default voice,
    /// with the key store at its default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid or the key store
    /// cannot be read.
    pub fn from_config(config: &Config, confirmer: Box<dyn Confirmer + Send>) -> Result<Self> {
        let client = SpeechClient::new(&config.server.url)?;
        Self::new(
            client,
            KeyStore::new(),
            &config.synthesis.default_voice,
            confirmer,
        )
    }

    /// Current session state, for rendering.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The API client, for URL resolution.
    #[must_use]
    pub fn client(&self) -> &SpeechClient {
        &self.client
    }

    /// Fetch the preset voice catalog into the session.
    ///
    /// # Errors
    ///
    /// Returns a retry hint on any failure; the underlying cause goes to
    /// the log. The previous catalog is kept.
    pub async fn load_voices(&mut self) -> Result<()> {
        match self.client.voices().await {
            Ok(catalog) => {
                info!(count = catalog.len(), "voice catalog loaded");
                self.state.voices = catalog;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "voice catalog fetch failed");
                Err(LarkError::Api(
                    "failed to load the voice list, try again".to_owned(),
                ))
            }
        }
    }

    /// Select a preset voice from the catalog. Clears any custom voice.
    ///
    /// # Errors
    ///
    /// Returns [`LarkError::UnknownVoice`] if the ID is not in the
    /// loaded catalog.
    pub fn select_voice(&mut self, voice_id: &str) -> Result<()> {
        if !self.state.voices.contains_key(voice_id) {
            return Err(LarkError::UnknownVoice(voice_id.to_owned()));
        }
        self.state.selection.select_preset(voice_id);
        Ok(())
    }

    /// Set the custom voice slot directly. An empty value clears it,
    /// falling back to the stored preset.
    pub fn set_custom_voice(&mut self, voice_id: &str) {
        self.state.selection.set_custom(voice_id);
    }

    /// Synthesize speech from `text` with the active voice.
    ///
    /// The result is stored as the session's last result on success.
    ///
    /// # Errors
    ///
    /// Fails fast, without a request, when the API key is missing, the
    /// trimmed text is empty, or the text exceeds [`MAX_TEXT_CHARS`].
    /// Otherwise returns transport or server-reported failures.
    pub async fn synthesize(&mut self, text: &str) -> Result<SynthesisOutcome> {
        let api_key = self.require_api_key()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(LarkError::EmptyText);
        }
        let len = text.chars().count();
        if len > MAX_TEXT_CHARS {
            return Err(LarkError::TextTooLong {
                len,
                limit: MAX_TEXT_CHARS,
            });
        }

        let request = SynthesisRequest {
            text: text.to_owned(),
            voice: self.state.selection.preset().to_owned(),
            custom_voice: self.state.selection.custom().to_owned(),
            api_key,
        };
        let outcome = self.client.synthesize(&request).await?;
        info!(filename = %outcome.filename, voice = %outcome.voice_name, "synthesis complete");
        self.state.last_result = Some(outcome.clone());
        Ok(outcome)
    }

    /// Clone a voice from a sample audio URL.
    ///
    /// On success the cloned-voice list is refreshed; a refresh failure
    /// only logs, the clone itself already succeeded.
    ///
    /// # Errors
    ///
    /// Fails fast, without a request, when the API key, audio URL, or
    /// voice name is missing. Otherwise returns transport or
    /// server-reported failures.
    pub async fn clone_voice(&mut self, audio_url: &str, voice_name: &str) -> Result<CloneOutcome> {
        let api_key = self.require_api_key()?;
        let audio_url = audio_url.trim();
        if audio_url.is_empty() {
            return Err(LarkError::MissingAudioUrl);
        }
        let voice_name = voice_name.trim();
        if voice_name.is_empty() {
            return Err(LarkError::MissingVoiceName);
        }

        let request = CloneRequest {
            audio_url: audio_url.to_owned(),
            voice_name: voice_name.to_owned(),
            api_key,
        };
        let outcome = self.client.clone_voice(&request).await?;
        info!(voice_id = %outcome.voice_id, "voice cloned");
        if let Err(e) = self.load_cloned().await {
            warn!(error = %e, "cloned voice list refresh failed");
        }
        Ok(outcome)
    }

    /// Fetch the cloned-voice list into the session.
    ///
    /// # Errors
    ///
    /// Returns transport or server-reported failures. The previous list
    /// is kept on failure.
    pub async fn load_cloned(&mut self) -> Result<()> {
        self.state.cloned = self.client.cloned_voices().await?;
        Ok(())
    }

    /// Make a cloned voice the active one. `selector` is a 1-based
    /// listing index or a verbatim voice ID.
    ///
    /// # Errors
    ///
    /// Returns [`LarkError::UnknownVoice`] if nothing matches.
    pub fn use_cloned(&mut self, selector: &str) -> Result<ClonedVoice> {
        let voice = self
            .state
            .resolve_cloned(selector)
            .cloned()
            .ok_or_else(|| LarkError::UnknownVoice(selector.to_owned()))?;
        self.state.selection.set_custom(&voice.voice_id);
        Ok(voice)
    }

    /// Delete a cloned voice after confirmation.
    ///
    /// Returns `Ok(None)` when the confirmer declines; nothing is sent
    /// in that case. On success the cloned-voice list is refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`LarkError::UnknownVoice`] if nothing matches the
    /// selector, or transport/server failures from the deletion.
    pub async fn delete_cloned(&mut self, selector: &str) -> Result<Option<ClonedVoice>> {
        let voice = self
            .state
            .resolve_cloned(selector)
            .cloned()
            .ok_or_else(|| LarkError::UnknownVoice(selector.to_owned()))?;
        let prompt = format!("delete cloned voice {} [{}]?", voice.name, voice.voice_id);
        if !self.confirmer.confirm(&prompt) {
            return Ok(None);
        }

        self.client.delete_cloned_voice(&voice.voice_id).await?;
        info!(voice_id = %voice.voice_id, "cloned voice deleted");
        if let Err(e) = self.load_cloned().await {
            warn!(error = %e, "cloned voice list refresh failed");
        }
        Ok(Some(voice))
    }

    /// Persist an API key and use it for this session.
    ///
    /// # Errors
    ///
    /// Returns [`LarkError::EmptyApiKey`] for a blank key, or an I/O
    /// error if the store cannot be written.
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(LarkError::EmptyApiKey);
        }
        self.keys.save(key)?;
        self.api_key = Some(key.to_owned());
        Ok(())
    }

    /// Remove the stored API key.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the store cannot be cleared.
    pub fn clear_api_key(&mut self) -> Result<()> {
        self.keys.clear()?;
        self.api_key = None;
        Ok(())
    }

    /// Whether an API key is available for requests.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Masked form of the current key, for display.
    #[must_use]
    pub fn api_key_display(&self) -> Option<String> {
        self.api_key.as_deref().map(crate::keystore::masked)
    }

    /// Playback and download URLs for a synthesis result.
    ///
    /// # Errors
    ///
    /// Returns an error if the filename produces an invalid URL.
    pub fn result_urls(&self, outcome: &SynthesisOutcome) -> Result<(Url, Url)> {
        Ok((
            self.client.audio_url(&outcome.filename)?,
            self.client.download_url(&outcome.filename)?,
        ))
    }

    /// Download the last synthesis result into `dir`, keeping the
    /// server-side filename.
    ///
    /// # Errors
    ///
    /// Returns [`LarkError::NoResult`] when nothing has been
    /// synthesized, [`LarkError::Api`] when the server-side filename is
    /// not a bare file name, or a transport/filesystem error from the
    /// download.
    pub async fn save_last_audio(&self, dir: &Path) -> Result<PathBuf> {
        let result = self.state.last_result.as_ref().ok_or(LarkError::NoResult)?;
        let dest = dir.join(bare_file_name(&result.filename)?);
        self.client.download_audio(&result.filename, &dest).await
    }

    fn require_api_key(&self) -> Result<String> {
        self.api_key.clone().ok_or(LarkError::MissingApiKey)
    }
}

/// The server names the result file, and that name is joined onto a
/// local directory, so anything other than a single normal path
/// component is refused before it can reach the filesystem.
fn bare_file_name(filename: &str) -> Result<&str> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(name)), None) if name == filename => Ok(filename),
        _ => Err(LarkError::Api(format!(
            "server sent an unusable audio filename: {filename:?}"
        ))),
    }
}
