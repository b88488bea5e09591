//! HTTP client for the speech synthesis and voice cloning service.
//!
//! Thin wrapper over the service's REST API. Validation and selection
//! logic live in [`crate::controller`]; this module only speaks the wire
//! protocol:
//!
//! - `GET /api/voices` — preset voice catalog
//! - `POST /api/synthesize` — text to speech
//! - `GET /api/audio/{filename}` / `GET /api/download/{filename}` — results
//! - `POST /api/clone-voice` — clone a voice from sample audio
//! - `GET /api/cloned-voices` — list cloned voices
//! - `DELETE /api/delete-cloned-voice/{voice_id}` — remove a cloned voice
//!
//! Mutating endpoints answer `{"success": true, ...}` on success and
//! `{"error": "..."}` with a non-2xx status on failure.

pub mod types;

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{LarkError, Result};
use types::{
    CloneOutcome, CloneRequest, ClonedVoice, SynthesisOutcome, SynthesisRequest, VoiceCatalog,
};

/// Client for the speech service REST API.
///
/// Holds a connection pool; cheap to clone. Requests carry no timeout,
/// so synthesis and cloning run until the server answers.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    base: Url,
    client: reqwest::Client,
}

impl SpeechClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| LarkError::Config(format!("invalid server URL {base_url:?}: {e}")))?;
        Ok(Self {
            base,
            client: reqwest::Client::new(),
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Fetch the preset voice catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    pub async fn voices(&self) -> Result<VoiceCatalog> {
        let url = self.endpoint("/api/voices")?;
        debug!(%url, "fetching voice catalog");
        let resp = self.client.get(url).send().await.map_err(http_err)?;
        read_plain(resp, "failed to load the voice list").await
    }

    /// Synthesize speech from text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the server reports
    /// the synthesis failed.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisOutcome> {
        let url = self.endpoint("/api/synthesize")?;
        debug!(
            voice = %request.voice,
            custom = !request.custom_voice.is_empty(),
            chars = request.text.chars().count(),
            "requesting synthesis"
        );
        let resp = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(http_err)?;
        read_envelope(resp, "speech synthesis failed").await
    }

    /// Clone a voice from a sample audio URL.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the server reports
    /// the clone failed (bad sample URL, quota, upstream rejection).
    pub async fn clone_voice(&self, request: &CloneRequest) -> Result<CloneOutcome> {
        let url = self.endpoint("/api/clone-voice")?;
        debug!(audio_url = %request.audio_url, name = %request.voice_name, "requesting voice clone");
        let resp = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(http_err)?;
        read_envelope(resp, "voice cloning failed").await
    }

    /// List cloned voices known to the server.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx response.
    pub async fn cloned_voices(&self) -> Result<Vec<ClonedVoice>> {
        let url = self.endpoint("/api/cloned-voices")?;
        let resp = self.client.get(url).send().await.map_err(http_err)?;
        read_plain(resp, "failed to load cloned voices").await
    }

    /// Delete a cloned voice by ID.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, when the voice does not
    /// exist, or when the upstream deletion fails.
    pub async fn delete_cloned_voice(&self, voice_id: &str) -> Result<()> {
        let url = self.endpoint(&format!(
            "/api/delete-cloned-voice/{}",
            urlencoding::encode(voice_id)
        ))?;
        debug!(%voice_id, "deleting cloned voice");
        let resp = self.client.delete(url).send().await.map_err(http_err)?;
        let _ack: serde_json::Value = read_envelope(resp, "delete failed").await?;
        Ok(())
    }

    /// Fetch a generated audio file into memory.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or if the file is gone.
    pub async fn fetch_audio(&self, filename: &str) -> Result<Bytes> {
        let url = self.audio_url(filename)?;
        let resp = self.client.get(url).send().await.map_err(http_err)?;
        let status = resp.status();
        let body = resp.bytes().await.map_err(http_err)?;
        if status.is_success() {
            Ok(body)
        } else {
            let text = String::from_utf8_lossy(&body);
            Err(LarkError::Api(extract_error_message(
                &text,
                "audio file not found",
            )))
        }
    }

    /// Download a generated audio file to `dest` with a progress bar.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, if the file is gone, or if
    /// `dest` cannot be written.
    pub async fn download_audio(&self, filename: &str, dest: &Path) -> Result<PathBuf> {
        let url = self.download_url(filename)?;
        let resp = self.client.get(url).send().await.map_err(http_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LarkError::Api(extract_error_message(
                &body,
                "audio file not found",
            )));
        }

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template(
            "  {msg} [{bar:30}] {bytes}/{total_bytes} {bytes_per_sec} ETA {eta}",
        ) {
            pb.set_style(style);
        }
        pb.set_message(filename.to_owned());
        if let Some(len) = resp.content_length() {
            pb.set_length(len);
        }

        // Write to a temp file then rename (atomic-ish on same filesystem).
        let tmp = dest.with_extension("part");
        let mut file = std::fs::File::create(&tmp)?;
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(http_err)?;
            file.write_all(&chunk)?;
            pb.inc(chunk.len() as u64);
        }
        pb.finish();

        std::fs::rename(&tmp, dest)?;
        Ok(dest.to_path_buf())
    }

    /// Streaming playback URL for a generated file.
    ///
    /// # Errors
    ///
    /// Returns an error if the filename produces an invalid URL.
    pub fn audio_url(&self, filename: &str) -> Result<Url> {
        self.endpoint(&format!("/api/audio/{}", urlencoding::encode(filename)))
    }

    /// Attachment download URL for a generated file.
    ///
    /// # Errors
    ///
    /// Returns an error if the filename produces an invalid URL.
    pub fn download_url(&self, filename: &str) -> Result<Url> {
        self.endpoint(&format!("/api/download/{}", urlencoding::encode(filename)))
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| LarkError::Config(format!("invalid endpoint URL {path:?}: {e}")))
    }
}

fn http_err(e: reqwest::Error) -> LarkError {
    LarkError::Http(e.to_string())
}

/// Read a plain JSON response (no `success` envelope).
async fn read_plain<T: DeserializeOwned>(resp: reqwest::Response, fallback: &str) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.map_err(http_err)?;
    if status.is_success() {
        serde_json::from_str(&body)
            .map_err(|e| LarkError::Http(format!("invalid response body: {e}")))
    } else {
        Err(LarkError::Api(extract_error_message(&body, fallback)))
    }
}

/// Read an enveloped JSON response: 2xx with `"success": true` carries the
/// payload, anything else carries an `"error"` message.
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response, fallback: &str) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await.map_err(http_err)?;
    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| LarkError::Http(format!("invalid response body: {e}")))?;
    let succeeded = value.get("success").and_then(serde_json::Value::as_bool) == Some(true);
    if status.is_success() && succeeded {
        serde_json::from_value(value)
            .map_err(|e| LarkError::Http(format!("unexpected response shape: {e}")))
    } else {
        Err(LarkError::Api(extract_error_message(&body, fallback)))
    }
}

/// Extract the server's error message from a response body, falling back
/// to an operation-specific message when the body has no usable `error`.
fn extract_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| fallback.to_owned())
}
