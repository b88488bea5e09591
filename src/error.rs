//! Error types for the lark client.

/// Top-level error type for the speech service client.
///
/// Display strings double as the user-facing notice text, so they are
/// written as full sentences a terminal user can act on.
#[derive(Debug, thiserror::Error)]
pub enum LarkError {
    /// No API key in the key store or the current session.
    #[error("configure an API key first (`/key <VALUE>` or `lark key set <VALUE>`)")]
    MissingApiKey,

    /// Synthesis text was empty after trimming.
    #[error("enter some text to synthesize")]
    EmptyText,

    /// Synthesis text exceeded the service limit.
    #[error("text is {len} characters, the limit is {limit}")]
    TextTooLong { len: usize, limit: usize },

    /// An API key was given but empty.
    #[error("enter an API key")]
    EmptyApiKey,

    /// Voice selector did not match the catalog or the cloned list.
    #[error("unknown voice {0:?}, run /voices or /cloned to see what is available")]
    UnknownVoice(String),

    /// An operation needed a synthesis result and none exists yet.
    #[error("nothing synthesized yet")]
    NoResult,

    /// Clone request was missing the source audio URL.
    #[error("provide an audio file URL to clone from")]
    MissingAudioUrl,

    /// Clone request was missing a name for the new voice.
    #[error("provide a name for the cloned voice")]
    MissingVoiceName,

    /// Transport-level failure (connect, read, TLS, invalid body).
    #[error("network error: {0}")]
    Http(String),

    /// The server answered with an application error.
    #[error("{0}")]
    Api(String),

    /// Configuration file error.
    #[error("config error: {0}")]
    Config(String),

    /// Key store or filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for lark operations.
pub type Result<T> = std::result::Result<T, LarkError>;
