//! lark: terminal client for a speech synthesis and voice cloning service.
//!
//! Talks to the service's REST API to synthesize speech from text, clone
//! voices from sample audio, and manage the results.
//!
//! # Architecture
//!
//! Everything user-visible flows through a single [`Controller`]:
//! - **api**: the wire protocol (`reqwest` against the service endpoints)
//! - **state**: voice catalog, active selection, cloned voices, last result
//! - **controller**: validation, operations, and state updates
//! - **view**: deterministic plain-text rendering of the state
//! - **shell**: the interactive frontend; one-shot subcommands live in
//!   the binary

pub mod api;
pub mod config;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod keystore;
pub mod lark_dirs;
pub mod shell;
pub mod state;
pub mod view;

pub use api::SpeechClient;
pub use config::Config;
pub use controller::{Controller, MAX_TEXT_CHARS};
pub use error::{LarkError, Result};
pub use keystore::KeyStore;
pub use state::{ActiveVoice, SessionState, VoiceSelection};
