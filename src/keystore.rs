//! Persistent storage for the speech service API key.
//!
//! The key is kept in a plain file under the config directory
//! (`config_dir()/api_key`, mode 0600 on Unix) so it survives across
//! sessions. An empty or missing file means no key is stored.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// File-backed store for the service API key.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    /// Store rooted at the default location (`config_dir()/api_key`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: crate::lark_dirs::api_key_file(),
        }
    }

    /// Store rooted at an explicit path.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored key, if any.
    ///
    /// Whitespace is trimmed; an empty file reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let key = content.trim();
                if key.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(key.to_owned()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist a key, creating parent directories as needed.
    ///
    /// On Unix the file is restricted to owner read/write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, key.trim())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    /// Remove the stored key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Masked form of a key for display: all but the last four characters hidden.
#[must_use]
pub fn masked(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_owned();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    fn temp_store() -> (tempfile::TempDir, KeyStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::at(dir.path().join("api_key"));
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trip() {
        let (_dir, store) = temp_store();
        store.save("sk-test-1234").unwrap();
        assert_eq!(store.load().unwrap(), Some("sk-test-1234".to_owned()));
    }

    #[test]
    fn load_missing_returns_none() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn load_trims_whitespace() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "  sk-padded \n").unwrap();
        assert_eq!(store.load().unwrap(), Some("sk-padded".to_owned()));
    }

    #[test]
    fn empty_file_reads_as_none() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "\n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_removes_key() {
        let (_dir, store) = temp_store();
        store.save("sk-test").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_when_missing_is_ok() {
        let (_dir, store) = temp_store();
        assert!(store.clear().is_ok());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::at(dir.path().join("nested").join("deep").join("api_key"));
        store.save("sk-test").unwrap();
        assert_eq!(store.load().unwrap(), Some("sk-test".to_owned()));
    }

    #[cfg(unix)]
    #[test]
    fn saved_key_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        store.save("sk-test").unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn masked_hides_all_but_last_four() {
        assert_eq!(masked("sk-abcdef1234"), "****1234");
    }

    #[test]
    fn masked_short_key_is_fully_hidden() {
        assert_eq!(masked("abc"), "****");
        assert_eq!(masked("abcd"), "****");
    }
}
