//! Persistent backends for the bearer token.
//!
//! A backend holds exactly one string under a fixed key. `FileStorage`
//! writes it to the cache directory, `KeyringStorage` to the OS keychain,
//! and `MemoryStorage` keeps it in process (tests, one-shot runs).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keyring::Entry;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "graphql_profile_token";

/// Keychain service name
const SERVICE_NAME: &str = "gqlprofile";

pub trait TokenStorage {
    /// Stored value, `None` when nothing is stored or the backend is unreadable
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: &str) -> Result<()>;
    fn remove(&mut self) -> Result<()>;
}

impl<S: TokenStorage + ?Sized> TokenStorage for Box<S> {
    fn read(&self) -> Option<String> {
        (**self).read()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        (**self).write(value)
    }

    fn remove(&mut self) -> Result<()> {
        (**self).remove()
    }
}

/// Token file inside the cache directory
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileStorage {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, value).context("Failed to write token file")?;
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

/// Token entry in the OS keychain
pub struct KeyringStorage {
    entry: Entry,
}

impl KeyringStorage {
    pub fn new() -> Result<Self> {
        let entry = Entry::new(SERVICE_NAME, TOKEN_KEY).context("Failed to create keyring entry")?;
        Ok(Self { entry })
    }
}

impl TokenStorage for KeyringStorage {
    fn read(&self) -> Option<String> {
        self.entry.get_password().ok()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.entry
            .set_password(value)
            .context("Failed to store token in keychain")
    }

    fn remove(&mut self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    value: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage, as if a previous run had written `value`
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut storage = FileStorage::new(dir.path().join("nested"));
        assert!(storage.read().is_none());

        storage.write("a.b.c").expect("Failed to write token");
        assert_eq!(storage.read().as_deref(), Some("a.b.c"));
        assert!(storage.path().ends_with(TOKEN_KEY));

        storage.remove().expect("Failed to remove token");
        assert!(storage.read().is_none());
        // Removing twice is fine
        storage.remove().expect("Failed to remove missing token");
    }

    #[test]
    #[ignore = "needs an OS keychain"]
    fn test_keyring_storage_persists_across_instances() {
        let mut writer = KeyringStorage::new().expect("Failed to open keychain");
        writer.write("a.b.c").expect("Failed to write token");

        let reader = KeyringStorage::new().expect("Failed to open keychain");
        assert_eq!(reader.read().as_deref(), Some("a.b.c"));

        writer.remove().expect("Failed to remove token");
        assert!(KeyringStorage::new().unwrap().read().is_none());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::with_value("x.y.z");
        assert_eq!(storage.read().as_deref(), Some("x.y.z"));
        storage.remove().unwrap();
        assert!(storage.read().is_none());
    }
}
