//! Storage Module
//!
//! Backing store abstraction for the durable caches.
//!
//! A cache instance owns exactly one `Storage` and writes it as a single
//! serialized blob per flush. Swapping `FileStorage` for another backend
//! (object store, managed KV) requires no change to cache logic.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;

// == Storage Trait ==
/// A named blob slot the durable cache persists into.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the previously saved blob, or `None` if nothing was ever saved.
    async fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Overwrites the blob atomically.
    async fn save(&self, bytes: &[u8]) -> Result<()>;
}

// == File Storage ==
/// File-backed storage: one file per cache instance.
///
/// Saves write a sibling temp file and rename it over the target, so a
/// crash mid-write never leaves a truncated blob behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

// == Memory Storage ==
/// In-memory storage, used by tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the currently saved blob, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.blob.lock().expect("storage lock poisoned").clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    async fn save(&self, bytes: &[u8]) -> Result<()> {
        *self.blob.lock().expect("storage lock poisoned") = Some(bytes.to_vec());
        Ok(())
    }
}
