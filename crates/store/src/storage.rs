use std::{
    collections::HashMap,
    env, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;

pub const DEFAULT_STORAGE_DIR: &str = "./data";
pub const DEFAULT_STORAGE_KEY: &str = "pitchmark-storage";

/// Key-value persistence for serialized state.
#[async_trait]
pub trait Storage: Send + Sync {
    /// `None` when nothing was saved under `key` yet.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    async fn save(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub key: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let dir = env::var("PITCHMARK_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_DIR));
        let key = env::var("PITCHMARK_STORAGE_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_owned());
        Self { dir, key }
    }

    pub fn file_storage(&self) -> FileStorage {
        FileStorage::new(&self.dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

/// One `<key>.json` file per key inside a directory. Writes go to a
/// temporary file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(why) if why.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(why) => Err(why.into()),
        }
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path(key);
        let temporary = path.with_extension("json.tmp");
        tokio::fs::write(&temporary, value).await?;
        tokio::fs::rename(&temporary, &path).await?;
        log::trace!("saved {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
