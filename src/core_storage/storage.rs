use crate::core_storage::error::StorageError;
use chrono::{DateTime, Utc};
use filetime::FileTime;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

/// Size and modification time of a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl FileStat {
    /// Modification time in the `YYYYMMDDHHMMSS` form used by MDTM.
    pub fn mdtm(&self) -> String {
        self.modified.format("%Y%m%d%H%M%S").to_string()
    }
}

/// A single flat directory holding every file the server exposes.
///
/// Names handed to the storage are plain file names; anything that could
/// reach outside the root is refused before the filesystem is touched.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a client supplied name to a path inside the root.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_name(name) {
            warn!("Rejected file name: {:?}", name);
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    pub async fn open_read(&self, name: &str) -> Result<File, StorageError> {
        let path = self.resolve(name)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|source| StorageError::Unavailable {
                name: name.to_string(),
                source,
            })?;
        if !metadata.is_file() {
            return Err(StorageError::NotAFile(name.to_string()));
        }
        File::open(&path)
            .await
            .map_err(|source| StorageError::Unavailable {
                name: name.to_string(),
                source,
            })
    }

    /// Creates (or truncates) `name`, creating the root first if needed.
    pub async fn create_write(&self, name: &str) -> Result<File, StorageError> {
        let path = self.resolve(name)?;
        self.ensure_root().await?;
        File::create(&path)
            .await
            .map_err(|source| StorageError::CreateFailed {
                name: name.to_string(),
                source,
            })
    }

    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(StorageError::RootUnavailable)
    }

    pub async fn stat(&self, name: &str) -> Result<FileStat, StorageError> {
        let path = self.resolve(name)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|source| StorageError::Unavailable {
                name: name.to_string(),
                source,
            })?;
        if !metadata.is_file() {
            return Err(StorageError::NotAFile(name.to_string()));
        }

        let mtime = FileTime::from_last_modification_time(&metadata);
        let modified = DateTime::<Utc>::from_timestamp(mtime.unix_seconds(), 0)
            .unwrap_or_default();

        Ok(FileStat {
            size: metadata.len(),
            modified,
        })
    }

    /// Names of every entry in the root, sorted.
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(StorageError::ListUnavailable)?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(StorageError::ListUnavailable)?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == "." || name == ".." {
                continue;
            }
            names.push(name);
        }
        names.sort();
        debug!("Listed {} entries in {:?}", names.len(), self.root);
        Ok(names)
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}
