use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ConfigPaths, StorageOptions};
use crate::error::{JournalError, JournalResult};

mod key;

pub use key::{key_for, NoteKey};

const TMP_EXTENSION: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub key: NoteKey,
    pub content: String,
}

/// Flat directory holding one plain-text file per calendar day.
#[derive(Debug, Clone)]
pub struct NoteStore {
    root: Arc<PathBuf>,
    options: Arc<StorageOptions>,
}

impl NoteStore {
    pub fn open(root: impl Into<PathBuf>, options: &StorageOptions) -> JournalResult<Self> {
        let root = root.into();
        create_private_dir(&root)?;
        let store = Self {
            root: Arc::new(root),
            options: Arc::new(options.clone()),
        };
        store.sweep_stale_writes()?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn save(&self, key: &NoteKey, content: &str) -> JournalResult<()> {
        let final_path = self.record_path(key);
        let tmp_path = final_path.with_extension(TMP_EXTENSION);
        if let Err(err) = self.write_tmp(&tmp_path, content) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
        if let Err(source) = fs::rename(&tmp_path, &final_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(JournalError::storage("replacing note", final_path, source));
        }
        tracing::debug!(key = %key, bytes = content.len(), "saved note");
        Ok(())
    }

    pub fn load(&self, key: &NoteKey) -> JournalResult<Option<String>> {
        let path = self.record_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(key = %key, bytes = content.len(), "loaded note");
                Ok(Some(content))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "no note recorded");
                Ok(None)
            }
            Err(err) => Err(JournalError::storage("reading note", path, err)),
        }
    }

    pub fn load_record(&self, key: &NoteKey) -> JournalResult<Option<NoteRecord>> {
        Ok(self.load(key)?.map(|content| NoteRecord {
            key: key.clone(),
            content,
        }))
    }

    pub fn delete(&self, key: &NoteKey) -> JournalResult<bool> {
        let path = self.record_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(key = %key, "deleted note");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(JournalError::storage("deleting note", path, err)),
        }
    }

    fn record_path(&self, key: &NoteKey) -> PathBuf {
        self.root.join(key.as_str())
    }

    fn write_tmp(&self, tmp_path: &Path, content: &str) -> JournalResult<()> {
        let mut file = File::create(tmp_path)
            .map_err(|err| JournalError::storage("creating temporary note", tmp_path, err))?;
        file.write_all(content.as_bytes())
            .map_err(|err| JournalError::storage("writing temporary note", tmp_path, err))?;
        if self.options.sync_writes {
            file.sync_all()
                .map_err(|err| JournalError::storage("syncing temporary note", tmp_path, err))?;
        }
        Ok(())
    }

    fn sweep_stale_writes(&self) -> JournalResult<()> {
        let entries = fs::read_dir(&*self.root)
            .map_err(|err| JournalError::storage("listing notes directory", &*self.root, err))?;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(?err, "skipping unreadable notes entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TMP_EXTENSION) {
                continue;
            }
            tracing::warn!("removing interrupted note write {}", path.display());
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(JournalError::storage("removing stale write", path, err)),
            }
        }
        Ok(())
    }
}

pub fn init(paths: &ConfigPaths, options: &StorageOptions) -> JournalResult<NoteStore> {
    let root = if options.notes_dir.as_os_str().is_empty() {
        paths.notes_dir.clone()
    } else {
        options.notes_dir.clone()
    };
    NoteStore::open(root, options)
}

#[cfg(unix)]
fn create_private_dir(path: &Path) -> JournalResult<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
        .map_err(|err| JournalError::storage("creating notes directory", path, err))
}

#[cfg(not(unix))]
fn create_private_dir(path: &Path) -> JournalResult<()> {
    fs::create_dir_all(path)
        .map_err(|err| JournalError::storage("creating notes directory", path, err))
}
