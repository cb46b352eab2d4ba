use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::themes::ThemeName;
use crate::error::{JournalError, JournalResult};

pub const DARK_MODE_KEY: &str = "dark_mode";
pub const FONT_SIZE_KEY: &str = "font_size";

pub const DEFAULT_FONT_SIZE: u8 = 12;
pub const MIN_FONT_SIZE: u8 = 12;
pub const MAX_FONT_SIZE: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
}

/// Key-value settings capability injected into callers.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<PreferenceValue>;

    fn set(&mut self, key: &str, value: PreferenceValue) -> JournalResult<()>;

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(PreferenceValue::Bool(value)) => value,
            _ => default,
        }
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(PreferenceValue::Int(value)) => value,
            _ => default,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, PreferenceValue>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: PreferenceValue) -> JournalResult<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Preferences persisted as a flat TOML table.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, PreferenceValue>,
}

impl TomlPreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> JournalResult<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).map_err(|err| JournalError::Corrupt {
                path: path.clone(),
                message: err.to_string(),
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(JournalError::storage("reading preferences", path, err)),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, PreferenceValue>) -> JournalResult<()> {
        let raw = toml::to_string(values).map_err(|err| JournalError::Corrupt {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| JournalError::storage("creating preferences dir", parent, err))?;
        }
        let tmp_path = self.path.with_extension("toml.tmp");
        if let Err(err) = fs::write(&tmp_path, raw) {
            let _ = fs::remove_file(&tmp_path);
            return Err(JournalError::storage("writing preferences", tmp_path, err));
        }
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(JournalError::storage("replacing preferences", &self.path, err));
        }
        Ok(())
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Option<PreferenceValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: PreferenceValue) -> JournalResult<()> {
        let mut next = self.values.clone();
        next.insert(key.to_owned(), value);
        self.persist(&next)?;
        self.values = next;
        tracing::debug!(key, ?value, "updated preference");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub dark_mode: bool,
    pub font_size: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Settings {
    pub fn load(store: &impl PreferenceStore) -> Self {
        let font_size = store.get_int(FONT_SIZE_KEY, i64::from(DEFAULT_FONT_SIZE));
        Self {
            dark_mode: store.get_bool(DARK_MODE_KEY, false),
            font_size: clamp_font_size(font_size),
        }
    }

    pub fn theme(&self) -> ThemeName {
        ThemeName::from_dark_mode(self.dark_mode)
    }
}

pub fn set_dark_mode(store: &mut impl PreferenceStore, enabled: bool) -> JournalResult<()> {
    store.set(DARK_MODE_KEY, PreferenceValue::Bool(enabled))
}

/// Stores the clamped size and returns it.
pub fn set_font_size(store: &mut impl PreferenceStore, size: i64) -> JournalResult<u8> {
    let size = clamp_font_size(size);
    store.set(FONT_SIZE_KEY, PreferenceValue::Int(i64::from(size)))?;
    Ok(size)
}

fn clamp_font_size(size: i64) -> u8 {
    size.clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn unset_preferences_use_defaults() {
        let store = MemoryPreferenceStore::default();
        let settings = Settings::load(&store);
        assert_eq!(settings, Settings::default());
        assert!(!settings.dark_mode);
        assert_eq!(settings.font_size, 12);
        assert_eq!(settings.theme(), ThemeName::Light);
    }

    #[test]
    fn font_size_is_clamped_on_write_and_read() -> anyhow::Result<()> {
        let mut store = MemoryPreferenceStore::default();
        assert_eq!(set_font_size(&mut store, 40)?, 24);
        assert_eq!(Settings::load(&store).font_size, 24);
        assert_eq!(set_font_size(&mut store, 3)?, 12);

        store.set(FONT_SIZE_KEY, PreferenceValue::Int(99))?;
        assert_eq!(Settings::load(&store).font_size, 24);
        Ok(())
    }

    #[test]
    fn mistyped_values_fall_back_to_defaults() -> anyhow::Result<()> {
        let mut store = MemoryPreferenceStore::default();
        store.set(DARK_MODE_KEY, PreferenceValue::Int(1))?;
        store.set(FONT_SIZE_KEY, PreferenceValue::Bool(true))?;
        assert_eq!(Settings::load(&store), Settings::default());
        Ok(())
    }

    #[test]
    fn toml_store_persists_across_reopen() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("preferences.toml");
        {
            let mut store = TomlPreferenceStore::open(&path)?;
            set_dark_mode(&mut store, true)?;
            set_font_size(&mut store, 18)?;
        }
        let store = TomlPreferenceStore::open(&path)?;
        let settings = Settings::load(&store);
        assert!(settings.dark_mode);
        assert_eq!(settings.font_size, 18);
        assert_eq!(settings.theme(), ThemeName::Dark);

        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("dark_mode = true"));
        assert!(raw.contains("font_size = 18"));
        Ok(())
    }

    #[test]
    fn failed_persist_keeps_memory_and_disk_unchanged() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("preferences.toml");
        let mut store = TomlPreferenceStore::open(&path)?;
        fs::create_dir(&path)?;
        fs::write(path.join("occupied"), "x")?;

        assert_matches!(
            set_dark_mode(&mut store, true),
            Err(JournalError::Storage { .. })
        );
        assert_eq!(store.get(DARK_MODE_KEY), None);
        assert!(!temp.path().join("preferences.toml.tmp").exists());
        Ok(())
    }

    #[test]
    fn corrupt_preferences_file_is_reported() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("preferences.toml");
        fs::write(&path, "dark_mode = [")?;
        assert_matches!(
            TomlPreferenceStore::open(&path),
            Err(JournalError::Corrupt { .. })
        );
        Ok(())
    }
}
