//! Persisted user preferences.
//!
//! A [`PreferencesStore`] is created once at startup from a [`Storage`]
//! backend, mutated through its methods, and writes the complete state back
//! after every change. The blob lives under a single key
//! ([`STORAGE_KEY`]) as camelCase JSON:
//!
//! ```json
//! {
//!   "selectedCategories": ["business", "technology"],
//!   "selectedSources": ["guardian", "nyt"],
//!   "excludedWriters": ["Jane Doe"],
//!   "theme": "dark"
//! }
//! ```
//!
//! # Loading
//!
//! Loading never fails. A missing or unparsable blob yields the defaults;
//! otherwise each field is validated on its own and only the invalid ones
//! fall back, so one unknown category does not cost the user their
//! excluded writers.

use crate::error::StoreError;
use crate::filter::FilterPreferences;
use crate::models::{Category, Source, Theme};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Key the preference blob is stored under.
pub const STORAGE_KEY: &str = "newshub_preferences";

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesState {
    pub selected_categories: Vec<Category>,
    pub selected_sources: Vec<Source>,
    pub excluded_writers: Vec<String>,
    pub theme: Theme,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            selected_categories: Category::ALL.to_vec(),
            selected_sources: Source::ALL.to_vec(),
            excluded_writers: Vec::new(),
            theme: Theme::default(),
        }
    }
}

impl PreferencesState {
    /// Decode a stored blob, falling back to defaults field by field.
    pub fn from_json(raw: &str) -> Self {
        let defaults = Self::default();
        let value: Value = match serde_json::from_str(raw) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) | Err(_) => {
                warn!("Stored preferences are not a JSON object; using defaults");
                return defaults;
            }
        };

        Self {
            selected_categories: field(&value, "selectedCategories")
                .unwrap_or(defaults.selected_categories),
            selected_sources: field(&value, "selectedSources").unwrap_or(defaults.selected_sources),
            excluded_writers: field(&value, "excludedWriters").unwrap_or(defaults.excluded_writers),
            theme: field(&value, "theme").unwrap_or(defaults.theme),
        }
    }

    /// The slice of these preferences that [`filter_articles`](crate::filter::filter_articles) reads.
    pub fn filter_preferences(&self) -> FilterPreferences {
        FilterPreferences::from(self)
    }
}

impl From<&PreferencesState> for FilterPreferences {
    fn from(state: &PreferencesState) -> Self {
        Self {
            excluded_writers: state.excluded_writers.clone(),
            selected_sources: state.selected_sources.clone(),
            selected_categories: state.selected_categories.clone(),
        }
    }
}

fn field<T: DeserializeOwned>(value: &Value, name: &str) -> Option<T> {
    let raw = value.get(name)?;
    match serde_json::from_value(raw.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(field = name, error = %e, "Invalid stored preference; using default");
            None
        }
    }
}

/// Key-value persistence for preference blobs.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a data directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never sees a half-written blob.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the blobs.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`: `<dir>/<key>.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote preferences");
        Ok(())
    }
}

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences bound to the storage they persist to.
#[derive(Debug)]
pub struct PreferencesStore<S: Storage> {
    storage: S,
    state: PreferencesState,
}

impl<S: Storage> PreferencesStore<S> {
    /// Restore preferences from `storage`; unreadable storage yields defaults.
    pub fn load(storage: S) -> Self {
        let state = match storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => PreferencesState::from_json(&raw),
            Ok(None) => {
                debug!("No stored preferences; using defaults");
                PreferencesState::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored preferences; using defaults");
                PreferencesState::default()
            }
        };
        info!(
            categories = state.selected_categories.len(),
            sources = state.selected_sources.len(),
            excluded_writers = state.excluded_writers.len(),
            "Loaded preferences"
        );
        Self { storage, state }
    }

    /// Current in-memory preferences. Always equal to the last successful write.
    pub fn state(&self) -> &PreferencesState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist `next` and adopt it; on a failed write the current state is kept.
    fn commit(&mut self, next: PreferencesState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&next)?;
        self.storage.write(STORAGE_KEY, &raw)?;
        self.state = next;
        Ok(())
    }

    /// Copy of the current state, changed by `edit`, then committed.
    fn update(&mut self, edit: impl FnOnce(&mut PreferencesState)) -> Result<(), StoreError> {
        let mut next = self.state.clone();
        edit(&mut next);
        self.commit(next)
    }

    /// Select `category` if it is not selected, deselect it otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the new state could not be written; the
    /// in-memory state is then left unchanged.
    pub fn toggle_category(&mut self, category: Category) -> Result<(), StoreError> {
        self.update(|state| toggle(&mut state.selected_categories, category))
    }

    /// Select `source` if it is not selected, deselect it otherwise.
    pub fn toggle_source(&mut self, source: Source) -> Result<(), StoreError> {
        self.update(|state| toggle(&mut state.selected_sources, source))
    }

    /// Replace the selected categories.
    pub fn set_categories(&mut self, categories: Vec<Category>) -> Result<(), StoreError> {
        self.update(|state| state.selected_categories = categories)
    }

    /// Replace the selected sources.
    pub fn set_sources(&mut self, sources: Vec<Source>) -> Result<(), StoreError> {
        self.update(|state| state.selected_sources = sources)
    }

    /// Add a writer to exclude.
    ///
    /// # Arguments
    ///
    /// * `writer` - Name as typed; surrounding whitespace is dropped
    ///
    /// # Returns
    ///
    /// `Ok(false)` without writing anything when the name is blank or already
    /// excluded, `Ok(true)` once the new list is stored.
    pub fn add_excluded_writer(&mut self, writer: &str) -> Result<bool, StoreError> {
        let writer = writer.trim();
        if writer.is_empty() || self.state.excluded_writers.iter().any(|w| w == writer) {
            return Ok(false);
        }
        self.update(|state| state.excluded_writers.push(writer.to_string()))?;
        Ok(true)
    }

    /// Stop excluding `writer`. Returns `false` when it was not excluded.
    pub fn remove_excluded_writer(&mut self, writer: &str) -> Result<bool, StoreError> {
        let writer = writer.trim();
        if !self.state.excluded_writers.iter().any(|w| w == writer) {
            return Ok(false);
        }
        self.update(|state| state.excluded_writers.retain(|w| w != writer))?;
        Ok(true)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.update(|state| state.theme = theme)
    }

    /// Switch between light and dark, returning the theme now in effect.
    pub fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        self.update(|state| state.theme = state.theme.toggled())?;
        Ok(self.state.theme)
    }

    /// Reset to defaults, keeping the current theme.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let theme = self.state.theme;
        self.commit(PreferencesState {
            theme,
            ..PreferencesState::default()
        })
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|i| *i == item) {
        Some(idx) => {
            items.remove(idx);
        }
        None => items.push(item),
    }
}
