use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Storage key of the theme flag.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(PreferenceError::Corrupt(format!("unknown theme {other:?}"))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("preference storage unavailable")]
    StorageUnavailable,
    #[error("preference storage corrupt: {0}")]
    Corrupt(String),
    #[error("preference storage error: {0}")]
    Io(String),
}

/// String key/value storage that outlives the session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
    fn remove(&mut self, key: &str) -> Result<bool, PreferenceError>;
}

/// Stored theme. Missing, unreadable, or unknown values fall back to
/// `Theme::Light`.
pub fn load_theme<P: PreferenceStore + ?Sized>(store: &P) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|err| {
            warn!(%err, "ignoring stored theme");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!(%err, "theme preference unreadable");
            Theme::default()
        }
    }
}

pub fn save_theme<P: PreferenceStore + ?Sized>(store: &mut P, theme: Theme) -> Result<(), PreferenceError> {
    debug!(%theme, "saving theme");
    store.set(THEME_KEY, theme.as_str())
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSnapshot {
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    snapshot: PreferenceSnapshot,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &PreferenceSnapshot {
        &self.snapshot
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.snapshot.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.snapshot.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, PreferenceError> {
        Ok(self.snapshot.values.remove(key).is_some())
    }
}

/// Preferences kept as one JSON object in a file, rewritten on every change.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    snapshot: PreferenceSnapshot,
}

impl JsonFilePreferenceStore {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let snapshot = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => PreferenceSnapshot::default(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| PreferenceError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PreferenceSnapshot::default(),
            Err(e) => return Err(PreferenceError::Io(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, snapshot })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PreferenceError::Io(format!("{}: {e}", parent.display())))?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.snapshot).map_err(|e| PreferenceError::Io(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| PreferenceError::Io(format!("{}: {e}", self.path.display())))
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.snapshot.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.snapshot.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<bool, PreferenceError> {
        let existed = self.snapshot.values.remove(key).is_some();
        if existed {
            self.persist()?;
        }
        Ok(existed)
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{PreferenceError, PreferenceStore};

    /// Browser `localStorage`, one item per key under a common prefix.
    #[derive(Debug)]
    pub struct LocalStoragePreferenceStore {
        key_prefix: String,
    }

    impl LocalStoragePreferenceStore {
        pub fn new(key_prefix: impl Into<String>) -> Result<Self, PreferenceError> {
            window_local_storage()?;
            Ok(Self {
                key_prefix: key_prefix.into(),
            })
        }

        fn item_key(&self, key: &str) -> String {
            if self.key_prefix.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", self.key_prefix, key)
            }
        }
    }

    impl PreferenceStore for LocalStoragePreferenceStore {
        fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
            window_local_storage()?
                .get_item(&self.item_key(key))
                .map_err(|e| PreferenceError::Io(format!("get_item failed: {:?}", e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
            window_local_storage()?
                .set_item(&self.item_key(key), value)
                .map_err(|e| PreferenceError::Io(format!("set_item failed: {:?}", e)))
        }

        fn remove(&mut self, key: &str) -> Result<bool, PreferenceError> {
            let existed = self.get(key)?.is_some();
            window_local_storage()?
                .remove_item(&self.item_key(key))
                .map_err(|e| PreferenceError::Io(format!("remove_item failed: {:?}", e)))?;
            Ok(existed)
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, PreferenceError> {
        let win = web_sys::window().ok_or(PreferenceError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| PreferenceError::Io(format!("localStorage error: {:?}", e)))?
            .ok_or(PreferenceError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStoragePreferenceStore {
    pub fn new(_key_prefix: impl Into<String>) -> Result<Self, PreferenceError> {
        Err(PreferenceError::StorageUnavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for LocalStoragePreferenceStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
        Err(PreferenceError::StorageUnavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
        Err(PreferenceError::StorageUnavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<bool, PreferenceError> {
        Err(PreferenceError::StorageUnavailable)
    }
}
