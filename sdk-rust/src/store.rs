use crate::{WalletError, WalletResult};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

pub const ENV_MODE_KEY: &str = "ENV_MODE";
pub const CUSTOM_BASE_URL_KEY: &str = "API_BASE";
pub const TOKEN_KEY: &str = "token";
pub const IDENTIFIER_KEY: &str = "mobile";

/// Durable string key-value storage backing the environment and session.
///
/// Every mutation is persisted before it returns, and reads observe the
/// latest completed write from the same process. `set_many` applies all of
/// its entries as one operation.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> WalletResult<()> {
        self.set_many(&[(key, value)])
    }
    fn set_many(&self, entries: &[(&str, &str)]) -> WalletResult<()>;
    fn remove(&self, key: &str) -> WalletResult<()>;
}

type Entries = BTreeMap<String, String>;

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local store. State lives as long as the value does, so sharing
/// one instance behind an `Arc` stands in for a restart in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> WalletResult<()> {
        let mut state = lock(&self.entries);
        for (key, value) in entries {
            state.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> WalletResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk.
///
/// The file is rewritten on every mutation through a sibling temp file and
/// a rename, so a crash leaves either the old or the new document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Open the store at `path`, loading existing state. A missing file is
    /// an empty store.
    pub fn open(path: impl Into<PathBuf>) -> WalletResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Entries::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(error) => return Err(error.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened state file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// `<data dir>/wallet-sdk/state.json` for the current user.
    pub fn default_path() -> WalletResult<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("wallet-sdk").join("state.json"))
            .ok_or_else(|| WalletError::Storage("no data directory for this user".to_string()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, apply: F) -> WalletResult<()>
    where
        F: FnOnce(&mut Entries),
    {
        let mut state = lock(&self.entries);
        let mut next = state.clone();
        apply(&mut next);
        if next == *state {
            return Ok(());
        }
        self.write(&next)?;
        *state = next;
        Ok(())
    }

    fn write(&self, entries: &Entries) -> WalletResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> WalletResult<()> {
        self.update(|state| {
            for (key, value) in entries {
                state.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove(&self, key: &str) -> WalletResult<()> {
        self.update(|state| {
            state.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_many_is_visible_together() {
        let store = MemoryStore::new();
        store
            .set_many(&[(ENV_MODE_KEY, "custom"), (CUSTOM_BASE_URL_KEY, "http://x")])
            .unwrap();
        assert_eq!(store.get(ENV_MODE_KEY).as_deref(), Some("custom"));
        assert_eq!(store.get(CUSTOM_BASE_URL_KEY).as_deref(), Some("http://x"));

        store.remove(ENV_MODE_KEY).unwrap();
        assert_eq!(store.get(ENV_MODE_KEY), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(TOKEN_KEY), None);
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(IDENTIFIER_KEY, "9999999999").unwrap();
        store.remove(TOKEN_KEY).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY), None);
        assert_eq!(reopened.get(IDENTIFIER_KEY).as_deref(), Some("9999999999"));
    }

    #[test]
    fn file_store_rejects_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let error = FileStore::open(&path).unwrap_err();
        assert!(matches!(error, WalletError::Serialization(_)));
    }
}
