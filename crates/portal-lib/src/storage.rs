// ============================
// portal-lib/src/storage.rs
// ============================
//! Two-scope key/value storage with in-memory and flat-file implementations.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::error::StorageError;

/// Name of the file holding the durable scope
pub const DURABLE_FILE: &str = "local-storage.json";

/// Storage scope a value lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Survives restarts ("remember me")
    Durable,
    /// Gone when the process ends
    Ephemeral,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::Durable, Scope::Ephemeral];
}

/// Trait for storage backends
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, scope: Scope, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a single key; absent keys are not an error
    fn remove(&self, scope: Scope, key: &str) -> Result<(), StorageError>;

    /// Remove every key in the scope
    fn clear(&self, scope: Scope) -> Result<(), StorageError>;
}

/// In-memory implementation, both scopes volatile
#[derive(Debug, Default)]
pub struct MemoryStore {
    durable: DashMap<String, String>,
    ephemeral: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn scope(&self, scope: Scope) -> &DashMap<String, String> {
        match scope {
            Scope::Durable => &self.durable,
            Scope::Ephemeral => &self.ephemeral,
        }
    }

    /// Number of keys held in a scope
    pub fn len(&self, scope: Scope) -> usize {
        self.scope(scope).len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, scope: Scope, key: &str) -> Option<String> {
        self.scope(scope).get(key).map(|v| v.value().clone())
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        self.scope(scope).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<(), StorageError> {
        self.scope(scope).remove(key);
        Ok(())
    }

    fn clear(&self, scope: Scope) -> Result<(), StorageError> {
        self.scope(scope).clear();
        Ok(())
    }
}

/// Flat-file implementation. The durable scope is mirrored to
/// `<root>/local-storage.json` on every write; the ephemeral scope is
/// kept in memory only.
#[derive(Debug)]
pub struct FlatFileStore {
    path: PathBuf,
    durable: RwLock<BTreeMap<String, String>>,
    ephemeral: DashMap<String, String>,
}

impl FlatFileStore {
    /// Open the store rooted at `root`, loading any durable state left by
    /// a previous run.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let path = root.join(DURABLE_FILE);

        let durable = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            durable: RwLock::new(durable),
            ephemeral: DashMap::new(),
        })
    }

    /// Path of the durable scope file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, durable: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(durable)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FlatFileStore {
    fn get(&self, scope: Scope, key: &str) -> Option<String> {
        match scope {
            Scope::Durable => self.durable.read().get(key).cloned(),
            Scope::Ephemeral => self.ephemeral.get(key).map(|v| v.value().clone()),
        }
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        match scope {
            Scope::Durable => {
                let mut durable = self.durable.write();
                let previous = durable.insert(key.to_string(), value.to_string());
                if let Err(err) = self.persist(&durable) {
                    // memory must not run ahead of the file
                    match previous {
                        Some(previous) => durable.insert(key.to_string(), previous),
                        None => durable.remove(key),
                    };
                    return Err(err);
                }
                Ok(())
            }
            Scope::Ephemeral => {
                self.ephemeral.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<(), StorageError> {
        match scope {
            Scope::Durable => {
                let mut durable = self.durable.write();
                let Some(previous) = durable.remove(key) else {
                    return Ok(());
                };
                if let Err(err) = self.persist(&durable) {
                    durable.insert(key.to_string(), previous);
                    return Err(err);
                }
                Ok(())
            }
            Scope::Ephemeral => {
                self.ephemeral.remove(key);
                Ok(())
            }
        }
    }

    fn clear(&self, scope: Scope) -> Result<(), StorageError> {
        match scope {
            Scope::Durable => {
                let mut durable = self.durable.write();
                // the file goes first so a failed removal leaves both sides intact
                match fs::remove_file(&self.path) {
                    Ok(()) => {}
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }
                durable.clear();
                Ok(())
            }
            Scope::Ephemeral => {
                self.ephemeral.clear();
                Ok(())
            }
        }
    }
}
