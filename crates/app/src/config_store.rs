//! In-memory config store.
//!
//! Stands in for the host's persistent store in tests and in the daemon.
//! A single [`RwLock`] guards every namespace so each batch write is one
//! critical section.

use std::collections::HashMap;
use std::sync::RwLock;

use leafcfg_domain::error::FormError;

use crate::ports::ConfigStore;

/// Errors from the in-memory store.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    /// A writer panicked while holding the lock.
    #[error("config store lock poisoned")]
    Poisoned,
}

impl From<MemoryStoreError> for FormError {
    fn from(err: MemoryStoreError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Volatile [`ConfigStore`] backed by nested hash maps.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    namespaces: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl InMemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every value stored under `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Storage`] if the lock is poisoned.
    pub fn snapshot(&self, namespace: &str) -> Result<HashMap<String, String>, FormError> {
        let namespaces = self
            .namespaces
            .read()
            .map_err(|_| MemoryStoreError::Poisoned)?;
        Ok(namespaces.get(namespace).cloned().unwrap_or_default())
    }
}

impl ConfigStore for InMemoryConfigStore {
    async fn get_params(
        &self,
        namespace: &str,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, FormError> {
        let namespaces = self
            .namespaces
            .read()
            .map_err(|_| MemoryStoreError::Poisoned)?;
        let Some(values) = namespaces.get(namespace) else {
            return Ok(HashMap::new());
        };
        Ok(keys
            .iter()
            .filter_map(|key| {
                values
                    .get(*key)
                    .map(|value| ((*key).to_string(), value.clone()))
            })
            .collect())
    }

    async fn set_params(
        &self,
        namespace: &str,
        entries: Vec<(String, String)>,
    ) -> Result<(), FormError> {
        let mut namespaces = self
            .namespaces
            .write()
            .map_err(|_| MemoryStoreError::Poisoned)?;
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .extend(entries);
        Ok(())
    }
}
