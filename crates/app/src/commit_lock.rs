//! Per-namespace commit serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;

/// Hands out one async mutex per store namespace.
///
/// Commits to the same namespace queue behind each other; commits to
/// different namespaces proceed independently.
#[derive(Debug, Default)]
pub struct NamespaceLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl NamespaceLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The commit lock of `namespace`, created on first use.
    #[must_use]
    pub fn for_namespace(&self, namespace: &str) -> Arc<AsyncMutex<()>> {
        // The map only holds `Arc`s, so a poisoned guard is still consistent.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(namespace.to_string()).or_default())
    }
}
