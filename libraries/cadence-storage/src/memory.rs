//! In-memory preference store
//!
//! Used for ephemeral sessions and tests. Nothing survives the process.

use async_trait::async_trait;
use cadence_core::{CadenceError, PreferenceStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::StorageError;

/// [`PreferenceStore`] holding values in a map
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, Value>>,
    reject_writes: AtomicBool,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail, as a full disk would
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Copy of the stored value for `key`
    pub fn value(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        // A poisoned map is still a valid map
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_writable(&self) -> Result<(), CadenceError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteRejected("store is read-only".into()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> cadence_core::Result<Option<Value>> {
        Ok(self.value(key))
    }

    async fn set_many(&self, entries: &[(&str, Value)]) -> cadence_core::Result<()> {
        self.check_writable()?;
        let mut values = self.lock();
        for (key, value) in entries {
            values.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    async fn clear(&self) -> cadence_core::Result<()> {
        self.check_writable()?;
        self.lock().clear();
        Ok(())
    }
}
