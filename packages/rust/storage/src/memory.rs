//! In-process slot store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use pureextracts_shared::{PureExtractsError, Result};

use crate::SlotStore;

/// Slots held in memory for the lifetime of the process.
///
/// Clones share the same map, so two stores built from clones of one
/// `MemorySlots` observe each other's writes like two tabs sharing one
/// browser profile.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `key` already holding `value`.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let slots = Self::new();
        if let Ok(mut map) = slots.slots.lock() {
            map.insert(key.into(), value.into());
        }
        slots
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| PureExtractsError::Storage("memory slot map poisoned".into()))
    }
}

impl SlotStore for MemorySlots {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
