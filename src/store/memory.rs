//! In-process flag; lost on restart.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{StatusStore, StoreBackend};
use crate::error::StoreError;

/// Flag held in an atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    enabled: AtomicBool,
}

impl MemoryStore {
    /// Create a store holding `initial`.
    pub fn new(initial: bool) -> Self {
        Self {
            enabled: AtomicBool::new(initial),
        }
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn read(&self) -> Result<bool, StoreError> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn write(&self, enabled: bool) -> Result<(), StoreError> {
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
    }
}
