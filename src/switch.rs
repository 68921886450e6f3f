//! Kill switch: the injected store plus the toggle lock.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::error::StoreError;
use crate::metrics;
use crate::store::{StatusStore, StoreBackend};

/// Shared handle to the deployment's render flag.
///
/// Toggles are serialized through one lock, so concurrent requests in this
/// process always alternate the value. Processes sharing a file or collection
/// are not coordinated.
#[derive(Clone)]
pub struct KillSwitch {
    store: Arc<dyn StatusStore>,
    toggle_lock: Arc<Mutex<()>>,
}

impl KillSwitch {
    /// Wrap a store.
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self {
            store,
            toggle_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Backend in use.
    pub fn backend(&self) -> StoreBackend {
        self.store.backend()
    }

    /// Current flag value.
    pub async fn status(&self) -> Result<bool, StoreError> {
        let start = Instant::now();
        let result = self.store.read().await;
        metrics::record_store_latency(start);

        if let Err(e) = &result {
            metrics::record_store_error();
            error!(backend = %self.backend(), error = %e, "Failed to read app status");
        }
        result
    }

    /// Negate the flag and return the new value.
    pub async fn toggle(&self) -> Result<bool, StoreError> {
        let _guard = self.toggle_lock.lock().await;

        let start = Instant::now();
        let result = async {
            let current = self.store.read().await?;
            let next = !current;
            self.store.write(next).await?;
            Ok::<_, StoreError>(next)
        }
        .await;
        metrics::record_store_latency(start);

        match &result {
            Ok(next) => info!(backend = %self.backend(), enabled = *next, "App status toggled"),
            Err(e) => {
                metrics::record_store_error();
                error!(backend = %self.backend(), error = %e, "Failed to toggle app status");
            }
        }
        result
    }
}

impl std::fmt::Debug for KillSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KillSwitch")
            .field("backend", &self.backend())
            .finish()
    }
}
