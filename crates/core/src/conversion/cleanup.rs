//! Cleanup of uploaded payload objects.
//!
//! A [`TemporaryObject`] is a lease on one uploaded object. It is acquired as
//! soon as a conversion request names a storage key and released by
//! [`TemporaryObject::discard`] once the attempt is over. If the lease is
//! dropped without being discarded (a panic, an early return added later), a
//! best-effort delete is spawned on the current runtime.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::storage::ObjectStore;

/// Delete an uploaded object, ignoring absence. Never fails the caller.
pub async fn discard<S: ObjectStore>(store: &S, key: &str) {
    match store.delete(key).await {
        Ok(()) => debug!(storage_path = %key, "Uploaded payload removed"),
        Err(e) => warn!(storage_path = %key, error = %e, "Failed to remove uploaded payload"),
    }
}

/// Lease on an uploaded object that must be removed when the attempt ends.
pub struct TemporaryObject<S: ObjectStore + 'static> {
    store: Arc<S>,
    key: String,
    armed: bool,
}

impl<S: ObjectStore + 'static> TemporaryObject<S> {
    /// Take responsibility for deleting `key`.
    #[must_use]
    pub fn acquire(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            armed: true,
        }
    }

    /// Storage key under lease.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Delete the object and release the lease.
    pub async fn discard(mut self) {
        self.armed = false;
        discard(self.store.as_ref(), &self.key).await;
    }
}

impl<S: ObjectStore + 'static> Drop for TemporaryObject<S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let store = Arc::clone(&self.store);
        let key = std::mem::take(&mut self.key);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(storage_path = %key, "Lease dropped, scheduling payload removal");
                handle.spawn(async move { discard(store.as_ref(), &key).await });
            }
            Err(_) => {
                warn!(storage_path = %key, "Lease dropped outside a runtime, payload left in storage");
            }
        }
    }
}
