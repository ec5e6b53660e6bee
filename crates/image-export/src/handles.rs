//! Transient handles over encoded buffers
//!
//! Every intermediate buffer read by more than one stage (probe, then page
//! placement) is registered here while in use. A [`TransientHandle`] owns its
//! registration: calling [`TransientHandle::release`] or dropping it removes
//! the buffer, so an error or early return cannot leak an entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Registry {
    next_id: AtomicU64,
    entries: Mutex<HashMap<u64, Arc<[u8]>>>,
}

impl Registry {
    fn entries(&self) -> MutexGuard<'_, HashMap<u64, Arc<[u8]>>> {
        // A poisoned map is still structurally valid
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Registry of live transient buffers, shared by every export of a session
#[derive(Debug, Clone, Default)]
pub struct HandleStore {
    inner: Arc<Registry>,
}

impl HandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and return the handle that owns the registration
    pub fn acquire(&self, bytes: Vec<u8>) -> TransientHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let bytes: Arc<[u8]> = bytes.into();
        self.inner.entries().insert(id, Arc::clone(&bytes));
        log::trace!("Acquired transient handle {id} ({} bytes)", bytes.len());
        TransientHandle {
            id,
            bytes,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Number of handles acquired and not yet released
    pub fn live_count(&self) -> usize {
        self.inner.entries().len()
    }
}

/// Owning handle to a registered buffer
#[derive(Debug)]
pub struct TransientHandle {
    id: u64,
    bytes: Arc<[u8]>,
    registry: Arc<Registry>,
}

impl TransientHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Release the registration once the last consumer is done
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for TransientHandle {
    fn drop(&mut self) {
        if self.registry.entries().remove(&self.id).is_some() {
            log::trace!("Released transient handle {}", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_removes_entry() {
        let store = HandleStore::new();
        let handle = store.acquire(vec![1, 2, 3]);
        assert_eq!(store.live_count(), 1);
        assert_eq!(handle.bytes(), &[1, 2, 3]);

        handle.release();
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_drop_on_error_path_releases() {
        let store = HandleStore::new();

        let failing = || -> Result<(), &'static str> {
            let _handle = store.acquire(vec![0; 16]);
            Err("probe failed")
        };

        assert!(failing().is_err());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_ids_are_unique_across_clones() {
        let store = HandleStore::new();
        let other = store.clone();

        let a = store.acquire(vec![1]);
        let b = other.acquire(vec![2]);
        assert_ne!(a.id(), b.id());
        assert_eq!(store.live_count(), 2);

        drop(a);
        assert_eq!(other.live_count(), 1);
        b.release();
        assert_eq!(store.live_count(), 0);
    }
}
