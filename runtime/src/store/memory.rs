//! In-memory store backend.
//!
//! Clones share state, so a test can keep one handle and inspect what the
//! store persisted through another.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{Entries, StoreBackend};
use crate::error::{StoreError, StoreResult};

#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<Entries>>,
    saves: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every load and save fails.
    pub fn failing() -> Self {
        let backend = Self::default();
        backend.set_failing(true);
        backend
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the last saved state.
    pub fn snapshot(&self) -> Entries {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("memory backend set to fail")));
        }
        Ok(())
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> StoreResult<Entries> {
        self.check()?;
        Ok(self.snapshot())
    }

    fn save(&self, entries: &Entries) -> StoreResult<()> {
        self.check()?;
        *self.lock() = entries.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
