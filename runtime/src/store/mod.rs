//! URL-keyed FAQ cache.
//!
//! The store is loaded once, mutated only by successful extractions, and
//! flushed through its backend after every insertion. An entry is never
//! replaced: the first extraction for a URL wins.

pub mod file;
pub mod memory;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::{CacheFormat, HarvestConfig};
use crate::error::StoreResult;
use crate::types::FaqResult;

pub use file::{JsonFileBackend, JsonLinesBackend};
pub use memory::MemoryBackend;

pub type Entries = IndexMap<String, FaqResult>;

/// Durable storage behind a [`FaqStore`].
pub trait StoreBackend: Send {
    /// Read every entry. A missing store is empty, not an error.
    fn load(&self) -> StoreResult<Entries>;

    /// Replace the persisted state with `entries`.
    fn save(&self, entries: &Entries) -> StoreResult<()>;

    /// Where the data lives, for logs and `doctor`.
    fn describe(&self) -> String;
}

/// File backend matching the configured cache path's format.
pub fn backend_for(config: &HarvestConfig) -> Box<dyn StoreBackend> {
    let path = config.cache_path.clone();
    match config.cache_format() {
        CacheFormat::Json => Box::new(JsonFileBackend::new(path)),
        CacheFormat::JsonLines => Box::new(JsonLinesBackend::new(path)),
    }
}

pub struct FaqStore {
    backend: Box<dyn StoreBackend>,
    entries: Entries,
}

impl FaqStore {
    /// Load eagerly. An unreadable or malformed store degrades to empty so
    /// the pipeline always has a usable cache.
    pub fn open(backend: Box<dyn StoreBackend>) -> Self {
        let entries = match backend.load() {
            Ok(entries) => {
                debug!("loaded {} cached url(s) from {}", entries.len(), backend.describe());
                entries
            }
            Err(e) => {
                warn!("ignoring unreadable FAQ store at {}: {e}", backend.describe());
                Entries::new()
            }
        };
        Self { backend, entries }
    }

    /// Load eagerly, surfacing load errors instead of degrading.
    pub fn try_open(backend: Box<dyn StoreBackend>) -> StoreResult<Self> {
        let entries = backend.load()?;
        Ok(Self { backend, entries })
    }

    /// The URL is used verbatim.
    pub fn get(&self, url: &str) -> Option<&FaqResult> {
        self.entries.get(url)
    }

    /// Insert unless `url` is already present. Returns whether it inserted.
    pub fn put(&mut self, url: &str, result: FaqResult) -> bool {
        if self.entries.contains_key(url) {
            debug!("keeping existing entry for {url}");
            return false;
        }
        self.entries.insert(url.to_string(), result);
        true
    }

    pub fn persist(&self) -> StoreResult<()> {
        self.backend.save(&self.entries)?;
        debug!("persisted {} url(s) to {}", self.entries.len(), self.backend.describe());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FaqResult)> {
        self.entries.iter().map(|(url, faqs)| (url.as_str(), faqs))
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FaqPair;

    fn result(q: &str) -> FaqResult {
        vec![FaqPair::new(q, "answer")]
    }

    #[test]
    fn test_first_write_wins() {
        let mut store = FaqStore::open(Box::new(MemoryBackend::new()));
        assert!(store.put("https://a.test/faq", result("first?")));
        assert!(!store.put("https://a.test/faq", result("second?")));
        assert_eq!(store.get("https://a.test/faq"), Some(&result("first?")));
    }

    #[test]
    fn test_url_is_verbatim() {
        let mut store = FaqStore::open(Box::new(MemoryBackend::new()));
        store.put("https://a.test/faq", result("q?"));
        assert!(store.get("https://a.test/faq/").is_none());
        assert!(store.get("HTTPS://A.TEST/faq").is_none());
    }

    #[test]
    fn test_persist_then_reload() {
        let backend = MemoryBackend::new();
        let mut store = FaqStore::open(Box::new(backend.clone()));
        store.put("u1", result("one?"));
        store.put("u2", result("two?"));
        store.persist().unwrap();

        let reloaded = FaqStore::open(Box::new(backend));
        assert_eq!(reloaded.get("u1"), Some(&result("one?")));
        let urls: Vec<_> = reloaded.iter().map(|(u, _)| u).collect();
        assert_eq!(urls, vec!["u1", "u2"]);
    }

    #[test]
    fn test_unreadable_store_degrades_to_empty() {
        let store = FaqStore::open(Box::new(MemoryBackend::failing()));
        assert!(store.is_empty());
        assert!(FaqStore::try_open(Box::new(MemoryBackend::failing())).is_err());
    }
}
