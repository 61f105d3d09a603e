//! Runtime configuration.
//!
//! Every field has a built-in default, can be overridden from the
//! environment, and is finally overridden by CLI flags in `main`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::acquisition::http_client::DEFAULT_USER_AGENT;
use crate::cleaning::NoiseProfile;
use crate::extraction::HeadingPolicy;

pub const CACHE_ENV: &str = "FAQ_HARVEST_CACHE";
pub const RENDER_WS_ENV: &str = "FAQ_HARVEST_RENDER_WS";
pub const CHROMIUM_ENV: &str = crate::renderer::chromium::CHROMIUM_ENV;
pub const STATIC_TIMEOUT_ENV: &str = "FAQ_HARVEST_STATIC_TIMEOUT";
pub const SETTLE_MS_ENV: &str = "FAQ_HARVEST_SETTLE_MS";

const CACHE_FILE: &str = "faqs.json";

/// On-disk layout of the cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheFormat {
    /// One JSON object mapping URL to pairs.
    Json,
    /// One `{"url": .., "faqs": [..]}` record per line.
    JsonLines,
}

impl CacheFormat {
    /// `.jsonl` selects JSON-lines; anything else is whole-document JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") => Self::JsonLines,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub cache_path: PathBuf,
    pub static_timeout: Duration,
    pub user_agent: String,
    /// DevTools websocket of an already-running renderer. Tier 2 is skipped
    /// when unset.
    pub render_endpoint: Option<String>,
    pub render_timeout: Duration,
    pub render_settle: Duration,
    /// Explicit Chromium binary for tier 3; discovered when unset.
    pub chromium_path: Option<PathBuf>,
    pub browser_timeout: Duration,
    pub browser_settle: Duration,
    pub noise: NoiseProfile,
    pub headings: HeadingPolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(CACHE_FILE),
            static_timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            render_endpoint: None,
            render_timeout: Duration::from_secs(20),
            render_settle: Duration::from_secs(2),
            chromium_path: None,
            browser_timeout: Duration::from_secs(30),
            browser_settle: Duration::from_secs(5),
            noise: NoiseProfile::default(),
            headings: HeadingPolicy::default(),
        }
    }
}

impl HarvestConfig {
    /// Defaults overlaid with `FAQ_HARVEST_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_path: resolve_cache_path(None),
            static_timeout: Duration::from_secs(read_env_u64(
                STATIC_TIMEOUT_ENV,
                defaults.static_timeout.as_secs(),
            )),
            render_endpoint: read_env_string(RENDER_WS_ENV).filter(|s| !s.is_empty()),
            chromium_path: read_env_string(CHROMIUM_ENV)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            browser_settle: Duration::from_millis(read_env_u64(
                SETTLE_MS_ENV,
                defaults.browser_settle.as_millis() as u64,
            )),
            ..defaults
        }
    }

    pub fn cache_format(&self) -> CacheFormat {
        CacheFormat::from_path(&self.cache_path)
    }
}

/// Cache file location: explicit path, `FAQ_HARVEST_CACHE`, `./faqs.json`
/// if it already exists, then `~/.faq-harvest/faqs.json`.
pub fn resolve_cache_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(custom) = read_env_string(CACHE_ENV) {
        if !custom.is_empty() {
            return PathBuf::from(custom);
        }
    }
    let local = PathBuf::from(CACHE_FILE);
    if local.exists() {
        return local;
    }
    dirs::home_dir()
        .map(|home| home.join(".faq-harvest").join(CACHE_FILE))
        .unwrap_or(local)
}

fn read_env_u64(name: &str, default_value: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default_value)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = HarvestConfig::default();
        assert_eq!(cfg.static_timeout, Duration::from_secs(15));
        assert_eq!(cfg.render_timeout, Duration::from_secs(20));
        assert_eq!(cfg.browser_settle, Duration::from_secs(5));
        assert_eq!(cfg.noise, NoiseProfile::Strict);
        assert_eq!(cfg.headings, HeadingPolicy::Standard);
        assert!(cfg.render_endpoint.is_none());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(CacheFormat::from_path(Path::new("faqs.json")), CacheFormat::Json);
        assert_eq!(CacheFormat::from_path(Path::new("/tmp/faqs.JSONL")), CacheFormat::JsonLines);
        assert_eq!(CacheFormat::from_path(Path::new("cache")), CacheFormat::Json);
    }

    #[test]
    fn test_explicit_cache_path_wins() {
        let path = resolve_cache_path(Some(Path::new("/tmp/custom.jsonl")));
        assert_eq!(path, PathBuf::from("/tmp/custom.jsonl"));
    }
}
