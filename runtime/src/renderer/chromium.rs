//! Chromium discovery and launch configuration.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chromiumoxide::browser::BrowserConfig;

/// Environment override for the Chromium binary.
pub const CHROMIUM_ENV: &str = "FAQ_HARVEST_CHROMIUM";

/// Find a Chromium binary: explicit path, `FAQ_HARVEST_CHROMIUM`,
/// `~/.faq-harvest/chromium/`, then the system `PATH`.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    if let Ok(p) = std::env::var(CHROMIUM_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let base = home.join(".faq-harvest/chromium");
        let candidates = if cfg!(target_os = "macos") {
            vec![
                base.join("chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                base.join("chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                base.join("chrome"),
            ]
        } else {
            vec![base.join("chrome-linux64/chrome"), base.join("chrome")]
        };
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Headless launch configuration for a single fetch.
pub fn launch_config(executable: &Path) -> Result<BrowserConfig> {
    BrowserConfig::builder()
        .chrome_executable(executable)
        .arg("--headless=new")
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-extensions")
        .arg("--disable-background-networking")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))
}
