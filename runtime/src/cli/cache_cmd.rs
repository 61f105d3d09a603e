//! `faqharvest cache`: read-only inspection of the FAQ store.

use anyhow::{Context, Result};

use crate::cli::output;
use crate::config::HarvestConfig;
use crate::store::{self, FaqStore};

fn open(config: &HarvestConfig) -> Result<FaqStore> {
    FaqStore::try_open(store::backend_for(config))
        .with_context(|| format!("failed to read FAQ store {}", config.cache_path.display()))
}

/// List cached URLs with their pair counts.
pub async fn run_list(config: &HarvestConfig) -> Result<()> {
    let store = open(config)?;

    if output::is_json() {
        let items: Vec<serde_json::Value> = store
            .iter()
            .map(|(url, faqs)| serde_json::json!({"url": url, "pairs": faqs.len()}))
            .collect();
        output::print_json(&serde_json::json!({
            "path": store.describe(),
            "entries": items,
        }));
        return Ok(());
    }

    if store.is_empty() {
        if !output::is_quiet() {
            println!("  Cache is empty ({}).", store.describe());
        }
        return Ok(());
    }

    println!("  Cached URLs ({}):\n", store.describe());
    for (url, faqs) in store.iter() {
        println!("    {:>4}  {url}", faqs.len());
    }
    Ok(())
}

/// Print the cached pairs for one URL.
pub async fn run_show(config: &HarvestConfig, url: &str) -> Result<()> {
    let store = open(config)?;
    let Some(faqs) = store.get(url) else {
        anyhow::bail!("{url} is not cached");
    };

    if output::is_json() {
        output::print_json(&serde_json::json!({"url": url, "faqs": faqs}));
        return Ok(());
    }

    for (i, pair) in faqs.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("Q: {}", pair.question);
        println!("A: {}", pair.answer);
    }
    Ok(())
}
