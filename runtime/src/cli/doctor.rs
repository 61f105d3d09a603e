//! Environment readiness check.

use anyhow::{Context, Result};

use crate::acquisition::{Availability, FetchCascade};
use crate::cli::output::{self, Styled};
use crate::config::HarvestConfig;
use crate::store::{self, FaqStore};

/// Report which fetch tiers can run here and whether the cache is readable.
pub async fn run(config: &HarvestConfig) -> Result<()> {
    let cascade = FetchCascade::from_config(config).context("failed to set up fetch tiers")?;
    let tiers: Vec<_> = cascade
        .tiers()
        .map(|tier| (tier.kind(), tier.probe(), tier.budget()))
        .collect();

    let cache = FaqStore::try_open(store::backend_for(config));
    let cache_path = config.cache_path.display().to_string();

    if output::is_json() {
        let tier_items: Vec<serde_json::Value> = tiers
            .iter()
            .map(|(kind, availability, budget)| {
                let (ready, reason) = match availability {
                    Availability::Ready => (true, None),
                    Availability::Unavailable(reason) => (false, Some(reason.as_str())),
                };
                serde_json::json!({
                    "tier": kind,
                    "ready": ready,
                    "reason": reason,
                    "budget_secs": budget.as_secs(),
                })
            })
            .collect();
        let cache_item = match &cache {
            Ok(store) => serde_json::json!({"path": cache_path, "ok": true, "entries": store.len()}),
            Err(e) => serde_json::json!({"path": cache_path, "ok": false, "error": e.to_string()}),
        };
        output::print_json(&serde_json::json!({
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "tiers": tier_items,
            "cache": cache_item,
        }));
        return Ok(());
    }

    let s = Styled::new();
    println!("{}", s.bold("faqharvest doctor"));
    println!();
    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    for (kind, availability, budget) in &tiers {
        match availability {
            Availability::Ready => println!(
                "{} {kind} tier ready {}",
                s.ok_sym(),
                s.dim(&format!("(budget {}s)", budget.as_secs()))
            ),
            Availability::Unavailable(reason) => {
                println!("{} {kind} tier skipped: {reason}", s.warn_sym())
            }
        }
    }

    match &cache {
        Ok(store) => println!(
            "{} Cache {cache_path}: {} url(s)",
            s.ok_sym(),
            store.len()
        ),
        Err(e) => println!(
            "{} Cache {cache_path} is unreadable and will be treated as empty: {e}",
            s.err_sym()
        ),
    }

    let available = tiers
        .iter()
        .filter(|(_, a, _)| *a == Availability::Ready)
        .count();
    println!();
    println!("Status: {available}/{} fetch tiers available", tiers.len());
    Ok(())
}
