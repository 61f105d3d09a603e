//! `faqharvest extract <url>`: harvest FAQs for one page.

use anyhow::{Context, Result};

use crate::cli::output::{self, Styled};
use crate::config::HarvestConfig;
use crate::pipeline::{HarvestReport, HarvestSource, Harvester};

/// Run the pipeline for `url` behind a spinner.
pub async fn harvest(config: &HarvestConfig, url: &str) -> Result<HarvestReport> {
    let mut harvester = Harvester::from_config(config).context("failed to set up fetch tiers")?;

    let pb = output::spinner(format!("Harvesting {url}"));
    let report = harvester.harvest(url).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(report?)
}

pub async fn run(config: &HarvestConfig, url: &str) -> Result<()> {
    let report = harvest(config, url).await?;

    if output::is_json() {
        output::print_json(&serde_json::to_value(&report)?);
        return Ok(());
    }

    print_warnings(&report);

    if report.faqs.is_empty() {
        if !output::is_quiet() {
            eprintln!("  No FAQs found for {url}.");
        }
        return Ok(());
    }

    for (i, pair) in report.faqs.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("Q: {}", pair.question);
        println!("A: {}", pair.answer);
    }

    if !output::is_quiet() {
        let s = Styled::new();
        eprintln!();
        eprintln!(
            "  {} {} pair(s) {} in {}ms",
            s.ok_sym(),
            report.faqs.len(),
            describe_source(&report.source),
            report.elapsed.as_millis()
        );
    }
    Ok(())
}

/// Tier failures on stderr; they never fail the command.
pub fn print_warnings(report: &HarvestReport) {
    if output::is_quiet() {
        return;
    }
    let s = Styled::new();
    for warning in report.warnings() {
        eprintln!(
            "  {} {} tier: {}",
            s.warn_sym(),
            warning.tier,
            warning.detail.as_deref().unwrap_or("failed")
        );
    }
}

fn describe_source(source: &HarvestSource) -> String {
    match source {
        HarvestSource::Cache => "from cache".to_string(),
        HarvestSource::Fresh { tier, strategy } => {
            format!("via {tier} fetch + {strategy} strategy")
        }
        HarvestSource::NotFound => "from no tier".to_string(),
    }
}
