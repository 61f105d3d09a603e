//! `faqharvest export <url>`: write harvested pairs in an export format.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::extract_cmd;
use crate::cli::output::{self, Styled};
use crate::config::HarvestConfig;
use crate::export;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// JSON array of {question, answer}
    Json,
    /// One chat transcript per line
    Jsonl,
}

pub async fn run(
    config: &HarvestConfig,
    url: &str,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    let report = extract_cmd::harvest(config, url).await?;
    extract_cmd::print_warnings(&report);

    let rendered = match format {
        ExportFormat::Json => {
            let mut s = export::to_json(&report.faqs)?;
            s.push('\n');
            s
        }
        ExportFormat::Jsonl => export::to_transcript_jsonl(&report.faqs)?,
    };

    let s = Styled::new();
    if report.faqs.is_empty() && !output::is_quiet() {
        eprintln!("  {} No FAQs found for {url}; exporting an empty set.", s.warn_sym());
    }

    match output_path {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !output::is_quiet() {
                eprintln!(
                    "  {} Wrote {} pair(s) to {}",
                    s.ok_sym(),
                    report.faqs.len(),
                    path.display()
                );
            }
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
