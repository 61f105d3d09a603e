// Copyright 2026 FAQ Harvest Contributors
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use faq_harvest::cleaning::NoiseProfile;
use faq_harvest::cli::{self, export_cmd::ExportFormat, output};
use faq_harvest::config::{self, HarvestConfig};
use faq_harvest::extraction::HeadingPolicy;

#[derive(Parser)]
#[command(
    name = "faqharvest",
    about = "Extract question/answer pairs from web pages",
    version,
    after_help = "Run 'faqharvest <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Cache file (.jsonl selects the line format) [env: FAQ_HARVEST_CACHE]
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// DevTools websocket of a running headless renderer [env: FAQ_HARVEST_RENDER_WS]
    #[arg(long, global = true)]
    render_endpoint: Option<String>,

    /// Chromium binary for the full-browser tier [env: FAQ_HARVEST_CHROMIUM]
    #[arg(long, global = true)]
    chromium: Option<PathBuf>,

    /// How aggressively to strip non-content markup
    #[arg(long, global = true, value_enum)]
    noise: Option<NoiseProfile>,

    /// Which headings count as questions
    #[arg(long, global = true, value_enum)]
    headings: Option<HeadingPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract FAQs from a page (cached after the first success)
    Extract {
        /// Page URL, used verbatim as the cache key
        url: String,
    },
    /// Extract FAQs and write them in an export format
    Export {
        url: String,
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Inspect the FAQ cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Check which fetch tiers can run and whether the cache is readable
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached URLs
    List,
    /// Show cached pairs for a URL
    Show { url: String },
}

impl Cli {
    fn config(&self) -> HarvestConfig {
        let mut cfg = HarvestConfig::from_env();
        if let Some(path) = &self.cache {
            cfg.cache_path = config::resolve_cache_path(Some(path));
        }
        if let Some(endpoint) = &self.render_endpoint {
            cfg.render_endpoint = Some(endpoint.clone());
        }
        if let Some(chromium) = &self.chromium {
            cfg.chromium_path = Some(chromium.clone());
        }
        if let Some(noise) = self.noise {
            cfg.noise = noise;
        }
        if let Some(headings) = self.headings {
            cfg.headings = headings;
        }
        cfg
    }
}

fn init_tracing(cli: &Cli) {
    let default_directive = if cli.verbose {
        "faq_harvest=debug"
    } else if cli.quiet {
        "faq_harvest=error"
    } else {
        "faq_harvest=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var(output::JSON_ENV, "1");
    }
    if cli.quiet {
        std::env::set_var(output::QUIET_ENV, "1");
    }
    if cli.no_color {
        std::env::set_var(output::NO_COLOR_ENV, "1");
    }

    init_tracing(&cli);
    let cfg = cli.config();

    let result = match &cli.command {
        Commands::Extract { url } => cli::extract_cmd::run(&cfg, url).await,
        Commands::Export {
            url,
            format,
            output,
        } => cli::export_cmd::run(&cfg, url, *format, output.as_deref()).await,
        Commands::Cache { action } => match action {
            CacheAction::List => cli::cache_cmd::run_list(&cfg).await,
            CacheAction::Show { url } => cli::cache_cmd::run_show(&cfg, url).await,
        },
        Commands::Doctor => cli::doctor::run(&cfg).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "faqharvest", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if output::is_json() {
            output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
