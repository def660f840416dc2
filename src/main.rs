// SPDX-License-Identifier: PMPL-1.0-or-later
//! Conformance Mapper CLI - WCAG conformance mapping and scoring

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use conformance_mapper::config::{load_config, write_default_config};
use conformance_mapper::report::{generate_error_report, generate_report, OutputFormat};
use conformance_mapper::{ComplianceLevel, Config, Mapper};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Map crawl and scan results onto the WCAG taxonomy and score them
#[derive(Parser)]
#[command(name = "conformance-mapper")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a crawl result and an accessibility scan into a conformance report
    Map {
        /// Crawl result (JSON)
        #[arg(long)]
        crawl: PathBuf,

        /// Accessibility scan result (JSON)
        #[arg(long)]
        scan: Option<PathBuf>,

        /// Configuration file (TOML or YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(long, short)]
        verbose: bool,
    },

    /// Write the default configuration
    InitConfig {
        /// Destination (.toml for TOML, anything else for YAML)
        path: PathBuf,
    },

    /// Print the compliance level for an overall score
    Level {
        /// Overall score between 0 and 100
        #[arg(allow_negative_numbers = true, value_parser = parse_score)]
        score: f64,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Parse an overall score, rejecting values outside [0, 100]
fn parse_score(raw: &str) -> Result<f64, String> {
    let score: f64 = raw.trim().parse().map_err(|_| format!("`{}` is not a number", raw))?;
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(score)
    } else {
        Err(format!("score {} is outside 0..=100", raw))
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("conformance_mapper=debug")
    } else {
        EnvFilter::new("conformance_mapper=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Map { crawl, scan, config, format, output, verbose } => {
            init_logging(verbose);

            let config = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("loading config from {}", path.display()))?,
                None => Config::default(),
            };
            let crawl = read_json(&crawl)?;
            let scan = match scan {
                Some(path) => read_json(&path)?,
                None => Value::Array(Vec::new()),
            };

            let format: OutputFormat = format.into();
            let mapper = Mapper::new(config).context("invalid configuration")?;
            match mapper.map(&crawl, &scan) {
                Ok(report) => {
                    write_output(&generate_report(&report, format), output.as_deref())?;
                }
                Err(e) => {
                    write_output(&generate_error_report(&e, format), output.as_deref())?;
                    std::process::exit(1);
                }
            }
        }

        Commands::InitConfig { path } => {
            init_logging(false);
            write_default_config(&path)
                .with_context(|| format!("writing config to {}", path.display()))?;
            eprintln!("Default configuration written to {}", path.display());
        }

        Commands::Level { score } => {
            println!("{}", ComplianceLevel::from_score(score));
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {} as JSON", path.display()))
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
