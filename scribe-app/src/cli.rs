use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ticket-scribe",
    version,
    about = "Extract support-ticket conversations as plain text for summarization"
)]
pub struct Cli {
    /// YAML config file; `scribe.yaml` in the working directory is used when present.
    #[arg(long, global = true, env = "SCRIBE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape one public ticket link.
    Scrape(ScrapeArgs),
    /// List previously scraped files as JSON, newest first.
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Public ticket URL (http:// or https://).
    pub url: String,

    /// Write the document to this file instead of the terminal.
    #[arg(short, long, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Write to a timestamped file in DIR, or in the configured output dir.
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pub output_dir: Option<Option<PathBuf>>,

    /// Navigation and per-step timeout in milliseconds.
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// WebDriver endpoint, overriding the config file.
    #[arg(long, value_name = "URL")]
    pub webdriver: Option<String>,

    /// Show the browser window.
    #[arg(long)]
    pub headed: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory to list; defaults to the configured output dir.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}
