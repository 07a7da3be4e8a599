use anyhow::Result;
use chrono::Local;
use clap::Parser;
use cli::{Cli, Command, ListArgs, ScrapeArgs};
use listing::{list_outputs, render_listing};
use scribe_common::observability::init_logging;
use scribe_config::{ScribeConfig, ScribeConfigLoader};
use scribe_drivers::browser::{driver::ScribeDriver, launch::BrowserOptions};
use scribe_extract::{ExtractOptions, TicketUrl, scrape_ticket};
use sink::Sink;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;

mod cli;
mod listing;
mod sink;

const DEFAULT_CONFIG_FILE: &str = "scribe.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let cfg = load_config(cli.config.as_deref())?;
    init_logging(cfg.logging.to_log_config())?;

    match cli.command {
        Command::Scrape(args) => scrape(args, &cfg).await,
        Command::List(args) => list(args, &cfg),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<ScribeConfig> {
    let loader = match explicit {
        Some(path) => ScribeConfigLoader::new().with_file(path),
        None => ScribeConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    Ok(loader.load()?)
}

fn browser_options(args: &ScrapeArgs, cfg: &ScribeConfig, nav: Duration) -> BrowserOptions {
    BrowserOptions {
        webdriver_url: args
            .webdriver
            .clone()
            .unwrap_or_else(|| cfg.browser.webdriver_url.clone()),
        headless: cfg.browser.headless && !args.headed,
        window_size: (cfg.browser.window_size[0], cfg.browser.window_size[1]),
        extra_args: cfg.browser.extra_args.clone(),
        page_load_timeout: nav,
    }
}

fn extract_options(args: &ScrapeArgs, cfg: &ScribeConfig) -> ExtractOptions {
    let cli_timeout = args.timeout.map(Duration::from_millis);
    ExtractOptions {
        navigation_timeout: cli_timeout.unwrap_or_else(|| cfg.timeouts.navigation()),
        step_timeout: cli_timeout.unwrap_or_else(|| cfg.timeouts.step()),
        title_wait: cfg.timeouts.title(),
        settle_grace: cfg.timeouts.settle(),
        timeline_events: Vec::new(),
    }
}

async fn scrape(args: ScrapeArgs, cfg: &ScribeConfig) -> Result<ExitCode> {
    if !announce(&args.url, &mut std::io::stdout())? {
        return Ok(ExitCode::FAILURE);
    }

    let options = extract_options(&args, cfg);
    let browser = browser_options(&args, cfg, options.navigation_timeout);

    let output_dir = args
        .output_dir
        .clone()
        .map(|dir| dir.unwrap_or_else(|| cfg.output.resolved_dir()));
    let sink = Sink::resolve(
        args.output.clone(),
        output_dir.as_deref(),
        Local::now().naive_local(),
    );

    let outcome = scrape_ticket(&args.url, || ScribeDriver::connect(&browser), &options).await;

    let mut out = std::io::stdout().lock();
    match outcome {
        Ok(document) => {
            sink.deliver(&document, &mut out)?;
            writeln!(out, "\nExtracted {} characters", document.chars().count())?;
            writeln!(out, "Ready for summarization!")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(target: "scribe.app", error = %err, "scrape failed");
            writeln!(out, "Failed to extract ticket content: {err}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the loading line for an acceptable URL, or the rejection, before any browser work.
fn announce(raw_url: &str, out: &mut impl Write) -> Result<bool> {
    match TicketUrl::parse(raw_url) {
        Ok(url) => {
            writeln!(out, "Loading ticket: {url}")?;
            Ok(true)
        }
        Err(err) => {
            writeln!(out, "Error: {err}")?;
            Ok(false)
        }
    }
}

fn list(args: ListArgs, cfg: &ScribeConfig) -> Result<ExitCode> {
    let dir = args.dir.unwrap_or_else(|| cfg.output.resolved_dir());
    let listing = list_outputs(&dir);
    println!("{}", render_listing(&listing)?);
    Ok(if listing.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
