use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const BANNER_WIDTH: usize = 50;

/// Where a finished document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    File(PathBuf),
    Terminal,
}

impl Sink {
    /// An explicit file wins; otherwise a directory gets a timestamped name.
    pub fn resolve(file: Option<PathBuf>, dir: Option<&Path>, now: NaiveDateTime) -> Self {
        match (file, dir) {
            (Some(path), _) => Sink::File(path),
            (None, Some(dir)) => Sink::File(dir.join(timestamped_name(now))),
            (None, None) => Sink::Terminal,
        }
    }

    /// Write `document` and report what happened on `out`.
    pub fn deliver(&self, document: &str, out: &mut impl Write) -> Result<()> {
        match self {
            Sink::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                fs::write(path, document)
                    .with_context(|| format!("failed to write {}", path.display()))?;

                writeln!(out, "Ticket content saved to: {}", path.display())?;
                writeln!(out, "\nTo summarize, print the file with:")?;
                writeln!(out, "cat {}", path.display())?;
                writeln!(
                    out,
                    "Then paste the output into your summarization assistant with: 'Summarize this ticket'"
                )?;
            }
            Sink::Terminal => {
                let banner = "=".repeat(BANNER_WIDTH);
                writeln!(out, "\n{banner}")?;
                writeln!(out, "{document}")?;
                writeln!(out, "\n{banner}")?;
                writeln!(
                    out,
                    "Copy the above text and paste it into your summarization assistant"
                )?;
            }
        }
        Ok(())
    }
}

/// `scraped_ticket_YYYYmmdd_HHMMSS.txt`
pub fn timestamped_name(now: NaiveDateTime) -> String {
    format!("scraped_ticket_{}.txt", now.format("%Y%m%d_%H%M%S"))
}
