use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// One scraped document in the output directory.
#[derive(Debug, Serialize)]
pub struct OutputFile {
    pub name: String,
    pub size: u64,
    pub modified: String,
    pub url: String,
    #[serde(skip)]
    modified_at: SystemTime,
}

#[derive(Debug, Serialize)]
pub struct Listing {
    pub files: Vec<OutputFile>,
}

/// Regular, non-hidden files in `dir`, newest first. `index.html` is skipped.
pub fn list_outputs(dir: &Path) -> Result<Listing> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name == "index.html" {
            continue;
        }
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let modified_at = meta.modified()?;
        files.push(OutputFile {
            modified: DateTime::<Local>::from(modified_at)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            url: name.clone(),
            name,
            size: meta.len(),
            modified_at,
        });
    }

    files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
    Ok(Listing { files })
}

/// JSON body for a listing, or `{"error": ...}` when it failed.
pub fn render_listing(result: &Result<Listing>) -> Result<String> {
    let body = match result {
        Ok(listing) => serde_json::to_string(listing)?,
        Err(err) => serde_json::to_string(&serde_json::json!({ "error": format!("{err:#}") }))?,
    };
    Ok(body)
}
