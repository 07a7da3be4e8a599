//! One scrape from URL to document, with the browser released on every path.
use crate::extractor::{extract_ticket, ExtractOptions};
use crate::ticket_url::TicketUrl;
use scribe_common::{Result, ScribeError};
use scribe_drivers::RenderingEngine;
use std::future::Future;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

/// Validate `raw_url`, launch an engine, extract the ticket and close the engine.
///
/// `launch` is only invoked once the URL is accepted, so a rejected URL never
/// acquires a browser. Once launched, the engine is closed whether extraction
/// succeeded or not. Close is bounded by the step timeout; a failing or stuck
/// close is logged and does not mask the result.
pub async fn scrape_ticket<E, L, Fut>(
    raw_url: &str,
    launch: L,
    options: &ExtractOptions,
) -> Result<String>
where
    E: RenderingEngine,
    L: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<E>>,
{
    let url = TicketUrl::parse(raw_url)?;
    let session = Uuid::new_v4();
    info!(target: "scribe.session", %session, %url, "loading ticket");

    let mut engine = launch().await.map_err(ScribeError::Launch)?;
    let outcome = navigate_and_extract(&mut engine, &url, options).await;

    match timeout(options.step_timeout, engine.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!(target: "scribe.session", %session, error = %err, "failed to close browser session")
        }
        Err(_) => warn!(
            target: "scribe.session",
            %session,
            budget_ms = options.step_timeout.as_millis() as u64,
            "browser close timed out"
        ),
    }

    match &outcome {
        Ok(document) => info!(
            target: "scribe.session",
            %session,
            chars = document.chars().count(),
            "extraction complete"
        ),
        Err(err) => warn!(target: "scribe.session", %session, error = %err, "scrape failed"),
    }
    outcome
}

async fn navigate_and_extract<E: RenderingEngine>(
    engine: &mut E,
    url: &TicketUrl,
    options: &ExtractOptions,
) -> Result<String> {
    let page = timeout(options.navigation_timeout, engine.navigate(url.as_url()))
        .await
        .map_err(|_| ScribeError::Timeout {
            step: "navigation",
            after: options.navigation_timeout,
        })?
        .map_err(ScribeError::Navigation)?;

    extract_ticket(&page, options).await
}
