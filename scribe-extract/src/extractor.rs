//! Multi-strategy extraction of ticket text from a rendered page.
//!
//! Page-level steps (stabilization, body reads) are fatal when they fail or
//! run out of time. Candidate probes are not: an error or an elapsed budget
//! there only means "no match" and the next candidate is tried.
use crate::candidates::{AUTHOR, MESSAGES, TIMESTAMP, TITLE};
use crate::document::{MessageRecord, TicketDocument};
use scribe_common::{Result, ScribeError};
use scribe_drivers::{PageNode, RenderedPage};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

const TITLE_POLL: Duration = Duration::from_millis(250);

/// Time budgets and optional inputs for one extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Budget for navigating to the ticket URL.
    pub navigation_timeout: Duration,
    /// Budget for each individual page query.
    pub step_timeout: Duration,
    /// How long to keep looking for a title before using the generic header.
    pub title_wait: Duration,
    /// Extra wait after network idle for client-side rendering to finish.
    pub settle_grace: Duration,
    /// Status-change events to splice ahead of the messages, oldest first.
    pub timeline_events: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            step_timeout: Duration::from_secs(30),
            title_wait: Duration::from_secs(5),
            settle_grace: Duration::from_secs(3),
            timeline_events: Vec::new(),
        }
    }
}

/// Extract the normalized ticket document from an already navigated page.
pub async fn extract_ticket<P: RenderedPage>(page: &P, options: &ExtractOptions) -> Result<String> {
    stabilize(page, options).await?;

    let title = extract_title(page, options).await;
    let mut document =
        TicketDocument::new(title.as_deref()).with_timeline(options.timeline_events.iter().cloned());

    match discover_messages(page, options).await {
        Some((selector, messages)) => {
            info!(
                target: "scribe.extract",
                count = messages.len(),
                %selector,
                "found messages"
            );
            for message in &messages {
                let record = read_message(message, options).await?;
                document.push_message(&record);
            }
        }
        None => {
            info!(
                target: "scribe.extract",
                "no messages found with standard selectors, capturing all visible text"
            );
            let text = bounded("body text read", options.step_timeout, page.body_text()).await?;
            document.push_raw(&text);
        }
    }

    Ok(document.render())
}

async fn stabilize<P: RenderedPage>(page: &P, options: &ExtractOptions) -> Result<()> {
    bounded(
        "network idle wait",
        options.step_timeout,
        page.wait_for_network_idle(),
    )
    .await?;
    if !options.settle_grace.is_zero() {
        debug!(
            target: "scribe.extract",
            grace_ms = options.settle_grace.as_millis() as u64,
            "waiting for client-side rendering"
        );
        sleep(options.settle_grace).await;
    }
    Ok(())
}

/// Poll the title candidates until one yields visible text or the wait expires.
async fn extract_title<P: RenderedPage>(page: &P, options: &ExtractOptions) -> Option<String> {
    let deadline = Instant::now() + options.title_wait;
    loop {
        let found = TITLE
            .first_present(|selector| {
                // per candidate, capped by the step budget
                let remaining = deadline.saturating_duration_since(Instant::now());
                first_visible_on_page(page, selector, remaining.min(options.step_timeout))
            })
            .await;
        if let Some((selector, title)) = found {
            debug!(target: "scribe.extract", %selector, %title, "title found");
            return Some(title);
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            debug!(target: "scribe.extract", "no title found, using generic header");
            return None;
        }
        sleep(remaining.min(TITLE_POLL)).await;
    }
}

async fn first_visible_on_page<P: RenderedPage>(
    page: &P,
    selector: &'static str,
    budget: Duration,
) -> Option<String> {
    let probe = async {
        let Some(first) = page.query_all(selector).await?.into_iter().next() else {
            return Ok(None);
        };
        visible_trimmed_text(&first).await
    };
    settle_probe(selector, timeout(budget, probe).await)
}

/// First selector under which the page has at least one element wins.
async fn discover_messages<P: RenderedPage>(
    page: &P,
    options: &ExtractOptions,
) -> Option<(&'static str, Vec<P::Node>)> {
    MESSAGES
        .first_present(|selector| async move {
            let nodes = timeout(options.step_timeout, page.query_all(selector)).await;
            settle_probe(selector, nodes.map(|r| r.map(Some)))
                .filter(|nodes: &Vec<P::Node>| !nodes.is_empty())
        })
        .await
}

async fn read_message<N: PageNode>(message: &N, options: &ExtractOptions) -> Result<MessageRecord> {
    let author = AUTHOR
        .first_present(|selector| visible_text_within(message, selector, options.step_timeout))
        .await
        .map(|(_, text)| text);
    let timestamp = TIMESTAMP
        .first_present(|selector| visible_text_within(message, selector, options.step_timeout))
        .await
        .map(|(_, text)| text);
    let body = bounded("message body read", options.step_timeout, message.text_content()).await?;

    Ok(MessageRecord::new(author, timestamp, &body))
}

async fn visible_text_within<N: PageNode>(
    scope: &N,
    selector: &'static str,
    budget: Duration,
) -> Option<String> {
    let probe = async {
        let Some(found) = scope.query_first(selector).await? else {
            return Ok(None);
        };
        visible_trimmed_text(&found).await
    };
    settle_probe(selector, timeout(budget, probe).await)
}

async fn visible_trimmed_text<N: PageNode>(node: &N) -> anyhow::Result<Option<String>> {
    if !node.is_visible().await? {
        return Ok(None);
    }
    let text = node.text_content().await?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Fold a probe outcome into "match" or "no match", logging why it missed.
fn settle_probe<T>(
    selector: &str,
    outcome: std::result::Result<anyhow::Result<Option<T>>, tokio::time::error::Elapsed>,
) -> Option<T> {
    match outcome {
        Ok(Ok(found)) => found,
        Ok(Err(err)) => {
            debug!(target: "scribe.extract", %selector, error = %err, "candidate skipped");
            None
        }
        Err(_) => {
            debug!(target: "scribe.extract", %selector, "candidate timed out");
            None
        }
    }
}

/// Run a fatal step under `budget`.
async fn bounded<T, F>(step: &'static str, budget: Duration, fut: F) -> Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match timeout(budget, fut).await {
        Ok(result) => result.map_err(ScribeError::Driver),
        Err(_) => Err(ScribeError::Timeout {
            step,
            after: budget,
        }),
    }
}
