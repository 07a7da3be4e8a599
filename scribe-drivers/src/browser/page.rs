use crate::capability::{PageNode, RenderedPage};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use fantoccini::{elements::Element, Client, Locator};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// Quiet period with no new network activity before the page counts as idle.
pub const IDLE_WINDOW: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// Resource-timing entries only land once a request finishes, so a stable
// count over IDLE_WINDOW is the strongest signal available over WebDriver.
const ACTIVITY_PROBE: &str = "return [document.readyState, \
     performance.getEntriesByType('resource').length];";

const BODY_TEXT: &str = "return document.body ? document.body.textContent : '';";

fn body_text_from(value: Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text),
        other => bail!("body text script returned a non-string: {other}"),
    }
}

/// One sample of the page's loading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySnapshot {
    pub document_complete: bool,
    pub finished_resources: u64,
}

impl ActivitySnapshot {
    /// Decode the `[readyState, resourceCount]` pair returned by the probe.
    pub fn from_probe(value: &Value) -> Result<Self> {
        let state = value
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("activity probe returned no readyState: {value}"))?;
        let finished_resources = value
            .get(1)
            .and_then(Value::as_u64)
            .ok_or_else(|| anyhow!("activity probe returned no resource count: {value}"))?;
        Ok(Self {
            document_complete: state == "complete",
            finished_resources,
        })
    }
}

/// Tracks successive snapshots until the page has been quiet for a window.
#[derive(Debug)]
pub struct IdleTracker {
    window: Duration,
    last: Option<ActivitySnapshot>,
    quiet_since: Option<Instant>,
}

impl IdleTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: None,
            quiet_since: None,
        }
    }

    /// Record a sample taken at `now`; true once the page is idle.
    pub fn observe(&mut self, snapshot: ActivitySnapshot, now: Instant) -> bool {
        let unchanged = self.last == Some(snapshot);
        self.last = Some(snapshot);

        if !snapshot.document_complete || !unchanged {
            self.quiet_since = Some(now);
            return false;
        }
        let since = *self.quiet_since.get_or_insert(now);
        now.duration_since(since) >= self.window
    }
}

/// The loaded ticket page of a live WebDriver session.
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn activity_snapshot(&self) -> Result<ActivitySnapshot> {
        let value = self.client.execute(ACTIVITY_PROBE, vec![]).await?;
        ActivitySnapshot::from_probe(&value)
    }
}

#[async_trait]
impl RenderedPage for WebDriverPage {
    type Node = WebDriverNode;

    async fn wait_for_network_idle(&self) -> Result<()> {
        let mut tracker = IdleTracker::new(IDLE_WINDOW);
        loop {
            let snapshot = self.activity_snapshot().await?;
            if tracker.observe(snapshot, Instant::now()) {
                debug!(
                    target: "scribe.driver",
                    resources = snapshot.finished_resources,
                    "network idle"
                );
                return Ok(());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<WebDriverNode>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements.into_iter().map(WebDriverNode::new).collect())
    }

    async fn body_text(&self) -> Result<String> {
        let value = self.client.execute(BODY_TEXT, vec![]).await?;
        body_text_from(value)
    }
}

#[derive(Clone)]
/// Wrapper for a DOM element of a [`WebDriverPage`].
pub struct WebDriverNode {
    element: Element,
}

impl WebDriverNode {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

#[async_trait]
impl PageNode for WebDriverNode {
    async fn query_first(&self, selector: &str) -> Result<Option<WebDriverNode>> {
        let elements = self.element.find_all(Locator::Css(selector)).await?;
        Ok(elements.into_iter().next().map(WebDriverNode::new))
    }

    async fn text_content(&self) -> Result<String> {
        let text = self.element.prop("textContent").await?;
        Ok(text.unwrap_or_default())
    }

    async fn is_visible(&self) -> Result<bool> {
        self.element
            .is_displayed()
            .await
            .map_err(anyhow::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snap(complete: bool, resources: u64) -> ActivitySnapshot {
        ActivitySnapshot {
            document_complete: complete,
            finished_resources: resources,
        }
    }

    #[test]
    fn decodes_probe_result() {
        let s = ActivitySnapshot::from_probe(&json!(["complete", 12])).unwrap();
        assert_eq!(s, snap(true, 12));
        let s = ActivitySnapshot::from_probe(&json!(["interactive", 3])).unwrap();
        assert!(!s.document_complete);
    }

    #[test]
    fn rejects_malformed_probe_result() {
        assert!(ActivitySnapshot::from_probe(&json!(null)).is_err());
        assert!(ActivitySnapshot::from_probe(&json!(["complete"])).is_err());
    }

    #[test]
    fn body_text_must_be_a_string() {
        assert_eq!(body_text_from(json!("Ticket 9")).unwrap(), "Ticket 9");
        assert_eq!(body_text_from(json!("")).unwrap(), "");
        assert!(body_text_from(json!(null)).is_err());
        assert!(body_text_from(json!({ "text": "x" })).is_err());
    }

    #[test]
    fn idle_requires_stable_complete_window() {
        let t0 = Instant::now();
        let mut tracker = IdleTracker::new(Duration::from_millis(500));

        assert!(!tracker.observe(snap(false, 1), t0));
        assert!(!tracker.observe(snap(true, 4), t0 + Duration::from_millis(100)));
        assert!(!tracker.observe(snap(true, 4), t0 + Duration::from_millis(300)));
        assert!(tracker.observe(snap(true, 4), t0 + Duration::from_millis(600)));
    }

    #[test]
    fn new_activity_restarts_the_window() {
        let t0 = Instant::now();
        let mut tracker = IdleTracker::new(Duration::from_millis(500));

        tracker.observe(snap(true, 4), t0);
        tracker.observe(snap(true, 4), t0 + Duration::from_millis(400));
        assert!(!tracker.observe(snap(true, 5), t0 + Duration::from_millis(550)));
        assert!(!tracker.observe(snap(true, 5), t0 + Duration::from_millis(900)));
        assert!(tracker.observe(snap(true, 5), t0 + Duration::from_millis(1050)));
    }
}
