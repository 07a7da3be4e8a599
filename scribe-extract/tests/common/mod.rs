#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use scribe_drivers::{PageNode, RenderedPage, RenderingEngine};
use scribe_extract::ExtractOptions;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Budgets small enough that tests never sit in a real wait.
pub fn fast_options() -> ExtractOptions {
    ExtractOptions {
        navigation_timeout: Duration::from_secs(2),
        step_timeout: Duration::from_secs(2),
        title_wait: Duration::ZERO,
        settle_grace: Duration::ZERO,
        timeline_events: Vec::new(),
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector {selector}: {e:?}"))
}

fn hides_itself(el: &ElementRef<'_>) -> bool {
    let node = el.value();
    node.attr("hidden").is_some()
        || node
            .attr("style")
            .map(|s| s.replace(' ', "").contains("display:none"))
            .unwrap_or(false)
}

fn rendered(el: ElementRef<'_>) -> bool {
    !hides_itself(&el)
        && el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .all(|a| !hides_itself(&a))
}

fn to_node(
    el: ElementRef<'_>,
    parent_visible: bool,
    slow: &Arc<HashSet<&'static str>>,
) -> StaticNode {
    StaticNode {
        outer_html: el.html(),
        text: el.text().collect(),
        visible: parent_visible && rendered(el),
        slow: slow.clone(),
    }
}

/// Park forever when `selector` was marked slow, like a query the driver never answers.
async fn stall_if_slow(slow: &HashSet<&'static str>, selector: &str) {
    if slow.contains(selector) {
        std::future::pending::<()>().await;
    }
}

/// In-memory page over a static HTML document.
pub struct StaticPage {
    html: String,
    failing: HashSet<&'static str>,
    slow: Arc<HashSet<&'static str>>,
    never_idle: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl StaticPage {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            failing: HashSet::new(),
            slow: Arc::new(HashSet::new()),
            never_idle: false,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make page-level queries for `selector` fail like a detached node would.
    pub fn failing_on(mut self, selector: &'static str) -> Self {
        self.failing.insert(selector);
        self
    }

    /// Make every query for `selector` hang, on the page and inside its nodes.
    pub fn slow_on(mut self, selector: &'static str) -> Self {
        Arc::make_mut(&mut self.slow).insert(selector);
        self
    }

    /// Keep the network busy forever.
    pub fn never_idle(mut self) -> Self {
        self.never_idle = true;
        self
    }

    pub fn query_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.queries.clone()
    }
}

#[async_trait]
impl RenderedPage for StaticPage {
    type Node = StaticNode;

    async fn wait_for_network_idle(&self) -> Result<()> {
        if self.never_idle {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<StaticNode>> {
        self.queries
            .lock()
            .map_err(|_| anyhow!("query log poisoned"))?
            .push(selector.to_string());
        if self.failing.contains(selector) {
            bail!("stale element reference for {selector}");
        }
        stall_if_slow(&self.slow, selector).await;
        let document = Html::parse_document(&self.html);
        let sel = parse_selector(selector)?;
        Ok(document
            .select(&sel)
            .map(|el| to_node(el, true, &self.slow))
            .collect())
    }

    async fn body_text(&self) -> Result<String> {
        let document = Html::parse_document(&self.html);
        let body = parse_selector("body")?;
        Ok(document
            .select(&body)
            .next()
            .map(|b| b.text().collect())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct StaticNode {
    outer_html: String,
    text: String,
    visible: bool,
    slow: Arc<HashSet<&'static str>>,
}

#[async_trait]
impl PageNode for StaticNode {
    async fn query_first(&self, selector: &str) -> Result<Option<StaticNode>> {
        stall_if_slow(&self.slow, selector).await;
        let fragment = Html::parse_fragment(&self.outer_html);
        let sel = parse_selector(selector)?;
        let Some(root) = fragment
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .next()
        else {
            return Ok(None);
        };
        Ok(root
            .select(&sel)
            .find(|el| el.id() != root.id())
            .map(|el| to_node(el, self.visible, &self.slow)))
    }

    async fn text_content(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn is_visible(&self) -> Result<bool> {
        Ok(self.visible)
    }
}

/// Engine handing out one [`StaticPage`] and recording whether it was closed.
pub struct StaticEngine {
    page: Option<StaticPage>,
    navigation_delay: Duration,
    navigation_error: Option<&'static str>,
    hanging_close: bool,
    closed: Arc<AtomicBool>,
}

impl StaticEngine {
    pub fn new(page: StaticPage) -> Self {
        Self {
            page: Some(page),
            navigation_delay: Duration::ZERO,
            navigation_error: None,
            hanging_close: false,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn slow_navigation(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    pub fn failing_navigation(mut self, reason: &'static str) -> Self {
        self.navigation_error = Some(reason);
        self
    }

    /// Record the close request but never finish it, like a session stuck behind a page load.
    pub fn hanging_close(mut self) -> Self {
        self.hanging_close = true;
        self
    }

    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

#[async_trait]
impl RenderingEngine for StaticEngine {
    type Page = StaticPage;

    async fn navigate(&mut self, _url: &Url) -> Result<StaticPage> {
        if !self.navigation_delay.is_zero() {
            tokio::time::sleep(self.navigation_delay).await;
        }
        if let Some(reason) = self.navigation_error {
            bail!(reason);
        }
        self.page.take().ok_or_else(|| anyhow!("page already opened"))
    }

    async fn close(self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        if self.hanging_close {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}
