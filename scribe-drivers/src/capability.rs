use anyhow::Result;
use async_trait::async_trait;
use url::Url;

/// A single element of a rendered page.
///
/// Methods never wait on their own; callers bound each call with
/// `tokio::time::timeout` and treat an elapsed budget as "no match".
#[async_trait]
pub trait PageNode: Send + Sync + Sized {
    /// First descendant matching the CSS `selector`, if any.
    async fn query_first(&self, selector: &str) -> Result<Option<Self>>;

    /// Raw `textContent` of the element, hidden descendants included.
    async fn text_content(&self) -> Result<String>;

    /// Whether the element is currently rendered visibly.
    async fn is_visible(&self) -> Result<bool>;
}

/// A navigated, script-executed document.
#[async_trait]
pub trait RenderedPage: Send + Sync {
    type Node: PageNode;

    /// Resolve once the page reports no in-flight network activity.
    ///
    /// Implementations may poll indefinitely; the caller owns the deadline.
    async fn wait_for_network_idle(&self) -> Result<()>;

    /// All elements matching the CSS `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Node>>;

    /// Full `textContent` of the document body.
    async fn body_text(&self) -> Result<String>;
}

/// A browser instance able to open exactly one page per scrape.
#[async_trait]
pub trait RenderingEngine: Send + Sized {
    type Page: RenderedPage;

    /// Navigate to `url` and hand back the loaded page.
    async fn navigate(&mut self, url: &Url) -> Result<Self::Page>;

    /// Release the browser session and every page it opened.
    async fn close(self) -> Result<()>;
}
