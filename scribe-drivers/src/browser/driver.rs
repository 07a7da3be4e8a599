use crate::browser::{
    launch::{build_capabilities, BrowserOptions},
    page::WebDriverPage,
};
use crate::capability::RenderingEngine;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use tracing::{debug, info};
use url::Url;

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// One driver backs one scrape; callers wanting parallel scrapes open
/// independent drivers.
pub struct ScribeDriver {
    client: Client,
}

impl ScribeDriver {
    /// Open a new browser session on a running WebDriver service
    /// (Chromedriver on `http://localhost:9515` by default).
    pub async fn connect(options: &BrowserOptions) -> Result<Self> {
        let caps = build_capabilities(options);

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .with_context(|| {
                format!(
                    "failed to open a WebDriver session at {}",
                    options.webdriver_url
                )
            })?;

        info!(
            target: "scribe.driver",
            endpoint = %options.webdriver_url,
            headless = options.headless,
            "webdriver session opened"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl RenderingEngine for ScribeDriver {
    type Page = WebDriverPage;

    async fn navigate(&mut self, url: &Url) -> Result<WebDriverPage> {
        self.client
            .goto(url.as_str())
            .await
            .with_context(|| format!("failed to load {url}"))?;
        debug!(target: "scribe.driver", %url, "navigation complete");
        Ok(WebDriverPage::new(self.client.clone()))
    }

    /// Close the underlying browser session.
    async fn close(self) -> Result<()> {
        self.client.close().await?;
        debug!(target: "scribe.driver", "webdriver session closed");
        Ok(())
    }
}
