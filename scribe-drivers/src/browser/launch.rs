use serde_json::json;
use std::time::Duration;
use webdriver::capabilities::Capabilities;

#[derive(Debug, Clone)]
/// How to reach the WebDriver service and how to launch Chromium through it.
pub struct BrowserOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub extra_args: Vec<String>,
    /// Server-side page-load limit. The driver abandons a stuck `goto`
    /// after this, which frees the session for the close that follows.
    pub page_load_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            window_size: (1920, 1080),
            extra_args: Vec::new(),
            page_load_timeout: Duration::from_secs(30),
        }
    }
}

/// Construct Chrome command-line arguments for a scrape session.
pub fn build_launch_arguments(options: &BrowserOptions) -> Vec<String> {
    let mut args = vec![
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-infobars".to_string(),
        "--disable-extensions".to_string(),
        format!(
            "--window-size={},{}",
            options.window_size.0, options.window_size.1
        ),
    ];
    if options.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args.extend(options.extra_args.iter().cloned());
    args
}

/// WebDriver capabilities carrying the Chromium launch arguments and the
/// page-load timeout.
pub fn build_capabilities(options: &BrowserOptions) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": build_launch_arguments(options) }),
    );
    caps.insert(
        "timeouts".to_string(),
        json!({ "pageLoad": options.page_load_timeout.as_millis() as u64 }),
    );
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_adds_headless_flags() {
        let args = build_launch_arguments(&BrowserOptions::default());
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--disable-gpu".to_string()));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
    }

    #[test]
    fn headed_session_omits_headless_flags() {
        let options = BrowserOptions {
            headless: false,
            extra_args: vec!["--lang=en-GB".into()],
            ..BrowserOptions::default()
        };
        let args = build_launch_arguments(&options);
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert_eq!(args.last().map(String::as_str), Some("--lang=en-GB"));
    }

    #[test]
    fn capabilities_embed_chrome_args() {
        let caps = build_capabilities(&BrowserOptions::default());
        let args = caps["goog:chromeOptions"]["args"]
            .as_array()
            .expect("args array");
        assert!(args.iter().any(|a| a == "--no-sandbox"));
    }

    #[test]
    fn capabilities_cap_server_side_page_load() {
        let options = BrowserOptions {
            page_load_timeout: Duration::from_millis(45_000),
            ..BrowserOptions::default()
        };
        let caps = build_capabilities(&options);
        assert_eq!(caps["timeouts"]["pageLoad"], 45_000);
    }
}
