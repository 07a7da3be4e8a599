//! Loader for ticket-scribe configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later sources winning:
//!
//! 1. built-in defaults (every section and field is optional)
//! 2. config files and inline YAML snippets, in the order they were attached
//! 3. `SCRIBE__`-prefixed environment variables, `__` separating nesting
//!    levels (`SCRIBE__TIMEOUTS__STEP_MS=45000`)
//!
//! String values may reference `${VAR}` placeholders; they are expanded after
//! merging, recursively up to a fixed depth.
//!
//! ```yaml
//! browser:
//!   webdriver_url: "http://localhost:9515"
//!   headless: true
//! timeouts:
//!   navigation_ms: 45000
//! output:
//!   dir: "${HOME}/web-share"
//! logging:
//!   format: json
//! ```
use config::{Config, ConfigError, Environment, File};
use scribe_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SCRIBE";
const APP_DIR_NAME: &str = "ticket-scribe";

#[derive(Debug, Default, Deserialize)]
pub struct ScribeConfig {
    #[serde(default)]
    pub browser: BrowserSection,
    #[serde(default)]
    pub timeouts: TimeoutSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// WebDriver endpoint and Chromium launch settings.
#[derive(Debug, Deserialize)]
pub struct BrowserSection {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_window_size")]
    pub window_size: [u32; 2],
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: true,
            window_size: default_window_size(),
            extra_args: Vec::new(),
        }
    }
}

/// Per-step time budgets, in milliseconds.
#[derive(Debug, Deserialize)]
pub struct TimeoutSection {
    #[serde(default = "default_step_ms")]
    pub navigation_ms: u64,
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    #[serde(default = "default_title_ms")]
    pub title_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for TimeoutSection {
    fn default() -> Self {
        Self {
            navigation_ms: default_step_ms(),
            step_ms: default_step_ms(),
            title_ms: default_title_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl TimeoutSection {
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
    pub fn title(&self) -> Duration {
        Duration::from_millis(self.title_ms)
    }
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputSection {
    /// Directory for generated `scraped_ticket_*.txt` files and for `list`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl OutputSection {
    /// Configured directory, else the platform data dir, else the working dir.
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR_NAME).join("tickets"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_true")]
    pub stderr: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            dir: None,
            filter: default_filter(),
            stderr: true,
        }
    }
}

impl LoggingSection {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_window_size() -> [u32; 2] {
    [1920, 1080]
}
fn default_true() -> bool {
    true
}
fn default_step_ms() -> u64 {
    30_000
}
fn default_title_ms() -> u64 {
    5_000
}
fn default_settle_ms() -> u64 {
    3_000
}
fn default_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (files + env overrides).
pub struct ScribeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScribeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScribeConfigLoader {
    /// Start from built-in defaults.
    ///
    /// ```
    /// use scribe_config::ScribeConfigLoader;
    ///
    /// let config = ScribeConfigLoader::new()
    ///     .with_yaml_str("timeouts:\n  title_ms: 2500")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.timeouts.title_ms, 2500);
    /// assert_eq!(config.timeouts.step_ms, 30_000);
    /// assert!(config.browser.headless);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use scribe_config::ScribeConfigLoader;
    ///
    /// unsafe { std::env::set_var("SCRIBE_DOC_SHARE", "/srv/share"); }
    ///
    /// let config = ScribeConfigLoader::new()
    ///     .with_yaml_str("output:\n  dir: \"${SCRIBE_DOC_SHARE}/tickets\"")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(
    ///     config.output.dir.as_deref(),
    ///     Some(std::path::Path::new("/srv/share/tickets"))
    /// );
    ///
    /// unsafe { std::env::remove_var("SCRIBE_DOC_SHARE"); }
    /// ```
    pub fn load(self) -> Result<ScribeConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScribeConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
