use scribe_common::{Result, ScribeError};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A ticket link that passed validation and may be navigated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketUrl(Url);

impl TicketUrl {
    /// Accept only absolute `http://` or `https://` links.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ScribeError::InvalidUrl(raw.to_string()));
        }
        let url = Url::parse(trimmed).map_err(|_| ScribeError::InvalidUrl(raw.to_string()))?;
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl FromStr for TicketUrl {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TicketUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
