//! Ordered selector candidates.
//!
//! Each list is tried front to back and the first selector that produces a
//! usable result wins; later entries are never consulted once one matches.
//! Appending a pattern is the only change needed to teach the extractor a
//! new page layout.
use std::future::Future;

/// A named, priority-ordered list of CSS selectors.
#[derive(Debug, Clone, Copy)]
pub struct CandidateList {
    pub name: &'static str,
    selectors: &'static [&'static str],
}

impl CandidateList {
    pub const fn new(name: &'static str, selectors: &'static [&'static str]) -> Self {
        Self { name, selectors }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.selectors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Run `probe` against each selector in order and return the first
    /// present result together with the selector that produced it.
    pub async fn first_present<T, F, Fut>(&self, mut probe: F) -> Option<(&'static str, T)>
    where
        F: FnMut(&'static str) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        for selector in self.iter() {
            if let Some(found) = probe(selector).await {
                return Some((selector, found));
            }
        }
        None
    }
}

/// Ticket heading.
pub const TITLE: CandidateList =
    CandidateList::new("title", &["h1", ".ticket-title", "[class*=\"title\"]"]);

/// Containers of individual conversation messages.
pub const MESSAGES: CandidateList = CandidateList::new(
    "messages",
    &[
        ".message, .comment",
        "[class*=\"message\"]",
        "[class*=\"comment\"]",
        ".ticket-message",
        ".conversation-item",
        "[data-testid*=\"message\"]",
    ],
);

/// Author of a message, searched inside the message container.
pub const AUTHOR: CandidateList = CandidateList::new(
    "author",
    &[
        ".author, .sender, .from",
        "[class*=\"author\"]",
        "[class*=\"sender\"]",
        "strong, .name, .username",
    ],
);

/// Timestamp of a message, searched inside the message container.
pub const TIMESTAMP: CandidateList = CandidateList::new(
    "timestamp",
    &[
        ".timestamp, .date, .time",
        "[class*=\"timestamp\"]",
        "[class*=\"date\"]",
    ],
);
