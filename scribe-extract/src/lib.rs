//! Ticket conversation extraction.
//!
//! Turns a dynamically rendered support-ticket page into one plain-text
//! document suited for summarization. The page structure is not known in
//! advance, so every structural lookup walks an ordered candidate list and
//! degrades to a default instead of failing.
//!
//! - [`session::scrape_ticket`]: validate a URL, drive one browser session, always release it
//! - [`extractor::extract_ticket`]: the extraction algorithm over a loaded page
//! - [`candidates`]: the selector lists, in priority order
//! - [`document`]: message records, document assembly, newline normalization
//!
//! # Examples
//! ```no_run
//! use scribe_drivers::browser::{driver::ScribeDriver, launch::BrowserOptions};
//! use scribe_extract::{scrape_ticket, ExtractOptions};
//!
//! # async fn demo() -> scribe_common::Result<()> {
//! let browser = BrowserOptions::default();
//! let text = scrape_ticket(
//!     "https://support.example.com/public/ticket/123",
//!     || ScribeDriver::connect(&browser),
//!     &ExtractOptions::default(),
//! )
//! .await?;
//! println!("{text}");
//! # Ok(()) }
//! ```
pub mod candidates;
pub mod document;
pub mod extractor;
pub mod session;
pub mod ticket_url;

pub use document::{normalize_newlines, MessageRecord, TicketDocument};
pub use extractor::{extract_ticket, ExtractOptions};
pub use session::scrape_ticket;
pub use ticket_url::TicketUrl;
