//! Driver layer for rendering ticket pages.
//!
//! The extractor never talks to a browser directly; it consumes the
//! [`capability`] traits, which describe what a fully rendered page must
//! support. This crate also ships the production implementation on top of a
//! WebDriver session.
//!
//! - [`capability::RenderingEngine`]: navigate to a URL, release the session
//! - [`capability::RenderedPage`]: network-idle wait and document-level queries
//! - [`capability::PageNode`]: per-element text, visibility and sub-queries
//! - [`browser::driver::ScribeDriver`]: `fantoccini` WebDriver client wrapper
//! - [`browser::page::WebDriverPage`]: DOM helpers backed by the live session
pub mod browser;
pub mod capability;

pub use capability::{PageNode, RenderedPage, RenderingEngine};
