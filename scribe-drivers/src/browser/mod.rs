//! WebDriver-backed implementation of the rendering capability.
pub mod driver;
pub mod launch;
pub mod page;
