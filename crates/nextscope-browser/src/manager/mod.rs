//! Browser instance manager.
//!
//! Launches headless Chrome on the debug port (or reuses one already
//! listening there), keeps one CDP connection for the process lifetime and
//! hands out fresh pages.

mod manager_core;
mod manager_pages;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
