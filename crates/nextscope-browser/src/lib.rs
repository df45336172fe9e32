//! Chrome DevTools Protocol instrumentation for nextscope.
//!
//! Provides headless Chrome control via CDP with per-page network event
//! fan-out. Pure Rust implementation with zero Node.js dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  nextscope      │ ◄──────────────► │  Chrome/Chromium │
//! │  (this crate)   │       CDP        │    (headless)    │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Lazy Initialization
//!
//! The browser is NOT launched when the manager is created. It is lazily
//! launched (or an already running instance on the debug port is reused)
//! when the first page is opened, and the connection is kept for later
//! analyses.

pub mod cdp;
pub mod manager;

pub use cdp::{CdpClient, CdpError, CdpEvent, NetworkIdle, PageSession};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
