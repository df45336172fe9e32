//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! This module provides a pure Rust CDP client. It connects to
//! Chrome/Chromium via WebSocket and communicates using the CDP JSON-RPC
//! protocol.
//!
//! ## Usage
//!
//! 1. Start Chrome with remote debugging:
//!    ```bash
//!    chrome --headless=new --remote-debugging-port=9222
//!    ```
//!
//! 2. Connect and load a page:
//!    ```rust,ignore
//!    let client = CdpClient::connect("http://localhost:9222").await?;
//!    let page = client.new_page(None).await?;
//!    page.navigate_until_idle("https://example.com", Duration::from_millis(500)).await?;
//!    ```

mod client;
mod error;
mod events;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use events::{CdpEvent, NetworkIdle};
pub use protocol::*;
pub use session::PageSession;
