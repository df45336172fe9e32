//! Integration tests against a real Chrome.
//!
//! These tests require Chrome to be installed on the system.
//! Run with: cargo test -p nextscope-browser --test integration_test -- --ignored --nocapture

use std::time::Duration;

use nextscope_browser::{BrowserError, BrowserManager, BrowserManagerConfig};

const PAGE: &str = "data:text/html,<html><body><div id=\"__next\">hello</div></body></html>";

/// Test helper to create a manager with test-specific config.
fn test_config() -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: 9333, // Use different port to avoid conflicts
        profile_dir: Some(std::path::PathBuf::from("/tmp/nextscope-test-profile")),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_open_navigate_and_close() {
    let manager = BrowserManager::new(test_config());

    let page = manager.open_page().await.expect("page should open");
    let mut events = page.subscribe();

    tokio::time::timeout(
        Duration::from_secs(20),
        page.navigate_until_idle(PAGE, Duration::from_millis(300)),
    )
    .await
    .expect("navigation should settle")
    .expect("navigation should succeed");

    let html = page.get_content().await.expect("content");
    assert!(html.contains("__next"));

    let mut saw_request = false;
    while let Ok(event) = events.try_recv() {
        if event.method == "Network.requestWillBeSent" {
            saw_request = true;
        }
    }
    assert!(saw_request, "document request should be observed");

    page.set_cache_disabled(true).await.expect("cache toggle");
    let target_id = page.target_id().to_string();
    manager.close_page(&target_id).await.expect("close");
    let err = manager.close_page(&target_id).await.unwrap_err();
    assert!(matches!(err, BrowserError::PageNotFound(_)));
    manager.shutdown_chrome().await.expect("shutdown");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_content_keeps_doctype() {
    let manager = BrowserManager::new(test_config());
    let page = manager.open_page().await.expect("page should open");

    tokio::time::timeout(
        Duration::from_secs(20),
        page.navigate_until_idle(
            "data:text/html,<!DOCTYPE html><html><body>ok</body></html>",
            Duration::from_millis(300),
        ),
    )
    .await
    .expect("navigation should settle")
    .expect("navigation should succeed");

    let html = page.get_content().await.expect("content");
    assert!(html.starts_with("<!DOCTYPE html><html>"), "got {html}");

    manager.close_page(page.target_id()).await.expect("close");
    manager.shutdown_chrome().await.expect("shutdown");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_navigation_error() {
    let manager = BrowserManager::new(test_config());
    let page = manager.open_page().await.expect("page should open");

    let result = page.navigate("http://nextscope.invalid/").await;
    assert!(result.is_err(), "unresolvable host should fail");

    manager.close_page(page.target_id()).await.expect("close");
    manager.shutdown_chrome().await.expect("shutdown");
}
