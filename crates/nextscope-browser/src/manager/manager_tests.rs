use std::path::PathBuf;
use std::time::Duration;

use super::*;

#[test]
fn test_config_default() {
    let config = BrowserManagerConfig::default();
    assert_eq!(config.debug_port, 9222);
    assert!(config.headless);
    assert!(config.chrome_path.is_none());
    assert_eq!(config.launch_timeout, Duration::from_millis(6000));
}

#[test]
fn test_config_endpoint() {
    let config = BrowserManagerConfig {
        debug_port: 9333,
        ..Default::default()
    };
    assert_eq!(config.endpoint(), "http://localhost:9333");
}

#[test]
fn test_config_profile_dir() {
    let config = BrowserManagerConfig::default();
    let profile = config.get_profile_dir();
    assert!(profile.ends_with(".nextscope/browser-profile"));

    let config = BrowserManagerConfig {
        profile_dir: Some(PathBuf::from("/tmp/nextscope-profile")),
        ..Default::default()
    };
    assert_eq!(config.get_profile_dir(), PathBuf::from("/tmp/nextscope-profile"));
}

#[test]
fn test_explicit_chrome_path_wins() {
    let manager = BrowserManager::new(BrowserManagerConfig {
        chrome_path: Some(PathBuf::from("/opt/chrome/chrome")),
        ..Default::default()
    });
    assert_eq!(
        manager.chrome_executable(),
        Some(PathBuf::from("/opt/chrome/chrome"))
    );
}

#[test]
fn test_browser_error_display() {
    let err = BrowserError::ConnectionFailed("timeout".to_string());
    assert_eq!(err.to_string(), "Connection failed: timeout");

    let err = BrowserError::LaunchFailed("permission denied".to_string());
    assert_eq!(err.to_string(), "Failed to launch Chrome: permission denied");
}

#[test]
fn test_cdp_error_mapping() {
    let err: BrowserError = crate::cdp::CdpError::NavigationFailed("net::ERR_ABORTED".to_string()).into();
    assert!(matches!(err, BrowserError::NavigationFailed(_)));

    let err: BrowserError = crate::cdp::CdpError::SessionClosed.into();
    assert!(matches!(err, BrowserError::NotConnected));
}

#[tokio::test]
async fn test_close_without_connect() {
    let manager = BrowserManager::new(BrowserManagerConfig::default());
    assert!(manager.close().await.is_ok());
}

#[tokio::test]
async fn test_close_unknown_page() {
    let manager = BrowserManager::new(BrowserManagerConfig::default());
    let err = manager.close_page("missing").await.unwrap_err();
    assert!(matches!(err, BrowserError::PageNotFound(_)));
}
