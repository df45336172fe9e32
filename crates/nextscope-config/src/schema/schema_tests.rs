use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.browser.debug_port, 9222);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_server_bind_address() {
    let server = ServerConfig::default();
    assert_eq!(server.bind_address(), "127.0.0.1:3000");
}

#[test]
fn test_browser_config_default() {
    let browser = BrowserConfig::default();
    assert!(browser.headless);
    assert!(browser.profile_dir.is_none());
    assert!(browser.chrome_path.is_none());
    assert_eq!(browser.launch_timeout(), Duration::from_millis(6000));
}

#[test]
fn test_analysis_config_default() {
    let analysis = AnalysisConfig::default();
    assert_eq!(analysis.navigation_timeout(), Duration::from_secs(30));
    assert_eq!(analysis.network_idle(), Duration::from_millis(500));
    assert_eq!(analysis.metrics_settle(), Duration::from_millis(1000));
    assert_eq!(analysis.body_fetch_concurrency, 4);
}

#[test]
fn test_logging_config_default() {
    let logging = LoggingConfig::default();
    assert!(!logging.json);
    assert!(logging.directory.is_none());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config: Config = toml::from_str(
        r#"
        [analysis]
        network_idle_ms = 250
        "#,
    )
    .unwrap();
    assert_eq!(config.analysis.network_idle_ms, 250);
    assert_eq!(config.analysis.navigation_timeout_secs, 30);
    assert_eq!(config.server.port, 3000);
}

#[test]
fn test_optional_paths_not_serialized() {
    let toml = toml::to_string(&Config::default()).unwrap();
    assert!(!toml.contains("profile_dir"));
    assert!(!toml.contains("directory"));
    assert!(toml.contains("[analysis]"));
}
