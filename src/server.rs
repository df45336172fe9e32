//! Runtime wiring: tracing, browser, analyzer and the two entry points.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nextscope_analyzer::{AnalyzerConfig, PageAnalyzer, TextReport};
use nextscope_api::{ApiServer, AppState, ServerConfig};
use nextscope_browser::{BrowserManager, BrowserManagerConfig};
use nextscope_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::adapters::BrowserPages;
use crate::cli::OutputFormat;

/// Initialize tracing with console output and an optional daily log file.
///
/// `RUST_LOG` takes precedence over `logging.level`. Console output goes to
/// stderr so JSON results on stdout stay clean.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (text_layer, json_layer) = if logging.json {
        (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    };

    let file_layer = match &logging.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("nextscope")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Flushes buffered lines on exit.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    Ok(())
}

/// Load the config file, falling back to defaults when it is missing.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<Config> {
    ConfigLoader::load_or_default(Some(path))
        .with_context(|| format!("loading {}", path.display()))
}

/// Log validation warnings and fail on validation errors.
pub(crate) fn validate_config(config: &Config) -> anyhow::Result<()> {
    let validation = ConfigValidator::validate(config)?;
    for warning in &validation.warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        let errors: Vec<String> = validation
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        anyhow::bail!("invalid configuration: {}", errors.join("; "));
    }
    Ok(())
}

pub(crate) fn browser_config(config: &Config) -> BrowserManagerConfig {
    BrowserManagerConfig {
        debug_port: config.browser.debug_port,
        profile_dir: config.browser.profile_dir.clone(),
        chrome_path: config.browser.chrome_path.clone(),
        headless: config.browser.headless,
        launch_timeout: config.browser.launch_timeout(),
    }
}

pub(crate) fn analyzer_config(config: &Config) -> AnalyzerConfig {
    AnalyzerConfig {
        navigation_timeout: config.analysis.navigation_timeout(),
        metrics_settle: config.analysis.metrics_settle(),
        body_fetch_concurrency: config.analysis.body_fetch_concurrency,
    }
}

fn build_analyzer(config: &Config) -> (Arc<BrowserManager>, Arc<PageAnalyzer>) {
    let manager = Arc::new(BrowserManager::new(browser_config(config)));
    let pages = Arc::new(BrowserPages::new(
        manager.clone(),
        config.analysis.network_idle(),
    ));
    let analyzer = Arc::new(PageAnalyzer::new(pages, analyzer_config(config)));
    (manager, analyzer)
}

/// Analyze one URL and print the result to stdout.
pub(crate) async fn run_analyze(
    config: Config,
    url: &str,
    force_fresh: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let (manager, analyzer) = build_analyzer(&config);
    let result = analyzer.analyze(url, force_fresh).await;

    if let Err(e) = manager.shutdown_chrome().await {
        warn!("Failed to shut down Chrome: {}", e);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print!("{}", TextReport(&result)),
    }
    Ok(())
}

/// Run the HTTP API until Ctrl-C.
pub(crate) async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("Starting nextscope v{}", env!("CARGO_PKG_VERSION"));

    let (manager, analyzer) = build_analyzer(&config);
    let state = Arc::new(AppState::new(analyzer));
    let server = ApiServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state,
    );

    info!("nextscope ready:");
    info!("  POST http://{}/api/analyze", server.addr());
    info!("  GET  http://{}/health", server.addr());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown requested");
    };
    server
        .run(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    info!("Shutting down...");
    manager.shutdown_chrome().await?;
    Ok(())
}
