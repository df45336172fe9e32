//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_analysis(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new(
                "server.host",
                "Host cannot be empty",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;
        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Debug port cannot be 0",
            ));
        }

        if browser.debug_port == config.server.port {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Debug port must differ from server.port",
            ));
        }

        if browser.launch_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.launch_timeout_ms",
                "launch_timeout_ms must be greater than 0",
            ));
        }

        if let Some(ref path) = browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome executable does not exist: {:?}", path),
                ));
            }
        }

        if !browser.headless {
            result.add_warning(ValidationWarning::new(
                "browser.headless",
                "Running with a visible browser window",
            ));
        }
    }

    fn validate_analysis(config: &Config, result: &mut ValidationResult) {
        let analysis = &config.analysis;
        if analysis.navigation_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "analysis.navigation_timeout_secs",
                "navigation_timeout_secs must be greater than 0",
            ));
        }

        if analysis.body_fetch_concurrency == 0 {
            result.add_error(ValidationError::new(
                "analysis.body_fetch_concurrency",
                "body_fetch_concurrency must be greater than 0",
            ));
        }

        if analysis.body_fetch_concurrency > 32 {
            result.add_warning(ValidationWarning::new(
                "analysis.body_fetch_concurrency",
                "body_fetch_concurrency is very high (>32), the browser may throttle requests",
            ));
        }

        if analysis.network_idle_ms >= analysis.navigation_timeout_secs.saturating_mul(1000) {
            result.add_warning(ValidationWarning::new(
                "analysis.network_idle_ms",
                "network_idle_ms is not shorter than the navigation timeout, every navigation will time out",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
