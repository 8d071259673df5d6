//! Configuration module for the restaurant administration client.
//!
//! Configuration is a single TOML file. String values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`; references are
//! resolved before parsing and the result is validated before use.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only; the full error echoes the whole input.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Backend API settings.
	pub api: ApiConfig,
	/// Where session credentials are persisted.
	pub session: SessionConfig,
	/// Transient alert banner settings.
	#[serde(default)]
	pub alerts: AlertConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Base URL of the backend, e.g. `http://127.0.0.1:5000`.
	pub base_url: String,
	/// Per-request timeout in seconds.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
	/// Value of the `x-dashboard-type` header sent on login.
	#[serde(default = "default_dashboard_type")]
	pub dashboard_type: String,
}

impl ApiConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

fn default_timeout_seconds() -> u64 {
	30
}

fn default_dashboard_type() -> String {
	"restaurant".to_string()
}

/// Session store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of session store implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

impl SessionConfig {
	/// Configuration table of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}
}

/// Alert banner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlertConfig {
	/// How long an alert stays visible before it is dismissed automatically.
	#[serde(default = "default_dismiss_after_ms")]
	pub dismiss_after_ms: u64,
}

impl AlertConfig {
	pub fn dismiss_after(&self) -> Duration {
		Duration::from_millis(self.dismiss_after_ms)
	}
}

impl Default for AlertConfig {
	fn default() -> Self {
		Self {
			dismiss_after_ms: default_dismiss_after_ms(),
		}
	}
}

fn default_dismiss_after_ms() -> u64 {
	3000
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of `VAR_NAME`, and
/// `${VAR_NAME:-default}` with the value or `default` when unset.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut missing = None;
	let resolved = re.replace_all(input, |cap: &regex::Captures<'_>| {
		let var_name = &cap[1];
		match (std::env::var(var_name), cap.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				missing.get_or_insert_with(|| var_name.to_string());
				String::new()
			}
		}
	});

	if let Some(var_name) = missing {
		return Err(ConfigError::Validation(format!(
			"Environment variable '{}' not found",
			var_name
		)));
	}
	Ok(resolved.into_owned())
}

impl Config {
	/// Loads configuration from a file, resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		let config: Config = content.parse()?;
		tracing::debug!(path = %path.display(), "Loaded configuration");
		Ok(config)
	}

	/// Validates the configuration.
	///
	/// - The API base URL must be an absolute `http(s)` URL
	/// - The request timeout must be between 1 and 300 seconds
	/// - The primary session store must be one of the configured implementations
	fn validate(&self) -> Result<(), ConfigError> {
		let base_url = self.api.base_url.trim();
		if base_url.is_empty() {
			return Err(ConfigError::Validation("API base_url cannot be empty".into()));
		}
		if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"API base_url must start with http:// or https://, got '{}'",
				base_url
			)));
		}
		if self.api.timeout_seconds == 0 || self.api.timeout_seconds > 300 {
			return Err(ConfigError::Validation(
				"API timeout_seconds must be between 1 and 300".into(),
			));
		}
		if self.api.dashboard_type.trim().is_empty() {
			return Err(ConfigError::Validation(
				"API dashboard_type cannot be empty".into(),
			));
		}

		if self.session.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one session implementation must be configured".into(),
			));
		}
		if self.session.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Session primary implementation cannot be empty".into(),
			));
		}
		if self.session.primary_config().is_none() {
			return Err(ConfigError::Validation(format!(
				"Primary session store '{}' not found in implementations",
				self.session.primary
			)));
		}

		if self.alerts.dismiss_after_ms > 60_000 {
			return Err(ConfigError::Validation(
				"alerts.dismiss_after_ms cannot exceed 60000".into(),
			));
		}

		Ok(())
	}

	/// In-memory configuration pointing at `base_url`, for tests.
	#[cfg(any(test, feature = "testing"))]
	pub fn for_tests(base_url: &str) -> Self {
		let mut implementations = HashMap::new();
		implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);
		Self {
			api: ApiConfig {
				base_url: base_url.to_string(),
				timeout_seconds: 5,
				dashboard_type: default_dashboard_type(),
			},
			session: SessionConfig {
				primary: "memory".to_string(),
				implementations,
			},
			alerts: AlertConfig::default(),
		}
	}
}

/// Parses a TOML string, resolving environment variables and validating the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
