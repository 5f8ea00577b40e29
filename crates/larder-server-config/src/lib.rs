// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Larder server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`LARDER_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use larder_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub encoding: EncodingConfig,
	pub events: EventsConfig,
	pub auth: AuthConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LARDER_SERVER_*`)
/// 2. Config file (`/etc/larder/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource)])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let encoding = layer.encoding.unwrap_or_default().finalize()?;
	let events = layer.events.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();

	validate_config(&http, &events, &auth)?;

	info!(
		host = %http.host,
		port = http.port,
		default_content_type = %encoding.default_content_type,
		event_sink = ?events.sink,
		environment = %auth.environment,
		dev_session = auth.dev_session_token.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		logging,
		encoding,
		events,
		auth,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(
	http: &HttpConfig,
	events: &EventsConfig,
	auth: &AuthConfig,
) -> Result<(), ConfigError> {
	if auth.dev_session_token.is_some() && auth.is_production() {
		return Err(ConfigError::Validation(
			"LARDER_SERVER_AUTH_DEV_SESSION_TOKEN is set while LARDER_SERVER_ENV=production. \
			 This is a security risk. Remove the dev session token or set LARDER_SERVER_ENV \
			 to a non-production value."
				.to_string(),
		));
	}

	if http.request_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"http.request_timeout_secs must be greater than zero".to_string(),
		));
	}

	if events.queue_capacity == 0 || events.workers == 0 {
		return Err(ConfigError::Validation(
			"events.queue_capacity and events.workers must be greater than zero".to_string(),
		));
	}

	if events.sink == EventSinkKind::Http && events.http_endpoint.is_none() {
		return Err(ConfigError::Validation(
			"events.sink = \"http\" requires events.http_endpoint".to_string(),
		));
	}

	Ok(())
}
