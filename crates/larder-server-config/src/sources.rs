// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AuthConfigLayer, EncodingConfigLayer, EventSinkKind, EventsConfigLayer, HttpConfigLayer,
	LogFormat, LoggingConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/larder/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: LARDER_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			logging: Some(load_logging_from_env()?),
			encoding: Some(load_encoding_from_env()),
			events: Some(load_events_from_env()?),
			auth: Some(load_auth_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	env_parse(name, "u16")
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	env_parse(name, "u64")
}

fn env_usize(name: &str) -> Result<Option<usize>, ConfigError> {
	env_parse(name, "usize")
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("LARDER_SERVER_HOST"),
		port: env_u16("LARDER_SERVER_PORT")?,
		request_timeout_secs: env_u64("LARDER_SERVER_REQUEST_TIMEOUT_SECS")?,
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var("LARDER_SERVER_LOG_FORMAT") {
		Some(v) => match v.to_lowercase().as_str() {
			"json" => Some(LogFormat::Json),
			"text" => Some(LogFormat::Text),
			_ => {
				return Err(ConfigError::InvalidValue {
					key: "LARDER_SERVER_LOG_FORMAT".to_string(),
					message: format!("expected 'text' or 'json', got '{v}'"),
				})
			}
		},
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var("LARDER_SERVER_LOG_LEVEL"),
		format,
	})
}

fn load_encoding_from_env() -> EncodingConfigLayer {
	EncodingConfigLayer {
		default_content_type: env_var("LARDER_SERVER_ENCODING_DEFAULT_CONTENT_TYPE"),
	}
}

fn load_events_from_env() -> Result<EventsConfigLayer, ConfigError> {
	let sink = match env_var("LARDER_SERVER_EVENTS_SINK") {
		Some(v) => Some(v.parse::<EventSinkKind>().map_err(|message| {
			ConfigError::InvalidValue {
				key: "LARDER_SERVER_EVENTS_SINK".to_string(),
				message,
			}
		})?),
		None => None,
	};

	Ok(EventsConfigLayer {
		queue_capacity: env_usize("LARDER_SERVER_EVENTS_QUEUE_CAPACITY")?,
		workers: env_usize("LARDER_SERVER_EVENTS_WORKERS")?,
		data_changes_topic: env_var("LARDER_SERVER_EVENTS_DATA_CHANGES_TOPIC"),
		sink,
		http_endpoint: env_var("LARDER_SERVER_EVENTS_HTTP_ENDPOINT"),
		http_timeout_secs: env_u64("LARDER_SERVER_EVENTS_HTTP_TIMEOUT_SECS")?,
	})
}

fn load_auth_from_env() -> AuthConfigLayer {
	AuthConfigLayer {
		environment: env_var("LARDER_SERVER_ENV"),
		session_cookie_name: env_var("LARDER_SERVER_SESSION_COOKIE_NAME"),
		dev_session_token: env_var("LARDER_SERVER_AUTH_DEV_SESSION_TOKEN"),
	}
}
