// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session and environment configuration.

use serde::Deserialize;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "larder_session";

#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
	/// Deployment environment name, e.g. `development` or `production`.
	pub environment: String,
	pub session_cookie_name: String,
	/// Bearer token registered as a service-admin session at startup.
	pub dev_session_token: Option<String>,
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			environment: "development".to_string(),
			session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
			dev_session_token: None,
		}
	}
}

impl std::fmt::Debug for AuthConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthConfig")
			.field("environment", &self.environment)
			.field("session_cookie_name", &self.session_cookie_name)
			.field(
				"dev_session_token",
				&self.dev_session_token.as_ref().map(|_| "[REDACTED]"),
			)
			.finish()
	}
}

#[derive(Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub dev_session_token: Option<String>,
}

impl std::fmt::Debug for AuthConfigLayer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthConfigLayer")
			.field("environment", &self.environment)
			.field("session_cookie_name", &self.session_cookie_name)
			.field(
				"dev_session_token",
				&self.dev_session_token.as_ref().map(|_| "[REDACTED]"),
			)
			.finish()
	}
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.dev_session_token.is_some() {
			self.dev_session_token = other.dev_session_token;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			environment: self
				.environment
				.unwrap_or_else(|| "development".to_string()),
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| DEFAULT_SESSION_COOKIE_NAME.to_string()),
			dev_session_token: self.dev_session_token,
		}
	}
}
