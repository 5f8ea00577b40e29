// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session resolution for inbound requests.
//!
//! Credential verification happens upstream. By the time a request reaches the
//! server it carries an opaque session token, either as a bearer token or in the
//! `larder_session` cookie, and a [`SessionResolver`] turns that token into a
//! [`SessionContext`].
//!
//! ```text
//! Request → Bearer token / Cookie → SessionResolver → SessionContext
//! ```
//!
//! Token values are never logged.

use crate::session::SessionContext;
use async_trait::async_trait;
use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;

/// Default session cookie name.
pub const SESSION_COOKIE_NAME: &str = "larder_session";

/// Extract the session token from the Cookie header (`larder_session`).
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	extract_session_cookie_with_name(headers, SESSION_COOKIE_NAME)
}

/// Extract the session token from the Cookie header with a custom cookie name.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let cookie = cookie.trim();
			let (name, value) = cookie.split_once('=')?;

			if name == cookie_name {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(|token| token.to_string())
}

/// Extract a session token, preferring the bearer token over the cookie.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	extract_bearer_token(headers).or_else(|| extract_session_cookie_with_name(headers, cookie_name))
}

/// Turns a session token into a session context.
///
/// Returns `None` for unknown or expired tokens.
#[async_trait]
pub trait SessionResolver: Send + Sync {
	async fn resolve(&self, token: &str) -> Option<SessionContext>;
}

/// Session store kept in process memory.
///
/// Used for development sessions and by tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
	sessions: RwLock<HashMap<String, SessionContext>>,
}

impl InMemorySessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn insert(&self, token: impl Into<String>, session: SessionContext) {
		self.sessions.write().await.insert(token.into(), session);
	}

	pub async fn revoke(&self, token: &str) -> bool {
		self.sessions.write().await.remove(token).is_some()
	}
}

#[async_trait]
impl SessionResolver for InMemorySessionStore {
	async fn resolve(&self, token: &str) -> Option<SessionContext> {
		self.sessions.read().await.get(token).cloned()
	}
}
