// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session attachment.
//!
//! [`session_layer`] resolves the request's bearer token or session cookie and
//! inserts the resulting [`SessionContext`] into the request extensions.
//! Requests without a valid token pass through unchanged; handlers that need a
//! caller use the [`Session`] extractor, which rejects them with 401.
//!
//! # Security
//!
//! - Token values are never logged
//! - Successful resolution records the user id on the span

use async_trait::async_trait;
use axum::{
	extract::{FromRequestParts, Request, State},
	http::request::Parts,
	middleware::Next,
	response::Response,
};
use larder_server_auth::{
	extract_session_token, AccountStatus, SessionContext, SessionResolver, UserId,
};
use larder_server_db::{DataError, Household, HouseholdStore, QueryFilter, UserStore, MAX_PAGE_SIZE};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::api::AppState;
use crate::api_response::ApiError;

#[instrument(
	name = "session_layer",
	skip(state, request, next),
	fields(user_id = tracing::field::Empty)
)]
pub async fn session_layer(
	State(state): State<AppState>,
	mut request: Request,
	next: Next,
) -> Response {
	if let Some(token) = extract_session_token(request.headers(), &state.session_cookie_name) {
		match state.sessions.resolve(&token).await {
			Some(session) => {
				tracing::Span::current().record("user_id", tracing::field::display(session.user_id()));
				request.extensions_mut().insert(session);
			}
			None => tracing::debug!("session token did not resolve"),
		}
	}
	next.run(request).await
}

/// Extractor that requires a session.
pub struct Session(pub SessionContext);

impl<S> FromRequestParts<S> for Session
where
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		match parts.extensions.get::<SessionContext>() {
			Some(session) => Ok(Session(session.clone())),
			None => {
				tracing::debug!("session required: no valid credentials");
				Err(ApiError::Unauthenticated)
			}
		}
	}
}

/// Resolves tokens to users and builds their session from current memberships.
///
/// Household checkers are rebuilt on every request, so membership changes take
/// effect on the caller's next request. The active household is the member's
/// default household, or the oldest membership when none is marked.
pub struct StoreSessionResolver<D> {
	store: Arc<D>,
	tokens: RwLock<HashMap<String, UserId>>,
}

impl<D> StoreSessionResolver<D>
where
	D: HouseholdStore + UserStore,
{
	pub fn new(store: Arc<D>) -> Self {
		Self {
			store,
			tokens: RwLock::new(HashMap::new()),
		}
	}

	pub async fn register(&self, token: impl Into<String>, user_id: UserId) {
		self.tokens.write().await.insert(token.into(), user_id);
	}

	pub async fn revoke(&self, token: &str) -> bool {
		self.tokens.write().await.remove(token).is_some()
	}

	/// Every household the user belongs to, read page by page.
	async fn all_households(
		&self,
		cancel: &CancellationToken,
		user_id: UserId,
	) -> Result<Vec<Household>, DataError> {
		let mut households = Vec::new();
		let mut filter = QueryFilter {
			page: 1,
			limit: MAX_PAGE_SIZE,
		};
		loop {
			let page = self
				.store
				.list_households_for_user(cancel, user_id, &filter)
				.await?;
			let last = page.len() < filter.limit as usize;
			households.extend(page);
			if last {
				return Ok(households);
			}
			filter.page += 1;
		}
	}

	async fn build(&self, user_id: UserId) -> Option<SessionContext> {
		let cancel = CancellationToken::new();
		let user = match self.store.get_user(&cancel, user_id).await {
			Ok(user) => user,
			Err(e) => {
				tracing::debug!(%user_id, error = %e, "session user unavailable");
				return None;
			}
		};
		if matches!(
			user.account_status,
			AccountStatus::Banned | AccountStatus::Terminated
		) {
			tracing::info!(%user_id, status = ?user.account_status, "session refused for account status");
			return None;
		}

		let households = match self.all_households(&cancel, user_id).await {
			Ok(households) => households,
			Err(e) => {
				tracing::warn!(%user_id, error = %e, "failed to load household memberships");
				return None;
			}
		};

		let mut session = SessionContext::new(user.id, user.service_roles.clone())
			.with_account_status(user.account_status);
		session.requester.account_status_explanation = user.account_status_explanation.clone();

		let mut active = None;
		for household in &households {
			let Some(membership) = household.membership(user_id) else {
				continue;
			};
			session = session.with_household(household.id, membership.household_roles.clone());
			let candidate = (!membership.default_household, membership.created_at, household.id);
			if active.map_or(true, |current| candidate < current) {
				active = Some(candidate);
			}
		}
		if let Some((_, _, household_id)) = active {
			session = session.with_active_household(household_id);
		}
		Some(session)
	}
}

#[async_trait]
impl<D> SessionResolver for StoreSessionResolver<D>
where
	D: HouseholdStore + UserStore + Send + Sync + 'static,
{
	async fn resolve(&self, token: &str) -> Option<SessionContext> {
		let user_id = *self.tokens.read().await.get(token)?;
		self.build(user_id).await
	}
}
