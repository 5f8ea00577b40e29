// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route-level permission filters.
//!
//! Authorization in Larder happens at two levels:
//!
//! 1. **Route-level** (this module's layers): the route needs a fixed set of
//!    permissions, checked before the handler runs
//! 2. **Handler-level** (capability predicates in `routes`): checks that depend
//!    on the target household
//!
//! - [`RequirePermission`]: every listed permission must be held by the service
//!   checker or by the active household's checker
//! - [`RequireServiceAdmin`]: the caller must hold the `service_admin` role
//!
//! # Security Properties
//!
//! - Decisions are logged with user_id and permission, never tokens
//! - Requests without a session are rejected with 401
//! - Requests lacking the permission are rejected with 403
//! - An active household the caller has no checker for grants nothing
//!
//! # Example
//!
//! ```ignore
//! Router::new()
//!     .route("/webhooks", post(create_webhook))
//!     .route_layer(RequirePermission::new(Permission::CREATE_WEBHOOKS));
//! ```

use axum::{
	body::Body,
	http::Request,
	response::{IntoResponse, Response},
};
use larder_server_auth::{Permission, SessionContext};
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::api_response::ApiError;

/// Route layer that requires a set of permissions.
#[derive(Clone)]
pub struct RequirePermission {
	permissions: Arc<[Permission]>,
}

impl RequirePermission {
	pub fn new(permission: Permission) -> Self {
		Self::all([permission])
	}

	/// Requires every permission in `permissions`.
	pub fn all(permissions: impl IntoIterator<Item = Permission>) -> Self {
		Self {
			permissions: permissions.into_iter().collect(),
		}
	}
}

impl<S> Layer<S> for RequirePermission {
	type Service = RequirePermissionService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequirePermissionService {
			inner,
			permissions: Arc::clone(&self.permissions),
		}
	}
}

/// Service wrapper for [`RequirePermission`] layer.
#[derive(Clone)]
pub struct RequirePermissionService<S> {
	inner: S,
	permissions: Arc<[Permission]>,
}

impl<S> Service<Request<Body>> for RequirePermissionService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = AuthzFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let Some(session) = req.extensions().get::<SessionContext>() else {
			tracing::debug!(
				permissions = ?self.permissions,
				"permission filter denied: not authenticated"
			);
			return AuthzFuture::rejected(ApiError::Unauthenticated);
		};

		if let Some(missing) = self
			.permissions
			.iter()
			.find(|permission| !session.has_permission(**permission))
		{
			tracing::info!(
				user_id = %session.user_id(),
				active_household_id = ?session.active_household_id,
				permission = %missing,
				"permission filter denied"
			);
			return AuthzFuture::rejected(ApiError::Forbidden);
		}

		tracing::debug!(
			user_id = %session.user_id(),
			permissions = ?self.permissions,
			"permission filter allowed"
		);

		AuthzFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

/// Route layer that requires the `service_admin` role.
#[derive(Clone, Copy, Default)]
pub struct RequireServiceAdmin;

impl<S> Layer<S> for RequireServiceAdmin {
	type Service = RequireServiceAdminService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireServiceAdminService { inner }
	}
}

/// Service wrapper for [`RequireServiceAdmin`] layer.
#[derive(Clone)]
pub struct RequireServiceAdminService<S> {
	inner: S,
}

impl<S> Service<Request<Body>> for RequireServiceAdminService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = AuthzFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let Some(session) = req.extensions().get::<SessionContext>() else {
			tracing::debug!("service admin filter denied: not authenticated");
			return AuthzFuture::rejected(ApiError::Unauthenticated);
		};

		if !session.service_checker().is_service_admin() {
			tracing::info!(
				user_id = %session.user_id(),
				roles = ?session.service_checker().roles(),
				"service admin filter denied"
			);
			return AuthzFuture::rejected(ApiError::Forbidden);
		}

		tracing::debug!(user_id = %session.user_id(), "service admin filter allowed");
		AuthzFuture::Inner {
			fut: self.inner.call(req),
		}
	}
}

pin_project! {
	/// Future for the permission filter services.
	#[project = AuthzFutureProj]
	pub enum AuthzFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F> AuthzFuture<F> {
	fn rejected(error: ApiError) -> Self {
		AuthzFuture::Rejected {
			resp: Some(error.into_response()),
		}
	}
}

impl<F, E> Future for AuthzFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			AuthzFutureProj::Inner { fut } => fut.poll(cx),
			AuthzFutureProj::Rejected { resp } => {
				let response = resp.take().unwrap_or_else(|| {
					ApiError::Internal("polled after completion".to_string()).into_response()
				});
				Poll::Ready(Ok(response))
			}
		}
	}
}
