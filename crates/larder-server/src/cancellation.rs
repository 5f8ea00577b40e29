// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request cancellation.
//!
//! [`cancellation_layer`] gives every request a [`CancellationToken`] that is
//! cancelled when the request future is dropped: the client went away or the
//! timeout layer gave up on it. Handlers pass the token to every data-manager
//! call.

use axum::{
	extract::{FromRequestParts, Request},
	http::request::Parts,
	middleware::Next,
	response::Response,
};
use std::convert::Infallible;
use tokio_util::sync::CancellationToken;

pub async fn cancellation_layer(mut request: Request, next: Next) -> Response {
	let token = CancellationToken::new();
	request.extensions_mut().insert(token.clone());
	let _guard = token.drop_guard();
	next.run(request).await
}

/// The current request's cancellation token.
///
/// Outside [`cancellation_layer`] this is a fresh token that never fires.
#[derive(Debug, Clone)]
pub struct RequestCancellation(pub CancellationToken);

impl<S> FromRequestParts<S> for RequestCancellation
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(RequestCancellation(
			parts
				.extensions
				.get::<CancellationToken>()
				.cloned()
				.unwrap_or_default(),
		))
	}
}
