// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::codec::Negotiated;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "health")]
pub struct HealthResponse {
	pub status: String,
	pub version: String,
}

/// Liveness probe. Needs no session.
pub async fn health_check(negotiated: Negotiated) -> Response {
	negotiated.ok(&HealthResponse {
		status: "ok".to_string(),
		version: env!("CARGO_PKG_VERSION").to_string(),
	})
}
