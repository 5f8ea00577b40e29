// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::SinkError;
use crate::sink::MessageSink;

/// Writes every message to the log. Used when no broker is configured.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl MessageSink for TracingSink {
	fn name(&self) -> &str {
		"tracing"
	}

	async fn deliver(&self, topic: &str, body: &[u8]) -> Result<(), SinkError> {
		let body = std::str::from_utf8(body)
			.map_err(|e| SinkError::Permanent(format!("message is not UTF-8: {e}")))?;
		tracing::info!(target: "larder::events", topic, message = body, "data change");
		Ok(())
	}
}
