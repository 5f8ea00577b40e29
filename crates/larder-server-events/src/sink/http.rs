// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::SinkError;
use crate::sink::MessageSink;

/// Returns the User-Agent sent by the HTTP sink.
pub fn user_agent() -> String {
	format!("larder/{}", env!("CARGO_PKG_VERSION"))
}

/// Posts each message as JSON to `{endpoint}/topics/{topic}`.
pub struct HttpSink {
	client: Client,
	endpoint: String,
}

impl HttpSink {
	pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
		let client = Client::builder()
			.user_agent(user_agent())
			.timeout(timeout)
			.build()
			.map_err(|e| SinkError::Permanent(format!("failed to build HTTP client: {e}")))?;

		Ok(Self {
			client,
			endpoint: endpoint.into(),
		})
	}

	pub fn topic_url(&self, topic: &str) -> String {
		format!("{}/topics/{}", self.endpoint.trim_end_matches('/'), topic)
	}
}

#[async_trait]
impl MessageSink for HttpSink {
	fn name(&self) -> &str {
		"http"
	}

	async fn deliver(&self, topic: &str, body: &[u8]) -> Result<(), SinkError> {
		let response = self
			.client
			.post(self.topic_url(topic))
			.header("Content-Type", "application/json")
			.body(body.to_vec())
			.send()
			.await
			.map_err(|e| SinkError::Transient(format!("request failed: {e}")))?;

		let status = response.status();
		if status.is_success() {
			Ok(())
		} else if status.is_server_error() {
			Err(SinkError::Transient(format!("broker returned {status}")))
		} else {
			Err(SinkError::Permanent(format!("broker returned {status}")))
		}
	}
}
