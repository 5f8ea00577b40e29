// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use larder_server_events::{DataChangeMessage, Publisher};
use std::sync::Arc;

/// Best-effort data-change publishing for handlers.
///
/// Called only after the primary effect is committed. A failure is logged and
/// never changes the response.
#[derive(Clone)]
pub struct EventPublisher {
	publisher: Arc<dyn Publisher>,
	topic: String,
}

impl EventPublisher {
	pub fn new(publisher: Arc<dyn Publisher>, topic: impl Into<String>) -> Self {
		Self {
			publisher,
			topic: topic.into(),
		}
	}

	pub fn topic(&self) -> &str {
		&self.topic
	}

	pub fn publish(&self, message: DataChangeMessage) {
		match self.publisher.publish(&self.topic, &message) {
			Ok(()) => tracing::debug!(
				event_type = %message.event_type,
				topic = %self.topic,
				"data change published"
			),
			Err(e) => tracing::warn!(
				event_type = %message.event_type,
				topic = %self.topic,
				user_id = %message.user_id,
				household_id = ?message.household_id,
				error = %e,
				"failed to publish data change"
			),
		}
	}
}
