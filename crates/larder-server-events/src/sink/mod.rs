// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod http;
pub mod tracing;

use async_trait::async_trait;

use crate::error::SinkError;

/// Destination for serialized messages drained from the publisher queue.
#[async_trait]
pub trait MessageSink: Send + Sync {
	fn name(&self) -> &str;

	async fn deliver(&self, topic: &str, body: &[u8]) -> Result<(), SinkError>;
}
