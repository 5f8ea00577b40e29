// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
	#[error("event queue is at capacity")]
	QueueFull,

	#[error("publisher is shutting down")]
	Closed,

	#[error("failed to serialize message: {0}")]
	Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SinkError {
	#[error("transient error: {0}")]
	Transient(String),

	#[error("permanent error: {0}")]
	Permanent(String),
}
