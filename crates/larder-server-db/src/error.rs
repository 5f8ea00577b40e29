// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
	/// The no-such-entity sentinel.
	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Operation cancelled")]
	Cancelled,

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Storage error: {0}")]
	Storage(String),
}

impl DataError {
	pub fn not_found(what: impl std::fmt::Display) -> Self {
		DataError::NotFound(what.to_string())
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, DataError::NotFound(_))
	}
}

pub type Result<T> = std::result::Result<T, DataError>;
