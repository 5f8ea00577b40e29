// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
	#[error("failed to decode {content_type} body: {message}")]
	Decode {
		content_type: &'static str,
		message: String,
	},

	#[error("failed to encode {content_type} body: {message}")]
	Encode {
		content_type: &'static str,
		message: String,
	},

	#[error("unsupported content type '{0}'")]
	UnsupportedContentType(String),
}

impl EncodingError {
	pub fn is_decode(&self) -> bool {
		matches!(self, EncodingError::Decode { .. })
	}
}
