// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Body encoding configuration.

use larder_common_encoding::{ContentType, JSON_CONTENT_TYPE};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConfig {
	/// Used when a request carries no recognized `RawHTML-type` header.
	pub default_content_type: ContentType,
}

impl Default for EncodingConfig {
	fn default() -> Self {
		Self {
			default_content_type: ContentType::Json,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodingConfigLayer {
	#[serde(default)]
	pub default_content_type: Option<String>,
}

impl EncodingConfigLayer {
	pub fn merge(&mut self, other: EncodingConfigLayer) {
		if other.default_content_type.is_some() {
			self.default_content_type = other.default_content_type;
		}
	}

	pub fn finalize(self) -> Result<EncodingConfig, ConfigError> {
		let raw = self
			.default_content_type
			.unwrap_or_else(|| JSON_CONTENT_TYPE.to_string());
		let default_content_type = raw.parse().map_err(|e: larder_common_encoding::EncodingError| {
			ConfigError::InvalidValue {
				key: "encoding.default_content_type".to_string(),
				message: e.to_string(),
			}
		})?;
		Ok(EncodingConfig {
			default_content_type,
		})
	}
}
