// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::EncodingError;
use http::HeaderMap;
use std::fmt;
use std::str::FromStr;

/// Header consulted for the request and response serialization.
pub const CONTENT_TYPE_HEADER: &str = "RawHTML-type";

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Serialization selected for a body.
///
/// `Unset` means the header was absent or unrecognized; it resolves to the
/// configured default via [`ContentType::or`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
	#[default]
	Unset,
	Json,
	Xml,
}

impl ContentType {
	/// Matches a header value against the supported tokens, ignoring case and
	/// surrounding whitespace.
	pub fn from_header_value(value: &str) -> ContentType {
		let value = value.trim();
		if value.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
			ContentType::Json
		} else if value.eq_ignore_ascii_case(XML_CONTENT_TYPE) {
			ContentType::Xml
		} else {
			ContentType::Unset
		}
	}

	/// Reads the `RawHTML-type` header. Non-UTF-8 values count as unrecognized.
	pub fn from_headers(headers: &HeaderMap) -> ContentType {
		headers
			.get(CONTENT_TYPE_HEADER)
			.and_then(|value| value.to_str().ok())
			.map(ContentType::from_header_value)
			.unwrap_or_default()
	}

	/// Resolves `Unset` to `default`.
	pub fn or(self, default: ContentType) -> ContentType {
		match self {
			ContentType::Unset => default,
			explicit => explicit,
		}
	}

	/// The concrete token written to responses. `Unset` encodes as JSON.
	pub fn as_str(&self) -> &'static str {
		match self {
			ContentType::Unset | ContentType::Json => JSON_CONTENT_TYPE,
			ContentType::Xml => XML_CONTENT_TYPE,
		}
	}
}

impl fmt::Display for ContentType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Strict parse used for configuration: only the two supported tokens are accepted.
impl FromStr for ContentType {
	type Err = EncodingError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match ContentType::from_header_value(s) {
			ContentType::Unset => Err(EncodingError::UnsupportedContentType(s.to_string())),
			parsed => Ok(parsed),
		}
	}
}
