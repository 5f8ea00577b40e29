// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::content_type::ContentType;
use crate::error::EncodingError;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Cursor;

/// Encodes and decodes bodies as JSON or XML.
///
/// Stateless apart from the default content type, so one instance is shared
/// by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerEncoderDecoder {
	default: ContentType,
}

impl Default for ServerEncoderDecoder {
	fn default() -> Self {
		Self::new(ContentType::Json)
	}
}

impl ServerEncoderDecoder {
	pub fn new(default: ContentType) -> Self {
		Self {
			default: default.or(ContentType::Json),
		}
	}

	pub fn default_content_type(&self) -> ContentType {
		self.default
	}

	/// The content type for a request: the `RawHTML-type` header when
	/// recognized, otherwise the configured default. Never `Unset`.
	pub fn negotiate(&self, headers: &HeaderMap) -> ContentType {
		ContentType::from_headers(headers).or(self.default)
	}

	pub fn decode<T: DeserializeOwned>(
		&self,
		content_type: ContentType,
		body: &[u8],
	) -> Result<T, EncodingError> {
		let content_type = content_type.or(self.default);
		let decode_error = |message: String| EncodingError::Decode {
			content_type: content_type.as_str(),
			message,
		};

		match content_type {
			ContentType::Xml => {
				let text = std::str::from_utf8(body).map_err(|e| decode_error(e.to_string()))?;
				quick_xml::de::from_str(text).map_err(|e| decode_error(e.to_string()))
			}
			ContentType::Json | ContentType::Unset => {
				serde_json::from_slice(body).map_err(|e| decode_error(e.to_string()))
			}
		}
	}

	pub fn encode<T: Serialize + ?Sized>(
		&self,
		content_type: ContentType,
		value: &T,
	) -> Result<Vec<u8>, EncodingError> {
		let content_type = content_type.or(self.default);
		let encode_error = |message: String| EncodingError::Encode {
			content_type: content_type.as_str(),
			message,
		};

		match content_type {
			ContentType::Xml => quick_xml::se::to_string(value)
				.map(|xml| reference_edge_whitespace(&xml).into_bytes())
				.map_err(|e| encode_error(e.to_string())),
			ContentType::Json | ContentType::Unset => {
				serde_json::to_vec(value).map_err(|e| encode_error(e.to_string()))
			}
		}
	}

	/// Encodes with the default content type and returns a readable view of the
	/// bytes, for clients that stream the body elsewhere.
	pub fn encode_reader<T: Serialize + ?Sized>(
		&self,
		value: &T,
	) -> Result<Cursor<Vec<u8>>, EncodingError> {
		self.encode(self.default, value).map(Cursor::new)
	}

	/// Encodes with the default content type.
	///
	/// # Panics
	///
	/// Panics if `value` cannot be encoded. Only use it for values whose
	/// encodability is guaranteed by construction.
	pub fn must_encode<T: Serialize + ?Sized>(&self, value: &T) -> Vec<u8> {
		match self.encode(self.default, value) {
			Ok(bytes) => bytes,
			Err(e) => {
				tracing::error!(error = %e, "value could not be encoded");
				panic!("must_encode: {e}");
			}
		}
	}
}

/// The XML reader trims whitespace around text content but leaves character
/// references alone, so whitespace at the edges of each text node is written
/// as references. Carriage returns are always referenced so that line-ending
/// normalization cannot rewrite them.
///
/// The serializer never writes whitespace between elements and always
/// escapes `<` in text, so every run outside a tag is a field's content.
fn reference_edge_whitespace(xml: &str) -> String {
	let mut out = String::with_capacity(xml.len());
	let mut rest = xml;
	while let Some(open) = rest.find('<') {
		let (text, tail) = rest.split_at(open);
		push_text(&mut out, text);
		match tail.find('>') {
			Some(close) => {
				out.push_str(&tail[..=close]);
				rest = &tail[close + 1..];
			}
			None => {
				out.push_str(tail);
				rest = "";
			}
		}
	}
	push_text(&mut out, rest);
	out
}

fn is_xml_whitespace(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn push_text(out: &mut String, text: &str) {
	let after_leading = text.trim_start_matches(is_xml_whitespace);
	let leading = &text[..text.len() - after_leading.len()];
	let body = after_leading.trim_end_matches(is_xml_whitespace);
	let trailing = &after_leading[body.len()..];

	leading.chars().for_each(|c| push_reference(out, c));
	for c in body.chars() {
		if c == '\r' {
			push_reference(out, c);
		} else {
			out.push(c);
		}
	}
	trailing.chars().for_each(|c| push_reference(out, c));
}

fn push_reference(out: &mut String, c: char) {
	out.push_str(&format!("&#x{:X};", u32::from(c)));
}
