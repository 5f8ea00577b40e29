// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error responses.
//!
//! Every failure a handler can report resolves to one [`ApiError`]. The body is
//! always an [`ErrorResponse`] (`{message, code}`); only `Explicit` errors carry
//! a caller-chosen message, the rest use the canned messages below so that no
//! internal detail reaches the caller.
//!
//! [`ApiError`] renders as JSON on its own. When the request negotiated XML, the
//! codec middleware re-encodes the [`ErrorResponse`] attached to the response
//! extensions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use larder_common_encoding::{ContentType, EncodingError};
use larder_server_api::ValidationError;
use larder_server_auth::SessionError;
use larder_server_db::DataError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::encoded_response;

pub const INVALID_INPUT_MESSAGE: &str = "invalid input attached to request";
pub const UNAUTHENTICATED_MESSAGE: &str = "invalid credentials provided";
pub const FORBIDDEN_MESSAGE: &str = "invalid permissions";
pub const NOT_FOUND_MESSAGE: &str = "resource not found";
pub const INTERNAL_MESSAGE: &str = "something has gone awry";

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "error")]
pub struct ErrorResponse {
	pub message: String,
	pub code: u16,
}

#[derive(Debug, Error)]
pub enum ApiError {
	/// The body could not be decoded or failed validation. Carries the
	/// validator's message when there is one.
	#[error("invalid input: {}", .0.as_deref().unwrap_or(INVALID_INPUT_MESSAGE))]
	InvalidInput(Option<String>),

	#[error("unauthenticated")]
	Unauthenticated,

	#[error("forbidden")]
	Forbidden,

	#[error("not found")]
	NotFound,

	/// The detail is for logs only.
	#[error("internal error: {0}")]
	Internal(String),

	#[error("{status}: {message}")]
	Explicit { status: StatusCode, message: String },
}

impl ApiError {
	pub fn invalid_input(message: impl Into<String>) -> Self {
		ApiError::InvalidInput(Some(message.into()))
	}

	pub fn explicit(status: StatusCode, message: impl Into<String>) -> Self {
		ApiError::Explicit {
			status,
			message: message.into(),
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
			ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
			ApiError::Forbidden => StatusCode::FORBIDDEN,
			ApiError::NotFound => StatusCode::NOT_FOUND,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
			ApiError::Explicit { status, .. } => *status,
		}
	}

	pub fn body(&self) -> ErrorResponse {
		let message = match self {
			ApiError::InvalidInput(Some(message)) => message.clone(),
			ApiError::InvalidInput(None) => INVALID_INPUT_MESSAGE.to_string(),
			ApiError::Unauthenticated => UNAUTHENTICATED_MESSAGE.to_string(),
			ApiError::Forbidden => FORBIDDEN_MESSAGE.to_string(),
			ApiError::NotFound => NOT_FOUND_MESSAGE.to_string(),
			ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
			ApiError::Explicit { message, .. } => message.clone(),
		};
		ErrorResponse {
			message,
			code: self.status().as_u16(),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		error_response(self.status(), self.body())
	}
}

/// Builds a JSON error response and attaches `body` for re-encoding.
pub(crate) fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
	let bytes = serde_json::to_vec(&body).unwrap_or_default();
	let mut response = encoded_response(status, ContentType::Json, bytes);
	response.extensions_mut().insert(body);
	response
}

impl From<DataError> for ApiError {
	fn from(e: DataError) -> Self {
		match e {
			DataError::NotFound(_) => ApiError::NotFound,
			DataError::Conflict(message) => ApiError::explicit(StatusCode::CONFLICT, message),
			DataError::Cancelled => {
				tracing::debug!("request cancelled before the data manager finished");
				ApiError::Internal(e.to_string())
			}
			DataError::Storage(_) => {
				tracing::error!(error = %e, "data manager failed");
				ApiError::Internal(e.to_string())
			}
		}
	}
}

impl From<EncodingError> for ApiError {
	fn from(e: EncodingError) -> Self {
		if e.is_decode() {
			tracing::debug!(error = %e, "request body could not be decoded");
			ApiError::InvalidInput(None)
		} else {
			tracing::error!(error = %e, "response could not be encoded");
			ApiError::Internal(e.to_string())
		}
	}
}

impl From<ValidationError> for ApiError {
	fn from(e: ValidationError) -> Self {
		tracing::debug!(field = e.field, "request body failed validation");
		ApiError::InvalidInput(Some(e.to_string()))
	}
}

impl From<SessionError> for ApiError {
	fn from(e: SessionError) -> Self {
		match e {
			SessionError::Missing => ApiError::Unauthenticated,
			SessionError::NoActiveHousehold | SessionError::NotAMember(_) => {
				tracing::info!(error = %e, "household scope check failed");
				ApiError::Forbidden
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use larder_common_encoding::{ContentType, ServerEncoderDecoder, CONTENT_TYPE_HEADER};
	use larder_server_auth::HouseholdId;
	use proptest::prelude::*;

	#[test]
	fn canned_messages_match_status() {
		let cases = [
			(ApiError::InvalidInput(None), 400, INVALID_INPUT_MESSAGE),
			(ApiError::Unauthenticated, 401, UNAUTHENTICATED_MESSAGE),
			(ApiError::Forbidden, 403, FORBIDDEN_MESSAGE),
			(ApiError::NotFound, 404, NOT_FOUND_MESSAGE),
			(
				ApiError::Internal("disk on fire".to_string()),
				500,
				INTERNAL_MESSAGE,
			),
		];
		for (error, code, message) in cases {
			assert_eq!(error.status().as_u16(), code);
			assert_eq!(
				error.body(),
				ErrorResponse {
					message: message.to_string(),
					code
				}
			);
		}
	}

	#[test]
	fn explicit_errors_keep_caller_status_and_message() {
		let error = ApiError::explicit(StatusCode::IM_A_TEAPOT, "short and stout");
		assert_eq!(error.status(), StatusCode::IM_A_TEAPOT);
		assert_eq!(error.body().message, "short and stout");
		assert_eq!(error.body().code, 418);
	}

	#[test]
	fn internal_detail_is_not_exposed() {
		let body = ApiError::from(DataError::Storage("connection refused".to_string())).body();
		assert_eq!(body.message, INTERNAL_MESSAGE);
	}

	#[test]
	fn data_errors_map_to_taxonomy() {
		assert!(matches!(
			ApiError::from(DataError::not_found("recipe")),
			ApiError::NotFound
		));
		assert_eq!(
			ApiError::from(DataError::Conflict("slug taken".to_string())).status(),
			StatusCode::CONFLICT
		);
		assert_eq!(
			ApiError::from(DataError::Cancelled).status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn validation_errors_carry_the_validator_message() {
		let error = ApiError::from(ValidationError::new("name", "is required"));
		assert_eq!(error.status(), StatusCode::BAD_REQUEST);
		assert_eq!(error.body().message, "name: is required");
	}

	#[test]
	fn session_errors_split_between_401_and_403() {
		assert_eq!(
			ApiError::from(SessionError::Missing).status(),
			StatusCode::UNAUTHORIZED
		);
		assert_eq!(
			ApiError::from(SessionError::NotAMember(HouseholdId::generate())).status(),
			StatusCode::FORBIDDEN
		);
	}

	#[tokio::test]
	async fn responses_are_json_and_carry_the_body() {
		let response = ApiError::NotFound.into_response();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.headers().get(CONTENT_TYPE_HEADER).unwrap(),
			"application/json"
		);
		assert_eq!(
			response.extensions().get::<ErrorResponse>().unwrap().code,
			404
		);

		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		assert_eq!(
			&bytes[..],
			br#"{"message":"resource not found","code":404}"#
		);
	}

	proptest! {
		#[test]
		fn error_bodies_round_trip(
			message in "[ \t\na-zA-Z0-9<>&'.:-]{0,40}",
			code in 400u16..600,
		) {
			let codec = ServerEncoderDecoder::default();
			let body = ErrorResponse { message, code };
			for content_type in [ContentType::Json, ContentType::Xml] {
				let encoded = codec.encode(content_type, &body).unwrap();
				let decoded: ErrorResponse = codec.decode(content_type, &encoded).unwrap();
				prop_assert_eq!(&decoded, &body);
			}
		}
	}
}
