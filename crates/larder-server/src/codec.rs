// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bridge between axum and the content codec.
//!
//! [`negotiate_layer`] resolves the request's [`ContentType`] once, from the
//! `RawHTML-type` header, and stores it in the request extensions. The
//! extractors below read it back:
//!
//! - [`Negotiated`]: encodes success bodies in the negotiated type
//! - [`Decoded`]: decodes the request body, rejecting with 400
//! - [`Params`]: query-string parameters, rejecting with 400
//!
//! Error responses are produced as JSON and re-encoded by the layer on the way
//! out when the request asked for XML.

use axum::{
	body::{Body, Bytes},
	extract::{FromRef, FromRequest, FromRequestParts, Query, Request, State},
	http::{header, request::Parts, HeaderValue, StatusCode},
	middleware::Next,
	response::{IntoResponse, Response},
};
use larder_common_encoding::{ContentType, ServerEncoderDecoder, CONTENT_TYPE_HEADER};
use serde::{de::DeserializeOwned, Serialize};
use std::convert::Infallible;

use crate::api_response::{ApiError, ErrorResponse};

/// Builds a response whose body is already encoded as `content_type`.
pub(crate) fn encoded_response(
	status: StatusCode,
	content_type: ContentType,
	bytes: Vec<u8>,
) -> Response {
	let token = HeaderValue::from_static(content_type.as_str());
	let mut response = (status, bytes).into_response();
	let headers = response.headers_mut();
	headers.insert(CONTENT_TYPE_HEADER, token.clone());
	headers.insert(header::CONTENT_TYPE, token);
	response
}

fn request_content_type(
	extensions: &axum::http::Extensions,
	headers: &axum::http::HeaderMap,
	codec: &ServerEncoderDecoder,
) -> ContentType {
	extensions
		.get::<ContentType>()
		.copied()
		.unwrap_or_else(|| codec.negotiate(headers))
}

/// Negotiates the content type and re-encodes error bodies to match it.
pub async fn negotiate_layer(
	State(codec): State<ServerEncoderDecoder>,
	mut request: Request,
	next: Next,
) -> Response {
	let content_type = codec.negotiate(request.headers());
	request.extensions_mut().insert(content_type);

	let response = next.run(request).await;
	if content_type == ContentType::Json {
		return response;
	}

	let Some(body) = response.extensions().get::<ErrorResponse>().cloned() else {
		return response;
	};
	match codec.encode(content_type, &body) {
		Ok(bytes) => {
			let (mut parts, _) = response.into_parts();
			let token = HeaderValue::from_static(content_type.as_str());
			parts.headers.insert(CONTENT_TYPE_HEADER, token.clone());
			parts.headers.insert(header::CONTENT_TYPE, token);
			parts.headers.remove(header::CONTENT_LENGTH);
			Response::from_parts(parts, Body::from(bytes))
		}
		Err(e) => {
			tracing::error!(error = %e, "error body could not be re-encoded");
			response
		}
	}
}

/// The codec and content type negotiated for this request.
#[derive(Debug, Clone, Copy)]
pub struct Negotiated {
	codec: ServerEncoderDecoder,
	content_type: ContentType,
}

impl Negotiated {
	pub fn new(codec: ServerEncoderDecoder, content_type: ContentType) -> Self {
		Self {
			codec,
			content_type: content_type.or(codec.default_content_type()),
		}
	}

	pub fn content_type(&self) -> ContentType {
		self.content_type
	}

	/// Encodes `value` with `status`. A value that cannot be encoded is logged
	/// and reported as a 500 instead.
	pub fn respond<T: Serialize + ?Sized>(&self, status: StatusCode, value: &T) -> Response {
		match self.codec.encode(self.content_type, value) {
			Ok(bytes) => encoded_response(status, self.content_type, bytes),
			Err(e) => ApiError::from(e).into_response(),
		}
	}

	pub fn ok<T: Serialize + ?Sized>(&self, value: &T) -> Response {
		self.respond(StatusCode::OK, value)
	}

	pub fn created<T: Serialize + ?Sized>(&self, value: &T) -> Response {
		self.respond(StatusCode::CREATED, value)
	}

	pub fn accepted<T: Serialize + ?Sized>(&self, value: &T) -> Response {
		self.respond(StatusCode::ACCEPTED, value)
	}

	pub fn no_content(&self) -> Response {
		StatusCode::NO_CONTENT.into_response()
	}
}

impl<S> FromRequestParts<S> for Negotiated
where
	ServerEncoderDecoder: FromRef<S>,
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let codec = ServerEncoderDecoder::from_ref(state);
		let content_type = request_content_type(&parts.extensions, &parts.headers, &codec);
		Ok(Negotiated::new(codec, content_type))
	}
}

/// A request body decoded with the negotiated content type.
///
/// Must be the last extractor of a handler.
#[derive(Debug, Clone)]
pub struct Decoded<T>(pub T);

impl<S, T> FromRequest<S> for Decoded<T>
where
	ServerEncoderDecoder: FromRef<S>,
	S: Send + Sync,
	T: DeserializeOwned + Send,
{
	type Rejection = ApiError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let codec = ServerEncoderDecoder::from_ref(state);
		let content_type = request_content_type(req.extensions(), req.headers(), &codec);
		let bytes = Bytes::from_request(req, state).await.map_err(|e| {
			tracing::debug!(error = %e, "request body could not be read");
			ApiError::InvalidInput(None)
		})?;
		Ok(Decoded(codec.decode(content_type, &bytes)?))
	}
}

/// Query-string parameters. Malformed values are invalid input.
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
	S: Send + Sync,
	T: DeserializeOwned,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Query::<T>::try_from_uri(&parts.uri)
			.map(|Query(params)| Params(params))
			.map_err(|e| {
				tracing::debug!(error = %e, "query string rejected");
				ApiError::InvalidInput(None)
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{middleware::from_fn_with_state, routing::post, Router};
	use serde::Deserialize;
	use tower::ServiceExt;

	#[derive(Debug, Serialize, Deserialize)]
	#[serde(rename = "example")]
	struct Example {
		name: String,
	}

	#[derive(Debug, Default, Deserialize)]
	struct Paging {
		page: Option<u32>,
	}

	async fn echo(negotiated: Negotiated, Decoded(example): Decoded<Example>) -> Response {
		negotiated.ok(&example)
	}

	async fn missing(_negotiated: Negotiated) -> Result<Response, ApiError> {
		Err(ApiError::NotFound)
	}

	async fn page(negotiated: Negotiated, Params(paging): Params<Paging>) -> Response {
		negotiated.ok(&serde_json::json!({ "page": paging.page }))
	}

	fn router() -> Router {
		let codec = ServerEncoderDecoder::default();
		Router::new()
			.route("/example", post(echo))
			.route("/missing", post(missing))
			.route("/page", post(page))
			.layer(from_fn_with_state(codec, negotiate_layer))
			.with_state(codec)
	}

	async fn send(uri: &str, content_type: Option<&str>, body: &'static str) -> Response {
		let mut request = Request::builder().method("POST").uri(uri);
		if let Some(content_type) = content_type {
			request = request.header(CONTENT_TYPE_HEADER, content_type);
		}
		router()
			.oneshot(request.body(Body::from(body)).unwrap())
			.await
			.unwrap()
	}

	async fn body_of(response: Response) -> String {
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		String::from_utf8(bytes.to_vec()).unwrap()
	}

	#[tokio::test]
	async fn xml_request_gets_xml_response() {
		let response = send(
			"/example",
			Some("application/xml"),
			"<example><name>foo</name></example>",
		)
		.await;
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(
			response.headers().get(CONTENT_TYPE_HEADER).unwrap(),
			"application/xml"
		);
		assert_eq!(body_of(response).await, "<example><name>foo</name></example>");
	}

	#[tokio::test]
	async fn missing_header_defaults_to_json() {
		let response = send("/example", None, r#"{"name":"foo"}"#).await;
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(
			response.headers().get(CONTENT_TYPE_HEADER).unwrap(),
			"application/json"
		);
		assert_eq!(body_of(response).await, r#"{"name":"foo"}"#);
	}

	#[tokio::test]
	async fn unrecognized_header_behaves_like_json() {
		let response = send("/example", Some("text/yaml"), r#"{"name":"foo"}"#).await;
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(body_of(response).await, r#"{"name":"foo"}"#);
	}

	#[tokio::test]
	async fn malformed_body_is_invalid_input() {
		let response = send("/example", None, r#"{"name":"#).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(
			body_of(response).await,
			r#"{"message":"invalid input attached to request","code":400}"#
		);
	}

	#[tokio::test]
	async fn errors_follow_negotiated_content_type() {
		let response = send("/missing", Some("application/xml"), "").await;
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		assert_eq!(
			response.headers().get(CONTENT_TYPE_HEADER).unwrap(),
			"application/xml"
		);
		assert_eq!(
			body_of(response).await,
			"<error><message>resource not found</message><code>404</code></error>"
		);
	}

	#[tokio::test]
	async fn bad_query_strings_are_invalid_input() {
		let response = send("/page?page=two", None, "").await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let response = send("/page?page=2", None, "").await;
		assert_eq!(body_of(response).await, r#"{"page":2}"#);
	}
}
