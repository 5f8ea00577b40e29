// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Content negotiation through the `RawHTML-type` header.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_bytes, json_body, TestApp};

const XML: &str = "application/xml";
const UNKNOWN_RECIPE: &str = "/api/v1/recipes/00000000-0000-4000-8000-000000000000";

fn header<'a>(response: &'a axum::response::Response, name: &str) -> &'a str {
	response.headers()[name].to_str().unwrap()
}

#[tokio::test]
async fn xml_requests_get_xml_responses() {
	let app = TestApp::new().await;
	let response = app
		.send_raw(
			Method::POST,
			"/api/v1/households",
			Some(&app.fixtures.outsider),
			XML,
			"<household_creation><name>Cabin</name></household_creation>",
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	assert_eq!(header(&response, "RawHTML-type"), XML);

	let body = String::from_utf8(body_bytes(response).await).unwrap();
	assert!(body.starts_with("<household>"), "{body}");
	assert!(body.contains("<name>Cabin</name>"), "{body}");
}

#[tokio::test]
async fn missing_header_defaults_to_json() {
	let app = TestApp::new().await;
	let response = app.get("/health", None).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(header(&response, "RawHTML-type"), "application/json");
	assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn undecodable_bodies_are_invalid_input() {
	let app = TestApp::new().await;
	let response = app
		.send_raw(
			Method::POST,
			"/api/v1/households",
			Some(&app.fixtures.outsider),
			"application/json",
			"{\"name\":",
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(
		json_body(response).await,
		json!({ "message": "invalid input attached to request", "code": 400 })
	);
}

#[tokio::test]
async fn not_found_uses_the_canned_message() {
	let app = TestApp::new().await;
	let response = app
		.get(UNKNOWN_RECIPE, Some(&app.fixtures.household_a.member))
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(
		json_body(response).await,
		json!({ "message": "resource not found", "code": 404 })
	);
}

#[tokio::test]
async fn errors_are_encoded_like_the_request() {
	let app = TestApp::new().await;
	let response = app
		.send_raw(
			Method::GET,
			UNKNOWN_RECIPE,
			Some(&app.fixtures.household_a.member),
			XML,
			"",
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(header(&response, "RawHTML-type"), XML);

	let body = String::from_utf8(body_bytes(response).await).unwrap();
	assert_eq!(
		body,
		"<error><message>resource not found</message><code>404</code></error>"
	);
}

#[tokio::test]
async fn unauthenticated_errors_are_encoded_like_the_request() {
	let app = TestApp::new().await;
	let response = app
		.send_raw(Method::GET, "/api/v1/recipes", None, XML, "")
		.await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	let body = String::from_utf8(body_bytes(response).await).unwrap();
	assert!(body.contains("<message>invalid credentials provided</message>"), "{body}");
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
	let app = TestApp::new().await;
	let response = app.get("/api/v1/pantry", None).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(json_body(response).await["code"], 404);
}
