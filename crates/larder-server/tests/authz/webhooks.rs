// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for webhook routes.

use axum::http::{Method, StatusCode};
use larder_server_events::EventType;
use serde_json::{json, Value};

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

fn webhook_body() -> Value {
	json!({
		"name": "notify",
		"content_type": "application/json",
		"url": "https://hooks.larder.test/notify",
		"method": "POST",
		"events": ["meal_plan_created"],
	})
}

async fn create_webhook(app: &TestApp) -> String {
	let response = app
		.post(
			"/api/v1/webhooks",
			Some(&app.fixtures.household_a.owner),
			webhook_body(),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	json_body(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn webhook_routes_require_the_right_role() {
	let app = TestApp::new().await;
	let webhook = create_webhook(&app).await;
	let a = &app.fixtures.household_a;
	let b = &app.fixtures.household_b;

	let cases = vec![
		AuthzCase {
			name: "anonymous list",
			method: Method::GET,
			path: "/api/v1/webhooks".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member lists",
			method: Method::GET,
			path: "/api/v1/webhooks".to_string(),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member reads",
			method: Method::GET,
			path: format!("/api/v1/webhooks/{webhook}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member cannot create",
			method: Method::POST,
			path: "/api/v1/webhooks".to_string(),
			user: Some(a.member.clone()),
			body: Some(webhook_body()),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member cannot archive",
			method: Method::DELETE,
			path: format!("/api/v1/webhooks/{webhook}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member cannot add trigger events",
			method: Method::POST,
			path: format!("/api/v1/webhooks/{webhook}/trigger_events"),
			user: Some(a.member.clone()),
			body: Some(json!({ "trigger_event": "recipe_created" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other household does not see it",
			method: Method::GET,
			path: format!("/api/v1/webhooks/{webhook}"),
			user: Some(b.owner.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "outsider has no household",
			method: Method::GET,
			path: "/api/v1/webhooks".to_string(),
			user: Some(app.fixtures.outsider.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn invalid_webhooks_are_rejected() {
	let app = TestApp::new().await;
	let mut body = webhook_body();
	body["url"] = json!("ftp://hooks.larder.test");

	let response = app
		.post(
			"/api/v1/webhooks",
			Some(&app.fixtures.household_a.owner),
			body,
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert!(app.publisher.event_types().is_empty());
}

#[tokio::test]
async fn trigger_events_are_added_and_archived() {
	let app = TestApp::new().await;
	let webhook = create_webhook(&app).await;
	let owner = &app.fixtures.household_a.owner;

	let response = app
		.post(
			&format!("/api/v1/webhooks/{webhook}/trigger_events"),
			Some(owner),
			json!({ "trigger_event": "recipe_created" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let trigger = json_body(response).await;
	assert_eq!(trigger["belongs_to_webhook"], webhook);

	let response = app
		.delete(
			&format!(
				"/api/v1/webhooks/{webhook}/trigger_events/{}",
				trigger["id"].as_str().unwrap()
			),
			Some(owner),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let fetched = json_body(
		app.get(&format!("/api/v1/webhooks/{webhook}"), Some(owner))
			.await,
	)
	.await;
	let events = fetched["trigger_events"].as_array().unwrap();
	assert_eq!(events.len(), 1);
	assert_eq!(events[0]["trigger_event"], "meal_plan_created");
}

#[tokio::test]
async fn archived_webhooks_disappear() {
	let app = TestApp::new().await;
	let webhook = create_webhook(&app).await;
	let owner = &app.fixtures.household_a.owner;

	let response = app
		.delete(&format!("/api/v1/webhooks/{webhook}"), Some(owner))
		.await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let response = app
		.get(&format!("/api/v1/webhooks/{webhook}"), Some(owner))
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	assert_eq!(
		app.publisher.event_types(),
		vec![EventType::WebhookCreated, EventType::WebhookArchived]
	);
}
