// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission checks and service-admin user routes.

use axum::http::{Method, StatusCode};
use larder_server_events::EventType;
use serde_json::json;

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn service_admins_hold_inherited_household_permissions() {
	let app = TestApp::new().await;
	let response = app
		.post(
			"/api/v1/users/permissions/check",
			Some(&app.fixtures.admin),
			json!({ "permissions": ["update.household", "read.webhooks", "update.user_status"] }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	assert_eq!(body["permissions"]["update.household"], true);
	assert_eq!(body["permissions"]["read.webhooks"], true);
	assert_eq!(body["permissions"]["update.user_status"], true);
}

#[tokio::test]
async fn members_hold_only_their_role_permissions() {
	let app = TestApp::new().await;
	let response = app
		.post(
			"/api/v1/users/permissions/check",
			Some(&app.fixtures.household_a.member),
			json!({ "permissions": ["read.webhooks", "create.webhooks", "read.webhooks"] }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	let permissions = body["permissions"].as_object().unwrap();
	assert_eq!(permissions.len(), 2);
	assert_eq!(permissions["read.webhooks"], true);
	assert_eq!(permissions["create.webhooks"], false);
}

#[tokio::test]
async fn unknown_permissions_are_invalid_input() {
	let app = TestApp::new().await;
	let member = &app.fixtures.household_a.member;

	let response = app
		.post(
			"/api/v1/users/permissions/check",
			Some(member),
			json!({ "permissions": ["launch.rockets"] }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let response = app
		.post(
			"/api/v1/users/permissions/check",
			Some(member),
			json!({ "permissions": [] }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_admin_routes_require_a_service_admin() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let admin = app.fixtures.admin.clone();

	let cases = vec![
		AuthzCase {
			name: "anyone reads self",
			method: Method::GET,
			path: "/api/v1/users/self".to_string(),
			user: Some(app.fixtures.outsider.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "household owner cannot list users",
			method: Method::GET,
			path: "/api/v1/users".to_string(),
			user: Some(a.owner.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member cannot read another user",
			method: Method::GET,
			path: format!("/api/v1/users/{}", a.owner.user.id),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "admin lists users",
			method: Method::GET,
			path: "/api/v1/users".to_string(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin reads a user",
			method: Method::GET,
			path: format!("/api/v1/users/{}", a.owner.user.id),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "admin searches users",
			method: Method::GET,
			path: "/api/v1/users/search?q=owner".to_string(),
			user: Some(admin),
			body: None,
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn banning_a_user_ends_their_session() {
	let app = TestApp::new().await;
	let member = &app.fixtures.household_a.member;

	let response = app
		.put(
			"/api/v1/users/status",
			Some(&app.fixtures.admin),
			json!({
				"target_user_id": member.user.id,
				"new_status": "banned",
				"reason": "spam",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);
	let user = json_body(response).await;
	assert_eq!(user["account_status"], "banned");
	assert_eq!(user["account_status_explanation"], "spam");

	let response = app.get("/api/v1/users/self", Some(member)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

	assert_eq!(
		app.publisher.event_types(),
		vec![EventType::UserAccountStatusUpdated]
	);
}

#[tokio::test]
async fn admins_cannot_change_their_own_status() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let response = app
		.put(
			"/api/v1/users/status",
			Some(admin),
			json!({
				"target_user_id": admin.user.id,
				"new_status": "terminated",
				"reason": "done",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert!(json_body(response).await["message"]
		.as_str()
		.unwrap()
		.starts_with("target_user_id"));
}
