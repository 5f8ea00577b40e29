// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for household routes.

use axum::http::{Method, StatusCode};
use larder_server_events::EventType;
use serde_json::json;

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn household_routes_require_the_right_role() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let b = &app.fixtures.household_b;
	let household = a.household.id;

	let cases = vec![
		AuthzCase {
			name: "anonymous list",
			method: Method::GET,
			path: "/api/v1/households".to_string(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member reads own household",
			method: Method::GET,
			path: format!("/api/v1/households/{household}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other household cannot see it",
			method: Method::GET,
			path: format!("/api/v1/households/{household}"),
			user: Some(b.owner.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "service admin reads any household",
			method: Method::GET,
			path: format!("/api/v1/households/{household}"),
			user: Some(app.fixtures.admin.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member cannot update",
			method: Method::PUT,
			path: format!("/api/v1/households/{household}"),
			user: Some(a.member.clone()),
			body: Some(json!({ "name": "Renamed" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner updates",
			method: Method::PUT,
			path: format!("/api/v1/households/{household}"),
			user: Some(a.owner.clone()),
			body: Some(json!({ "name": "Renamed" })),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "service admin updates any household",
			method: Method::PUT,
			path: format!("/api/v1/households/{household}"),
			user: Some(app.fixtures.admin.clone()),
			body: Some(json!({ "contact_phone": "555-0100" })),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other owner cannot archive",
			method: Method::DELETE,
			path: format!("/api/v1/households/{household}"),
			user: Some(b.owner.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member cannot invite",
			method: Method::POST,
			path: format!("/api/v1/households/{household}/invite"),
			user: Some(a.member.clone()),
			body: Some(json!({ "to_email": "someone@larder.test" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "outsider cannot mark as default",
			method: Method::POST,
			path: format!("/api/v1/households/{household}/default"),
			user: Some(app.fixtures.outsider.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member marks as default",
			method: Method::POST,
			path: format!("/api/v1/households/{household}/default"),
			user: Some(a.member.clone()),
			body: Some(json!({})),
			expected_status: StatusCode::ACCEPTED,
		},
		AuthzCase {
			name: "member cannot remove the owner",
			method: Method::DELETE,
			path: format!("/api/v1/households/{household}/members/{}", a.owner.user.id),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "malformed household id",
			method: Method::GET,
			path: "/api/v1/households/not-a-uuid".to_string(),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn members_only_list_their_own_households() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;

	let response = app.get("/api/v1/households", Some(&a.member)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = json_body(response).await;
	let data = body["data"].as_array().unwrap();
	assert_eq!(data.len(), 1);
	assert_eq!(data[0]["id"], a.household.id.to_string());

	let response = app
		.get("/api/v1/households", Some(&app.fixtures.admin))
		.await;
	let body = json_body(response).await;
	assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn creating_a_household_makes_the_caller_its_admin() {
	let app = TestApp::new().await;
	let outsider = &app.fixtures.outsider;

	let response = app
		.post("/api/v1/households", Some(outsider), json!({ "name": "Cabin" }))
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let created = json_body(response).await;
	assert_eq!(created["belongs_to_user"], outsider.user.id.to_string());

	let response = app.get("/api/v1/households/current", Some(outsider)).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["id"], created["id"]);

	let response = app
		.put(
			&format!("/api/v1/households/{}", created["id"].as_str().unwrap()),
			Some(outsider),
			json!({ "name": "Lake Cabin" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	assert_eq!(
		app.publisher.event_types(),
		vec![EventType::HouseholdCreated, EventType::HouseholdUpdated]
	);
}

#[tokio::test]
async fn callers_without_a_household_have_no_current_household() {
	let app = TestApp::new().await;
	let response = app
		.get("/api/v1/households/current", Some(&app.fixtures.outsider))
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn promoted_members_gain_admin_capabilities() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let household = a.household.id;

	let response = app
		.patch(
			&format!(
				"/api/v1/households/{household}/members/{}/permissions",
				a.member.user.id
			),
			Some(&a.owner),
			json!({ "new_roles": ["household_admin"], "reason": "helping out" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);

	let updated = json_body(response).await;
	let promoted = updated["members"]
		.as_array()
		.unwrap()
		.iter()
		.find(|m| m["belongs_to_user"] == a.member.user.id.to_string())
		.unwrap();
	assert_eq!(promoted["household_roles"], json!(["household_admin"]));

	let messages = app.publisher.messages();
	let (_, message) = messages.last().unwrap();
	assert_eq!(
		message.event_type,
		EventType::HouseholdMembershipPermissionsUpdated
	);
	assert_eq!(message.payload.as_ref(), Some(&updated));

	let response = app
		.put(
			&format!("/api/v1/households/{household}"),
			Some(&a.member),
			json!({ "name": "Shared" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn the_owner_stays_an_admin() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let household = a.household.id;
	let owner_roles = format!(
		"/api/v1/households/{household}/members/{}/permissions",
		a.owner.user.id
	);

	let response = app
		.patch(
			&owner_roles,
			Some(&a.owner),
			json!({ "new_roles": ["household_member"], "reason": "stepping back" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);

	let response = app
		.patch(
			&format!(
				"/api/v1/households/{household}/members/{}/permissions",
				a.member.user.id
			),
			Some(&a.owner),
			json!({ "new_roles": ["household_admin"], "reason": "helping out" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);

	// A second admin cannot demote the owner either.
	let response = app
		.patch(
			&owner_roles,
			Some(&a.member),
			json!({ "new_roles": ["household_member"], "reason": "coup" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(json_body(response).await["code"], 409);

	assert_eq!(
		app.publisher.event_types(),
		vec![EventType::HouseholdMembershipPermissionsUpdated]
	);
}

#[tokio::test]
async fn unknown_roles_are_invalid_input() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;

	let response = app
		.patch(
			&format!(
				"/api/v1/households/{}/members/{}/permissions",
				a.household.id, a.member.user.id
			),
			Some(&a.owner),
			json!({ "new_roles": ["household_overlord"], "reason": "typo" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = json_body(response).await;
	assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn ownership_transfer_checks_the_current_owner() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let path = format!("/api/v1/households/{}/transfer", a.household.id);

	let response = app
		.post(
			&path,
			Some(&a.owner),
			json!({
				"current_owner": a.member.user.id,
				"new_owner": a.owner.user.id,
				"reason": "swap",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let response = app
		.post(
			&path,
			Some(&a.owner),
			json!({
				"current_owner": a.owner.user.id,
				"new_owner": a.member.user.id,
				"reason": "moving out",
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);
	let household = json_body(response).await;
	assert_eq!(household["belongs_to_user"], a.member.user.id.to_string());
}

#[tokio::test]
async fn removed_members_lose_access() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let household = a.household.id;

	let response = app
		.delete(
			&format!("/api/v1/households/{household}/members/{}", a.member.user.id),
			Some(&a.owner),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);

	let response = app
		.get(&format!("/api/v1/households/{household}"), Some(&a.member))
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert!(app
		.publisher
		.event_types()
		.contains(&EventType::HouseholdMemberRemoved));
}

#[tokio::test]
async fn archived_households_are_gone() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let path = format!("/api/v1/households/{}", a.household.id);

	let response = app.delete(&path, Some(&a.owner)).await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let response = app.get(&path, Some(&app.fixtures.admin)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
