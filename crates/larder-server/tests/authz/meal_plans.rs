// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for meal plan routes.

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use larder_server_events::EventType;
use serde_json::{json, Value};

use super::support::{json_body, run_authz_cases, AuthzCase, TestApp};

fn meal_plan_body() -> Value {
	json!({
		"notes": "weeknight dinners",
		"voting_deadline": Utc::now() + Duration::days(2),
	})
}

async fn create_meal_plan(app: &TestApp) -> String {
	let response = app
		.post(
			"/api/v1/meal_plans",
			Some(&app.fixtures.household_a.owner),
			meal_plan_body(),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let plan = json_body(response).await;
	assert_eq!(plan["status"], "awaiting_votes");
	assert_eq!(
		plan["belongs_to_household"],
		app.fixtures.household_a.household.id.to_string()
	);
	plan["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn meal_plan_routes_follow_household_capabilities() {
	let app = TestApp::new().await;
	let plan = create_meal_plan(&app).await;
	let a = &app.fixtures.household_a;
	let b = &app.fixtures.household_b;

	let cases = vec![
		AuthzCase {
			name: "member cannot create",
			method: Method::POST,
			path: "/api/v1/meal_plans".to_string(),
			user: Some(a.member.clone()),
			body: Some(meal_plan_body()),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member lists",
			method: Method::GET,
			path: "/api/v1/meal_plans".to_string(),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member reads",
			method: Method::GET,
			path: format!("/api/v1/meal_plans/{plan}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member cannot update",
			method: Method::PUT,
			path: format!("/api/v1/meal_plans/{plan}"),
			user: Some(a.member.clone()),
			body: Some(json!({ "notes": "mine now" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member cannot archive",
			method: Method::DELETE,
			path: format!("/api/v1/meal_plans/{plan}"),
			user: Some(a.member.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other household does not see it",
			method: Method::GET,
			path: format!("/api/v1/meal_plans/{plan}"),
			user: Some(b.owner.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "outsider has no household",
			method: Method::GET,
			path: "/api/v1/meal_plans".to_string(),
			user: Some(app.fixtures.outsider.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn past_voting_deadlines_are_invalid() {
	let app = TestApp::new().await;
	let response = app
		.post(
			"/api/v1/meal_plans",
			Some(&app.fixtures.household_a.owner),
			json!({ "voting_deadline": Utc::now() - Duration::hours(1) }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(json_body(response).await["code"], 400);
}

#[tokio::test]
async fn owners_finalize_and_archive_meal_plans() {
	let app = TestApp::new().await;
	let plan = create_meal_plan(&app).await;
	let owner = &app.fixtures.household_a.owner;
	let path = format!("/api/v1/meal_plans/{plan}");

	let response = app
		.put(&path, Some(owner), json!({ "status": "finalized" }))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["status"], "finalized");

	let response = app.put(&path, Some(owner), json!({})).await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let response = app.delete(&path, Some(owner)).await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let listed = json_body(app.get("/api/v1/meal_plans", Some(owner)).await).await;
	assert!(listed["data"].as_array().unwrap().is_empty());

	assert_eq!(
		app.publisher.event_types(),
		vec![
			EventType::MealPlanCreated,
			EventType::MealPlanUpdated,
			EventType::MealPlanArchived
		]
	);
}
