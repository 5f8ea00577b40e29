// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session resolution: bearer tokens, cookies and account standing.

use axum::{
	body::Body,
	http::{header, Request, StatusCode},
};
use larder_server_auth::{AccountStatus, HouseholdId, InMemorySessionStore, SessionContext};
use larder_server_db::{HouseholdStore, UserStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::support::{json_body, oneshot, TestApp};

#[tokio::test]
async fn missing_and_unknown_tokens_are_unauthenticated() {
	let app = TestApp::new().await;

	let response = app.get("/api/v1/users/self", None).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(
		json_body(response).await["message"],
		"invalid credentials provided"
	);

	let request = Request::builder()
		.uri("/api/v1/users/self")
		.header(header::AUTHORIZATION, "Bearer not-a-session")
		.body(Body::empty())
		.unwrap();
	let response = oneshot(&app.router, request).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_authenticates() {
	let app = TestApp::new().await;
	let member = &app.fixtures.household_a.member;

	let request = Request::builder()
		.uri("/api/v1/users/self")
		.header(
			header::COOKIE,
			format!("theme=dark; larder_session={}", member.session_token),
		)
		.body(Body::empty())
		.unwrap();
	let response = oneshot(&app.router, request).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["id"], member.user.id.to_string());
}

#[tokio::test]
async fn banned_users_lose_their_session() {
	let app = TestApp::new().await;
	let owner = &app.fixtures.household_b.owner;

	app.store
		.update_account_status(
			&CancellationToken::new(),
			owner.user.id,
			AccountStatus::Banned,
			"chargeback",
		)
		.await
		.unwrap();

	let response = app.get("/api/v1/households", Some(owner)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn an_active_household_without_a_checker_is_forbidden() {
	let app = TestApp::new().await;
	let sessions = Arc::new(InMemorySessionStore::new());
	let user = app.fixtures.outsider.user.id;
	sessions
		.insert(
			"stale",
			SessionContext::new(user, ["service_user"]).with_active_household(HouseholdId::generate()),
		)
		.await;
	let router = app.router_with_sessions(sessions);

	let request = Request::builder()
		.uri("/api/v1/webhooks")
		.header(header::AUTHORIZATION, "Bearer stale")
		.body(Body::empty())
		.unwrap();
	let response = oneshot(&router, request).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let request = Request::builder()
		.uri("/api/v1/meal_plans")
		.header(header::AUTHORIZATION, "Bearer stale")
		.body(Body::empty())
		.unwrap();
	let response = oneshot(&router, request).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn membership_changes_apply_on_the_next_request() {
	let app = TestApp::new().await;
	let a = &app.fixtures.household_a;
	let outsider = &app.fixtures.outsider;

	let response = app.get("/api/v1/webhooks", Some(outsider)).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	app.store
		.add_member(
			&CancellationToken::new(),
			a.household.id,
			outsider.user.id,
			larder_server_auth::HouseholdRole::HouseholdMember,
		)
		.await
		.unwrap();

	let response = app.get("/api/v1/webhooks", Some(outsider)).await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn revoked_tokens_are_unauthenticated() {
	let app = TestApp::new().await;
	let member = &app.fixtures.household_a.member;

	assert!(app.sessions.revoke(&member.session_token).await);
	let response = app.get("/api/v1/users/self", Some(member)).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
