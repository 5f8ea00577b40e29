// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for household invitations.

use axum::http::StatusCode;
use larder_server_events::EventType;
use serde_json::json;

use super::support::{json_body, TestApp, TestUser};

/// Owner of household A invites the member of household B.
async fn invite(app: &TestApp) -> (String, TestUser) {
	let a = &app.fixtures.household_a;
	let recipient = app.fixtures.household_b.member.clone();

	let response = app
		.post(
			&format!("/api/v1/households/{}/invite", a.household.id),
			Some(&a.owner),
			json!({ "to_email": recipient.user.email_address, "note": "join us" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let invitation = json_body(response).await;
	assert_eq!(invitation["to_user"], recipient.user.id.to_string());
	assert_eq!(invitation["status"], "pending");
	(invitation["id"].as_str().unwrap().to_string(), recipient)
}

#[tokio::test]
async fn only_sender_and_recipient_can_read_an_invitation() {
	let app = TestApp::new().await;
	let (id, recipient) = invite(&app).await;
	let path = format!("/api/v1/household_invitations/{id}");

	assert_eq!(
		app.get(&path, Some(&app.fixtures.household_a.owner))
			.await
			.status(),
		StatusCode::OK
	);
	assert_eq!(app.get(&path, Some(&recipient)).await.status(), StatusCode::OK);
	assert_eq!(
		app.get(&path, Some(&app.fixtures.household_a.member))
			.await
			.status(),
		StatusCode::NOT_FOUND
	);
}

#[tokio::test]
async fn sent_and_received_lists() {
	let app = TestApp::new().await;
	let (id, recipient) = invite(&app).await;

	let sent = json_body(
		app.get(
			"/api/v1/household_invitations/sent",
			Some(&app.fixtures.household_a.owner),
		)
		.await,
	)
	.await;
	assert_eq!(sent["data"][0]["id"], id);

	let received = json_body(
		app.get("/api/v1/household_invitations/received", Some(&recipient))
			.await,
	)
	.await;
	assert_eq!(received["data"][0]["id"], id);
}

#[tokio::test]
async fn accepting_adds_the_recipient_as_a_member() {
	let app = TestApp::new().await;
	let (id, recipient) = invite(&app).await;
	let household = app.fixtures.household_a.household.id;

	// The sender cannot accept on the recipient's behalf.
	let response = app
		.put(
			&format!("/api/v1/household_invitations/{id}/accept"),
			Some(&app.fixtures.household_a.owner),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let response = app
		.put(
			&format!("/api/v1/household_invitations/{id}/accept"),
			Some(&recipient),
			json!({ "note": "thanks" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);
	assert_eq!(json_body(response).await["status"], "accepted");

	let response = app
		.get(&format!("/api/v1/households/{household}"), Some(&recipient))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	assert_eq!(
		app.publisher.event_types(),
		vec![
			EventType::HouseholdInvitationCreated,
			EventType::HouseholdInvitationAccepted
		]
	);
}

#[tokio::test]
async fn recipient_rejects_and_sender_cancels() {
	let app = TestApp::new().await;
	let (first, recipient) = invite(&app).await;

	let response = app
		.put(
			&format!("/api/v1/household_invitations/{first}/cancel"),
			Some(&recipient),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let response = app
		.put(
			&format!("/api/v1/household_invitations/{first}/reject"),
			Some(&recipient),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);
	assert_eq!(json_body(response).await["status"], "rejected");

	let (second, _) = invite(&app).await;
	let response = app
		.put(
			&format!("/api/v1/household_invitations/{second}/cancel"),
			Some(&app.fixtures.household_a.owner),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::ACCEPTED);
	assert_eq!(json_body(response).await["status"], "cancelled");
}

#[tokio::test]
async fn a_second_pending_invitation_conflicts() {
	let app = TestApp::new().await;
	let (_, recipient) = invite(&app).await;
	let a = &app.fixtures.household_a;

	let response = app
		.post(
			&format!("/api/v1/households/{}/invite", a.household.id),
			Some(&a.owner),
			json!({ "to_email": recipient.user.email_address.to_uppercase() }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(json_body(response).await["code"], 409);
}
