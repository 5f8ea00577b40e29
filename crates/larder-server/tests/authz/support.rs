// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use larder_server_auth::{HouseholdRole, ServiceRole, SessionResolver};
use larder_server_db::{Household, HouseholdStore, MemoryStore, User, UserStore};
use larder_server_events::{DataChangeMessage, EventType, PublishError, Publisher};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use larder_server::{create_app_state, create_router, ServerConfig, StoreSessionResolver};

/// Remembers every published message.
#[derive(Default)]
pub struct RecordingPublisher {
	messages: Mutex<Vec<(String, DataChangeMessage)>>,
}

impl RecordingPublisher {
	pub fn event_types(&self) -> Vec<EventType> {
		self.messages
			.lock()
			.unwrap()
			.iter()
			.map(|(_, message)| message.event_type)
			.collect()
	}

	pub fn messages(&self) -> Vec<(String, DataChangeMessage)> {
		self.messages.lock().unwrap().clone()
	}
}

impl Publisher for RecordingPublisher {
	fn publish(&self, topic: &str, message: &DataChangeMessage) -> Result<(), PublishError> {
		self.messages
			.lock()
			.unwrap()
			.push((topic.to_string(), message.clone()));
		Ok(())
	}
}

/// Rejects every message.
pub struct FailingPublisher;

impl Publisher for FailingPublisher {
	fn publish(&self, _topic: &str, _message: &DataChangeMessage) -> Result<(), PublishError> {
		Err(PublishError::QueueFull)
	}
}

#[derive(Clone)]
pub struct TestUser {
	pub user: User,
	pub session_token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		(
			HeaderName::from_static("authorization"),
			HeaderValue::from_str(&format!("Bearer {}", self.session_token)).unwrap(),
		)
	}
}

#[derive(Clone)]
pub struct HouseholdFixture {
	pub household: Household,
	pub owner: TestUser,
	pub member: TestUser,
}

#[derive(Clone)]
pub struct Fixtures {
	pub household_a: HouseholdFixture,
	pub household_b: HouseholdFixture,
	pub admin: TestUser,
	pub outsider: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub store: Arc<MemoryStore>,
	pub sessions: Arc<StoreSessionResolver<MemoryStore>>,
	pub publisher: Arc<RecordingPublisher>,
}

impl TestApp {
	pub async fn new() -> Self {
		let publisher = Arc::new(RecordingPublisher::default());
		let mut app = Self::with_publisher(publisher.clone()).await;
		app.publisher = publisher;
		app
	}

	/// An app whose events go to `publisher`. The `publisher` field then holds
	/// an unused recorder.
	pub async fn with_publisher(publisher: Arc<dyn Publisher>) -> Self {
		let store = Arc::new(MemoryStore::new());
		let sessions = Arc::new(StoreSessionResolver::new(store.clone()));
		let fixtures = create_fixtures(&store, &sessions).await;

		let state = create_app_state(
			store.clone(),
			sessions.clone(),
			publisher,
			&ServerConfig::default(),
		);
		Self {
			router: create_router(state),
			fixtures,
			store,
			sessions,
			publisher: Arc::new(RecordingPublisher::default()),
		}
	}

	/// A router over this app's store that resolves sessions with `sessions`
	/// instead of the store-backed resolver.
	pub fn router_with_sessions(&self, sessions: Arc<dyn SessionResolver>) -> Router {
		let state = create_app_state(
			self.store.clone(),
			sessions,
			self.publisher.clone(),
			&ServerConfig::default(),
		);
		create_router(state)
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self.request(Method::GET, path, user, Option::<()>::None).await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn put(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PUT, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	/// Sends `body` as-is with the given `RawHTML-type` header.
	pub async fn send_raw(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		content_type: &str,
		body: impl Into<Body>,
	) -> Response<Body> {
		let mut builder = Request::builder()
			.method(method)
			.uri(path)
			.header("RawHTML-type", content_type);
		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}
		let request = builder.body(body.into()).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => Body::from(serde_json::to_string(&b).unwrap()),
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();
		self.router.clone().oneshot(request).await.unwrap()
	}
}

pub async fn oneshot(router: &Router, request: Request<Body>) -> Response<Body> {
	router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
	axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap()
		.to_vec()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
	serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PUT => {
				app.put(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app.patch(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

async fn create_fixtures(
	store: &Arc<MemoryStore>,
	sessions: &StoreSessionResolver<MemoryStore>,
) -> Fixtures {
	let admin = create_test_user(store, sessions, "admin", true).await;
	let outsider = create_test_user(store, sessions, "outsider", false).await;
	let household_a = create_household_fixture(store, sessions, "a").await;
	let household_b = create_household_fixture(store, sessions, "b").await;

	Fixtures {
		household_a,
		household_b,
		admin,
		outsider,
	}
}

async fn create_household_fixture(
	store: &Arc<MemoryStore>,
	sessions: &StoreSessionResolver<MemoryStore>,
	suffix: &str,
) -> HouseholdFixture {
	let cancel = CancellationToken::new();
	let owner = create_test_user(store, sessions, &format!("owner-{suffix}"), false).await;
	let member = create_test_user(store, sessions, &format!("member-{suffix}"), false).await;

	let household = Household::new(format!("Household {suffix}"), owner.user.id);
	store.create_household(&cancel, &household).await.unwrap();
	store
		.add_member(
			&cancel,
			household.id,
			member.user.id,
			HouseholdRole::HouseholdMember,
		)
		.await
		.unwrap();
	let household = store.get_household(&cancel, household.id).await.unwrap();

	HouseholdFixture {
		household,
		owner,
		member,
	}
}

async fn create_test_user(
	store: &Arc<MemoryStore>,
	sessions: &StoreSessionResolver<MemoryStore>,
	username: &str,
	is_admin: bool,
) -> TestUser {
	let mut user = User::new(username, format!("{username}@larder.test"));
	if is_admin {
		user.service_roles = vec![ServiceRole::ServiceAdmin.to_string()];
	}
	store
		.create_user(&CancellationToken::new(), &user)
		.await
		.unwrap();

	let session_token = format!("token-{}", user.id);
	sessions.register(session_token.clone(), user.id).await;
	TestUser {
		user,
		session_token,
	}
}
