// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::Utc;
use larder_server_auth::{HouseholdId, WebhookId};
use larder_server_db::{Webhook, WebhookTriggerEvent};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

pub const ALLOWED_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["application/json", "application/xml"];

fn trigger_event(field: &'static str, value: &str) -> Result<(), ValidationError> {
	validation::required(field, value)?;
	validation::max_len(field, value, 64)?;
	if !value.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
		return Err(ValidationError::new(
			field,
			format!("'{value}' is not an event type"),
		));
	}
	Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "webhook_creation")]
pub struct WebhookCreationRequest {
	pub name: String,
	pub content_type: String,
	pub url: String,
	pub method: String,
	#[serde(default)]
	pub events: Vec<String>,
}

impl WebhookCreationRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::name("name", &self.name)?;
		if !ALLOWED_CONTENT_TYPES.contains(&self.content_type.as_str()) {
			return Err(ValidationError::new(
				"content_type",
				"must be application/json or application/xml",
			));
		}
		if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
			return Err(ValidationError::new("url", "must be an http(s) URL"));
		}
		validation::max_len("url", &self.url, 2048)?;
		if !ALLOWED_METHODS.contains(&self.method.to_ascii_uppercase().as_str()) {
			return Err(ValidationError::new("method", "unsupported HTTP method"));
		}
		if self.events.is_empty() {
			return Err(ValidationError::new("events", "at least one event is required"));
		}
		for event in &self.events {
			trigger_event("events", event)?;
		}
		Ok(())
	}

	pub fn into_webhook(self, household_id: HouseholdId) -> Webhook {
		let id = WebhookId::generate();
		let mut events = self.events;
		events.sort();
		events.dedup();
		Webhook {
			id,
			name: self.name.trim().to_string(),
			content_type: self.content_type,
			url: self.url,
			method: self.method.to_ascii_uppercase(),
			belongs_to_household: household_id,
			trigger_events: events
				.into_iter()
				.map(|event| WebhookTriggerEvent::new(id, event))
				.collect(),
			created_at: Utc::now(),
			last_updated_at: None,
			archived_at: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "webhook_trigger_event_creation")]
pub struct WebhookTriggerEventCreationRequest {
	pub trigger_event: String,
}

impl WebhookTriggerEventCreationRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		trigger_event("trigger_event", &self.trigger_event)
	}
}
