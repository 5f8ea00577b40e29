// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data-change event publication configuration.

use serde::Deserialize;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_DATA_CHANGES_TOPIC: &str = "data_changes";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Where published events are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSinkKind {
	/// Write events to the log.
	#[default]
	Log,
	/// POST events to a broker endpoint.
	Http,
	/// Discard events.
	None,
}

impl std::str::FromStr for EventSinkKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"log" => Ok(EventSinkKind::Log),
			"http" => Ok(EventSinkKind::Http),
			"none" => Ok(EventSinkKind::None),
			other => Err(format!("unknown event sink '{other}'")),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsConfig {
	pub queue_capacity: usize,
	pub workers: usize,
	pub data_changes_topic: String,
	pub sink: EventSinkKind,
	pub http_endpoint: Option<String>,
	pub http_timeout_secs: u64,
}

impl Default for EventsConfig {
	fn default() -> Self {
		Self {
			queue_capacity: DEFAULT_QUEUE_CAPACITY,
			workers: DEFAULT_WORKERS,
			data_changes_topic: DEFAULT_DATA_CHANGES_TOPIC.to_string(),
			sink: EventSinkKind::Log,
			http_endpoint: None,
			http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfigLayer {
	#[serde(default)]
	pub queue_capacity: Option<usize>,
	#[serde(default)]
	pub workers: Option<usize>,
	#[serde(default)]
	pub data_changes_topic: Option<String>,
	#[serde(default)]
	pub sink: Option<EventSinkKind>,
	#[serde(default)]
	pub http_endpoint: Option<String>,
	#[serde(default)]
	pub http_timeout_secs: Option<u64>,
}

impl EventsConfigLayer {
	pub fn merge(&mut self, other: EventsConfigLayer) {
		if other.queue_capacity.is_some() {
			self.queue_capacity = other.queue_capacity;
		}
		if other.workers.is_some() {
			self.workers = other.workers;
		}
		if other.data_changes_topic.is_some() {
			self.data_changes_topic = other.data_changes_topic;
		}
		if other.sink.is_some() {
			self.sink = other.sink;
		}
		if other.http_endpoint.is_some() {
			self.http_endpoint = other.http_endpoint;
		}
		if other.http_timeout_secs.is_some() {
			self.http_timeout_secs = other.http_timeout_secs;
		}
	}

	pub fn finalize(self) -> EventsConfig {
		EventsConfig {
			queue_capacity: self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY),
			workers: self.workers.unwrap_or(DEFAULT_WORKERS),
			data_changes_topic: self
				.data_changes_topic
				.unwrap_or_else(|| DEFAULT_DATA_CHANGES_TOPIC.to_string()),
			sink: self.sink.unwrap_or_default(),
			http_endpoint: self.http_endpoint,
			http_timeout_secs: self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
		}
	}
}
