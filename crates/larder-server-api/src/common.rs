// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use larder_server_db::QueryFilter;
use serde::{Deserialize, Serialize};

/// Body for operations that only report the affected id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "id_response")]
pub struct IdResponse {
	pub id: String,
}

impl IdResponse {
	pub fn new(id: impl ToString) -> Self {
		Self { id: id.to_string() }
	}
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "list")]
pub struct ListResponse<T> {
	#[serde(default = "Vec::new")]
	pub data: Vec<T>,
	pub page: u32,
	pub limit: u32,
}

impl<T> ListResponse<T> {
	pub fn new(data: Vec<T>, filter: &QueryFilter) -> Self {
		let filter = filter.normalized();
		Self {
			data,
			page: filter.page,
			limit: filter.limit,
		}
	}
}

/// `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
	pub page: Option<u32>,
	pub limit: Option<u32>,
}

impl PageQuery {
	pub fn filter(&self) -> QueryFilter {
		let defaults = QueryFilter::default();
		QueryFilter {
			page: self.page.unwrap_or(defaults.page),
			limit: self.limit.unwrap_or(defaults.limit),
		}
		.normalized()
	}
}

/// `?q=&page=&limit=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
	#[serde(default)]
	pub q: String,
	pub page: Option<u32>,
	pub limit: Option<u32>,
}

impl SearchQuery {
	pub fn filter(&self) -> QueryFilter {
		PageQuery {
			page: self.page,
			limit: self.limit,
		}
		.filter()
	}
}
