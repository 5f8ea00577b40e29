// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 250;

/// Pagination for list queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFilter {
	pub page: u32,
	pub limit: u32,
}

impl Default for QueryFilter {
	fn default() -> Self {
		Self {
			page: 1,
			limit: DEFAULT_PAGE_SIZE,
		}
	}
}

impl QueryFilter {
	/// Clamps out-of-range values: page 0 becomes 1, limit is kept in `1..=MAX_PAGE_SIZE`.
	pub fn normalized(self) -> Self {
		Self {
			page: self.page.max(1),
			limit: self.limit.clamp(1, MAX_PAGE_SIZE),
		}
	}

	pub fn offset(&self) -> usize {
		let f = self.normalized();
		(f.page as usize - 1) * f.limit as usize
	}

	/// Applies the page window to an already-ordered sequence.
	pub fn paginate<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
		let f = self.normalized();
		items
			.into_iter()
			.skip(self.offset())
			.take(f.limit as usize)
			.collect()
	}
}
