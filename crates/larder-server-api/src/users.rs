// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use larder_server_auth::{AccountStatus, Permission, UserId};
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

pub const MAX_PERMISSIONS_PER_CHECK: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "user_account_status_update")]
pub struct UserStatusUpdateRequest {
	pub target_user_id: UserId,
	pub new_status: AccountStatus,
	#[serde(default)]
	pub reason: String,
}

impl UserStatusUpdateRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::required("reason", &self.reason)?;
		validation::max_len("reason", &self.reason, 1024)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "permission_check")]
pub struct PermissionCheckRequest {
	#[serde(default)]
	pub permissions: Vec<String>,
}

impl PermissionCheckRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		self.parsed().map(|_| ())
	}

	/// The requested permissions, deduplicated and in catalog form.
	pub fn parsed(&self) -> Result<Vec<Permission>, ValidationError> {
		if self.permissions.is_empty() {
			return Err(ValidationError::new(
				"permissions",
				"at least one permission is required",
			));
		}
		if self.permissions.len() > MAX_PERMISSIONS_PER_CHECK {
			return Err(ValidationError::new(
				"permissions",
				format!("at most {MAX_PERMISSIONS_PER_CHECK} permissions per check"),
			));
		}

		let mut parsed = self
			.permissions
			.iter()
			.map(|id| {
				Permission::from_id(id.trim())
					.ok_or_else(|| ValidationError::new("permissions", format!("unknown permission '{id}'")))
			})
			.collect::<Result<Vec<_>, _>>()?;
		parsed.sort();
		parsed.dedup();
		Ok(parsed)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "permission_check_result")]
pub struct PermissionCheckResponse {
	/// Permission id to whether the requester holds it.
	pub permissions: BTreeMap<String, bool>,
}
