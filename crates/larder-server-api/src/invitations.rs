// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household_invitation_creation")]
pub struct InvitationCreationRequest {
	pub to_email: String,
	#[serde(default)]
	pub note: String,
}

impl InvitationCreationRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::email("to_email", &self.to_email)?;
		validation::max_len("note", &self.note, 1024)
	}
}

/// Body for accept, reject and cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "household_invitation_update")]
pub struct InvitationUpdateRequest {
	#[serde(default)]
	pub note: String,
}

impl InvitationUpdateRequest {
	pub fn validate(&self) -> Result<(), ValidationError> {
		validation::max_len("note", &self.note, 1024)
	}
}
