// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Structural validation for decoded request bodies.

/// A decoded body that failed a structural rule. The message is shown to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
	pub field: &'static str,
	pub message: String,
}

impl ValidationError {
	pub fn new(field: &'static str, message: impl Into<String>) -> Self {
		Self {
			field,
			message: message.into(),
		}
	}
}

pub const MAX_NAME_LEN: usize = 256;

pub(crate) fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::new(field, "cannot be blank"));
	}
	Ok(())
}

pub(crate) fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
	if value.chars().count() > max {
		return Err(ValidationError::new(
			field,
			format!("must be at most {max} characters"),
		));
	}
	Ok(())
}

pub(crate) fn name(field: &'static str, value: &str) -> Result<(), ValidationError> {
	required(field, value)?;
	max_len(field, value, MAX_NAME_LEN)
}

/// Like [`name`], but only when a value was supplied.
pub(crate) fn optional_name(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
	match value {
		Some(value) => name(field, value),
		None => Ok(()),
	}
}

pub(crate) fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
	required(field, value)?;
	let value = value.trim();
	let valid = value
		.split_once('@')
		.is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'));
	if !valid {
		return Err(ValidationError::new(field, "must be an email address"));
	}
	Ok(())
}

pub(crate) fn any_present(field: &'static str, present: &[bool]) -> Result<(), ValidationError> {
	if !present.iter().any(|p| *p) {
		return Err(ValidationError::new(field, "at least one field must be provided"));
	}
	Ok(())
}
