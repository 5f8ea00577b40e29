// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use larder_server_auth::{AccountStatus, UserId};
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::filter::QueryFilter;
use crate::memory::MemoryStore;
use crate::types::User;

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn create_user(&self, cancel: &CancellationToken, user: &User) -> Result<()>;
	async fn get_user(&self, cancel: &CancellationToken, id: UserId) -> Result<User>;
	async fn get_user_by_email(&self, cancel: &CancellationToken, email: &str) -> Result<User>;
	async fn list_users(&self, cancel: &CancellationToken, filter: &QueryFilter)
		-> Result<Vec<User>>;
	/// Users whose username starts with `prefix`, ignoring case.
	async fn search_users_by_username(
		&self,
		cancel: &CancellationToken,
		prefix: &str,
		filter: &QueryFilter,
	) -> Result<Vec<User>>;
	async fn update_account_status(
		&self,
		cancel: &CancellationToken,
		id: UserId,
		status: AccountStatus,
		explanation: &str,
	) -> Result<User>;
}

#[async_trait]
impl UserStore for MemoryStore {
	#[tracing::instrument(skip(self, cancel, user), fields(user_id = %user.id))]
	async fn create_user(&self, cancel: &CancellationToken, user: &User) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let taken = tables.users.values().any(|u| {
			u.username.eq_ignore_ascii_case(&user.username)
				|| u.email_address.eq_ignore_ascii_case(&user.email_address)
		});
		if taken {
			return Err(DataError::Conflict(format!(
				"username or email for {} already registered",
				user.username
			)));
		}
		tables.users.insert(user.id, user.clone());
		Ok(())
	}

	async fn get_user(&self, cancel: &CancellationToken, id: UserId) -> Result<User> {
		let tables = self.read(cancel).await?;
		tables
			.users
			.get(&id)
			.filter(|u| u.archived_at.is_none())
			.cloned()
			.ok_or_else(|| DataError::not_found(format!("user {id}")))
	}

	async fn get_user_by_email(&self, cancel: &CancellationToken, email: &str) -> Result<User> {
		let tables = self.read(cancel).await?;
		tables
			.users
			.values()
			.find(|u| u.archived_at.is_none() && u.email_address.eq_ignore_ascii_case(email.trim()))
			.cloned()
			.ok_or_else(|| DataError::not_found("user with that email"))
	}

	async fn list_users(
		&self,
		cancel: &CancellationToken,
		filter: &QueryFilter,
	) -> Result<Vec<User>> {
		let tables = self.read(cancel).await?;
		let mut users: Vec<User> = tables
			.users
			.values()
			.filter(|u| u.archived_at.is_none())
			.cloned()
			.collect();
		users.sort_by(|a, b| a.username.cmp(&b.username));
		Ok(filter.paginate(users))
	}

	async fn search_users_by_username(
		&self,
		cancel: &CancellationToken,
		prefix: &str,
		filter: &QueryFilter,
	) -> Result<Vec<User>> {
		let prefix = prefix.trim().to_lowercase();
		let tables = self.read(cancel).await?;
		let mut users: Vec<User> = tables
			.users
			.values()
			.filter(|u| u.archived_at.is_none() && u.username.to_lowercase().starts_with(&prefix))
			.cloned()
			.collect();
		users.sort_by(|a, b| a.username.cmp(&b.username));
		Ok(filter.paginate(users))
	}

	#[tracing::instrument(skip(self, cancel, explanation))]
	async fn update_account_status(
		&self,
		cancel: &CancellationToken,
		id: UserId,
		status: AccountStatus,
		explanation: &str,
	) -> Result<User> {
		let mut tables = self.write(cancel).await?;
		let user = tables
			.users
			.get_mut(&id)
			.filter(|u| u.archived_at.is_none())
			.ok_or_else(|| DataError::not_found(format!("user {id}")))?;
		user.account_status = status;
		user.account_status_explanation = explanation.to_string();
		user.last_updated_at = Some(Utc::now());
		Ok(user.clone())
	}
}
