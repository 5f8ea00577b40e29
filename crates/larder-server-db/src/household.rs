// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Households and their memberships.

use async_trait::async_trait;
use chrono::Utc;
use larder_server_auth::{HouseholdId, HouseholdRole, UserId};
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::filter::QueryFilter;
use crate::memory::{MemoryStore, Tables};
use crate::types::{Household, HouseholdUserMembership};

#[async_trait]
pub trait HouseholdStore: Send + Sync {
	async fn create_household(&self, cancel: &CancellationToken, household: &Household)
		-> Result<()>;
	async fn get_household(
		&self,
		cancel: &CancellationToken,
		id: HouseholdId,
	) -> Result<Household>;
	/// Every live household. Only service admins should see this.
	async fn list_all_households(
		&self,
		cancel: &CancellationToken,
		filter: &QueryFilter,
	) -> Result<Vec<Household>>;
	async fn list_households_for_user(
		&self,
		cancel: &CancellationToken,
		user_id: UserId,
		filter: &QueryFilter,
	) -> Result<Vec<Household>>;
	async fn update_household(&self, cancel: &CancellationToken, household: &Household)
		-> Result<()>;
	async fn archive_household(&self, cancel: &CancellationToken, id: HouseholdId) -> Result<()>;
	async fn add_member(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		user_id: UserId,
		role: HouseholdRole,
	) -> Result<()>;
	/// Replaces a member's roles and returns the updated household. The owner
	/// and the last remaining admin keep `household_admin`.
	async fn modify_member_roles(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		user_id: UserId,
		roles: Vec<String>,
	) -> Result<Household>;
	/// Makes `new_owner`, who must already be a member, the owner and an admin.
	async fn transfer_ownership(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		new_owner: UserId,
	) -> Result<Household>;
	async fn remove_member(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		user_id: UserId,
	) -> Result<Household>;
	/// Marks `household_id` as the user's default and clears the flag elsewhere.
	async fn mark_as_default(
		&self,
		cancel: &CancellationToken,
		user_id: UserId,
		household_id: HouseholdId,
	) -> Result<()>;
}

fn live_household(tables: &mut Tables, id: HouseholdId) -> Result<&mut Household> {
	tables
		.households
		.get_mut(&id)
		.filter(|h| h.archived_at.is_none())
		.ok_or_else(|| DataError::not_found(format!("household {id}")))
}

fn member_mut(household: &mut Household, user_id: UserId) -> Result<&mut HouseholdUserMembership> {
	let household_id = household.id;
	household
		.members
		.iter_mut()
		.find(|m| m.belongs_to_user == user_id)
		.ok_or_else(|| DataError::not_found(format!("member {user_id} of household {household_id}")))
}

fn is_admin(membership: &HouseholdUserMembership) -> bool {
	let admin = HouseholdRole::HouseholdAdmin.as_str();
	membership.household_roles.iter().any(|r| r == admin)
}

fn sorted(mut households: Vec<Household>) -> Vec<Household> {
	households.sort_by_key(|h| (h.created_at, h.id));
	households
}

#[async_trait]
impl HouseholdStore for MemoryStore {
	#[tracing::instrument(skip(self, cancel, household), fields(household_id = %household.id))]
	async fn create_household(
		&self,
		cancel: &CancellationToken,
		household: &Household,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		if tables.households.contains_key(&household.id) {
			return Err(DataError::Conflict(format!("household {} exists", household.id)));
		}
		tables.households.insert(household.id, household.clone());
		tracing::debug!("household created");
		Ok(())
	}

	async fn get_household(
		&self,
		cancel: &CancellationToken,
		id: HouseholdId,
	) -> Result<Household> {
		let tables = self.read(cancel).await?;
		tables
			.households
			.get(&id)
			.filter(|h| h.archived_at.is_none())
			.cloned()
			.ok_or_else(|| DataError::not_found(format!("household {id}")))
	}

	async fn list_all_households(
		&self,
		cancel: &CancellationToken,
		filter: &QueryFilter,
	) -> Result<Vec<Household>> {
		let tables = self.read(cancel).await?;
		let live = tables
			.households
			.values()
			.filter(|h| h.archived_at.is_none())
			.cloned()
			.collect();
		Ok(filter.paginate(sorted(live)))
	}

	async fn list_households_for_user(
		&self,
		cancel: &CancellationToken,
		user_id: UserId,
		filter: &QueryFilter,
	) -> Result<Vec<Household>> {
		let tables = self.read(cancel).await?;
		let mine = tables
			.households
			.values()
			.filter(|h| h.archived_at.is_none() && h.has_member(user_id))
			.cloned()
			.collect();
		Ok(filter.paginate(sorted(mine)))
	}

	#[tracing::instrument(skip(self, cancel, household), fields(household_id = %household.id))]
	async fn update_household(
		&self,
		cancel: &CancellationToken,
		household: &Household,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let existing = live_household(&mut tables, household.id)?;
		existing.name = household.name.clone();
		existing.contact_phone = household.contact_phone.clone();
		existing.last_updated_at = Some(Utc::now());
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn archive_household(&self, cancel: &CancellationToken, id: HouseholdId) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let household = live_household(&mut tables, id)?;
		household.archived_at = Some(Utc::now());
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn add_member(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		user_id: UserId,
		role: HouseholdRole,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let household = live_household(&mut tables, household_id)?;
		if household.has_member(user_id) {
			return Err(DataError::Conflict(format!(
				"user {user_id} already belongs to household {household_id}"
			)));
		}
		household
			.members
			.push(HouseholdUserMembership::new(household_id, user_id, role));
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn modify_member_roles(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		user_id: UserId,
		roles: Vec<String>,
	) -> Result<Household> {
		let mut tables = self.write(cancel).await?;
		let household = live_household(&mut tables, household_id)?;
		let keeps_admin = roles
			.iter()
			.any(|r| r == HouseholdRole::HouseholdAdmin.as_str());
		if !keeps_admin {
			if household.belongs_to_user == user_id {
				return Err(DataError::Conflict(
					"the owner must remain a household admin".to_string(),
				));
			}
			let other_admins = household
				.members
				.iter()
				.filter(|m| m.belongs_to_user != user_id && is_admin(m))
				.count();
			if other_admins == 0 && household.membership(user_id).is_some_and(is_admin) {
				return Err(DataError::Conflict(
					"a household needs at least one admin".to_string(),
				));
			}
		}
		member_mut(household, user_id)?.household_roles = roles;
		household.last_updated_at = Some(Utc::now());
		Ok(household.clone())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn transfer_ownership(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		new_owner: UserId,
	) -> Result<Household> {
		let mut tables = self.write(cancel).await?;
		let household = live_household(&mut tables, household_id)?;
		member_mut(household, new_owner)?.household_roles =
			vec![HouseholdRole::HouseholdAdmin.to_string()];
		household.belongs_to_user = new_owner;
		household.last_updated_at = Some(Utc::now());
		Ok(household.clone())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn remove_member(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		user_id: UserId,
	) -> Result<Household> {
		let mut tables = self.write(cancel).await?;
		let household = live_household(&mut tables, household_id)?;
		if household.belongs_to_user == user_id {
			return Err(DataError::Conflict(
				"the owner cannot be removed; transfer ownership first".to_string(),
			));
		}
		let before = household.members.len();
		household.members.retain(|m| m.belongs_to_user != user_id);
		if household.members.len() == before {
			return Err(DataError::not_found(format!(
				"member {user_id} of household {household_id}"
			)));
		}
		household.last_updated_at = Some(Utc::now());
		Ok(household.clone())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn mark_as_default(
		&self,
		cancel: &CancellationToken,
		user_id: UserId,
		household_id: HouseholdId,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		member_mut(live_household(&mut tables, household_id)?, user_id)?;

		for household in tables.households.values_mut() {
			for membership in household.members.iter_mut() {
				if membership.belongs_to_user == user_id {
					membership.default_household = household.id == household_id;
				}
			}
		}
		Ok(())
	}
}
