// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use larder_server_auth::{HouseholdId, MealPlanId};
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::filter::QueryFilter;
use crate::memory::{MemoryStore, Tables};
use crate::types::MealPlan;

#[async_trait]
pub trait MealPlanStore: Send + Sync {
	async fn create_meal_plan(&self, cancel: &CancellationToken, meal_plan: &MealPlan) -> Result<()>;
	async fn get_meal_plan(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: MealPlanId,
	) -> Result<MealPlan>;
	async fn list_meal_plans(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		filter: &QueryFilter,
	) -> Result<Vec<MealPlan>>;
	async fn update_meal_plan(&self, cancel: &CancellationToken, meal_plan: &MealPlan) -> Result<()>;
	async fn archive_meal_plan(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: MealPlanId,
	) -> Result<()>;
}

fn owned_meal_plan(
	tables: &mut Tables,
	household_id: HouseholdId,
	id: MealPlanId,
) -> Result<&mut MealPlan> {
	tables
		.meal_plans
		.get_mut(&id)
		.filter(|p| p.belongs_to_household == household_id && p.archived_at.is_none())
		.ok_or_else(|| DataError::not_found(format!("meal plan {id}")))
}

#[async_trait]
impl MealPlanStore for MemoryStore {
	#[tracing::instrument(skip(self, cancel, meal_plan), fields(meal_plan_id = %meal_plan.id))]
	async fn create_meal_plan(&self, cancel: &CancellationToken, meal_plan: &MealPlan) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		if tables.meal_plans.contains_key(&meal_plan.id) {
			return Err(DataError::Conflict(format!("meal plan {} exists", meal_plan.id)));
		}
		tables.meal_plans.insert(meal_plan.id, meal_plan.clone());
		Ok(())
	}

	async fn get_meal_plan(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: MealPlanId,
	) -> Result<MealPlan> {
		let tables = self.read(cancel).await?;
		tables
			.meal_plans
			.get(&id)
			.filter(|p| p.belongs_to_household == household_id && p.archived_at.is_none())
			.cloned()
			.ok_or_else(|| DataError::not_found(format!("meal plan {id}")))
	}

	async fn list_meal_plans(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		filter: &QueryFilter,
	) -> Result<Vec<MealPlan>> {
		let tables = self.read(cancel).await?;
		let mut plans: Vec<MealPlan> = tables
			.meal_plans
			.values()
			.filter(|p| p.belongs_to_household == household_id && p.archived_at.is_none())
			.cloned()
			.collect();
		plans.sort_by_key(|p| (p.voting_deadline, p.id));
		Ok(filter.paginate(plans))
	}

	#[tracing::instrument(skip(self, cancel, meal_plan), fields(meal_plan_id = %meal_plan.id))]
	async fn update_meal_plan(&self, cancel: &CancellationToken, meal_plan: &MealPlan) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let existing = owned_meal_plan(&mut tables, meal_plan.belongs_to_household, meal_plan.id)?;
		existing.notes = meal_plan.notes.clone();
		existing.status = meal_plan.status;
		existing.voting_deadline = meal_plan.voting_deadline;
		existing.last_updated_at = Some(Utc::now());
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn archive_meal_plan(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: MealPlanId,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		owned_meal_plan(&mut tables, household_id, id)?.archived_at = Some(Utc::now());
		Ok(())
	}
}
