// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use larder_server_auth::{HouseholdId, WebhookId, WebhookTriggerEventId};
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::filter::QueryFilter;
use crate::memory::{MemoryStore, Tables};
use crate::types::{Webhook, WebhookTriggerEvent};

/// Webhooks are always addressed through the household that owns them; a
/// webhook belonging to another household is reported as not found.
#[async_trait]
pub trait WebhookStore: Send + Sync {
	async fn create_webhook(&self, cancel: &CancellationToken, webhook: &Webhook) -> Result<()>;
	async fn get_webhook(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: WebhookId,
	) -> Result<Webhook>;
	async fn list_webhooks(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		filter: &QueryFilter,
	) -> Result<Vec<Webhook>>;
	async fn archive_webhook(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: WebhookId,
	) -> Result<()>;
	async fn add_trigger_event(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		event: &WebhookTriggerEvent,
	) -> Result<()>;
	async fn archive_trigger_event(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		webhook_id: WebhookId,
		id: WebhookTriggerEventId,
	) -> Result<()>;
}

fn owned_webhook(tables: &mut Tables, household_id: HouseholdId, id: WebhookId) -> Result<&mut Webhook> {
	tables
		.webhooks
		.get_mut(&id)
		.filter(|w| w.belongs_to_household == household_id && w.archived_at.is_none())
		.ok_or_else(|| DataError::not_found(format!("webhook {id}")))
}

/// Drops archived trigger events from a webhook returned to callers.
fn visible(webhook: &Webhook) -> Webhook {
	let mut webhook = webhook.clone();
	webhook.trigger_events.retain(|e| e.archived_at.is_none());
	webhook
}

#[async_trait]
impl WebhookStore for MemoryStore {
	#[tracing::instrument(skip(self, cancel, webhook), fields(webhook_id = %webhook.id))]
	async fn create_webhook(&self, cancel: &CancellationToken, webhook: &Webhook) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		if tables.webhooks.contains_key(&webhook.id) {
			return Err(DataError::Conflict(format!("webhook {} exists", webhook.id)));
		}
		tables.webhooks.insert(webhook.id, webhook.clone());
		Ok(())
	}

	async fn get_webhook(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: WebhookId,
	) -> Result<Webhook> {
		let tables = self.read(cancel).await?;
		tables
			.webhooks
			.get(&id)
			.filter(|w| w.belongs_to_household == household_id && w.archived_at.is_none())
			.map(visible)
			.ok_or_else(|| DataError::not_found(format!("webhook {id}")))
	}

	async fn list_webhooks(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		filter: &QueryFilter,
	) -> Result<Vec<Webhook>> {
		let tables = self.read(cancel).await?;
		let mut webhooks: Vec<Webhook> = tables
			.webhooks
			.values()
			.filter(|w| w.belongs_to_household == household_id && w.archived_at.is_none())
			.map(visible)
			.collect();
		webhooks.sort_by_key(|w| (w.created_at, w.id));
		Ok(filter.paginate(webhooks))
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn archive_webhook(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		id: WebhookId,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		owned_webhook(&mut tables, household_id, id)?.archived_at = Some(Utc::now());
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel, event), fields(webhook_id = %event.belongs_to_webhook))]
	async fn add_trigger_event(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		event: &WebhookTriggerEvent,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let webhook = owned_webhook(&mut tables, household_id, event.belongs_to_webhook)?;
		let duplicate = webhook
			.trigger_events
			.iter()
			.any(|e| e.archived_at.is_none() && e.trigger_event == event.trigger_event);
		if duplicate {
			return Err(DataError::Conflict(format!(
				"webhook already triggers on {}",
				event.trigger_event
			)));
		}
		webhook.trigger_events.push(event.clone());
		webhook.last_updated_at = Some(Utc::now());
		Ok(())
	}

	#[tracing::instrument(skip(self, cancel))]
	async fn archive_trigger_event(
		&self,
		cancel: &CancellationToken,
		household_id: HouseholdId,
		webhook_id: WebhookId,
		id: WebhookTriggerEventId,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let webhook = owned_webhook(&mut tables, household_id, webhook_id)?;
		let event = webhook
			.trigger_events
			.iter_mut()
			.find(|e| e.id == id && e.archived_at.is_none())
			.ok_or_else(|| DataError::not_found(format!("webhook trigger event {id}")))?;
		event.archived_at = Some(Utc::now());
		Ok(())
	}
}
