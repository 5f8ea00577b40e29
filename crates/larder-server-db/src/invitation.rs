// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use larder_server_auth::{HouseholdRole, InvitationId, UserId};
use tokio_util::sync::CancellationToken;

use crate::error::{DataError, Result};
use crate::filter::QueryFilter;
use crate::memory::{MemoryStore, Tables};
use crate::types::{HouseholdInvitation, HouseholdUserMembership, InvitationStatus};

#[async_trait]
pub trait InvitationStore: Send + Sync {
	async fn create_invitation(
		&self,
		cancel: &CancellationToken,
		invitation: &HouseholdInvitation,
	) -> Result<()>;
	async fn get_invitation(
		&self,
		cancel: &CancellationToken,
		id: InvitationId,
	) -> Result<HouseholdInvitation>;
	async fn list_sent_invitations(
		&self,
		cancel: &CancellationToken,
		from_user: UserId,
		filter: &QueryFilter,
	) -> Result<Vec<HouseholdInvitation>>;
	async fn list_received_invitations(
		&self,
		cancel: &CancellationToken,
		to_user: UserId,
		filter: &QueryFilter,
	) -> Result<Vec<HouseholdInvitation>>;
	/// Marks a pending invitation accepted and adds `user_id` to the destination
	/// household as a `household_member`, in one step.
	async fn accept_invitation(
		&self,
		cancel: &CancellationToken,
		id: InvitationId,
		user_id: UserId,
		note: &str,
	) -> Result<HouseholdInvitation>;
	/// Moves a pending invitation to `Rejected` or `Cancelled`.
	async fn finalize_invitation(
		&self,
		cancel: &CancellationToken,
		id: InvitationId,
		status: InvitationStatus,
		note: &str,
	) -> Result<HouseholdInvitation>;
}

fn pending_invitation(tables: &mut Tables, id: InvitationId) -> Result<&mut HouseholdInvitation> {
	let invitation = tables
		.invitations
		.get_mut(&id)
		.ok_or_else(|| DataError::not_found(format!("invitation {id}")))?;
	if invitation.status != InvitationStatus::Pending {
		return Err(DataError::Conflict(format!(
			"invitation {id} is already {}",
			invitation.status
		)));
	}
	Ok(invitation)
}

fn newest_first(mut invitations: Vec<HouseholdInvitation>, filter: &QueryFilter) -> Vec<HouseholdInvitation> {
	invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
	filter.paginate(invitations)
}

#[async_trait]
impl InvitationStore for MemoryStore {
	#[tracing::instrument(skip(self, cancel, invitation), fields(invitation_id = %invitation.id))]
	async fn create_invitation(
		&self,
		cancel: &CancellationToken,
		invitation: &HouseholdInvitation,
	) -> Result<()> {
		let mut tables = self.write(cancel).await?;
		let household_live = tables
			.households
			.get(&invitation.destination_household)
			.is_some_and(|h| h.archived_at.is_none());
		if !household_live {
			return Err(DataError::not_found(format!(
				"household {}",
				invitation.destination_household
			)));
		}

		let duplicate = tables.invitations.values().any(|existing| {
			existing.status == InvitationStatus::Pending
				&& existing.destination_household == invitation.destination_household
				&& existing.to_email.eq_ignore_ascii_case(&invitation.to_email)
		});
		if duplicate {
			return Err(DataError::Conflict(format!(
				"{} already has a pending invitation",
				invitation.to_email
			)));
		}

		tables.invitations.insert(invitation.id, invitation.clone());
		Ok(())
	}

	async fn get_invitation(
		&self,
		cancel: &CancellationToken,
		id: InvitationId,
	) -> Result<HouseholdInvitation> {
		let tables = self.read(cancel).await?;
		tables
			.invitations
			.get(&id)
			.cloned()
			.ok_or_else(|| DataError::not_found(format!("invitation {id}")))
	}

	async fn list_sent_invitations(
		&self,
		cancel: &CancellationToken,
		from_user: UserId,
		filter: &QueryFilter,
	) -> Result<Vec<HouseholdInvitation>> {
		let tables = self.read(cancel).await?;
		let sent = tables
			.invitations
			.values()
			.filter(|i| i.from_user == from_user)
			.cloned()
			.collect();
		Ok(newest_first(sent, filter))
	}

	async fn list_received_invitations(
		&self,
		cancel: &CancellationToken,
		to_user: UserId,
		filter: &QueryFilter,
	) -> Result<Vec<HouseholdInvitation>> {
		let tables = self.read(cancel).await?;
		let received = tables
			.invitations
			.values()
			.filter(|i| i.to_user == Some(to_user))
			.cloned()
			.collect();
		Ok(newest_first(received, filter))
	}

	#[tracing::instrument(skip(self, cancel, note))]
	async fn accept_invitation(
		&self,
		cancel: &CancellationToken,
		id: InvitationId,
		user_id: UserId,
		note: &str,
	) -> Result<HouseholdInvitation> {
		let mut tables = self.write(cancel).await?;
		let household_id = pending_invitation(&mut tables, id)?.destination_household;

		let household = tables
			.households
			.get_mut(&household_id)
			.filter(|h| h.archived_at.is_none())
			.ok_or_else(|| DataError::not_found(format!("household {household_id}")))?;
		if !household.has_member(user_id) {
			household.members.push(HouseholdUserMembership::new(
				household_id,
				user_id,
				HouseholdRole::HouseholdMember,
			));
		}

		let invitation = pending_invitation(&mut tables, id)?;
		invitation.status = InvitationStatus::Accepted;
		invitation.status_note = note.to_string();
		invitation.to_user = Some(user_id);
		invitation.last_updated_at = Some(Utc::now());
		Ok(invitation.clone())
	}

	#[tracing::instrument(skip(self, cancel, note))]
	async fn finalize_invitation(
		&self,
		cancel: &CancellationToken,
		id: InvitationId,
		status: InvitationStatus,
		note: &str,
	) -> Result<HouseholdInvitation> {
		if !matches!(status, InvitationStatus::Rejected | InvitationStatus::Cancelled) {
			return Err(DataError::Conflict(format!(
				"invitations cannot be finalized as {status}"
			)));
		}

		let mut tables = self.write(cancel).await?;
		let invitation = pending_invitation(&mut tables, id)?;
		invitation.status = status;
		invitation.status_note = note.to_string();
		invitation.last_updated_at = Some(Utc::now());
		Ok(invitation.clone())
	}
}
