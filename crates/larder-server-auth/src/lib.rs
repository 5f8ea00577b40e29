// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization for the Larder server.
//!
//! - [`permissions`]: the closed catalog of [`Permission`] identifiers
//! - [`rbac`]: the role registry with its parent chain, seeded once per process
//! - [`checker`]: service- and household-level permission checkers
//! - [`session`]: the per-request [`SessionContext`]
//! - [`middleware`]: session token extraction and resolution

pub mod checker;
pub mod middleware;
pub mod permissions;
pub mod rbac;
pub mod session;
pub mod types;

pub use checker::{
	HouseholdRolePermissionChecker, PermissionChecker, ServiceRolePermissionChecker,
};
pub use middleware::{
	extract_bearer_token, extract_session_cookie, extract_session_cookie_with_name,
	extract_session_token, InMemorySessionStore, SessionResolver, SESSION_COOKIE_NAME,
};
pub use permissions::{Permission, UnknownPermission};
pub use rbac::{rbac, RbacError, Role, RoleRegistry};
pub use session::{RequesterInfo, SessionContext, SessionError};
pub use types::{
	AccountStatus, HouseholdId, HouseholdRole, InvitationId, MealPlanId, RecipeId, ServiceRole,
	UserId, ValidIngredientId, WebhookId, WebhookTriggerEventId,
};
