// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod events;
mod households;
mod invitations;
mod meal_plans;
mod negotiation;
mod recipes;
mod sessions;
mod support;
mod users;
mod valid_ingredients;
mod webhooks;
