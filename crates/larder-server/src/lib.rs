// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Larder household meal-planning server.
//!
//! This crate provides the HTTP surface: content negotiation, session
//! attachment, authorization layers and the route handlers that drive the
//! data managers and publish data-change events.

pub mod api;
pub mod api_response;
pub mod authz;
pub mod cancellation;
pub mod codec;
pub mod events;
pub mod routes;
pub mod session;

pub use api::{create_app_state, create_router, AppState};
pub use api_response::{ApiError, ErrorResponse};
pub use authz::{RequirePermission, RequireServiceAdmin};
pub use events::EventPublisher;
pub use larder_server_config::ServerConfig;
pub use session::StoreSessionResolver;
