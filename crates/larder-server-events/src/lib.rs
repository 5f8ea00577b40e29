// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data-change events.
//!
//! Handlers hand a [`DataChangeMessage`] to a [`Publisher`] after their primary
//! effect is committed. Publishing never blocks the request: the
//! [`QueuedPublisher`] accepts messages into a bounded queue and a pool of
//! workers delivers them to the configured [`MessageSink`]s.

pub mod error;
pub mod event;
pub mod publisher;
pub mod sink;

pub use error::{PublishError, SinkError};
pub use event::{DataChangeMessage, DataType, EventType};
pub use publisher::{NoopPublisher, Publisher, QueuedPublisher};
pub use sink::http::HttpSink;
pub use sink::tracing::TracingSink;
pub use sink::MessageSink;
