// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod auth;
mod encoding;
mod events;
mod http;
mod logging;

pub use auth::{AuthConfig, AuthConfigLayer};
pub use encoding::{EncodingConfig, EncodingConfigLayer};
pub use events::{EventSinkKind, EventsConfig, EventsConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
