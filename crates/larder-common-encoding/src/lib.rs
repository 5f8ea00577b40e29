// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Content negotiation and body encoding for Larder.
//!
//! Requests and responses carry their serialization in the `RawHTML-type`
//! header. The header name is part of the wire contract and is spelled exactly
//! that way.

mod codec;
mod content_type;
mod error;

pub use codec::ServerEncoderDecoder;
pub use content_type::{ContentType, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE, XML_CONTENT_TYPE};
pub use error::EncodingError;
