//! LINE Messaging API integration.
//!
//! Provides the push and reply clients used for parent notifications and
//! webhook responses, the webhook event payload types, and verification
//! of the `x-line-signature` request header.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod events;
pub mod signature;

pub use client::{LineClient, LineConfig, TextMessage};
pub use error::{LineError, Result};
pub use events::{EventSource, MessageContent, WebhookEvent, WebhookPayload};
pub use signature::verify_signature;
