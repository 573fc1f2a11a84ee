//! Client-side media retry handling.
//!
//! Wires the protocol and crypto crates to the rest of a client: sending
//! retry receipts through a [`NodeSender`], turning inbound notifications into
//! [`Event`]s for an [`EventDispatcher`], and decrypting the result.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod transport;

pub use client::{build_media_retry_receipt, decrypt_media_retry_notification, Client};
pub use config::ClientConfig;
pub use dispatch::{BroadcastDispatcher, Event, EventDispatcher};
pub use error::{ClientError, ConfigError, TransportError};
pub use transport::{ChannelSender, NodeSender};
