//! Wire-level types for the media retry sub-protocol.
//!
//! This crate provides:
//! - The tagged tree [`Node`] used by every stanza, with a closed [`NodeContent`] union
//! - [`AttrGetter`], a deferred-error accessor for untrusted node attributes
//! - Minimal [`Jid`] addressing
//! - Parsing of inbound media retry notifications into [`MediaRetryEvent`]
//! - Length-prefixed framing of nodes for the transport writer

pub mod attrs;
pub mod codec;
pub mod error;
pub mod jid;
pub mod node;
pub mod notification;
pub mod types;

pub use attrs::{AttrGetter, FromAttr};
pub use error::{AttrError, JidError, ProtocolError};
pub use jid::Jid;
pub use node::{AttrValue, Attrs, Node, NodeContent};
pub use notification::parse_media_retry_notification;
pub use types::{MediaRetryContent, MediaRetryError, MediaRetryEvent, MessageId, MessageInfo};
