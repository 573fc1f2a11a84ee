//! Plaintext payloads carried inside the sealed retry messages.
//!
//! Encoded with postcard; field order is part of the wire schema.

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Sent by the requester: names the message whose media should be re-uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorReceipt {
    pub stanza_id: String,
}

/// Outcome reported by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaRetryResult {
    GeneralError,
    Success,
    NotFound,
    DecryptionError,
}

/// Sent by the peer: where the re-uploaded media can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRetryNotification {
    pub stanza_id: String,
    /// Present only when `result` is [`MediaRetryResult::Success`].
    pub direct_path: Option<String>,
    pub result: MediaRetryResult,
}

impl ServerErrorReceipt {
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        Ok(postcard::from_bytes(data)?)
    }
}

impl MediaRetryNotification {
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CryptoError> {
        Ok(postcard::from_bytes(data)?)
    }
}
