use std::time::SystemTime;

use crate::jid::Jid;

/// Stanza identifier of a message.
pub type MessageId = String;

/// The parts of a received message needed to request a media re-upload.
#[derive(Debug, Clone)]
pub struct MessageInfo {
    pub id: MessageId,
    /// Chat the message was sent in (user or group).
    pub chat: Jid,
    /// Author of the message. Only sent on the wire for group chats.
    pub sender: Jid,
    pub is_from_me: bool,
    pub is_group: bool,
}

/// Error code sent by the peer instead of an encrypted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaRetryError {
    pub code: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRetryContent {
    /// AES-256-GCM sealed `MediaRetryNotification`, ciphertext includes the tag.
    Encrypted { ciphertext: Vec<u8>, iv: Vec<u8> },
    /// The peer refused or failed to handle the retry request.
    Declined(MediaRetryError),
}

/// Response to a media retry receipt, built from an inbound notification node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRetryEvent {
    pub timestamp: SystemTime,
    pub message_id: MessageId,
    pub chat_id: Jid,
    pub from_me: bool,
    /// Group participant that sent the original message.
    pub sender_id: Option<Jid>,
    pub content: MediaRetryContent,
}

impl MediaRetryEvent {
    pub fn ciphertext(&self) -> Option<&[u8]> {
        match &self.content {
            MediaRetryContent::Encrypted { ciphertext, .. } => Some(ciphertext),
            MediaRetryContent::Declined(_) => None,
        }
    }

    pub fn iv(&self) -> Option<&[u8]> {
        match &self.content {
            MediaRetryContent::Encrypted { iv, .. } => Some(iv),
            MediaRetryContent::Declined(_) => None,
        }
    }

    pub fn error(&self) -> Option<MediaRetryError> {
        match self.content {
            MediaRetryContent::Declined(err) => Some(err),
            MediaRetryContent::Encrypted { .. } => None,
        }
    }
}
