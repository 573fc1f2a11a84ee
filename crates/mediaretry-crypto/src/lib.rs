//! Media retry cryptography: retry key derivation and AEAD payload sealing.
//!
//! This crate provides:
//! - HKDF-SHA256 derivation of the retry key from a message's media key
//! - AES-256-GCM sealing bound to the message ID as associated data
//! - The postcard-encoded receipt and notification payloads
//! - Both sides of the exchange: the requester's receipt and the peer's notification

pub mod cipher;
pub mod error;
pub mod payload;
pub mod receipt;
pub mod retry_key;

// Re-export key types for convenience
pub use cipher::{open, seal, Sealed, GCM_TAG_SIZE, IV_LEN};
pub use error::CryptoError;
pub use payload::{MediaRetryNotification, MediaRetryResult, ServerErrorReceipt};
pub use receipt::{
    decrypt_media_retry_notification, decrypt_media_retry_receipt,
    encrypt_media_retry_notification, encrypt_media_retry_receipt,
};
pub use retry_key::{derive_retry_key, RetryKey, MEDIA_RETRY_INFO, RETRY_KEY_LEN};
