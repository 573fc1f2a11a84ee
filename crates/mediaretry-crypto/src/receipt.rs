//! Both halves of the retry exchange.
//!
//! The requester seals a [`ServerErrorReceipt`]; the peer that still holds the
//! media answers with a sealed [`MediaRetryNotification`]. Each side derives
//! the retry key from the same media key.

use tracing::debug;

use crate::cipher::{open, seal, Sealed};
use crate::error::CryptoError;
use crate::payload::{MediaRetryNotification, ServerErrorReceipt};
use crate::retry_key::derive_retry_key;

/// Seal the retry receipt for `message_id`.
///
/// Fails before producing any output if encoding, key derivation or the
/// randomness source fails.
pub fn encrypt_media_retry_receipt(
    message_id: &str,
    media_key: &[u8],
) -> Result<Sealed, CryptoError> {
    let plaintext = ServerErrorReceipt {
        stanza_id: message_id.to_string(),
    }
    .to_bytes()?;
    let key = derive_retry_key(media_key)?;
    let sealed = seal(&key, message_id, &plaintext)?;
    debug!(message_id, len = sealed.ciphertext.len(), "sealed media retry receipt");
    Ok(sealed)
}

/// Open a retry receipt on the peer side.
pub fn decrypt_media_retry_receipt(
    message_id: &str,
    media_key: &[u8],
    ciphertext: &[u8],
    iv: &[u8],
) -> Result<ServerErrorReceipt, CryptoError> {
    let key = derive_retry_key(media_key)?;
    let plaintext = open(&key, message_id, ciphertext, iv)?;
    ServerErrorReceipt::from_bytes(&plaintext)
}

/// Seal the peer's answer to a retry receipt.
pub fn encrypt_media_retry_notification(
    message_id: &str,
    media_key: &[u8],
    notification: &MediaRetryNotification,
) -> Result<Sealed, CryptoError> {
    let plaintext = notification.to_bytes()?;
    let key = derive_retry_key(media_key)?;
    seal(&key, message_id, &plaintext)
}

/// Open the peer's answer using the media key passed to the original receipt.
pub fn decrypt_media_retry_notification(
    message_id: &str,
    media_key: &[u8],
    ciphertext: &[u8],
    iv: &[u8],
) -> Result<MediaRetryNotification, CryptoError> {
    let key = derive_retry_key(media_key)?;
    let plaintext = open(&key, message_id, ciphertext, iv)?;
    MediaRetryNotification::from_bytes(&plaintext).map_err(|e| match e {
        CryptoError::Serialization(e) => CryptoError::InvalidPayload(e),
        other => other,
    })
}
