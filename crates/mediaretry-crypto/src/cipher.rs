//! AES-256-GCM sealing of retry payloads.
//!
//! The message ID is bound to every ciphertext as associated data, so a
//! payload sealed for one message never opens as a retry for another.

use ring::aead::{Aad, Nonce, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::CryptoError;
use crate::retry_key::RetryKey;

/// AES-256-GCM authentication tag size.
pub const GCM_TAG_SIZE: usize = 16;

/// IV size, drawn fresh for every encryption.
pub const IV_LEN: usize = NONCE_LEN;

/// Output of [`seal`]: ciphertext with appended tag, plus the IV used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_LEN],
}

/// Encrypt `plaintext` under `key` with a random IV.
///
/// `message_id` is authenticated but not encrypted. A failing randomness
/// source is reported as [`CryptoError::Entropy`]; no fallback IV is used.
pub fn seal(key: &RetryKey, message_id: &str, plaintext: &[u8]) -> Result<Sealed, CryptoError> {
    let rng = SystemRandom::new();
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv).map_err(|_| CryptoError::Entropy)?;

    let aead_key = key.to_aead_key()?;
    let mut in_out = plaintext.to_vec();
    aead_key
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(iv),
            Aad::from(message_id.as_bytes()),
            &mut in_out,
        )
        .map_err(|_| CryptoError::Init)?;

    Ok(Sealed {
        ciphertext: in_out,
        iv,
    })
}

/// Decrypt a ciphertext produced by [`seal`].
///
/// Any mismatch in key, IV, message ID or ciphertext bytes fails with
/// [`CryptoError::Authentication`]. An IV of the wrong length is treated the same.
pub fn open(
    key: &RetryKey,
    message_id: &str,
    ciphertext: &[u8],
    iv: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let iv: [u8; IV_LEN] = iv.try_into().map_err(|_| CryptoError::Authentication)?;
    if ciphertext.len() < GCM_TAG_SIZE {
        return Err(CryptoError::Authentication);
    }

    let aead_key = key.to_aead_key()?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = aead_key
        .open_in_place(
            Nonce::assume_unique_for_key(iv),
            Aad::from(message_id.as_bytes()),
            &mut in_out,
        )
        .map_err(|_| CryptoError::Authentication)?;

    Ok(plaintext.to_vec())
}
