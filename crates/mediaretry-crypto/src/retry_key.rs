//! Retry key derivation.
//!
//! Both the requester and the peer holding the media re-derive the same key
//! from the media key they already share, so no handshake is needed.

use std::fmt;

use hkdf::Hkdf;
use ring::aead::{LessSafeKey, UnboundKey, AES_256_GCM};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// HKDF info label for retry keys.
pub const MEDIA_RETRY_INFO: &[u8] = b"WhatsApp Media Retry Notification";

/// Retry key size (AES-256).
pub const RETRY_KEY_LEN: usize = 32;

/// Symmetric key protecting the retry receipt and notification.
///
/// Recomputed per use and wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RetryKey([u8; RETRY_KEY_LEN]);

impl RetryKey {
    pub fn as_bytes(&self) -> &[u8; RETRY_KEY_LEN] {
        &self.0
    }

    /// Create an AES-256-GCM key from the raw bytes.
    pub(crate) fn to_aead_key(&self) -> Result<LessSafeKey, CryptoError> {
        let unbound = UnboundKey::new(&AES_256_GCM, &self.0).map_err(|_| CryptoError::Init)?;
        Ok(LessSafeKey::new(unbound))
    }
}

impl fmt::Debug for RetryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryKey(..)")
    }
}

/// Derive the retry key: HKDF-SHA256 with an empty salt and [`MEDIA_RETRY_INFO`].
pub fn derive_retry_key(media_key: &[u8]) -> Result<RetryKey, CryptoError> {
    let hkdf = Hkdf::<Sha256>::new(None, media_key);
    let mut key = RetryKey([0u8; RETRY_KEY_LEN]);
    hkdf.expand(MEDIA_RETRY_INFO, &mut key.0)
        .map_err(|_| CryptoError::KeyDerivation)?;
    Ok(key)
}
