use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("failed to initialize AES-256-GCM cipher")]
    Init,

    #[error("decryption failed: invalid key, tampered data or mismatched message ID")]
    Authentication,

    #[error("serialization error: {0}")]
    Serialization(#[from] postcard::Error),

    /// The payload authenticated but did not decode, usually a media key
    /// that belongs to a different message.
    #[error("failed to decode retry payload (invalid encryption key?): {0}")]
    InvalidPayload(#[source] postcard::Error),

    #[error("secure random source failed")]
    Entropy,

    #[error("retry key derivation failed")]
    KeyDerivation,
}
