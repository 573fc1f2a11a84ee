use mediaretry_crypto::CryptoError;
use mediaretry_protocol::{JidError, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid own_jid: {0}")]
    OwnJid(#[from] JidError),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("outbound queue is full")]
    QueueFull,

    #[error("outbound channel closed")]
    Closed,

    #[error("failed to encode node: {0}")]
    Encode(#[from] ProtocolError),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("client is not logged in")]
    NotLoggedIn,

    #[error("failed to prepare encrypted retry receipt: {0}")]
    Crypto(#[from] CryptoError),

    #[error("failed to decrypt media retry notification: {0}")]
    DecryptNotification(#[source] CryptoError),

    #[error("failed to send node: {0}")]
    Transport(#[from] TransportError),

    #[error("media retry was declined with code {code}")]
    Declined { code: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_display() {
        let e = ClientError::Declined { code: 2 };
        assert!(e.to_string().contains("code 2"));
    }

    #[test]
    fn from_crypto_error() {
        let e: ClientError = CryptoError::Entropy.into();
        assert!(matches!(e, ClientError::Crypto(CryptoError::Entropy)));
        assert!(e.to_string().contains("secure random source failed"));
    }

    #[test]
    fn decrypt_notification_display() {
        let e = ClientError::DecryptNotification(CryptoError::Authentication);
        let msg = e.to_string();
        assert!(msg.starts_with("failed to decrypt media retry notification"));
        assert!(!msg.contains("receipt"));

        let e = ClientError::DecryptNotification(CryptoError::InvalidPayload(
            postcard::Error::DeserializeUnexpectedEnd,
        ));
        assert!(e.to_string().contains("invalid encryption key?"));
    }

    #[test]
    fn from_transport_error() {
        let e: ClientError = TransportError::Closed.into();
        assert!(e.to_string().contains("channel closed"));
    }
}
