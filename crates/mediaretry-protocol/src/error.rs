use thiserror::Error;

/// First failure recorded by an [`AttrGetter`](crate::AttrGetter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrError {
    #[error("missing attribute '{0}'")]
    Missing(String),

    #[error("malformed attribute '{key}': expected {expected}, got {got}")]
    Malformed {
        key: String,
        expected: &'static str,
        got: String,
    },
}

impl AttrError {
    /// Name of the offending attribute.
    pub fn key(&self) -> &str {
        match self {
            AttrError::Missing(key) => key,
            AttrError::Malformed { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JidError {
    #[error("invalid JID {input:?}: {reason}")]
    Invalid { input: String, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A required child element is absent or carries the wrong kind of content.
    #[error("missing <{tag}> element in {context}")]
    ElementMissing { tag: String, context: String },

    #[error("invalid attributes: {0}")]
    Attributes(#[from] AttrError),

    #[error("missing attributes in <rmr> tag: {0}")]
    RmrAttributes(#[source] AttrError),

    #[error("message too large: {0} bytes (max 65536)")]
    MessageTooLarge(usize),

    #[error("serialization error: {0}")]
    Serialization(#[from] postcard::Error),
}

impl ProtocolError {
    pub fn element_missing(tag: &str, context: impl Into<String>) -> Self {
        ProtocolError::ElementMissing {
            tag: tag.to_string(),
            context: context.into(),
        }
    }

    /// Tag name for [`ProtocolError::ElementMissing`], `None` otherwise.
    pub fn missing_tag(&self) -> Option<&str> {
        match self {
            ProtocolError::ElementMissing { tag, .. } => Some(tag),
            _ => None,
        }
    }
}
