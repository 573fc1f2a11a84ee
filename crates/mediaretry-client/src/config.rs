use std::path::Path;

use mediaretry_protocol::{Jid, JidError};
use serde::Deserialize;

use crate::error::ConfigError;

/// Client configuration, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Local device identity, e.g. `12345.0:7@s.whatsapp.net`.
    /// Absent until the device is paired.
    #[serde(default)]
    pub own_jid: Option<String>,

    /// Capacity of the queue feeding the transport writer.
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,

    /// Capacity of the broadcast channel used for dispatched events.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
}

fn default_outbound_queue_capacity() -> usize {
    64
}

fn default_event_queue_capacity() -> usize {
    128
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            own_jid: None,
            outbound_queue_capacity: default_outbound_queue_capacity(),
            event_queue_capacity: default_event_queue_capacity(),
        }
    }
}

impl ClientConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Parsed [`own_jid`](Self::own_jid), `None` when not paired.
    pub fn own_id(&self) -> Result<Option<Jid>, JidError> {
        self.own_jid.as_deref().map(str::parse::<Jid>).transpose()
    }
}
