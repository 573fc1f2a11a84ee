//! Minimal JID addressing: `user[.agent][:device]@server`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JidError;

/// Server for regular user accounts.
pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";

/// Server for group chats.
pub const GROUP_SERVER: &str = "g.us";

/// A user, device or group identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Jid {
    pub user: String,
    pub agent: u8,
    pub device: u16,
    pub server: String,
}

impl Jid {
    pub fn new(user: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            agent: 0,
            device: 0,
            server: server.into(),
        }
    }

    /// A JID with no server is the zero value.
    pub fn is_empty(&self) -> bool {
        self.server.is_empty()
    }

    pub fn is_group(&self) -> bool {
        self.server == GROUP_SERVER
    }

    /// Whether this JID addresses a specific agent or device.
    pub fn is_ad(&self) -> bool {
        self.agent != 0 || self.device != 0
    }

    /// Strip agent and device, leaving the account-level identity.
    pub fn to_non_ad(&self) -> Jid {
        Jid::new(self.user.clone(), self.server.clone())
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.user.is_empty() {
            return f.write_str(&self.server);
        }
        f.write_str(&self.user)?;
        if self.agent != 0 {
            write!(f, ".{}", self.agent)?;
        }
        if self.device != 0 {
            write!(f, ":{}", self.device)?;
        }
        write!(f, "@{}", self.server)
    }
}

impl FromStr for Jid {
    type Err = JidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| JidError::Invalid {
            input: s.to_string(),
            reason,
        };

        let Some((user_part, server)) = s.split_once('@') else {
            if s.is_empty() {
                return Err(invalid("empty input"));
            }
            return Ok(Jid::new("", s));
        };
        if server.is_empty() {
            return Err(invalid("empty server"));
        }

        let (rest, device) = match user_part.split_once(':') {
            Some((rest, device)) => (
                rest,
                device.parse::<u16>().map_err(|_| invalid("bad device"))?,
            ),
            None => (user_part, 0),
        };
        let (user, agent) = match rest.split_once('.') {
            Some((user, agent)) => (user, agent.parse::<u8>().map_err(|_| invalid("bad agent"))?),
            None => (rest, 0),
        };

        Ok(Jid {
            user: user.to_string(),
            agent,
            device,
            server: server.to_string(),
        })
    }
}
