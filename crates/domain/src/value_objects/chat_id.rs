//! Internal chat identifier
//!
//! Never serialized to clients; addresses a chat for joins in the Durable
//! Log Store and as the Counter Store key namespace for message numbers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal identifier for a [`crate::entities::Chat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(Uuid);

impl ChatId {
    /// Generate a new, time-ordered internal identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID (e.g. a row read back from storage).
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// The Counter Store key for this chat's message-number counter.
    #[must_use]
    pub fn message_counter_key(&self) -> String {
        format!("chat:{}:message_counter", self.0)
    }
}

impl Default for ChatId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ChatId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
