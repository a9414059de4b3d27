//! Internal application identifier
//!
//! Never serialized to clients; used only as the join key inside the
//! Durable Log Store and as the Counter Store / Job Queue key namespace.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal identifier for an [`crate::entities::Application`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(Uuid);

impl AppId {
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

    /// The Counter Store key for this application's chat-number counter.
    #[must_use]
    pub fn chat_counter_key(&self) -> String {
        format!("chat_app:{}:chat_counter", self.0)
    }
}

impl Default for AppId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AppId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(AppId::new(), AppId::new());
    }

    #[test]
    fn counter_key_is_namespaced() {
        let uuid = Uuid::nil();
        let id = AppId::from_uuid(uuid);
        assert_eq!(
            id.chat_counter_key(),
            "chat_app:00000000-0000-0000-0000-000000000000:chat_counter"
        );
    }
}
