//! Chat entity — a conversation scope owned by an application

use crate::value_objects::{AppId, ChatId, Number};

/// A conversation scope under an [`crate::entities::Application`].
///
/// `number` is assigned once, at creation, by the Counter Store allocator
/// and is immutable thereafter. `messages_count` is advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub application_id: AppId,
    pub number: Number,
    pub messages_count: i64,
}

impl Chat {
    /// Construct a chat for an already-allocated `number`.
    #[must_use]
    pub fn new(application_id: AppId, number: Number) -> Self {
        Self {
            id: ChatId::new(),
            application_id,
            number,
            messages_count: 0,
        }
    }
}
