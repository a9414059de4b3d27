//! Message entity — an immutable text item owned by a chat

use chrono::{DateTime, Utc};

use crate::{DomainError, value_objects::{ChatId, MessageId, Number}};

/// An immutable text item under a [`crate::entities::Chat`].
///
/// Once created, a message is never edited or deleted by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub number: Number,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Construct a message for an already-allocated `number`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] if `body` is blank.
    pub fn create(
        chat_id: ChatId,
        number: Number,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(DomainError::validation("body", "can't be blank"));
        }
        Ok(Self {
            id: MessageId::new(),
            chat_id,
            number,
            body,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_body() {
        let err = Message::create(ChatId::new(), Number::new(1), "   ", Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::ValidationError { .. }));
    }

    #[test]
    fn create_accepts_non_blank_body() {
        let msg = Message::create(ChatId::new(), Number::new(1), "Hello", Utc::now()).unwrap();
        assert_eq!(msg.body, "Hello");
    }
}
