//! Application entity — a tenant

use crate::{DomainError, value_objects::{AppId, Token}};

/// A tenant. Owns an unbounded set of [`crate::entities::Chat`]s.
///
/// `chats_count` is advisory: it is a cached, eventually-consistent
/// projection maintained by the count reconciler, not a live count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: AppId,
    pub token: Token,
    pub name: String,
    pub chats_count: i64,
}

impl Application {
    /// Construct a brand-new application with a freshly generated id and token.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] if `name` is blank.
    pub fn create(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            id: AppId::new(),
            token: Token::generate(),
            name,
            chats_count: 0,
        })
    }

    /// Rename the application.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] if `name` is blank.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name", "can't be blank"));
    }
    Ok(())
}
