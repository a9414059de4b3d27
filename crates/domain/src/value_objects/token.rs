//! Opaque, URL-safe application token
//!
//! The token is the sole externally visible identifier for an [`crate::entities::Application`].
//! Internal numeric/UUID identifiers must never be serialized to clients.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Number of random bytes backing a token (160 bits, comfortably above the
/// 128-bit entropy floor once base64-encoded).
const TOKEN_BYTES: usize = 20;

/// Opaque, high-entropy, URL-safe application token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Generate a new random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap an already-encoded token string (e.g. read back from storage).
    #[must_use]
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_unique() {
        let a = Token::generate();
        let b = Token::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_token_is_url_safe() {
        let token = Token::generate();
        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn generated_token_has_at_least_128_bits_of_entropy() {
        // base64 (no padding) encodes 6 bits per character.
        let token = Token::generate();
        assert!(token.as_str().len() * 6 >= 128);
    }

    #[test]
    fn round_trips_through_display() {
        let token = Token::from_string("abc123");
        assert_eq!(token.to_string(), "abc123");
    }
}
