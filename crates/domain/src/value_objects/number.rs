//! Per-parent sequential number
//!
//! A `Number` is a positive integer assigned once, at creation, by the
//! Counter Store allocator. It is never a global identifier: the same value
//! may exist under every parent, and uniqueness only holds within one parent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A positive, per-parent sequential number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Number(u64);

impl Number {
    /// Wrap a raw integer value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is zero; numbers are 1-based by contract of the
    /// Counter Store allocator, which never returns 0.
    #[must_use]
    pub fn new(value: u64) -> Self {
        assert!(value > 0, "Number must be positive, got 0");
        Self(value)
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Number> for u64 {
    fn from(number: Number) -> Self {
        number.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_positive_value() {
        assert_eq!(Number::new(1).get(), 1);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn rejects_zero() {
        let _ = Number::new(0);
    }

    #[test]
    fn orders_numerically() {
        assert!(Number::new(1) < Number::new(2));
    }
}
