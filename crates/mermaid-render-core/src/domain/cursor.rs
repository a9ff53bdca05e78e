//! Editor cursor location.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Zero-based line/column position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CursorPosition {
    line: u32,
    column: u32,
}

impl CursorPosition {
    /// Build a position from signed transport values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativeLine` or `NegativeColumn` for values
    /// below zero or above `u32::MAX`.
    pub fn create(line: i64, column: i64) -> Result<Self, ValidationError> {
        let line = u32::try_from(line).map_err(|_| ValidationError::NegativeLine)?;
        let column = u32::try_from(column).map_err(|_| ValidationError::NegativeColumn)?;
        Ok(Self { line, column })
    }

    /// Top-left corner of the buffer.
    #[must_use]
    pub const fn initial() -> Self {
        Self { line: 0, column: 0 }
    }

    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}
