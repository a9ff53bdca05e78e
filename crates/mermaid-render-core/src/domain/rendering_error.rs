//! Structured failure payloads carried by failed aggregates.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

// ============================================================================
// RENDERING ERROR
// ============================================================================

/// Why a diagram failed to render, with an optional source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderingError {
    message: String,
    line: Option<u32>,
    column: Option<u32>,
}

impl RenderingError {
    /// Create an error with a trimmed, non-empty message.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyErrorMessage` for blank messages.
    pub fn create(
        message: &str,
        line: Option<u32>,
        column: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }

        Ok(Self {
            message: message.to_string(),
            line,
            column,
        })
    }

    /// Shorthand for an error without location.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyErrorMessage` for blank messages.
    pub fn from_message(message: &str) -> Result<Self, ValidationError> {
        Self::create(message, None, None)
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        self.line
    }

    #[must_use]
    pub const fn column(&self) -> Option<u32> {
        self.column
    }
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "{} (Line {line}, Column {column})", self.message)
            }
            (Some(line), None) => write!(f, "{} (Line {line})", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

// ============================================================================
// EXPORT ERROR
// ============================================================================

/// Why an image export failed. `code` is an unvalidated machine tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportError {
    message: String,
    code: Option<String>,
}

impl ExportError {
    /// Create an error with a trimmed, non-empty message.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyErrorMessage` for blank messages.
    pub fn create(message: &str) -> Result<Self, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }

        Ok(Self {
            message: message.to_string(),
            code: None,
        })
    }

    /// Attach a machine-readable code.
    #[must_use]
    pub fn with_code(self, code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..self
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
