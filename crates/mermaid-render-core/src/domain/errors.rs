//! Domain error taxonomy
//!
//! Two kinds of failure live here:
//!
//! - **`ValidationError`**: malformed input rejected synchronously by a value
//!   object or aggregate (empty code, illegal file name, non-positive size).
//!   These are user errors and are reported back to the caller.
//! - **`InvariantViolation`**: an aggregate whose state contradicts its own
//!   rules (SUCCESS without a result, FAILED without an error). These signal
//!   corrupt storage or a programming bug and are never user-facing.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use thiserror::Error;

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Input rejected by a value object or aggregate constructor/mutator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Mermaid code cannot be empty")]
    EmptyMermaidCode,

    #[error("Rendered SVG cannot be empty")]
    EmptyRenderedSvg,

    #[error("Source SVG cannot be empty")]
    EmptySourceSvg,

    #[error("Image data cannot be empty")]
    EmptyImageData,

    #[error("Error message cannot be empty")]
    EmptyErrorMessage,

    #[error("File name cannot be empty")]
    EmptyFileName,

    #[error("File name cannot contain special characters: / \\ : * ? \" < > |")]
    InvalidFileName(String),

    #[error("Width must be greater than 0")]
    NonPositiveWidth,

    #[error("Height must be greater than 0")]
    NonPositiveHeight,

    #[error("Scale must be greater than 0")]
    NonPositiveScale,

    #[error("Width and height must be greater than 0")]
    NonPositiveDimensions,

    #[error("Line number cannot be negative")]
    NegativeLine,

    #[error("Column number cannot be negative")]
    NegativeColumn,

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// Which enumeration was being parsed (e.g. "image format")
        kind: &'static str,
        /// The rejected value
        value: String,
    },
}

// ============================================================================
// INVARIANT VIOLATIONS
// ============================================================================

/// A state combination an aggregate must never hold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Invariant violation: {aggregate} SUCCESS status requires {result}")]
    SuccessWithoutResult {
        aggregate: &'static str,
        result: &'static str,
    },

    #[error("Invariant violation: {aggregate} FAILED status requires error")]
    FailedWithoutError { aggregate: &'static str },

    #[error("Invariant violation: {aggregate} SUCCESS status cannot have error")]
    SuccessWithError { aggregate: &'static str },
}
