//! Aggregate roots
//!
//! Each aggregate is a consistency boundary with its own transitions and
//! event buffer:
//!
//! - [`Diagram`]: Mermaid source and its render outcome
//! - [`DiagramImage`]: an SVG and its export outcome
//! - [`EditorSession`]: live editing state with undo/redo

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod diagram;
pub mod diagram_image;
pub mod editor_session;

pub use diagram::{Diagram, DiagramError};
pub use diagram_image::{DiagramImage, DiagramImageError};
pub use editor_session::{EditorSession, EditorSessionError, DEBOUNCE_DELAY_MS};

use super::errors::InvariantViolation;

/// The three result invariants shared by `Diagram` and `DiagramImage`:
/// SUCCESS requires a result, FAILED requires an error, SUCCESS forbids an error.
pub(crate) const fn check_outcome(
    aggregate: &'static str,
    result: &'static str,
    is_success: bool,
    is_failed: bool,
    has_result: bool,
    has_error: bool,
) -> Result<(), InvariantViolation> {
    if is_success && !has_result {
        return Err(InvariantViolation::SuccessWithoutResult { aggregate, result });
    }
    if is_failed && !has_error {
        return Err(InvariantViolation::FailedWithoutError { aggregate });
    }
    if is_success && has_error {
        return Err(InvariantViolation::SuccessWithError { aggregate });
    }
    Ok(())
}
