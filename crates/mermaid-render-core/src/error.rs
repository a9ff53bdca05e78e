//! Crate-level error type.
//!
//! Wraps every failure a use case can surface so transports have one type to
//! translate into status codes and exit codes:
//!
//! - **Validation**: bad user input (exit code 1)
//! - **Engine**: renderer, converter, or I/O failure (exit code 2)
//! - **Not found**: unknown or expired aggregate (exit code 3)
//! - **Invalid state**: invariant violations and storage failures (exit code 4)

use std::fmt;

use thiserror::Error;

use crate::domain::{
    ConversionError, DiagramError, DiagramImageError, EditorSessionError, InvariantViolation,
    RenderError, RepositoryError, ValidationError,
};

/// Which aggregate a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Diagram,
    DiagramImage,
    EditorSession,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Diagram => "Diagram",
            Self::DiagramImage => "Diagram image",
            Self::EditorSession => "Editor session",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Diagram(#[from] DiagramError),

    #[error(transparent)]
    DiagramImage(#[from] DiagramImageError),

    #[error(transparent)]
    EditorSession(#[from] EditorSessionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True when the Mermaid engine rejected the source.
    #[must_use]
    pub const fn is_render_failure(&self) -> bool {
        matches!(self, Self::Render(_))
    }

    /// True for malformed caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Diagram(DiagramError::Validation(_))
                | Self::DiagramImage(
                    DiagramImageError::Validation(_) | DiagramImageError::CannotResizeSvg
                )
        )
    }

    /// Stable machine-readable code for transports.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Render(_) => "RENDER_FAILED",
            Self::Conversion(_) => "EXPORT_FAILED",
            Self::NotFound { entity, .. } => match entity {
                Entity::Diagram => "DIAGRAM_NOT_FOUND",
                Entity::DiagramImage => "IMAGE_NOT_FOUND",
                Entity::EditorSession => "SESSION_NOT_FOUND",
            },
            Self::EditorSession(_) => "HISTORY_EMPTY",
            Self::Invariant(_)
            | Self::Diagram(DiagramError::Invariant(_))
            | Self::DiagramImage(DiagramImageError::Invariant(_)) => "INVARIANT_VIOLATION",
            Self::Diagram(DiagramError::NotRendered | DiagramError::NotFailed)
            | Self::DiagramImage(DiagramImageError::NotExported) => "INVALID_STATE",
            Self::Repository(_) => "STORAGE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Validation(_)
            | Self::Diagram(DiagramError::Validation(_))
            | Self::DiagramImage(
                DiagramImageError::Validation(_) | DiagramImageError::CannotResizeSvg,
            ) => "VALIDATION_ERROR",
        }
    }

    /// Process exit code for the CLI.
    ///
    /// - 1: invalid input or configuration
    /// - 2: engine or I/O failure
    /// - 3: not found
    /// - 4: invalid state
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_validation() {
            return 1;
        }
        match self {
            Self::InvalidConfig(_) | Self::EditorSession(_) => 1,
            Self::Render(_) | Self::Conversion(_) | Self::Io(_) => 2,
            Self::NotFound { .. } => 3,
            _ => 4,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::InvalidConfig(format!("Failed to parse config: {err}"))
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::storage_error(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_failure_keeps_original_message() {
        let err = Error::from(RenderError::new("Syntax error"));
        assert!(err.is_render_failure());
        assert_eq!(err.to_string(), "Syntax error");
        assert_eq!(err.code(), "RENDER_FAILED");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_validation_codes() {
        let err = Error::from(DiagramError::Validation(ValidationError::EmptyMermaidCode));
        assert!(err.is_validation());
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Mermaid code cannot be empty");
    }

    #[test]
    fn test_not_found_display_and_code() {
        let err = Error::not_found(Entity::Diagram, "abc");
        assert_eq!(err.to_string(), "Diagram not found: abc");
        assert_eq!(err.code(), "DIAGRAM_NOT_FOUND");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_invariant_is_not_user_facing() {
        let err = Error::from(DiagramError::Invariant(
            InvariantViolation::FailedWithoutError {
                aggregate: "Diagram",
            },
        ));
        assert!(!err.is_validation());
        assert_eq!(err.code(), "INVARIANT_VIOLATION");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.code(), "IO_ERROR");
    }
}
