//! # Domain Layer
//!
//! Value objects, aggregates, events, and the trait seams the use cases
//! depend on. Nothing in here performs I/O.
//!
//! ## Module Structure
//!
//! ### Value objects
//!
//! - [`MermaidCode`] - validated Mermaid source with its [`DiagramType`]
//! - [`ExportOptions`] - file name, dimensions, scale, background colour
//! - [`RenderingError`] / [`ExportError`] - failure payloads stored on aggregates
//! - [`CodeHistory`] - bounded undo/redo stacks
//! - [`CursorPosition`] - editor cursor
//!
//! ### Aggregate roots
//!
//! - [`Diagram`] - Mermaid source and its render outcome
//! - [`DiagramImage`] - SVG and its export outcome
//! - [`EditorSession`] - live editing state
//!
//! Each aggregate buffers [`DomainEvent`]s during transitions; callers drain
//! them with `pull_domain_events`.
//!
//! ### Seams
//!
//! - [`repository`] - one persistence trait per aggregate
//! - [`ports`] - `Renderer`, `Converter`, `EventPublisher`

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod aggregates;
pub mod code_history;
pub mod cursor;
pub mod errors;
pub mod events;
pub mod export_options;
pub mod identifiers;
pub mod mermaid_code;
pub mod ports;
pub mod rendering_error;
pub mod repository;
pub mod status;

pub use aggregates::{
    Diagram, DiagramError, DiagramImage, DiagramImageError, EditorSession, EditorSessionError,
    DEBOUNCE_DELAY_MS,
};
pub use code_history::{CodeHistory, HistoryStep, MAX_HISTORY_SIZE};
pub use cursor::CursorPosition;
pub use errors::{InvariantViolation, ValidationError};
pub use events::{DomainEvent, EventKind};
pub use export_options::{ExportOptions, ExportOptionsBuilder, ImageFormat, ImagePayload};
pub use identifiers::{AggregateId, EventId};
pub use mermaid_code::{DiagramType, MermaidCode};
pub use ports::{ConversionError, Converter, EventPublisher, PngOptions, RenderError, Renderer};
pub use rendering_error::{ExportError, RenderingError};
pub use repository::{
    DiagramImageRepository, DiagramRepository, EditorSessionRepository, RepositoryError,
    RepositoryResult,
};
pub use status::{ExportStatus, RenderStatus};
