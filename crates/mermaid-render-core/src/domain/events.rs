//! Domain events module
//!
//! Events are immutable facts recorded by aggregates while they transition.
//! Every event carries the shared metadata (`event_id`, `occurred_at`,
//! `aggregate_id`) plus one [`EventKind`] describing what happened.
//!
//! # Buffer and drain
//!
//! Aggregates own an [`EventBuffer`]. Transitions append to it and callers
//! empty it through `pull_domain_events`, which hands over everything
//! recorded so far and leaves the buffer empty. A second pull returns nothing.
//!
//! # Serialized shape
//!
//! ```json
//! {
//!   "event_id": "…",
//!   "occurred_at": "2024-01-01T00:00:00Z",
//!   "aggregate_id": "…",
//!   "event_type": "DiagramCreated",
//!   "data": { "mermaid_code": "graph TD", "diagram_type": "flowchart" }
//! }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    export_options::ImageFormat,
    identifiers::{AggregateId, EventId},
    mermaid_code::DiagramType,
};

// ============================================================================
// Domain Event
// ============================================================================

/// A recorded fact about one aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub aggregate_id: AggregateId,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// What happened, with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data")]
pub enum EventKind {
    // Diagram
    DiagramCreated {
        mermaid_code: String,
        diagram_type: DiagramType,
    },
    DiagramRendered {
        rendered_svg: String,
    },
    DiagramRenderFailed {
        error_message: String,
        error_line: Option<u32>,
        error_column: Option<u32>,
    },
    DiagramCodeUpdated {
        new_mermaid_code: String,
        new_diagram_type: DiagramType,
    },

    // DiagramImage
    ImageExportRequested {
        format: ImageFormat,
        width: Option<u32>,
        height: Option<u32>,
    },
    ImageExported {
        format: ImageFormat,
        file_size: u64,
    },
    ImageExportFailed {
        error_message: String,
    },
    ImageResized {
        new_width: u32,
        new_height: u32,
    },

    // EditorSession
    EditorSessionStarted,
    CodeChanged {
        new_code: String,
        cursor_line: u32,
        cursor_column: u32,
    },
    RenderRequested {
        mermaid_code: String,
    },
    CodeUndone {
        restored_code: String,
    },
    CodeRedone {
        restored_code: String,
    },
}

impl EventKind {
    /// Discriminant string, identical to the serialized `event_type` tag.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::DiagramCreated { .. } => "DiagramCreated",
            Self::DiagramRendered { .. } => "DiagramRendered",
            Self::DiagramRenderFailed { .. } => "DiagramRenderFailed",
            Self::DiagramCodeUpdated { .. } => "DiagramCodeUpdated",
            Self::ImageExportRequested { .. } => "ImageExportRequested",
            Self::ImageExported { .. } => "ImageExported",
            Self::ImageExportFailed { .. } => "ImageExportFailed",
            Self::ImageResized { .. } => "ImageResized",
            Self::EditorSessionStarted => "EditorSessionStarted",
            Self::CodeChanged { .. } => "CodeChanged",
            Self::RenderRequested { .. } => "RenderRequested",
            Self::CodeUndone { .. } => "CodeUndone",
            Self::CodeRedone { .. } => "CodeRedone",
        }
    }
}

impl DomainEvent {
    /// Stamp a new event for `aggregate_id` with a fresh id and the current time.
    #[must_use]
    pub fn new(aggregate_id: AggregateId, kind: EventKind) -> Self {
        Self {
            event_id: EventId::generate(),
            occurred_at: Utc::now(),
            aggregate_id,
            kind,
        }
    }

    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }
}

// ============================================================================
// Event Buffer
// ============================================================================

/// Append-only list of events owned by one aggregate instance.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Vec<DomainEvent>,
}

impl EventBuffer {
    pub fn record(&mut self, aggregate_id: AggregateId, kind: EventKind) {
        self.events.push(DomainEvent::new(aggregate_id, kind));
    }

    /// Take every buffered event, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
