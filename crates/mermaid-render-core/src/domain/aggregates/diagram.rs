//! Diagram aggregate root.
//!
//! A `Diagram` owns validated Mermaid source and the outcome of rendering it.
//!
//! # Invariants
//!
//! Checked on construction and after every transition:
//!
//! 1. `Success` requires rendered SVG
//! 2. `Failed` requires a `RenderingError`
//! 3. `Success` never carries an error

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::check_outcome;
use crate::domain::{
    errors::{InvariantViolation, ValidationError},
    events::{DomainEvent, EventBuffer, EventKind},
    identifiers::AggregateId,
    mermaid_code::{DiagramType, MermaidCode},
    rendering_error::RenderingError,
    status::RenderStatus,
};

// ============================================================================
// DOMAIN ERRORS
// ============================================================================

/// Errors raised by `Diagram` factories, transitions, and guarded accessors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    /// `svg()` called while not `Success`
    #[error("Diagram has not been successfully rendered")]
    NotRendered,

    /// `error_detail()` called while not `Failed`
    #[error("Diagram has not failed rendering")]
    NotFailed,
}

// ============================================================================
// DIAGRAM AGGREGATE ROOT
// ============================================================================

#[derive(Debug, Clone)]
pub struct Diagram {
    id: AggregateId,
    mermaid_code: MermaidCode,
    rendered_svg: Option<String>,
    render_status: RenderStatus,
    error: Option<RenderingError>,
    created_at: DateTime<Utc>,
    events: EventBuffer,
}

impl Diagram {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a pending diagram and record `DiagramCreated`.
    ///
    /// # Errors
    ///
    /// Returns `DiagramError::Validation` if the code is blank.
    pub fn create(mermaid_code: &str) -> Result<Self, DiagramError> {
        let code = MermaidCode::create(mermaid_code)?;
        let mut diagram = Self {
            id: AggregateId::generate(),
            mermaid_code: code,
            rendered_svg: None,
            render_status: RenderStatus::Pending,
            error: None,
            created_at: Utc::now(),
            events: EventBuffer::default(),
        };

        diagram.events.record(
            diagram.id,
            EventKind::DiagramCreated {
                mermaid_code: diagram.mermaid_code.raw_code().to_string(),
                diagram_type: diagram.mermaid_code.diagram_type(),
            },
        );
        Ok(diagram)
    }

    /// Rebuild a stored diagram. Records no events.
    ///
    /// # Errors
    ///
    /// Returns `DiagramError::Validation` if the stored code is blank and
    /// `DiagramError::Invariant` if the stored state is inconsistent.
    pub fn reconstitute(
        id: AggregateId,
        mermaid_code: &str,
        rendered_svg: Option<String>,
        render_status: RenderStatus,
        error: Option<RenderingError>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DiagramError> {
        let diagram = Self {
            id,
            mermaid_code: MermaidCode::create(mermaid_code)?,
            rendered_svg,
            render_status,
            error,
            created_at,
            events: EventBuffer::default(),
        };
        diagram.validate_invariants()?;
        Ok(diagram)
    }

    // ========================================================================
    // STATE TRANSITIONS
    // ========================================================================

    /// Record a successful render.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyRenderedSvg` for blank SVG; the diagram
    /// is left untouched in that case.
    pub fn mark_as_rendered(&mut self, svg: &str) -> Result<(), DiagramError> {
        if svg.trim().is_empty() {
            return Err(ValidationError::EmptyRenderedSvg.into());
        }

        self.rendered_svg = Some(svg.to_string());
        self.render_status = RenderStatus::Success;
        self.error = None;
        self.validate_invariants()?;

        self.events.record(
            self.id,
            EventKind::DiagramRendered {
                rendered_svg: svg.to_string(),
            },
        );
        Ok(())
    }

    /// Record a failed render, dropping any previous SVG.
    pub fn mark_as_failed(&mut self, error: RenderingError) {
        self.events.record(
            self.id,
            EventKind::DiagramRenderFailed {
                error_message: error.message().to_string(),
                error_line: error.line(),
                error_column: error.column(),
            },
        );

        self.rendered_svg = None;
        self.render_status = RenderStatus::Failed;
        self.error = Some(error);
    }

    /// Replace the source. Identical code is a no-op; anything else resets
    /// the diagram to `Pending` and records `DiagramCodeUpdated`.
    ///
    /// # Errors
    ///
    /// Returns `DiagramError::Validation` if the new code is blank.
    pub fn update_code(&mut self, new_code: &str) -> Result<(), DiagramError> {
        let code = MermaidCode::create(new_code)?;
        if code == self.mermaid_code {
            return Ok(());
        }

        self.events.record(
            self.id,
            EventKind::DiagramCodeUpdated {
                new_mermaid_code: code.raw_code().to_string(),
                new_diagram_type: code.diagram_type(),
            },
        );

        self.mermaid_code = code;
        self.render_status = RenderStatus::Pending;
        self.rendered_svg = None;
        self.error = None;
        Ok(())
    }

    /// Take every event recorded since the last pull.
    pub fn pull_domain_events(&mut self) -> Vec<DomainEvent> {
        self.events.drain()
    }

    // ========================================================================
    // GUARDED ACCESSORS
    // ========================================================================

    /// Rendered SVG of a successful diagram.
    ///
    /// # Errors
    ///
    /// Returns `DiagramError::NotRendered` unless the status is `Success`.
    pub fn svg(&self) -> Result<&str, DiagramError> {
        if self.render_status != RenderStatus::Success {
            return Err(DiagramError::NotRendered);
        }
        self.rendered_svg.as_deref().ok_or_else(|| {
            InvariantViolation::SuccessWithoutResult {
                aggregate: "Diagram",
                result: "rendered SVG",
            }
            .into()
        })
    }

    /// Failure detail of a failed diagram.
    ///
    /// # Errors
    ///
    /// Returns `DiagramError::NotFailed` unless the status is `Failed`.
    pub fn error_detail(&self) -> Result<&RenderingError, DiagramError> {
        if self.render_status != RenderStatus::Failed {
            return Err(DiagramError::NotFailed);
        }
        self.error.as_ref().ok_or_else(|| {
            InvariantViolation::FailedWithoutError {
                aggregate: "Diagram",
            }
            .into()
        })
    }

    // ========================================================================
    // QUERY METHODS
    // ========================================================================

    #[must_use]
    pub const fn id(&self) -> AggregateId {
        self.id
    }

    #[must_use]
    pub const fn mermaid_code(&self) -> &MermaidCode {
        &self.mermaid_code
    }

    #[must_use]
    pub const fn diagram_type(&self) -> DiagramType {
        self.mermaid_code.diagram_type()
    }

    #[must_use]
    pub fn rendered_svg(&self) -> Option<&str> {
        self.rendered_svg.as_deref()
    }

    #[must_use]
    pub const fn render_status(&self) -> RenderStatus {
        self.render_status
    }

    #[must_use]
    pub const fn error(&self) -> Option<&RenderingError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        check_outcome(
            "Diagram",
            "rendered SVG",
            matches!(self.render_status, RenderStatus::Success),
            matches!(self.render_status, RenderStatus::Failed),
            self.rendered_svg.as_deref().is_some_and(|svg| !svg.is_empty()),
            self.error.is_some(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "graph TD\nA-->B";

    fn syntax_error() -> RenderingError {
        RenderingError::create("Syntax error", Some(2), Some(4)).expect("valid error")
    }

    #[test]
    fn test_create_is_pending_with_one_event() {
        let mut diagram = Diagram::create(CODE).expect("valid code");
        assert_eq!(diagram.render_status(), RenderStatus::Pending);
        assert_eq!(diagram.diagram_type(), DiagramType::Flowchart);
        assert_eq!(diagram.rendered_svg(), None);

        let events = diagram.pull_domain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "DiagramCreated");
        assert_eq!(events[0].aggregate_id, diagram.id());
    }

    #[test]
    fn test_create_rejects_empty_code() {
        let result = Diagram::create("");
        assert_eq!(
            result.err().map(|e| e.to_string()),
            Some("Mermaid code cannot be empty".to_string())
        );
    }

    #[test]
    fn test_mark_as_rendered() {
        let mut diagram = Diagram::create(CODE).expect("valid code");
        diagram.mark_as_rendered("<svg>ok</svg>").expect("non-empty svg");

        assert_eq!(diagram.render_status(), RenderStatus::Success);
        assert_eq!(diagram.svg().ok(), Some("<svg>ok</svg>"));
        assert_eq!(diagram.error(), None);
        let types: Vec<_> = diagram
            .pull_domain_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(types, vec!["DiagramCreated", "DiagramRendered"]);
    }

    #[test]
    fn test_mark_as_rendered_rejects_blank_svg() {
        let mut diagram = Diagram::create(CODE).expect("valid code");
        let _ = diagram.pull_domain_events();

        let result = diagram.mark_as_rendered("  ");
        assert_eq!(
            result,
            Err(DiagramError::Validation(ValidationError::EmptyRenderedSvg))
        );
        assert_eq!(diagram.render_status(), RenderStatus::Pending);
        assert!(diagram.pull_domain_events().is_empty());
    }

    #[test]
    fn test_mark_as_failed_clears_svg() {
        let mut diagram = Diagram::create(CODE).expect("valid code");
        diagram.mark_as_rendered("<svg/>").expect("non-empty svg");
        diagram.mark_as_failed(syntax_error());

        assert_eq!(diagram.render_status(), RenderStatus::Failed);
        assert_eq!(diagram.rendered_svg(), None);
        assert_eq!(diagram.error_detail().ok(), Some(&syntax_error()));
        assert_eq!(diagram.svg(), Err(DiagramError::NotRendered));
    }

    #[test]
    fn test_error_detail_requires_failed_status() {
        let diagram = Diagram::create(CODE).expect("valid code");
        assert_eq!(diagram.error_detail(), Err(DiagramError::NotFailed));
    }

    #[test]
    fn test_update_code_same_code_is_noop() {
        let mut diagram = Diagram::create(CODE).expect("valid code");
        diagram.mark_as_rendered("<svg/>").expect("non-empty svg");
        let _ = diagram.pull_domain_events();

        diagram.update_code(CODE).expect("valid code");
        assert_eq!(diagram.render_status(), RenderStatus::Success);
        assert!(diagram.pull_domain_events().is_empty());
    }

    #[test]
    fn test_update_code_resets_to_pending() {
        let mut diagram = Diagram::create(CODE).expect("valid code");
        diagram.mark_as_failed(syntax_error());
        let _ = diagram.pull_domain_events();

        diagram
            .update_code("sequenceDiagram\n  A->>B: Hello")
            .expect("valid code");

        assert_eq!(diagram.render_status(), RenderStatus::Pending);
        assert_eq!(diagram.diagram_type(), DiagramType::Sequence);
        assert_eq!(diagram.error(), None);
        let events = diagram.pull_domain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "DiagramCodeUpdated");
    }

    #[test]
    fn test_reconstitute_roundtrip_without_events() {
        let id = AggregateId::generate();
        let created_at = Utc::now();
        let mut diagram = Diagram::reconstitute(
            id,
            CODE,
            Some("<svg/>".into()),
            RenderStatus::Success,
            None,
            created_at,
        )
        .expect("consistent state");

        assert_eq!(diagram.id(), id);
        assert_eq!(diagram.mermaid_code().raw_code(), CODE);
        assert_eq!(diagram.rendered_svg(), Some("<svg/>"));
        assert_eq!(diagram.render_status(), RenderStatus::Success);
        assert_eq!(diagram.created_at(), created_at);
        assert!(diagram.pull_domain_events().is_empty());
    }

    #[test]
    fn test_reconstitute_rejects_inconsistent_state() {
        let id = AggregateId::generate();
        let now = Utc::now();

        let success_without_svg =
            Diagram::reconstitute(id, CODE, None, RenderStatus::Success, None, now);
        assert!(matches!(
            success_without_svg,
            Err(DiagramError::Invariant(InvariantViolation::SuccessWithoutResult { .. }))
        ));

        let failed_without_error =
            Diagram::reconstitute(id, CODE, None, RenderStatus::Failed, None, now);
        assert!(matches!(
            failed_without_error,
            Err(DiagramError::Invariant(InvariantViolation::FailedWithoutError { .. }))
        ));

        let success_with_error = Diagram::reconstitute(
            id,
            CODE,
            Some("<svg/>".into()),
            RenderStatus::Success,
            Some(syntax_error()),
            now,
        );
        assert!(matches!(
            success_with_error,
            Err(DiagramError::Invariant(InvariantViolation::SuccessWithError { .. }))
        ));
    }
}
