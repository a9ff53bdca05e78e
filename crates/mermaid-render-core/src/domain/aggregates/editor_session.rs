//! `EditorSession` aggregate root.
//!
//! Tracks one live editing session: current code, cursor, undo/redo history
//! and whether a preview render is outstanding. There is no result state
//! machine here; the session only records intent (`RenderRequested`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    code_history::CodeHistory,
    cursor::CursorPosition,
    events::{DomainEvent, EventBuffer, EventKind},
    identifiers::AggregateId,
};

/// Suggested delay for callers coalescing render requests. Not enforced here.
pub const DEBOUNCE_DELAY_MS: u64 = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorSessionError {
    #[error("Cannot undo: no history available")]
    NothingToUndo,

    #[error("Cannot redo: no future history available")]
    NothingToRedo,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    id: AggregateId,
    current_code: String,
    cursor_position: CursorPosition,
    history: CodeHistory,
    last_render_requested_at: Option<DateTime<Utc>>,
    is_render_pending: bool,
    created_at: DateTime<Utc>,
    events: EventBuffer,
}

impl EditorSession {
    /// Start an empty session and record `EditorSessionStarted`.
    #[must_use]
    pub fn create() -> Self {
        let mut session = Self {
            id: AggregateId::generate(),
            current_code: String::new(),
            cursor_position: CursorPosition::initial(),
            history: CodeHistory::create(),
            last_render_requested_at: None,
            is_render_pending: false,
            created_at: Utc::now(),
            events: EventBuffer::default(),
        };
        session
            .events
            .record(session.id, EventKind::EditorSessionStarted);
        session
    }

    /// Rebuild a stored session. Records no events.
    #[must_use]
    pub fn reconstitute(
        id: AggregateId,
        current_code: String,
        cursor_position: CursorPosition,
        history: CodeHistory,
        last_render_requested_at: Option<DateTime<Utc>>,
        is_render_pending: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            current_code,
            cursor_position,
            history,
            last_render_requested_at,
            is_render_pending,
            created_at,
            events: EventBuffer::default(),
        }
    }

    /// Replace the code, pushing the previous code onto the undo stack.
    ///
    /// Resubmitting the current code changes nothing, cursor included.
    pub fn update_code(&mut self, new_code: &str, cursor: CursorPosition) {
        if self.current_code == new_code {
            return;
        }

        self.history = self.history.push_undo(self.current_code.as_str());
        self.current_code = new_code.to_string();
        self.cursor_position = cursor;

        self.events.record(
            self.id,
            EventKind::CodeChanged {
                new_code: new_code.to_string(),
                cursor_line: cursor.line(),
                cursor_column: cursor.column(),
            },
        );
    }

    /// Flag a render as pending. Returns `false` (and does nothing) while the
    /// code is blank.
    pub fn request_render(&mut self) -> bool {
        if self.current_code.trim().is_empty() {
            return false;
        }

        self.is_render_pending = true;
        self.last_render_requested_at = Some(Utc::now());
        self.events.record(
            self.id,
            EventKind::RenderRequested {
                mermaid_code: self.current_code.clone(),
            },
        );
        true
    }

    pub fn mark_render_complete(&mut self) {
        self.is_render_pending = false;
    }

    /// Restore the previous code.
    ///
    /// # Errors
    ///
    /// Returns `EditorSessionError::NothingToUndo` when the undo stack is empty.
    pub fn undo(&mut self) -> Result<(), EditorSessionError> {
        let step = self
            .history
            .undo(&self.current_code)
            .ok_or(EditorSessionError::NothingToUndo)?;

        self.events.record(
            self.id,
            EventKind::CodeUndone {
                restored_code: step.code.clone(),
            },
        );
        self.current_code = step.code;
        self.history = step.history;
        Ok(())
    }

    /// Re-apply the most recently undone code.
    ///
    /// # Errors
    ///
    /// Returns `EditorSessionError::NothingToRedo` when the redo stack is empty.
    pub fn redo(&mut self) -> Result<(), EditorSessionError> {
        let step = self
            .history
            .redo(&self.current_code)
            .ok_or(EditorSessionError::NothingToRedo)?;

        self.events.record(
            self.id,
            EventKind::CodeRedone {
                restored_code: step.code.clone(),
            },
        );
        self.current_code = step.code;
        self.history = step.history;
        Ok(())
    }

    pub fn update_cursor(&mut self, position: CursorPosition) {
        self.cursor_position = position;
    }

    pub fn clear_history(&mut self) {
        self.history = self.history.clear();
    }

    /// Take every event recorded since the last pull.
    pub fn pull_domain_events(&mut self) -> Vec<DomainEvent> {
        self.events.drain()
    }

    #[must_use]
    pub const fn id(&self) -> AggregateId {
        self.id
    }

    #[must_use]
    pub fn current_code(&self) -> &str {
        &self.current_code
    }

    #[must_use]
    pub const fn cursor_position(&self) -> CursorPosition {
        self.cursor_position
    }

    #[must_use]
    pub const fn history(&self) -> &CodeHistory {
        &self.history
    }

    #[must_use]
    pub const fn last_render_requested_at(&self) -> Option<DateTime<Utc>> {
        self.last_render_requested_at
    }

    #[must_use]
    pub const fn is_render_pending(&self) -> bool {
        self.is_render_pending
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
