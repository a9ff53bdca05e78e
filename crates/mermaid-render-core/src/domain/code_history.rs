//! Bounded undo/redo history for editor sessions.
//!
//! `CodeHistory` is an immutable value: every operation returns a new history
//! and leaves the receiver untouched. Both stacks are `im::Vector`s so the
//! copies share structure instead of cloning every entry.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use im::Vector;
use serde::Serialize;

/// Maximum number of entries kept on each stack.
pub const MAX_HISTORY_SIZE: usize = 50;

/// Outcome of a successful undo or redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    /// Code to restore.
    pub code: String,
    /// History after the step.
    pub history: CodeHistory,
}

/// Undo and redo stacks, newest entry last.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CodeHistory {
    undo_stack: Vector<String>,
    redo_stack: Vector<String>,
}

/// Append `entry`, evicting the oldest entries beyond the cap.
fn push_capped(stack: &Vector<String>, entry: String) -> Vector<String> {
    let mut next = stack.clone();
    next.push_back(entry);
    while next.len() > MAX_HISTORY_SIZE {
        next.pop_front();
    }
    next
}

fn capped(entries: impl IntoIterator<Item = String>) -> Vector<String> {
    entries
        .into_iter()
        .fold(Vector::new(), |stack, entry| push_capped(&stack, entry))
}

impl CodeHistory {
    /// Empty history.
    #[must_use]
    pub fn create() -> Self {
        Self::default()
    }

    /// Rebuild from stored stacks (oldest first). Oversized stacks keep their
    /// newest entries.
    #[must_use]
    pub fn reconstitute(
        undo: impl IntoIterator<Item = String>,
        redo: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            undo_stack: capped(undo),
            redo_stack: capped(redo),
        }
    }

    /// Record `code` as the newest undo entry. Any forward edit invalidates redo.
    #[must_use]
    pub fn push_undo(&self, code: impl Into<String>) -> Self {
        Self {
            undo_stack: push_capped(&self.undo_stack, code.into()),
            redo_stack: Vector::new(),
        }
    }

    /// Pop the newest undo entry, parking `current_code` on the redo stack.
    ///
    /// Returns `None` when there is nothing to undo.
    #[must_use]
    pub fn undo(&self, current_code: &str) -> Option<HistoryStep> {
        let mut undo_stack = self.undo_stack.clone();
        let code = undo_stack.pop_back()?;
        Some(HistoryStep {
            code,
            history: Self {
                undo_stack,
                redo_stack: push_capped(&self.redo_stack, current_code.to_string()),
            },
        })
    }

    /// Mirror of [`undo`](Self::undo).
    #[must_use]
    pub fn redo(&self, current_code: &str) -> Option<HistoryStep> {
        let mut redo_stack = self.redo_stack.clone();
        let code = redo_stack.pop_back()?;
        Some(HistoryStep {
            code,
            history: Self {
                undo_stack: push_capped(&self.undo_stack, current_code.to_string()),
                redo_stack,
            },
        })
    }

    #[must_use]
    pub fn clear(&self) -> Self {
        Self::default()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub const fn undo_stack(&self) -> &Vector<String> {
        &self.undo_stack
    }

    #[must_use]
    pub const fn redo_stack(&self) -> &Vector<String> {
        &self.redo_stack
    }
}
