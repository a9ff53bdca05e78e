//! `MermaidCode` value object and diagram type detection.
//!
//! Mermaid source is validated once at construction (trimmed, non-empty) and
//! classified by its leading keyword. Equality is raw-code equality.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::errors::ValidationError;

/// Diagram family inferred from the first keyword of the source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    Flowchart,
    Sequence,
    Class,
    State,
    Er,
    Gantt,
    Pie,
    Git,
    Journey,
    Mindmap,
    Timeline,
    Unknown,
}

/// Keyword prefixes, checked in order against the lower-cased first token.
const KEYWORDS: &[(&str, DiagramType)] = &[
    ("graph", DiagramType::Flowchart),
    ("flowchart", DiagramType::Flowchart),
    ("sequencediagram", DiagramType::Sequence),
    ("classdiagram", DiagramType::Class),
    ("statediagram", DiagramType::State),
    ("erdiagram", DiagramType::Er),
    ("gantt", DiagramType::Gantt),
    ("pie", DiagramType::Pie),
    ("gitgraph", DiagramType::Git),
    ("journey", DiagramType::Journey),
    ("mindmap", DiagramType::Mindmap),
    ("timeline", DiagramType::Timeline),
];

impl DiagramType {
    /// Classify trimmed Mermaid source by its first keyword, case-insensitively.
    ///
    /// Versioned keywords such as `stateDiagram-v2` match their family prefix.
    #[must_use]
    pub fn detect(code: &str) -> Self {
        let first = code
            .split_whitespace()
            .next()
            .map(str::to_lowercase)
            .unwrap_or_default();

        KEYWORDS
            .iter()
            .find(|(keyword, _)| first.starts_with(keyword))
            .map_or(Self::Unknown, |(_, kind)| *kind)
    }
}

/// Validated Mermaid diagram source.
#[derive(Debug, Clone, Serialize)]
pub struct MermaidCode {
    raw_code: String,
    diagram_type: DiagramType,
}

impl MermaidCode {
    /// Validate and classify raw Mermaid source.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyMermaidCode` for empty or whitespace-only input.
    pub fn create(raw_code: &str) -> Result<Self, ValidationError> {
        let trimmed = raw_code.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyMermaidCode);
        }

        Ok(Self {
            raw_code: trimmed.to_string(),
            diagram_type: DiagramType::detect(trimmed),
        })
    }

    /// The trimmed source text.
    #[must_use]
    pub fn raw_code(&self) -> &str {
        &self.raw_code
    }

    #[must_use]
    pub const fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }
}

impl PartialEq for MermaidCode {
    fn eq(&self, other: &Self) -> bool {
        self.raw_code == other.raw_code
    }
}

impl Eq for MermaidCode {}
