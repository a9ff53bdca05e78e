//! Lifecycle states of the two result-bearing aggregates.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Render state of a `Diagram`.
///
/// `Pending` is re-entered whenever the source changes; there is no direct
/// edge between `Success` and `Failed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RenderStatus {
    Pending,
    Success,
    Failed,
}

/// Export state of a `DiagramImage`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Pending,
    Success,
    Failed,
}
