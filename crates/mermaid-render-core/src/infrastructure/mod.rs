//! # Infrastructure Layer
//!
//! Adapters for the domain seams: repositories (in-memory and SQLite), event
//! publishers, the Mermaid CLI renderer, and the `resvg` converter.

pub mod command_renderer;
pub mod memory;
pub mod publishers;
pub mod resvg_converter;
pub mod sqlite;
pub mod ttl_store;

pub use command_renderer::CommandRenderer;
pub use memory::{
    InMemoryDiagramImageRepository, InMemoryDiagramRepository, InMemoryEditorSessionRepository,
};
pub use publishers::{
    BroadcastEventPublisher, FanOutPublisher, RecordingEventPublisher, TracingEventPublisher,
};
pub use resvg_converter::ResvgConverter;
pub use sqlite::{
    Database, SqliteDiagramImageRepository, SqliteDiagramRepository,
    SqliteEditorSessionRepository,
};
pub use ttl_store::TtlStore;
