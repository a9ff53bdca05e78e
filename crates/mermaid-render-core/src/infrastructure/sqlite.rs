//! `SQLite` persistence for all three aggregates using `SQLx`.
//!
//! - One pool shared by every repository
//! - Embedded schema executed on open (no migration files)
//! - `save` is an upsert; `find_by_id` reconstitutes through the aggregate
//!   factories so stored rows are checked against the same invariants
//! - Timestamps are RFC 3339 text; undo/redo stacks are JSON arrays

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::{path::Path, str::FromStr};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqlitePoolOptions, SqliteRow},
    Row, Sqlite, SqlitePool,
};

use crate::domain::{
    AggregateId, CodeHistory, CursorPosition, Diagram, DiagramImage, DiagramImageRepository,
    DiagramRepository, EditorSession, EditorSessionRepository, ExportError, ExportOptions,
    ExportStatus, ImageFormat, ImagePayload, RenderStatus, RenderingError, RepositoryError,
    RepositoryResult,
};

/// Database schema as SQL string - executed once on open
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS diagrams (
    id TEXT PRIMARY KEY,
    mermaid_code TEXT NOT NULL,
    diagram_type TEXT NOT NULL,
    rendered_svg TEXT,
    render_status TEXT NOT NULL CHECK(render_status IN ('pending', 'success', 'failed')),
    error_message TEXT,
    error_line INTEGER,
    error_column INTEGER,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS diagram_images (
    id TEXT PRIMARY KEY,
    source_svg TEXT NOT NULL,
    format TEXT NOT NULL CHECK(format IN ('png', 'svg')),
    image_data BLOB,
    image_kind TEXT CHECK(image_kind IN ('bytes', 'text')),
    file_name TEXT,
    width INTEGER,
    height INTEGER,
    scale REAL NOT NULL DEFAULT 1,
    background_color TEXT,
    export_status TEXT NOT NULL CHECK(export_status IN ('pending', 'success', 'failed')),
    error_message TEXT,
    error_code TEXT,
    file_size INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS editor_sessions (
    id TEXT PRIMARY KEY,
    current_code TEXT NOT NULL,
    cursor_line INTEGER NOT NULL DEFAULT 0,
    cursor_column INTEGER NOT NULL DEFAULT 0,
    undo_stack TEXT NOT NULL DEFAULT '[]',
    redo_stack TEXT NOT NULL DEFAULT '[]',
    last_render_requested_at TEXT,
    is_render_pending INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_diagrams_status ON diagrams(render_status);
CREATE INDEX IF NOT EXISTS idx_images_status ON diagram_images(export_status);
";

// ============================================================================
// DATABASE
// ============================================================================

/// Connection pool wrapper handing out the three repositories.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database file and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be opened or the schema fails.
    pub async fn open(path: &Path) -> RepositoryResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::storage_error(format!("Failed to create parent directory: {e}"))
            })?;
        }

        let path_str = path.to_str().ok_or_else(|| {
            RepositoryError::storage_error("Database path contains invalid UTF-8")
        })?;
        let db_url = if path.is_absolute() {
            format!("sqlite:///{path_str}?mode=rwc")
        } else {
            format!("sqlite:{path_str}?mode=rwc")
        };

        let pool = SqlitePool::connect(&db_url).await.map_err(|e| {
            RepositoryError::storage_error(format!("Failed to connect to database: {e}"))
        })?;
        Self::with_pool(pool).await
    }

    /// Private in-memory database. Single connection, so every query sees
    /// the same data.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the schema fails.
    pub async fn in_memory() -> RepositoryResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| RepositoryError::storage_error(format!("Failed to open database: {e}")))?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> RepositoryResult<Self> {
        sqlx::query(SCHEMA).execute(&pool).await.map_err(|e| {
            RepositoryError::storage_error(format!("Failed to initialize schema: {e}"))
        })?;
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[must_use]
    pub fn diagrams(&self) -> SqliteDiagramRepository {
        SqliteDiagramRepository {
            pool: self.pool.clone(),
        }
    }

    #[must_use]
    pub fn images(&self) -> SqliteDiagramImageRepository {
        SqliteDiagramImageRepository {
            pool: self.pool.clone(),
        }
    }

    #[must_use]
    pub fn sessions(&self) -> SqliteEditorSessionRepository {
        SqliteEditorSessionRepository {
            pool: self.pool.clone(),
        }
    }
}

// ============================================================================
// ROW HELPERS
// ============================================================================

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> RepositoryResult<T>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::storage_error(format!("Failed to read {name}: {e}")))
}

fn storage(context: &str) -> impl FnOnce(sqlx::Error) -> RepositoryError + '_ {
    move |e| RepositoryError::storage_error(format!("{context}: {e}"))
}

fn parse_timestamp(id: &str, value: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::corrupted(id, format!("invalid timestamp '{value}': {e}")))
}

fn parse_enum<T: FromStr>(id: &str, field: &str, value: &str) -> RepositoryResult<T> {
    T::from_str(value)
        .map_err(|_| RepositoryError::corrupted(id, format!("invalid {field} '{value}'")))
}

fn to_u32(id: &str, field: &str, value: Option<i64>) -> RepositoryResult<Option<u32>> {
    value
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| RepositoryError::corrupted(id, format!("{field} out of range: {v}")))
        })
        .transpose()
}

fn parse_id(value: &str) -> RepositoryResult<AggregateId> {
    AggregateId::parse(value).map_err(|e| RepositoryError::corrupted(value, e))
}

// ============================================================================
// DIAGRAMS
// ============================================================================

#[derive(Clone)]
pub struct SqliteDiagramRepository {
    pool: SqlitePool,
}

impl SqliteDiagramRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_diagram_row(row: &SqliteRow) -> RepositoryResult<Diagram> {
    let id: String = column(row, "id")?;
    let status: String = column(row, "render_status")?;
    let error_message: Option<String> = column(row, "error_message")?;
    let error_line: Option<i64> = column(row, "error_line")?;
    let error_column: Option<i64> = column(row, "error_column")?;
    let created_at: String = column(row, "created_at")?;

    let error = error_message
        .map(|message| {
            RenderingError::create(
                &message,
                to_u32(&id, "error_line", error_line)?,
                to_u32(&id, "error_column", error_column)?,
            )
            .map_err(|e| RepositoryError::corrupted(&id, e))
        })
        .transpose()?;

    Diagram::reconstitute(
        parse_id(&id)?,
        &column::<String>(row, "mermaid_code")?,
        column(row, "rendered_svg")?,
        parse_enum::<RenderStatus>(&id, "render_status", &status)?,
        error,
        parse_timestamp(&id, &created_at)?,
    )
    .map_err(|e| RepositoryError::corrupted(&id, e))
}

#[async_trait]
impl DiagramRepository for SqliteDiagramRepository {
    async fn save(&self, diagram: &Diagram) -> RepositoryResult<()> {
        let error = diagram.error();
        sqlx::query(
            "INSERT OR REPLACE INTO diagrams
                (id, mermaid_code, diagram_type, rendered_svg, render_status,
                 error_message, error_line, error_column, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(diagram.id().to_string())
        .bind(diagram.mermaid_code().raw_code())
        .bind(diagram.diagram_type().to_string())
        .bind(diagram.rendered_svg())
        .bind(diagram.render_status().to_string())
        .bind(error.map(RenderingError::message))
        .bind(error.and_then(RenderingError::line).map(i64::from))
        .bind(error.and_then(RenderingError::column).map(i64::from))
        .bind(diagram.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage("Failed to save diagram"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<Diagram>> {
        sqlx::query("SELECT * FROM diagrams WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to load diagram"))?
            .as_ref()
            .map(parse_diagram_row)
            .transpose()
    }

    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM diagrams WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage("Failed to delete diagram"))?;
        Ok(())
    }
}

// ============================================================================
// DIAGRAM IMAGES
// ============================================================================

#[derive(Clone)]
pub struct SqliteDiagramImageRepository {
    pool: SqlitePool,
}

impl SqliteDiagramImageRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_payload(
    id: &str,
    kind: Option<&str>,
    data: Option<Vec<u8>>,
) -> RepositoryResult<Option<ImagePayload>> {
    match (kind, data) {
        (_, None) => Ok(None),
        (Some("text"), Some(bytes)) => String::from_utf8(bytes)
            .map(|text| Some(ImagePayload::Text(text)))
            .map_err(|e| RepositoryError::corrupted(id, e)),
        (_, Some(bytes)) => Ok(Some(ImagePayload::Bytes(bytes))),
    }
}

fn parse_image_row(row: &SqliteRow) -> RepositoryResult<DiagramImage> {
    let id: String = column(row, "id")?;
    let format: String = column(row, "format")?;
    let status: String = column(row, "export_status")?;
    let kind: Option<String> = column(row, "image_kind")?;
    let data: Option<Vec<u8>> = column(row, "image_data")?;
    let error_message: Option<String> = column(row, "error_message")?;
    let error_code: Option<String> = column(row, "error_code")?;
    let created_at: String = column(row, "created_at")?;

    let options = ExportOptions::builder()
        .file_name(column::<Option<String>>(row, "file_name")?)
        .width(to_u32(&id, "width", column(row, "width")?)?)
        .height(to_u32(&id, "height", column(row, "height")?)?)
        .scale(Some(column::<f64>(row, "scale")?))
        .background_color(column::<Option<String>>(row, "background_color")?)
        .build()
        .map_err(|e| RepositoryError::corrupted(&id, e))?;

    let error = error_message
        .map(|message| {
            ExportError::create(&message)
                .map(|err| match error_code {
                    Some(code) => err.with_code(code),
                    None => err,
                })
                .map_err(|e| RepositoryError::corrupted(&id, e))
        })
        .transpose()?;

    DiagramImage::reconstitute(
        parse_id(&id)?,
        column(row, "source_svg")?,
        parse_enum::<ImageFormat>(&id, "format", &format)?,
        parse_payload(&id, kind.as_deref(), data)?,
        options,
        parse_enum::<ExportStatus>(&id, "export_status", &status)?,
        error,
        parse_timestamp(&id, &created_at)?,
    )
    .map_err(|e| RepositoryError::corrupted(&id, e))
}

#[async_trait]
impl DiagramImageRepository for SqliteDiagramImageRepository {
    async fn save(&self, image: &DiagramImage) -> RepositoryResult<()> {
        let payload = image.stored_data();
        let kind = payload.map(|data| match data {
            ImagePayload::Bytes(_) => "bytes",
            ImagePayload::Text(_) => "text",
        });
        let options = image.options();
        let error = image.error();
        let file_size = i64::try_from(image.file_size()).unwrap_or(i64::MAX);

        sqlx::query(
            "INSERT OR REPLACE INTO diagram_images
                (id, source_svg, format, image_data, image_kind, file_name, width, height,
                 scale, background_color, export_status, error_message, error_code,
                 file_size, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(image.id().to_string())
        .bind(image.source_svg())
        .bind(image.format().to_string())
        .bind(payload.map(ImagePayload::as_bytes))
        .bind(kind)
        .bind(options.file_name())
        .bind(options.width().map(i64::from))
        .bind(options.height().map(i64::from))
        .bind(options.scale())
        .bind(options.background_color())
        .bind(image.export_status().to_string())
        .bind(error.map(ExportError::message))
        .bind(error.and_then(ExportError::code))
        .bind(file_size)
        .bind(image.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage("Failed to save diagram image"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<DiagramImage>> {
        sqlx::query("SELECT * FROM diagram_images WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to load diagram image"))?
            .as_ref()
            .map(parse_image_row)
            .transpose()
    }

    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM diagram_images WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage("Failed to delete diagram image"))?;
        Ok(())
    }
}

// ============================================================================
// EDITOR SESSIONS
// ============================================================================

#[derive(Clone)]
pub struct SqliteEditorSessionRepository {
    pool: SqlitePool,
}

impl SqliteEditorSessionRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_stack(id: &str, field: &str, json: &str) -> RepositoryResult<Vec<String>> {
    serde_json::from_str(json)
        .map_err(|e| RepositoryError::corrupted(id, format!("invalid {field}: {e}")))
}

fn parse_session_row(row: &SqliteRow) -> RepositoryResult<EditorSession> {
    let id: String = column(row, "id")?;
    let cursor = CursorPosition::create(column(row, "cursor_line")?, column(row, "cursor_column")?)
        .map_err(|e| RepositoryError::corrupted(&id, e))?;
    let undo = parse_stack(&id, "undo_stack", &column::<String>(row, "undo_stack")?)?;
    let redo = parse_stack(&id, "redo_stack", &column::<String>(row, "redo_stack")?)?;
    let last_render: Option<String> = column(row, "last_render_requested_at")?;
    let created_at: String = column(row, "created_at")?;

    Ok(EditorSession::reconstitute(
        parse_id(&id)?,
        column(row, "current_code")?,
        cursor,
        CodeHistory::reconstitute(undo, redo),
        last_render
            .map(|value| parse_timestamp(&id, &value))
            .transpose()?,
        column::<i64>(row, "is_render_pending")? != 0,
        parse_timestamp(&id, &created_at)?,
    ))
}

#[async_trait]
impl EditorSessionRepository for SqliteEditorSessionRepository {
    async fn save(&self, session: &EditorSession) -> RepositoryResult<()> {
        let history = session.history();
        let undo = serde_json::to_string(history.undo_stack())
            .map_err(|e| RepositoryError::storage_error(format!("Failed to encode history: {e}")))?;
        let redo = serde_json::to_string(history.redo_stack())
            .map_err(|e| RepositoryError::storage_error(format!("Failed to encode history: {e}")))?;
        let cursor = session.cursor_position();

        sqlx::query(
            "INSERT OR REPLACE INTO editor_sessions
                (id, current_code, cursor_line, cursor_column, undo_stack, redo_stack,
                 last_render_requested_at, is_render_pending, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(session.id().to_string())
        .bind(session.current_code())
        .bind(i64::from(cursor.line()))
        .bind(i64::from(cursor.column()))
        .bind(undo)
        .bind(redo)
        .bind(session.last_render_requested_at().map(|at| at.to_rfc3339()))
        .bind(i64::from(session.is_render_pending()))
        .bind(session.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage("Failed to save editor session"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<EditorSession>> {
        sqlx::query("SELECT * FROM editor_sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage("Failed to load editor session"))?
            .as_ref()
            .map(parse_session_row)
            .transpose()
    }

    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM editor_sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage("Failed to delete editor session"))?;
        Ok(())
    }
}
