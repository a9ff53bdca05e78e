//! MCP tool server on stdio.
//!
//! Exposes one tool, `render_diagram`, which exports PNG and either writes it
//! under `<base>/storage/diagrams/` or returns it base64-encoded. Tool
//! failures are reported in the result with `success: false` so the client
//! session keeps running.

pub mod types;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use mermaid_render_core::{
    application::{ExportPngCommand, ExportPngUseCase},
    config::ToolConfig,
    domain::DiagramType,
};
use rmcp::{
    handler::server::{
        tool::ToolRouter,
        wrapper::{Json, Parameters},
    },
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};

use self::types::{OutputType, RenderDiagramOutput, RenderDiagramParams};

pub const TOOL_NAME: &str = "render_diagram";

#[derive(Clone)]
pub struct ToolBridge {
    export_png: Arc<ExportPngUseCase>,
    config: ToolConfig,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ToolBridge {
    pub fn new(export_png: Arc<ExportPngUseCase>, config: ToolConfig) -> Self {
        Self {
            export_png,
            config,
            tool_router: Self::tool_router(),
        }
    }

    /// Serve on the process's stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if the MCP handshake or the transport fails.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        self.serve_io(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve over any byte stream pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the MCP handshake or the transport fails.
    pub async fn serve_io<R, W>(self, reader: R, writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let service = self.serve((reader, writer)).await?;
        info!("MCP client connected");
        let reason = service.waiting().await?;
        info!(?reason, "MCP session closed");
        Ok(())
    }

    /// Render Mermaid diagram code to a PNG image (1920x1440). Returns a file
    /// path or base64 data.
    #[tool(name = "render_diagram")]
    pub async fn render_diagram(
        &self,
        params: Parameters<RenderDiagramParams>,
    ) -> Result<Json<RenderDiagramOutput>, ErrorData> {
        let RenderDiagramParams {
            mermaid_code,
            output_type,
            base_path,
        } = params.0;

        let diagram_type = DiagramType::detect(mermaid_code.trim()).to_string();
        let command = ExportPngCommand {
            width: Some(self.config.width),
            height: Some(self.config.height),
            ..ExportPngCommand::new(mermaid_code)
        };

        let exported = match self.export_png.execute(command).await {
            Ok(exported) => exported,
            Err(e) => {
                warn!(error = %e, "render_diagram failed");
                return Ok(Json(RenderDiagramOutput::failure(e.to_string())));
            }
        };

        let output = match output_type {
            OutputType::Base64 => RenderDiagramOutput {
                success: true,
                image_base64: Some(STANDARD.encode(exported.image_data.as_bytes())),
                diagram_type: Some(diagram_type),
                ..RenderDiagramOutput::default()
            },
            OutputType::File => {
                let base = base_path.map_or_else(|| self.config.output_dir.clone(), PathBuf::from);
                let file_name = format!("{}-{}", Utc::now().timestamp_millis(), exported.file_name);
                match write_image(&base, &file_name, exported.image_data.as_bytes()).await {
                    Ok(path) => RenderDiagramOutput {
                        success: true,
                        image_url: Some(path.display().to_string()),
                        diagram_type: Some(diagram_type),
                        ..RenderDiagramOutput::default()
                    },
                    Err(e) => {
                        warn!(error = %e, "Failed to store rendered image");
                        RenderDiagramOutput::failure(format!("Failed to store image: {e}"))
                    }
                }
            }
        };
        Ok(Json(output))
    }
}

#[tool_handler]
impl ServerHandler for ToolBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Mermaid rendering server (tools: render_diagram). Pass mermaidCode; \
                 outputType \"file\" (default) or \"base64\"."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

async fn write_image(base: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let dir = base.join("storage").join("diagrams");
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(std::path::absolute(&path).unwrap_or(path))
}
