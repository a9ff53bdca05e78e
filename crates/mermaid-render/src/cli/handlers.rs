//! Subcommand handlers.

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::ArgMatches;
use mermaid_render_core::{
    application::ExportPngCommand,
    config::{load_config, Config, StorageBackend},
    domain::{EventPublisher, ImageFormat},
    infrastructure::RecordingEventPublisher,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;

use super::args::build_cli;
use crate::{app::AppState, http, tool::ToolBridge};

/// Default SQLite location when `--storage sqlite` is given without a path.
const DEFAULT_SQLITE_PATH: &str = ".mermaid-render/state.db";

/// Parse `std::env::args` and run the selected subcommand.
///
/// # Errors
///
/// Returns any configuration, I/O, or use-case error.
pub async fn run_cli() -> Result<()> {
    let matches = build_cli().get_matches();
    run(&matches).await
}

/// Run an already-parsed command line.
///
/// # Errors
///
/// Returns any configuration, I/O, or use-case error.
pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = resolve_config(matches)?;

    let recorder = matches
        .get_flag("events")
        .then(|| Arc::new(RecordingEventPublisher::new()));
    let observer = recorder
        .clone()
        .map(|recorder| recorder as Arc<dyn EventPublisher>);
    let state = AppState::from_config(&config, observer).await?;

    let outcome = match matches.subcommand() {
        Some(("serve", sub)) => serve(state, &config, sub).await,
        Some(("render", sub)) => render(&state, sub).await,
        Some(("export", sub)) => export(&state, sub).await,
        Some(("tool", _)) => run_tool(&state, &config).await,
        _ => Err(anyhow::anyhow!("Unknown command")),
    };

    if let Some(recorder) = recorder {
        print_events(&recorder)?;
    }
    outcome
}

fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let explicit = matches.get_one::<PathBuf>("config");
    let mut config = load_config(explicit.map(PathBuf::as_path))?;

    if let Some(storage) = matches.get_one::<String>("storage") {
        config.storage.backend = storage
            .parse::<StorageBackend>()
            .with_context(|| format!("Invalid storage backend: {storage}"))?;
        if config.storage.backend == StorageBackend::Sqlite && config.storage.path.is_none() {
            config.storage.path = Some(PathBuf::from(DEFAULT_SQLITE_PATH));
        }
    }

    config.validate()?;
    Ok(config)
}

async fn serve(state: AppState, config: &Config, sub: &ArgMatches) -> Result<()> {
    let host = sub
        .get_one::<String>("host")
        .unwrap_or(&config.server.host);
    let port = sub
        .get_one::<u16>("port")
        .copied()
        .unwrap_or(config.server.port);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {host}:{port}"))?;
    http::serve(state, addr).await
}

async fn render(state: &AppState, sub: &ArgMatches) -> Result<()> {
    let source = read_input(sub).await?;
    let result = state.render.execute(&source).await?;
    info!(diagram_id = %result.diagram_id, "Rendered");

    let mut stdout = tokio::io::stdout();
    stdout.write_all(result.svg.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

async fn export(state: &AppState, sub: &ArgMatches) -> Result<()> {
    let source = read_input(sub).await?;
    let format = sub
        .get_one::<String>("format")
        .map_or(Ok(ImageFormat::Png), |f| f.parse::<ImageFormat>())
        .context("Invalid format")?;
    let file_name = sub.get_one::<String>("file-name").cloned();

    let result = match format {
        ImageFormat::Png => {
            let command = ExportPngCommand {
                width: sub.get_one::<u32>("width").copied(),
                height: sub.get_one::<u32>("height").copied(),
                scale: sub.get_one::<f64>("scale").copied(),
                background_color: sub.get_one::<String>("background").cloned(),
                file_name,
                ..ExportPngCommand::new(source)
            };
            state.export_png.execute(command).await?
        }
        ImageFormat::Svg => state.export_svg.execute(&source, file_name).await?,
    };

    let output = sub
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(&result.file_name));

    if output == Path::new("-") {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(result.image_data.as_bytes()).await?;
        stdout.flush().await?;
    } else {
        tokio::fs::write(&output, result.image_data.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{}\n", output.display()).as_bytes())
            .await?;
        stdout.flush().await?;
    }
    info!(
        image_id = %result.image_id,
        file_size = result.file_size,
        "Exported"
    );
    Ok(())
}

async fn run_tool(state: &AppState, config: &Config) -> Result<()> {
    let bridge = ToolBridge::new(Arc::clone(&state.export_png), config.tool.clone());
    info!("Tool bridge ready on stdio");
    bridge.serve_stdio().await
}

async fn read_input(sub: &ArgMatches) -> Result<String> {
    let input = sub
        .get_one::<String>("input")
        .map_or("-", String::as_str);

    if input == "-" {
        let mut source = String::new();
        tokio::io::stdin()
            .read_to_string(&mut source)
            .await
            .context("Failed to read stdin")?;
        return Ok(source);
    }

    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {input}"))
}

fn print_events(recorder: &RecordingEventPublisher) -> Result<()> {
    for event in recorder.events() {
        let line = serde_json::to_string(&event)?;
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{line}");
        }
    }
    Ok(())
}
