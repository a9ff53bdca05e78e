//! mermaid-render CLI
//!
//! Binary name: `mermaid-render`

use std::process;

use mermaid_render::cli::run_cli;

#[tokio::main]
async fn main() {
    // stdout carries SVG, exported bytes, and tool responses; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run_cli().await {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {err:#}");
        }

        let code = err
            .downcast_ref::<mermaid_render_core::Error>()
            .map_or(1, mermaid_render_core::Error::exit_code);

        #[allow(clippy::exit)]
        process::exit(code);
    }
}
