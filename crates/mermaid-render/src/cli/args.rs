//! Command builders for the `mermaid-render` CLI.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("mermaid-render")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render Mermaid diagrams to SVG and PNG")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Explicit config file, applied after global and project config"),
        )
        .arg(
            Arg::new("storage")
                .long("storage")
                .global(true)
                .value_parser(["memory", "sqlite"])
                .help("Storage backend override"),
        )
        .arg(
            Arg::new("events")
                .long("events")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print published domain events to stderr as JSON lines"),
        )
        .subcommand(cmd_serve())
        .subcommand(cmd_render())
        .subcommand(cmd_export())
        .subcommand(cmd_tool())
}

fn input_arg() -> Arg {
    Arg::new("input")
        .required(true)
        .value_name("INPUT")
        .help("Mermaid source file, or '-' for stdin")
}

pub fn cmd_serve() -> Command {
    Command::new("serve")
        .about("Run the HTTP API")
        .arg(Arg::new("host").long("host").help("Bind address"))
        .arg(
            Arg::new("port")
                .long("port")
                .value_parser(value_parser!(u16).range(1..))
                .help("Bind port"),
        )
}

pub fn cmd_render() -> Command {
    Command::new("render")
        .about("Render Mermaid source and print the SVG to stdout")
        .arg(input_arg())
}

pub fn cmd_export() -> Command {
    Command::new("export")
        .about("Export Mermaid source as a PNG or SVG file")
        .arg(input_arg())
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .value_parser(["png", "svg"])
                .default_value("png"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Output path, '-' for stdout (default: generated file name)"),
        )
        .arg(Arg::new("width").long("width").value_parser(value_parser!(u32)))
        .arg(Arg::new("height").long("height").value_parser(value_parser!(u32)))
        .arg(Arg::new("scale").long("scale").value_parser(value_parser!(f64)))
        .arg(
            Arg::new("background")
                .long("background")
                .value_name("COLOR")
                .help("Background colour: #rgb, #rrggbb, #rrggbbaa, white, black, transparent"),
        )
        .arg(
            Arg::new("file-name")
                .long("file-name")
                .help("Base name used for the generated file name"),
        )
}

pub fn cmd_tool() -> Command {
    Command::new("tool").about("Serve the render_diagram MCP tool over stdio")
}
