use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::config::load_config;
use crate::error::Error;
use crate::ir::Direction;
use crate::orchestrator::{Visualizer, run_pipeline};
use crate::parser::{CommandParser, ParseResponse};
use crate::render::render_svg;

#[derive(Parser, Debug)]
#[command(
    name = "astflow",
    version,
    about = "Flowchart layout for AST-derived control-flow graphs"
)]
pub struct Args {
    /// Source file to visualize, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// External parser command; receives {"code": ...} on stdin and must
    /// print the {nodes, edges, ast} response on stdout
    #[arg(short = 'p', long = "parser")]
    pub parser: Option<String>,

    /// Pre-captured parser response (JSON file); bypasses --parser
    #[arg(short = 'g', long = "graph")]
    pub graph: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config json5 file (layout + theme overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout direction (overrides the config file)
    #[arg(short = 'd', long = "direction", value_enum)]
    pub direction: Option<DirectionArg>,

    /// Print the parser's raw AST dump to stderr
    #[arg(long = "ast")]
    pub show_ast: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DirectionArg {
    /// Top to bottom
    Tb,
    /// Left to right
    Lr,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Tb => Direction::TopToBottom,
            DirectionArg::Lr => Direction::LeftToRight,
        }
    }
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(direction) = args.direction {
        config.layout.direction = direction.into();
    }

    let state = if let Some(path) = &args.graph {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading captured response {}", path.display()))?;
        let response: ParseResponse =
            serde_json::from_str(&contents).map_err(Error::MalformedResponse)?;
        run_pipeline(response, &config.layout, &config.theme)?
    } else {
        let command = args
            .parser
            .as_deref()
            .and_then(CommandParser::from_command_line)
            .context("either --parser or --graph is required")?;
        let code = read_input(args.input.as_deref())?;
        let mut visualizer = Visualizer::new(command, config.layout.clone(), config.theme.clone());
        visualizer.visualize(&code)?;
        visualizer
            .into_state()
            .context("visualizer produced no state")?
    };

    if args.show_ast {
        eprintln!("{}", state.ast);
    }

    let rendered = match args.output_format {
        OutputFormat::Svg => render_svg(&state.scene, &config.theme),
        OutputFormat::Json => serde_json::to_string_pretty(&state.scene)?,
    };
    write_output(&rendered, args.output.as_deref())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(contents: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
