//! Client boundary to the external source-code parser. The parser itself is
//! another service; this module only speaks its request/response format and
//! maps transport failures into the error taxonomy.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::ir::{RawEdge, RawNode};

/// Response body of the parser: the raw node/edge list plus an opaque AST
/// dump that is passed through for display, never interpreted here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseResponse {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub ast: String,
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    code: &'a str,
}

/// The single synchronous call the orchestrator makes per request.
pub trait ParserClient {
    fn parse(&self, code: &str) -> Result<ParseResponse, Error>;
}

/// Runs an external parser command: the request body `{"code": ...}` goes to
/// its stdin, the JSON response is read from its stdout.
#[derive(Debug, Clone)]
pub struct CommandParser {
    program: String,
    args: Vec<String>,
}

impl CommandParser {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Splits a whitespace-separated command line, e.g. `"python3 parse.py"`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        let mut parser = Self::new(program);
        for part in parts {
            parser = parser.arg(part);
        }
        Some(parser)
    }
}

impl ParserClient for CommandParser {
    fn parse(&self, code: &str) -> Result<ParseResponse, Error> {
        let body = serde_json::to_vec(&ParseRequest { code })
            .map_err(|err| Error::ParserUnavailable(io::Error::other(err)))?;
        debug!(program = %self.program, bytes = body.len(), "invoking parser");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(Error::ParserUnavailable)?;
        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits without reading stdin breaks the pipe; its
            // exit status and stdout still decide how the call went.
            match stdin.write_all(&body) {
                Err(err) if err.kind() != io::ErrorKind::BrokenPipe => {
                    return Err(Error::ParserUnavailable(err));
                }
                _ => {}
            }
        }
        let output = child.wait_with_output().map_err(Error::ParserUnavailable)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ParserUnavailable(io::Error::other(format!(
                "parser exited with {}: {}",
                output.status,
                stderr.trim()
            ))));
        }

        serde_json::from_slice(&output.stdout).map_err(Error::MalformedResponse)
    }
}
