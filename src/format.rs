//! Post-render formatting. Failures never surface: the formatter logs and
//! hands back the text it was given.
use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

pub trait Formatter {
    fn format(&self, source: String) -> String;
}

/// Identity.
pub struct Verbatim;

impl Formatter for Verbatim {
    fn format(&self, source: String) -> String {
        source
    }
}

/// Pipes Go source through an external `gofmt`.
pub struct GoFmt {
    program: String,
}

impl Default for GoFmt {
    fn default() -> Self {
        Self::with_program("gofmt")
    }
}

impl GoFmt {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn run(&self, source: &str) -> std::io::Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            warn!(
                program = %self.program,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "formatter rejected output, keeping it unformatted"
            );
            return Ok(None);
        }
        Ok(String::from_utf8(output.stdout).ok())
    }
}

impl Formatter for GoFmt {
    fn format(&self, source: String) -> String {
        match self.run(&source) {
            Ok(Some(formatted)) => {
                debug!(program = %self.program, "formatted output");
                formatted
            }
            Ok(None) => source,
            Err(err) => {
                warn!(program = %self.program, error = %err, "formatter unavailable, keeping output unformatted");
                source
            }
        }
    }
}
