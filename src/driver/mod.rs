mod config;
mod error;

pub use config::Config;
pub use error::DriverError;

use crate::ir::{diagnostics_to_string, lower_program, program_to_string, LoweredProgram};
use crate::parser::{parse_program, ParseError};
use std::io::Write;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// What a successful run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub instrs: usize,
    pub diagnostics: usize,
}

impl RunSummary {
    pub fn exit_code(&self) -> i32 {
        if self.diagnostics > 0 {
            2
        } else {
            0
        }
    }
}

pub struct Driver {
    config: Config,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<RunSummary, DriverError> {
        let path = self.config.get_source_path();
        let mut source = self.config.get_script()?;

        source.push('\n');

        let lowered =
            compile_source(&source, path).map_err(|err| DriverError::syntax(err, &source))?;

        info!(
            instrs = lowered.instrs.len(),
            diagnostics = lowered.diagnostics.len(),
            "lowered program"
        );

        let mut output = self.config.get_output()?;

        output.write_all(program_to_string(&lowered.instrs).as_bytes())?;

        if self.config.trace {
            for production in lowered.trace.iter() {
                writeln!(output, "{}", production)?;
            }
        }

        if !lowered.diagnostics.is_empty() {
            warn!(count = lowered.diagnostics.len(), "semantic errors recorded");
        }

        let report = diagnostics_to_string(&lowered.diagnostics, &source);

        if self.config.__output_override.is_some() {
            output.write_all(report.as_bytes())?;
        } else {
            eprint!("{}", report);
        }

        output.flush()?;

        Ok(RunSummary {
            instrs: lowered.instrs.len(),
            diagnostics: lowered.diagnostics.len(),
        })
    }
}

/// Parses and lowers one compilation unit. The caller is expected to have
/// appended the trailing newline.
pub fn compile_source(source: &str, path: Option<String>) -> Result<LoweredProgram, ParseError> {
    let unit = parse_program(source, path)?;

    debug!(classes = unit.classes.len(), "parsed compilation unit");

    Ok(lower_program(&unit))
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the `-v` count.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exit_code_reflects_diagnostics() {
        assert_eq!(RunSummary { instrs: 3, diagnostics: 0 }.exit_code(), 0);
        assert_eq!(RunSummary { instrs: 0, diagnostics: 1 }.exit_code(), 2);
    }

    #[test]
    fn syntax_errors_carry_their_lines() {
        let source = "class A {\n  static { int x = ; }\n}\n";
        let err = compile_source(source, Some("A.java".to_string())).unwrap_err();

        assert_eq!(err.lines(source), vec![2]);
        assert_eq!(err.path(), Some("A.java"));
    }
}
