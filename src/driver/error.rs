use crate::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no input provided, pass a file, -i <PROGRAM> or -s")]
    MissingInput,
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("{rendered}")]
    Syntax { error: ParseError, rendered: String },
}

impl DriverError {
    pub fn syntax(error: ParseError, source: &str) -> Self {
        let rendered = error.render(source);

        DriverError::Syntax { error, rendered }
    }
}
