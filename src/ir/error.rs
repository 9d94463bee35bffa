use crate::parser::{line_number, Span};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("type is not compatible: {lhs}, {rhs}")]
    TypeMismatch { lhs: String, rhs: String },
    #[error("undeclared identifier '{0}'")]
    UndeclaredIdentifier(String),
    #[error("'{0}' is already declared")]
    DuplicateDeclaration(String),
    #[error("array size must be integer: {0}")]
    ArraySizeNotInteger(String),
    #[error("array index must be integer: {0}")]
    ArrayIndexNotInteger(String),
    #[error("'{0}' is not an array")]
    NotAnArray(String),
    #[error("increment and decrement operators can be used with integers only: {0}")]
    InvalidIncrementOperand(String),
    #[error("invalid operand: {0}")]
    InvalidOperand(String),
    #[error("condition must be boolean or integer: {0}")]
    InvalidCondition(String),
    #[error("break outside of a loop")]
    BreakOutsideLoop,
    #[error("continue outside of a loop")]
    ContinueOutsideLoop,
}

/// A recoverable semantic error and the node it was raised on.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub error: SemanticError,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(error: SemanticError, span: Span) -> Self {
        Self { error, span }
    }

    pub fn line(&self, source: &str) -> usize {
        line_number(source, self.span.start)
    }

    pub fn render(&self, source: &str) -> String {
        format!("line {}: {}", self.line(source), self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_with_line_number() {
        let source = "class A {\n  static { x = 1; }\n}\n";
        let start = source.find('x').unwrap();
        let diagnostic = Diagnostic::new(
            SemanticError::UndeclaredIdentifier("x".to_string()),
            Span::new(start, start + 1),
        );

        assert_eq!(diagnostic.render(source), "line 2: undeclared identifier 'x'");
    }
}
