use super::lexer::LexError;
use super::spanned::{line_number, retrieve_span_snippet, Spanned};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorItem {
    #[error("{0}")]
    LexError(LexError),
    #[error("{msg}, found '{found}'")]
    Expected { msg: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} syntax error(s)", errors.len())]
pub struct ParseError {
    pub errors: Vec<Spanned<ParseErrorItem>>,
    path: Option<String>,
}

impl ParseError {
    pub fn new(errors: Vec<Spanned<ParseErrorItem>>, path: Option<String>) -> Self {
        Self { errors, path }
    }

    pub fn set_path(&mut self, path: Option<String>) {
        self.path = path;
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Line numbers of every error, in report order.
    pub fn lines(&self, source: &str) -> Vec<usize> {
        self.errors
            .iter()
            .map(|err| line_number(source, err.span.start))
            .collect()
    }

    pub fn render(&self, source: &str) -> String {
        let mut output = String::new();
        let location = self.path.as_deref().unwrap_or("<input>");

        for err in self.errors.iter() {
            let line = line_number(source, err.span.start);
            output.push_str(&format!("{}: line {}: syntax error: {}\n", location, line, err.item));

            if let Some(snippet) = retrieve_span_snippet(source, err.span) {
                let width = (snippet.end - snippet.start).max(1);

                output.push_str(&format!("    {}\n", snippet.source_line));
                output.push_str(&format!(
                    "    {}{}\n",
                    " ".repeat(snippet.start),
                    "^".repeat(width)
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::spanned::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_points_at_the_offending_token() {
        let source = "class A {\n  int x = ;\n}\n";
        let start = source.find(';').unwrap();
        let error = ParseError::new(
            vec![Spanned::new(
                ParseErrorItem::Expected {
                    msg: "Expected expression after '='".to_string(),
                    found: ";".to_string(),
                },
                Span::new(start, start + 1),
            )],
            Some("A.java".to_string()),
        );

        assert_eq!(error.lines(source), vec![2]);
        let expected = format!(
            "A.java: line 2: syntax error: Expected expression after '=', found ';'\n{}\n{}\n",
            "      int x = ;",
            format!("{}^", " ".repeat(14)),
        );

        assert_eq!(error.render(source), expected);
    }

    #[test]
    fn lex_errors_display_their_cause() {
        let item = ParseErrorItem::LexError(LexError::UnclosedString);

        assert_eq!(item.to_string(), "Unclosed string");
    }
}
