#[derive(Clone, Debug, PartialEq)]
pub struct Spanned<T> {
    pub item: T,
    pub span: Span,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

pub struct SpanSnippet {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub source_line: String,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl<T> Spanned<T> {
    pub fn new(item: T, span: Span) -> Self {
        Self { item, span }
    }

    pub fn get_span(&self) -> Span {
        self.span
    }

    pub fn map<F, B>(self, f: F) -> Spanned<B>
    where
        F: Fn(T) -> B,
    {
        let span = self.span;
        let item = f(self.item);

        Spanned { item, span }
    }
}

/// 1-based line number of the byte offset `pos` in `source`.
pub fn line_number(source: &str, pos: usize) -> usize {
    let pos = pos.min(source.len());

    source.as_bytes()[..pos].iter().filter(|b| **b == b'\n').count() + 1
}

pub fn retrieve_span_snippet(source: &str, span: Span) -> Option<SpanSnippet> {
    let mut offset = 0;

    for (i, line) in source.lines().enumerate() {
        let line_len = line.len() + 1; // +1 for '\n'
        let line_start = offset;
        let line_end = offset + line_len;

        if span.start >= line_start && span.start < line_end {
            let col_start = span.start - line_start;
            let col_end = span.end.min(line_end - 1).max(span.start) - line_start;

            return Some(SpanSnippet {
                line: i + 1,
                start: col_start,
                end: col_end,
                source_line: line.to_string(),
            });
        }

        offset = line_end;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_count_newlines_before_offset() {
        let source = "int a;\nint b;\n\nint c;\n";

        assert_eq!(line_number(source, 0), 1);
        assert_eq!(line_number(source, 7), 2);
        assert_eq!(line_number(source, 15), 4);
        assert_eq!(line_number(source, 10_000), 5);
    }

    #[test]
    fn snippet_for_second_line() {
        let source = "class A {\n  int x = y;\n}\n";
        let start = source.find('y').unwrap();
        let snippet = retrieve_span_snippet(source, Span::new(start, start + 1)).unwrap();

        assert_eq!(snippet.line, 2);
        assert_eq!(snippet.source_line, "  int x = y;");
        assert_eq!(snippet.start, 10);
        assert_eq!(snippet.end, 11);
    }

    #[test]
    fn snippet_out_of_bounds() {
        assert!(retrieve_span_snippet("a", Span::new(10, 11)).is_none());
    }

    #[test]
    fn join_covers_both_spans() {
        assert_eq!(Span::new(4, 6).join(Span::new(1, 3)), Span::new(1, 6));
    }
}
