mod decl;
mod error;
mod expr;
mod lexer;
mod spanned;
mod stmt;
mod token;

pub use decl::{
    ClassDecl, CompilationUnit, Import, Member, MethodDecl, MethodKind, Param, TypeName,
    VarDeclarator,
};
pub use error::{ParseError, ParseErrorItem};
pub use expr::{Expr, Literal, Name};
pub use lexer::{LexError, Lexer};
pub use spanned::{line_number, retrieve_span_snippet, Span, SpanSnippet, Spanned};
pub use stmt::{Block, CatchClause, Stmt, SwitchGroup, SwitchLabel};
pub use token::{Ctrl, KeyWord, Token};

use decl::compilation_unit;

use std::rc::{Rc, Weak};
use std::cell::OnceCell;

pub fn parse_program(input: &str, path: Option<String>) -> Result<CompilationUnit, ParseError> {
    compilation_unit()
        .closed_by(ctrl(Ctrl::End).expect("Expected a class declaration"))
        .parse_str(input)
        .and_then(|unit| {
            // only reachable when the grammar bailed out without recording why
            unit.ok_or_else(|| ParseError::new(vec![], None))
        })
        .map_err(|mut err| {
            err.set_path(path);
            err
        })
}

struct ParseContext<'a> {
    lexer: Lexer<'a>,
    errors: Vec<Spanned<ParseErrorItem>>,
    last_end: usize,
}

impl<'a> ParseContext<'a> {
    fn peek(&mut self) -> Option<Spanned<Token>> {
        match self.lexer.peek() {
            Err(lex_error) => {
                // the lexer has already moved past the bad input
                let parse_error = lex_error.map(ParseErrorItem::LexError);
                self.add_err(parse_error);
                None
            }
            Ok(spanned_token) => Some(spanned_token),
        }
    }

    fn adv(&mut self) {
        if let Ok(token) = self.lexer.get_token() {
            self.last_end = token.span.end;
        } else {
            self.last_end = self.lexer.pos();
        }
    }

    fn peek_nth(&mut self, n: usize) -> Option<Token> {
        self.lexer.peek_nth(n).ok().map(|token| token.item)
    }

    fn add_err(&mut self, err: Spanned<ParseErrorItem>) {
        self.errors.push(err);
    }

    fn eof(&self) -> bool {
        self.lexer.eof()
    }
}

#[derive(Clone)]
struct Parser<'a, T> {
    func: Rc<dyn Fn(&mut ParseContext<'a>) -> Option<T> + 'a>,
}

impl<'a, T: 'a> Parser<'a, T> {
    pub fn new(func: impl Fn(&mut ParseContext<'a>) -> Option<T> + 'a) -> Self {
        Self {
            func: Rc::new(func),
        }
    }

    pub fn parse_str(self, input: &'a str) -> Result<Option<T>, ParseError> {
        let lexer = Lexer::new(input);

        let mut ctx = ParseContext {
            lexer,
            errors: vec![],
            last_end: 0,
        };

        let value = self.parse(&mut ctx);

        if ctx.errors.is_empty() {
            Ok(value)
        } else {
            Err(ParseError::new(ctx.errors, None))
        }
    }

    fn parse(&self, ctx: &mut ParseContext<'a>) -> Option<T> {
        (self.func)(ctx)
    }

    pub fn then<A: 'a>(self, then: Parser<'a, A>) -> Parser<'a, A> {
        Parser::new(move |ctx: &mut ParseContext<'a>| {
            if self.parse(ctx).is_some() {
                then.parse(ctx)
            } else {
                None
            }
        })
    }

    pub fn append<A: 'a>(self, then: Parser<'a, A>) -> Parser<'a, (T, A)> {
        Parser::new(move |ctx: &mut ParseContext<'a>| {
            let first = self.parse(ctx)?;
            let second = then.parse(ctx)?;

            Some((first, second))
        })
    }

    pub fn closed_by<A: 'a>(self, then: Parser<'a, A>) -> Parser<'a, T> {
        Parser::new(move |ctx: &mut ParseContext<'a>| {
            let first = self.parse(ctx)?;
            let _ = then.parse(ctx)?;

            Some(first)
        })
    }

    pub fn expect(self, error_msg: &'static str) -> Parser<'a, T> {
        Parser::new(move |ctx| {
            let error_count = ctx.errors.len();

            if let Some(result) = self.parse(ctx) {
                Some(result)
            } else if ctx.errors.len() > error_count {
                None
            } else {
                // a lex error was already recorded for this position
                let span = ctx.peek()?.span;
                let error = ParseErrorItem::Expected {
                    msg: error_msg.to_string(),
                    found: found_text(ctx.lexer.get_input(), span),
                };

                ctx.add_err(Spanned::new(error, span));
                None
            }
        })
    }

    /// Tries `alternative` only when `self` failed without reporting an error.
    pub fn or(self, alternative: Parser<'a, T>) -> Parser<'a, T> {
        Parser::new(move |ctx| {
            let error_count = ctx.errors.len();

            if let Some(value) = self.parse(ctx) {
                Some(value)
            } else if ctx.errors.len() > error_count {
                None
            } else {
                alternative.parse(ctx)
            }
        })
    }

    /// On failure, skips tokens up to and including the next `ctrl_recover`
    /// and tries again. Stops before a closing curly so the enclosing block
    /// can still see it.
    pub fn recover(self, ctrl_recover: Ctrl) -> Parser<'a, T> {
        Parser::new(move |ctx| {
            if let Some(value) = self.parse(ctx) {
                Some(value)
            } else {
                loop {
                    if ctx.eof() || at_ctrl(ctx, Ctrl::RightCurly) {
                        break;
                    }

                    match ctrl(ctrl_recover).parse(ctx) {
                        Some(_) => {
                            if let Some(value) = self.parse(ctx) {
                                return Some(value);
                            }
                        }
                        None => ctx.adv(),
                    }
                }

                None
            }
        })
    }

    pub fn zero_or_more(self) -> Parser<'a, Vec<T>> {
        Parser::new(move |ctx| {
            let mut values = vec![];

            while let Some(value) = self.parse(ctx) {
                values.push(value);
            }

            Some(values)
        })
    }

    pub fn optional(self) -> Parser<'a, Option<T>> {
        Parser::new(move |ctx| Some(self.parse(ctx)))
    }

    pub fn map<C: 'a, N: 'a>(self, callback: C) -> Parser<'a, N>
    where
        C: Fn(T) -> N,
    {
        Parser::new(move |ctx| self.parse(ctx).map(&callback))
    }

    pub fn mix<B: 'a, C: 'a, D: 'a>(self, other: Parser<'a, B>, callback: C) -> Parser<'a, D>
    where
        C: Fn(T, Option<B>) -> Option<D>,
    {
        Parser::new(move |ctx| {
            if let Some(result) = self.parse(ctx) {
                callback(result, other.parse(ctx))
            } else {
                None
            }
        })
    }

    /// Runs the parser only when `guard` accepts the upcoming tokens.
    pub fn when(self, guard: fn(&mut ParseContext<'a>) -> bool) -> Parser<'a, T> {
        Parser::new(move |ctx| if guard(ctx) { self.parse(ctx) } else { None })
    }

    pub fn spanned(self) -> Parser<'a, Spanned<T>> {
        span(self)
    }

    pub fn delimited<A: 'a, B: 'a>(
        self,
        left: Parser<'a, A>,
        right: Parser<'a, B>,
    ) -> Parser<'a, T> {
        Parser::new(move |ctx| {
            let _ = left.parse(ctx)?;
            let result = self.parse(ctx)?;
            let _ = right.parse(ctx)?;

            Some(result)
        })
    }

    pub fn delimited_list<A: 'a>(self, delimiter: Parser<'a, A>) -> Parser<'a, Vec<T>> {
        Parser::new(move |ctx| {
            let mut items = vec![];

            let first = self.parse(ctx)?;
            items.push(first);

            while delimiter.parse(ctx).is_some() {
                if let Some(next) = self.parse(ctx) {
                    items.push(next);
                } else {
                    break;
                }
            }

            Some(items)
        })
    }
}

fn found_text(input: &str, span: Span) -> String {
    if span.start >= input.len() {
        Ctrl::End.as_str().to_string()
    } else {
        input[span.start..span.end].to_string()
    }
}

fn nothing<'a>() -> Parser<'a, ()> {
    Parser::new(move |_| Some(()))
}

fn at_ctrl(ctx: &mut ParseContext<'_>, expected: Ctrl) -> bool {
    matches!(ctx.peek().map(|t| t.item), Some(Token::Ctrl(c)) if c == expected)
}

fn ctrl<'a>(expected: Ctrl) -> Parser<'a, ()> {
    Parser::new(move |ctx| match ctx.peek() {
        Some(spanned_token) => match spanned_token.item {
            Token::Ctrl(ctrl) if ctrl == expected => {
                ctx.adv();
                Some(())
            }
            _ => None,
        },
        None => None,
    })
}

fn keyword<'a>(expected: KeyWord) -> Parser<'a, ()> {
    Parser::new(move |ctx| match ctx.peek() {
        Some(spanned_token) => match spanned_token.item {
            Token::KeyWord(keyword) if keyword == expected => {
                ctx.adv();
                Some(())
            }
            _ => None,
        },
        None => None,
    })
}

fn modifier<'a>() -> Parser<'a, KeyWord> {
    Parser::new(move |ctx| match ctx.peek() {
        Some(spanned_token) => match spanned_token.item {
            Token::KeyWord(keyword) if keyword.is_modifier() => {
                ctx.adv();
                Some(keyword)
            }
            _ => None,
        },
        None => None,
    })
}

fn symbol<'a>() -> Parser<'a, String> {
    Parser::new(|ctx| match ctx.peek() {
        Some(spanned_token) => match spanned_token.item {
            Token::Ident(name) => {
                ctx.adv();
                Some(name)
            }
            _ => None,
        },
        None => None,
    })
}

fn block(sp: Parser<'_, Spanned<Stmt>>) -> Parser<'_, Block> {
    let left_curly = ctrl(Ctrl::LeftCurly);
    let right_curly = ctrl(Ctrl::RightCurly).expect("Expected '}', found something else");
    let items = sp.recover(Ctrl::SemiColon).zero_or_more();

    items.delimited(left_curly, right_curly)
}

fn recursive<'a, T>(func: impl Fn(Parser<'a, T>) -> Parser<'a, T> + 'a) -> Parser<'a, T>
where
    T: 'a,
{
    let cell: Rc<OnceCell<Parser<'a, T>>> = Rc::new(OnceCell::new());
    let weak: Weak<OnceCell<Parser<'a, T>>> = Rc::downgrade(&cell);

    // the inner handle is weak so the grammar does not own itself
    let inner = Parser::new(move |ctx| {
        let cell = weak.upgrade()?;
        let parser = cell.get()?;

        parser.parse(ctx)
    });

    let _ = cell.set(func(inner));

    Parser::new(move |ctx| cell.get()?.parse(ctx))
}

fn span<'a, T: 'a>(func: Parser<'a, T>) -> Parser<'a, Spanned<T>> {
    Parser::new(move |ctx| {
        let start = ctx.peek()?.span.start;
        let result: Option<T> = func.parse(ctx);
        let end = ctx.last_end.max(start);

        result.map(|value| Spanned::new(value, Span::new(start, end)))
    })
}
