use super::spanned::{Span, Spanned};
use super::token::{Ctrl, KeyWord, Token};
use core::iter::Peekable;
use core::str::Chars;
use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Debug, Error)]
pub enum LexError {
    #[error("Unexpected character")]
    Unknown,
    #[error("Unclosed string")]
    UnclosedString,
    #[error("Unclosed character literal")]
    UnclosedChar,
    #[error("Unclosed multi line comment")]
    UnclosedComment,
    #[error("Invalid number")]
    InvalidNumber,
    #[error("Invalid escape sequence")]
    InvalidEscape,
}

pub struct Lexer<'a> {
    peek: Option<Spanned<Token>>,
    chars: Peekable<Chars<'a>>,
    input: &'a str,
    pos: usize,
    eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            peek: None,
            pos: 0,
            eof: false,
        }
    }

    pub fn get_token(&mut self) -> Result<Spanned<Token>, Spanned<LexError>> {
        if let Some(token) = self.peek.take() {
            return Ok(token);
        }

        if self.eof {
            return Ok(Spanned::new(self.end_token(), Span::new(self.pos, self.pos)));
        }

        self.lex_token()
    }

    pub fn peek(&mut self) -> Result<Spanned<Token>, Spanned<LexError>> {
        if let Some(token) = &self.peek {
            return Ok(token.clone());
        }

        if self.eof {
            return Ok(Spanned::new(self.end_token(), Span::new(self.pos, self.pos)));
        }

        let peek = self.lex_token()?;
        self.peek = Some(peek.clone());

        Ok(peek)
    }

    // 0 is equivalent to peek(), 1 would be the token after peek() and so on
    pub fn peek_nth(&mut self, mut n: usize) -> Result<Spanned<Token>, Spanned<LexError>> {
        if n == 0 {
            return self.peek();
        }

        let starting_pos = self.pos;
        let eof = self.eof;

        // if peek is     present we lex n     tokens
        // if peek is NOT present we lex n + 1 tokens
        if self.peek.is_none() {
            n += 1;
        }

        for _ in 1..n {
            let _ = self.lex_token();
        }

        let token = if self.eof {
            Ok(Spanned::new(self.end_token(), Span::new(self.pos, self.pos)))
        } else {
            self.lex_token()
        };

        // rewind to where we started
        self.eof = eof;
        self.pos = starting_pos;
        self.reset_iter();

        token
    }

    /// Byte offset just past the last consumed token.
    pub fn pos(&self) -> usize {
        match &self.peek {
            Some(token) => token.span.start,
            None => self.pos,
        }
    }

    pub fn eof(&self) -> bool {
        self.peek.is_none() && (self.pos >= self.input.len() || self.eof)
    }

    pub fn get_input(&self) -> &'a str {
        self.input
    }

    fn lex_token(&mut self) -> Result<Spanned<Token>, Spanned<LexError>> {
        self.skip_ignored_input()?;

        let start = self.pos;
        let result = self.lex_token_inner();
        let end = self.pos;
        let span = Span::new(start, end);

        match result {
            Ok(token) => Ok(Spanned::new(token, span)),
            Err(err) => Err(Spanned::new(err, span)),
        }
    }

    fn lex_token_inner(&mut self) -> Result<Token, LexError> {
        if self.chars.peek().is_none() {
            self.eof = true;

            return Ok(self.end_token());
        }

        if let Some(token) = self.lex_ident_or_keyword() {
            return Ok(token);
        }

        if let Some(token) = self.lex_num()? {
            return Ok(token);
        }

        if let Some(token) = self.lex_string()? {
            return Ok(token);
        }

        if let Some(token) = self.lex_char()? {
            return Ok(token);
        }

        if let Some(token) = self.lex_ctrl() {
            return Ok(token);
        }

        self.advance();

        Err(LexError::Unknown)
    }

    fn skip_ignored_input(&mut self) -> Result<(), Spanned<LexError>> {
        loop {
            if !self.lex_whitespace() && !self.lex_comment()? {
                return Ok(());
            }
        }
    }

    fn lex_whitespace(&mut self) -> bool {
        match self.chars.peek() {
            Some(c) if c.is_whitespace() => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn lex_comment(&mut self) -> Result<bool, Spanned<LexError>> {
        if self.read('/') {
            if self.read('/') {
                self.read_until('\n');
                return Ok(true);
            }

            if self.read('*') {
                let start = self.pos - 2;

                loop {
                    self.read_until('*');
                    if self.advance().is_none() {
                        return Err(Spanned::new(
                            LexError::UnclosedComment,
                            Span::new(start, self.pos),
                        ));
                    }

                    if self.read('/') {
                        return Ok(true);
                    }
                }
            }

            // Go back! this might be a dividing op '/'
            self.pos -= 1;
            self.reset_iter();
        }

        Ok(false)
    }

    fn lex_ident_or_keyword(&mut self) -> Option<Token> {
        match self.chars.peek() {
            Some(c) if c.is_alphabetic() || *c == '_' || *c == '$' => {}
            _ => return None,
        }

        let word = self.lex_word();

        Some(match KeyWord::from_word(word) {
            Some(keyword) => Token::KeyWord(keyword),
            None => Token::Ident(word.to_string()),
        })
    }

    fn lex_word(&mut self) -> &'a str {
        let starting_pos = self.pos;

        while let Some(p) = self.chars.peek() {
            if p.is_alphanumeric() || *p == '_' || *p == '$' {
                self.advance();
            } else {
                break;
            }
        }

        &self.input[starting_pos..self.pos]
    }

    fn lex_num(&mut self) -> Result<Option<Token>, LexError> {
        match self.chars.peek() {
            Some(p) if p.is_ascii_digit() => {}
            _ => return Ok(None),
        }

        let start_pos = self.pos;

        if self.read('0') {
            if self.read('x') || self.read('X') {
                return self.lex_radix_int(16).map(Some);
            }

            if self.read('b') || self.read('B') {
                return self.lex_radix_int(2).map(Some);
            }
        }

        let mut is_float = false;

        self.read_digits(10);

        if self.peek_is('.') && self.peek_second_is_digit() {
            is_float = true;
            self.advance();
            self.read_digits(10);
        }

        if self.peek_is('e') || self.peek_is('E') {
            is_float = true;
            self.advance();

            if !self.read('+') {
                self.read('-');
            }

            if !self.read_digits(10) {
                return Err(LexError::InvalidNumber);
            }
        }

        let mut digits_end = self.pos;

        if self.read('f') || self.read('F') {
            // the float suffix stays in the lexeme to keep its type
            is_float = true;
            digits_end = self.pos;
        } else if self.read('d') || self.read('D') {
            is_float = true;
        } else if !is_float {
            // long suffix, the lexeme keeps the digits only
            let _ = self.read('l') || self.read('L');
        }

        self.expect_number_end()?;

        let raw = &self.input[start_pos..digits_end];
        let lexeme = strip_underscores(raw, 10)?;

        if is_float {
            return Ok(Some(Token::Float(lexeme)));
        }

        // a leading zero makes an octal literal
        let radix = if lexeme.len() > 1 && lexeme.starts_with('0') { 8 } else { 10 };

        int_token(&lexeme, radix).map(Some)
    }

    /// Reads the digits after a `0x` or `0b` prefix. The lexeme is
    /// normalized to decimal.
    fn lex_radix_int(&mut self, radix: u32) -> Result<Token, LexError> {
        let start_pos = self.pos;

        if !self.read_digits(radix) {
            return Err(LexError::InvalidNumber);
        }

        let digits_end = self.pos;
        let _ = self.read('l') || self.read('L');

        self.expect_number_end()?;

        let digits = strip_underscores(&self.input[start_pos..digits_end], radix)?;

        int_token(&digits, radix)
    }

    fn expect_number_end(&mut self) -> Result<(), LexError> {
        match self.chars.peek() {
            Some(p) if p.is_alphanumeric() || *p == '_' => Err(LexError::InvalidNumber),
            _ => Ok(()),
        }
    }

    fn read_digits(&mut self, radix: u32) -> bool {
        let mut found = false;

        while let Some(p) = self.chars.peek() {
            if p.is_digit(radix) {
                self.advance();
                found = true;
            } else if *p == '_' && found {
                self.advance();
            } else {
                break;
            }
        }

        found
    }

    fn lex_string(&mut self) -> Result<Option<Token>, LexError> {
        if !self.read('"') {
            return Ok(None);
        }

        let contents = self.lex_quoted('"', LexError::UnclosedString)?;

        Ok(Some(Token::String(contents)))
    }

    fn lex_char(&mut self) -> Result<Option<Token>, LexError> {
        if !self.read('\'') {
            return Ok(None);
        }

        let contents = self.lex_quoted('\'', LexError::UnclosedChar)?;

        if contents.chars().count() != 1 {
            return Err(LexError::UnclosedChar);
        }

        Ok(Some(Token::Char(contents)))
    }

    fn lex_quoted(&mut self, delimiter: char, unclosed: LexError) -> Result<String, LexError> {
        let mut result = String::new();

        loop {
            match self.advance() {
                None | Some('\n') => return Err(unclosed),
                Some(c) if c == delimiter => return Ok(result),
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('0') => '\0',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some(_) => return Err(LexError::InvalidEscape),
                        None => return Err(unclosed),
                    };

                    result.push(escaped);
                }
                Some(c) => result.push(c),
            }
        }
    }

    fn lex_ctrl(&mut self) -> Option<Token> {
        let c = *self.chars.peek()?;

        let ctrl = match c {
            '=' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::DoubleEqual)], Ctrl::Equal));
            }
            '!' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::NotEqual)], Ctrl::Not));
            }
            '|' => {
                self.advance();
                return Some(
                    self.lex_ctrl_suffix(&[('|', Ctrl::Or), ('=', Ctrl::PipeEqual)], Ctrl::Pipe),
                );
            }
            '&' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(
                    &[('&', Ctrl::And), ('=', Ctrl::AmpersandEqual)],
                    Ctrl::Ampersand,
                ));
            }
            '+' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(
                    &[('+', Ctrl::Increment), ('=', Ctrl::PlusEqual)],
                    Ctrl::Plus,
                ));
            }
            '-' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(
                    &[('-', Ctrl::Decrement), ('=', Ctrl::MinusEqual)],
                    Ctrl::Minus,
                ));
            }
            '*' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::MultiplyEqual)], Ctrl::Multiply));
            }
            '/' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::DivideEqual)], Ctrl::Divide));
            }
            '%' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::ModuloEqual)], Ctrl::Modulo));
            }
            '^' => {
                self.advance();
                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::CarrotEqual)], Ctrl::Carrot));
            }
            '<' => {
                self.advance();

                if self.read('<') {
                    return Some(
                        self.lex_ctrl_suffix(&[('=', Ctrl::ShiftLeftEqual)], Ctrl::ShiftLeft),
                    );
                }

                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::Lte)], Ctrl::Lt));
            }
            '>' => {
                self.advance();

                if self.read('>') {
                    return Some(
                        self.lex_ctrl_suffix(&[('=', Ctrl::ShiftRightEqual)], Ctrl::ShiftRight),
                    );
                }

                return Some(self.lex_ctrl_suffix(&[('=', Ctrl::Gte)], Ctrl::Gt));
            }
            '(' => Ctrl::LeftParen,
            ')' => Ctrl::RightParen,
            '[' => Ctrl::LeftBracket,
            ']' => Ctrl::RightBracket,
            '{' => Ctrl::LeftCurly,
            '}' => Ctrl::RightCurly,
            ':' => Ctrl::Colon,
            '?' => Ctrl::Question,
            ';' => Ctrl::SemiColon,
            ',' => Ctrl::Comma,
            '.' => Ctrl::Period,
            '~' => Ctrl::Tilde,
            _ => return None,
        };

        self.advance();

        Some(Token::Ctrl(ctrl))
    }

    fn lex_ctrl_suffix(&mut self, suffixes: &[(char, Ctrl)], fallback: Ctrl) -> Token {
        for (c, ctrl) in suffixes.iter() {
            if self.read(*c) {
                return Token::Ctrl(*ctrl);
            }
        }

        Token::Ctrl(fallback)
    }

    fn peek_is(&mut self, c: char) -> bool {
        self.chars.peek() == Some(&c)
    }

    fn peek_second_is_digit(&self) -> bool {
        let mut rest = self.input[self.pos..].chars();
        rest.next();

        matches!(rest.next(), Some(c) if c.is_ascii_digit())
    }

    fn read(&mut self, c: char) -> bool {
        if self.peek_is(c) {
            self.advance();
            return true;
        }

        false
    }

    fn read_until(&mut self, c: char) {
        while let Some(peek) = self.chars.peek() {
            if *peek == c {
                break;
            } else {
                self.advance();
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();

        Some(c)
    }

    fn reset_iter(&mut self) {
        self.chars = self.input[self.pos..].chars().peekable();
    }

    fn end_token(&self) -> Token {
        Token::Ctrl(Ctrl::End)
    }
}

/// Drops digit separators. A separator must sit between two digits.
fn strip_underscores(raw: &str, radix: u32) -> Result<String, LexError> {
    let chars: Vec<char> = raw.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if *c != '_' {
            continue;
        }

        let before = chars[..i].iter().rev().find(|c| **c != '_');
        let after = chars[i + 1..].iter().find(|c| **c != '_');

        match (before, after) {
            (Some(b), Some(a)) if b.is_digit(radix) && a.is_digit(radix) => {}
            _ => return Err(LexError::InvalidNumber),
        }
    }

    Ok(raw.chars().filter(|c| *c != '_').collect())
}

fn int_token(digits: &str, radix: u32) -> Result<Token, LexError> {
    i64::from_str_radix(digits, radix)
        .map(|value| Token::Int(value.to_string()))
        .map_err(|_| LexError::InvalidNumber)
}
