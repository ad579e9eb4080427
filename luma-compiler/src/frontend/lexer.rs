use logos::Logos;
use std::fmt;

use crate::source::{Range, SourceFile, Text};

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[logos(skip r"[ \t\r\n\x0b\x0c]+")] // Whitespace
#[logos(skip r"--[^\n]*")] // Line comments starting with '--'
pub enum Token {
    // --- Keywords ---
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("end")]
    End,

    // --- Identifiers and numbers ---
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    // Digits with at most one embedded dot, or a leading dot. Conversion to
    // f64 happens in the parser so malformed lexemes (a lone '.') get a
    // proper diagnostic there.
    #[regex(r"[0-9]+\.?[0-9]*|\.[0-9]*")]
    Number,

    // --- Punctuation ---
    #[token("=")]
    Equal,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    // Any other character. Never reported here; the parser rejects it.
    #[regex(r".", priority = 0)]
    Invalid,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Token::Function => "'function'",
            Token::Return => "'return'",
            Token::End => "'end'",
            Token::Identifier => "identifier",
            Token::Number => "number",
            Token::Equal => "'='",
            Token::Comma => "','",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Invalid => "invalid token",
        };
        f.write_str(name)
    }
}

/// One-token window over the token stream.
///
/// `current()` is `None` once the input is exhausted; advancing past the end
/// stays there, with a zero-width range at the end of the buffer.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Token>,
    current: Option<Token>,
    range: Range,
}

impl<'src> Lexer<'src> {
    pub fn new(file: &'src SourceFile) -> Self {
        let mut lexer = Self {
            inner: Token::lexer(file.text()),
            current: None,
            range: Range::new(0, 0),
        };
        lexer.advance();
        lexer
    }

    pub fn current(&self) -> Option<Token> {
        self.current
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// The current token's lexeme as a borrowed slice.
    pub fn text(&self) -> Text<'src> {
        Text {
            text: &self.inner.source()[self.range.start..self.range.end],
            range: self.range,
        }
    }

    pub fn at(&self, token: Token) -> bool {
        self.current == Some(token)
    }

    pub fn at_eof(&self) -> bool {
        self.current.is_none()
    }

    pub fn advance(&mut self) {
        match self.inner.next() {
            Some(Ok(token)) => {
                self.current = Some(token);
                let span = self.inner.span();
                self.range = Range::new(span.start, span.end);
            }
            Some(Err(())) => {
                self.current = Some(Token::Invalid);
                let span = self.inner.span();
                self.range = Range::new(span.start, span.end);
            }
            None => {
                self.current = None;
                let end = self.inner.source().len();
                self.range = Range::new(end, end);
            }
        }
    }
}
