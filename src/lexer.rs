use std::fmt;

use crate::token::{Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Unterminated double-quoted string. A newline inside the quotes
    /// also ends the line and reports this.
    UnterminatedString,
    /// Control byte that cannot appear in a line.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated quoted string")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {}", ch.escape_default())
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at column {}", span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize one input line into a sequence of tokens.
///
/// Whitespace separates tokens and is otherwise discarded; a trailing
/// newline is tolerated. `=` is always its own token. Double-quoted
/// strings may contain whitespace and `=` and support the escapes
/// `\"`, `\\`, `\n`, `\t`, and `\r`.
///
/// # Errors
///
/// Returns `LexError` on an unterminated quoted string or a control
/// byte outside quotes.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    const fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            col: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while self.pos < self.input.len() {
            let ch = self.input[self.pos];

            match ch {
                b' ' | b'\t' => {
                    self.advance();
                }
                // A line arrives newline-stripped; tolerate one anyway.
                b'\r' | b'\n' => {
                    self.advance();
                }
                b'=' => {
                    tokens.push(self.make_token(TokenKind::Equals, "=".to_string()));
                    self.advance();
                }
                b'"' => {
                    tokens.push(self.read_quoted_string()?);
                }
                c if c.is_ascii_control() => {
                    return Err(LexError {
                        kind: LexErrorKind::UnexpectedCharacter(char::from(c)),
                        span: self.span(),
                    });
                }
                _ => {
                    tokens.push(self.read_word());
                }
            }
        }

        Ok(tokens)
    }

    const fn span(&self) -> Span {
        Span { column: self.col }
    }

    const fn make_token(&self, kind: TokenKind, text: String) -> Token {
        Token {
            kind,
            text,
            span: self.span(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    const fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
            self.col += 1;
        }
    }

    fn read_quoted_string(&mut self) -> Result<Token, LexError> {
        let start_col = self.col;
        self.advance(); // skip opening quote

        let mut value: Vec<u8> = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedString,
                        span: Span { column: start_col },
                    });
                }
                Some(b'\\') => {
                    self.advance();
                    match self.peek() {
                        Some(b'n') => {
                            value.push(b'\n');
                            self.advance();
                        }
                        Some(b't') => {
                            value.push(b'\t');
                            self.advance();
                        }
                        Some(b'r') => {
                            value.push(b'\r');
                            self.advance();
                        }
                        Some(b'"') => {
                            value.push(b'"');
                            self.advance();
                        }
                        Some(b'\\') => {
                            value.push(b'\\');
                            self.advance();
                        }
                        Some(c) => {
                            value.push(b'\\');
                            value.push(c);
                            self.advance();
                        }
                        None => {
                            value.push(b'\\');
                        }
                    }
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Ok(Token {
            kind: TokenKind::QuotedString,
            text: String::from_utf8_lossy(&value).into_owned(),
            span: Span { column: start_col },
        })
    }

    fn read_word(&mut self) -> Token {
        let start_col = self.col;
        let start = self.pos;

        while self.pos < self.input.len() {
            match self.input[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' | b'=' | b'"' => break,
                _ => self.advance(),
            }
        }

        Token {
            kind: TokenKind::Word,
            text: String::from_utf8_lossy(&self.input[start..self.pos]).into_owned(),
            span: Span { column: start_col },
        }
    }
}
