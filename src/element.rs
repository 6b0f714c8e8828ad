use crate::format::{ParseErrorKind, RecordWrapper};
use crate::token::{Token, TokenKind};

/// Cursor over the tokens of one line.
///
/// Single consumer per parse; elements remove tokens from the front
/// and a successful parse must leave the stream empty.
#[derive(Debug)]
pub(crate) struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    pub(crate) const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn pop(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// One unit of a line format.
///
/// Each variant consumes a bounded prefix of the stream and records
/// its content through the wrapper, or fails with a structural error.
/// Elements hold configuration only and are never mutated by a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormatElement {
    /// Consume and discard one exact keyword token.
    Literal { keyword: String },
    /// Consume `keyword`, `=`, and one value token; write the value
    /// under `field`. When not `mandatory`, an absent keyword is a
    /// no-op that consumes nothing.
    Field {
        keyword: String,
        field: String,
        mandatory: bool,
    },
    /// Consume every remaining token and write their texts joined by
    /// single spaces under `field`. Writes nothing when the stream is
    /// already empty.
    Remainder { field: String },
}

impl FormatElement {
    /// Drive this element against the stream.
    ///
    /// At most one wrapper write per call, and only on success; a
    /// failing element leaves no partial write behind. There is no
    /// backtracking: once a keyword is consumed, the rest of the
    /// element's shape must follow.
    pub(crate) fn consume<W: RecordWrapper>(
        &self,
        stream: &mut TokenStream<'_>,
        wrapper: &mut W,
    ) -> Result<(), ParseErrorKind> {
        match self {
            Self::Literal { keyword } => Self::expect_keyword(stream, keyword),
            Self::Field {
                keyword,
                field,
                mandatory,
            } => {
                if !keyword_is_next(stream, keyword) {
                    if *mandatory {
                        return Err(ParseErrorKind::ExpectedKeyword {
                            keyword: keyword.clone(),
                            found: stream.peek().map(|t| t.text.clone()),
                        });
                    }
                    return Ok(());
                }
                stream.pop();
                Self::expect_equals(stream, keyword)?;
                let value = Self::expect_value(stream, keyword)?;
                wrapper.set(field, value);
                Ok(())
            }
            Self::Remainder { field } => {
                if stream.is_empty() {
                    return Ok(());
                }
                let mut parts = Vec::with_capacity(stream.remaining());
                while let Some(token) = stream.pop() {
                    parts.push(token.text.as_str());
                }
                wrapper.set(field, &parts.join(" "));
                Ok(())
            }
        }
    }

    fn expect_keyword(stream: &mut TokenStream<'_>, keyword: &str) -> Result<(), ParseErrorKind> {
        if keyword_is_next(stream, keyword) {
            stream.pop();
            Ok(())
        } else {
            Err(ParseErrorKind::ExpectedKeyword {
                keyword: keyword.to_string(),
                found: stream.peek().map(|t| t.text.clone()),
            })
        }
    }

    fn expect_equals(stream: &mut TokenStream<'_>, keyword: &str) -> Result<(), ParseErrorKind> {
        match stream.pop() {
            Some(token) if token.kind == TokenKind::Equals => Ok(()),
            other => Err(ParseErrorKind::ExpectedEquals {
                keyword: keyword.to_string(),
                found: other.map(|t| t.text.clone()),
            }),
        }
    }

    fn expect_value<'a>(
        stream: &mut TokenStream<'a>,
        keyword: &str,
    ) -> Result<&'a str, ParseErrorKind> {
        match stream.pop() {
            Some(token) if matches!(token.kind, TokenKind::Word | TokenKind::QuotedString) => {
                Ok(&token.text)
            }
            other => Err(ParseErrorKind::ExpectedValue {
                keyword: keyword.to_string(),
                found: other.map(|t| t.text.clone()),
            }),
        }
    }
}

fn keyword_is_next(stream: &TokenStream<'_>, keyword: &str) -> bool {
    stream
        .peek()
        .is_some_and(|t| t.kind == TokenKind::Word && t.text == keyword)
}
