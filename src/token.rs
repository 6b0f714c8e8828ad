/// Source location for error reporting.
///
/// Input is a single line, so only the 1-based column is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub column: usize,
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted word (keyword or bare value).
    Word,
    /// Double-quoted string (`"..."`), escapes resolved.
    QuotedString,
    /// Key/value separator `=`.
    Equals,
}

/// A single token with its kind, text, and source location.
///
/// For `QuotedString` the text is the string content with quotes
/// stripped and escape sequences resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
