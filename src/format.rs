use std::fmt;

use crate::element::{FormatElement, TokenStream};
use crate::lexer::{self, LexError};

/// Write access to an in-progress output record, keyed by field name.
///
/// One implementation per concrete record shape; the driver and the
/// format elements only ever see this trait, never the record itself.
/// A wrapper instance belongs to exactly one parse call.
pub trait RecordWrapper {
    /// Record the value parsed for `field`.
    fn set(&mut self, field: &str, value: &str);
}

/// Contextual defaults supplied by the caller alongside each line.
///
/// These are not parsed from the line. `default_source` fills the
/// source field of a record whose line did not set it; `customer_id`
/// and `tag_keywords` identify the tenant and its recognized tag
/// keywords for formats that care about them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    pub default_source: Option<String>,
    pub customer_id: Option<String>,
    pub tag_keywords: Vec<String>,
}

/// Classifies a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The line is not lexically well-formed.
    Lex(LexError),
    /// A mandatory keyword is missing or out of place.
    ExpectedKeyword {
        keyword: String,
        found: Option<String>,
    },
    /// A keyword is not followed by `=`.
    ExpectedEquals {
        keyword: String,
        found: Option<String>,
    },
    /// A keyword and `=` are not followed by a value token.
    ExpectedValue {
        keyword: String,
        found: Option<String>,
    },
    /// Tokens remain after every element has run.
    TrailingTokens { first: String, count: usize },
    /// A required field is absent or empty.
    MissingField { field: String },
    /// A field's value is outside its enumerated set.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(e) => write!(f, "{e}"),
            Self::ExpectedKeyword {
                keyword,
                found: None,
            } => {
                write!(f, "expected keyword '{keyword}', reached end of line")
            }
            Self::ExpectedKeyword {
                keyword,
                found: Some(found),
            } => {
                write!(f, "expected keyword '{keyword}', got '{found}'")
            }
            Self::ExpectedEquals {
                keyword,
                found: None,
            } => {
                write!(f, "expected '=' after '{keyword}', reached end of line")
            }
            Self::ExpectedEquals {
                keyword,
                found: Some(found),
            } => {
                write!(f, "expected '=' after '{keyword}', got '{found}'")
            }
            Self::ExpectedValue {
                keyword,
                found: None,
            } => {
                write!(f, "expected a value for '{keyword}', reached end of line")
            }
            Self::ExpectedValue {
                keyword,
                found: Some(found),
            } => {
                write!(f, "expected a value for '{keyword}', got '{found}'")
            }
            Self::TrailingTokens { first, count } => {
                write!(f, "{count} unconsumed token(s) starting at '{first}'")
            }
            Self::MissingField { field } => {
                write!(f, "no '{field}' key was present in the input")
            }
            Self::InvalidValue {
                field,
                value,
                expected,
            } => {
                write!(f, "invalid value '{value}' for '{field}', expected {expected}")
            }
        }
    }
}

/// Error produced while parsing one line.
///
/// Always carries the raw input line; no partial record survives a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not parse \"{line}\": {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: String,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: &str) -> Self {
        Self {
            kind,
            line: line.to_string(),
        }
    }
}

/// Executes one sealed element sequence against input lines.
///
/// Immutable after construction and free of per-parse state, so one
/// instance may be shared across threads; everything mutable lives on
/// the stack of a single `drive` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    elements: Vec<FormatElement>,
}

impl Formatter {
    pub(crate) const fn from_elements(elements: Vec<FormatElement>) -> Self {
        Self { elements }
    }

    /// Run every element, in declared order, over the tokens of one
    /// line, writing fields through `wrapper`.
    ///
    /// Structure only: record-shape validation (required fields,
    /// enumerated values) belongs to the concrete format that owns the
    /// wrapper. The caller discards the wrapper on failure.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when tokenization fails, when an element
    /// cannot consume its expected shape, or when tokens remain after
    /// every element has run.
    pub fn drive<W: RecordWrapper>(&self, input: &str, wrapper: &mut W) -> Result<(), ParseError> {
        let tokens =
            lexer::tokenize(input).map_err(|e| ParseError::new(ParseErrorKind::Lex(e), input))?;
        let mut stream = TokenStream::new(&tokens);

        for element in &self.elements {
            element
                .consume(&mut stream, wrapper)
                .map_err(|kind| ParseError::new(kind, input))?;
        }

        if let Some(token) = stream.peek() {
            return Err(ParseError::new(
                ParseErrorKind::TrailingTokens {
                    first: token.text.clone(),
                    count: stream.remaining(),
                },
                input,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::builder::FormatBuilder;

    #[derive(Debug, Default, PartialEq, Eq)]
    struct MapWrapper {
        fields: BTreeMap<String, String>,
    }

    impl RecordWrapper for MapWrapper {
        fn set(&mut self, field: &str, value: &str) {
            self.fields.insert(field.to_string(), value.to_string());
        }
    }

    fn keyword_value_format() -> Formatter {
        FormatBuilder::new()
            .field("source", "source")
            .optional_field("description", "description")
            .field("action", "action")
            .build()
            .expect("valid format")
    }

    #[test]
    fn drives_all_elements_in_order() {
        let formatter = keyword_value_format();
        let mut wrapper = MapWrapper::default();
        formatter
            .drive(
                r#"source=host1 description="test box" action=save"#,
                &mut wrapper,
            )
            .expect("drive");

        assert_eq!(wrapper.fields.get("source").map(String::as_str), Some("host1"));
        assert_eq!(
            wrapper.fields.get("description").map(String::as_str),
            Some("test box")
        );
        assert_eq!(wrapper.fields.get("action").map(String::as_str), Some("save"));
    }

    #[test]
    fn optional_field_skipped() {
        let formatter = keyword_value_format();
        let mut wrapper = MapWrapper::default();
        formatter
            .drive("source=host1 action=save", &mut wrapper)
            .expect("drive");
        assert!(!wrapper.fields.contains_key("description"));
    }

    #[test]
    fn trailing_tokens_rejected() {
        let formatter = keyword_value_format();
        let mut wrapper = MapWrapper::default();
        let err = formatter
            .drive("source=host1 action=save extra=1", &mut wrapper)
            .unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::TrailingTokens { ref first, count: 3 }
            if first == "extra"
        ));
        assert_eq!(err.line, "source=host1 action=save extra=1");
    }

    #[test]
    fn lex_error_carries_line() {
        let formatter = keyword_value_format();
        let mut wrapper = MapWrapper::default();
        let err = formatter
            .drive(r#"source=host1 description="oops action=save"#, &mut wrapper)
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Lex(_)));
        assert!(err.line.contains("oops"));
    }

    #[test]
    fn structural_error_names_element() {
        let formatter = FormatBuilder::new()
            .literal("@SourceTag")
            .field("source", "source")
            .build()
            .expect("valid format");
        let mut wrapper = MapWrapper::default();
        let err = formatter.drive("source=host1", &mut wrapper).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::ExpectedKeyword { ref keyword, .. }
            if keyword == "@SourceTag"
        ));
    }

    #[test]
    fn literal_prefix_format() {
        let formatter = FormatBuilder::new()
            .literal("@SourceTag")
            .field("action", "action")
            .field("source", "source")
            .remainder("tags")
            .build()
            .expect("valid format");
        let mut wrapper = MapWrapper::default();
        formatter
            .drive("@SourceTag action=save source=host1 tag1 tag2", &mut wrapper)
            .expect("drive");
        assert_eq!(wrapper.fields.get("tags").map(String::as_str), Some("tag1 tag2"));
    }

    #[test]
    fn empty_line_with_only_optional_elements() {
        let formatter = FormatBuilder::new()
            .optional_field("description", "description")
            .build()
            .expect("valid format");
        let mut wrapper = MapWrapper::default();
        formatter.drive("", &mut wrapper).expect("drive");
        assert!(wrapper.fields.is_empty());
    }

    #[test]
    fn drive_is_repeatable() {
        // no hidden cross-call state
        let formatter = keyword_value_format();
        let mut first = MapWrapper::default();
        let mut second = MapWrapper::default();
        formatter
            .drive("source=host1 action=delete", &mut first)
            .expect("drive");
        formatter
            .drive("source=host1 action=delete", &mut second)
            .expect("drive");
        assert_eq!(first, second);
    }

    #[test]
    fn display_formats() {
        let err = ParseError::new(
            ParseErrorKind::MissingField {
                field: "source".to_string(),
            },
            "action=save",
        );
        assert_eq!(
            err.to_string(),
            "could not parse \"action=save\": no 'source' key was present in the input"
        );
    }
}
