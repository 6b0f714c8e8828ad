use std::fmt;

use crate::element::FormatElement;
use crate::format::{Formatter, ParseContext, ParseError, ParseErrorKind, RecordWrapper};

/// Field name for the source identifier.
pub const SOURCE: &str = "source";
/// Field name for the free-text description.
pub const DESCRIPTION: &str = "description";
/// Field name for the requested action.
pub const ACTION: &str = "action";

/// The operation requested on a source's tag or description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Attach or replace.
    Save,
    /// Remove.
    Delete,
}

impl Action {
    /// The wire keyword for this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Delete => "delete",
        }
    }

    /// Match a wire keyword, case-sensitively.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "save" => Some(Self::Save),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed administrative action on a named source.
///
/// `annotations` holds the fields of custom formats beyond the three
/// known ones, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTag {
    pub source: String,
    pub action: Action,
    pub description: Option<String>,
    pub annotations: Vec<(String, String)>,
}

impl fmt::Display for SourceTag {
    /// Render the canonical line form: `source=… description=… action=…`
    /// followed by any annotations. Values are quoted when they contain
    /// whitespace, quotes, or `=`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SOURCE}=")?;
        write_value(f, &self.source)?;
        if let Some(description) = &self.description {
            write!(f, " {DESCRIPTION}=")?;
            write_value(f, description)?;
        }
        write!(f, " {ACTION}={}", self.action)?;
        for (field, value) in &self.annotations {
            write!(f, " {field}=")?;
            write_value(f, value)?;
        }
        Ok(())
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    use std::fmt::Write as _;

    let bare = !value.is_empty()
        && !value
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control() || matches!(ch, '"' | '=' | '\\'));
    if bare {
        return f.write_str(value);
    }

    f.write_char('"')?;
    for ch in value.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => f.write_char(ch)?,
        }
    }
    f.write_char('"')
}

/// Collects fields for one [`SourceTag`] during a single parse.
#[derive(Debug, Default)]
struct SourceTagWrapper {
    source: Option<String>,
    description: Option<String>,
    action: Option<String>,
    annotations: Vec<(String, String)>,
}

impl RecordWrapper for SourceTagWrapper {
    fn set(&mut self, field: &str, value: &str) {
        match field {
            SOURCE => self.source = Some(value.to_string()),
            DESCRIPTION => self.description = Some(value.to_string()),
            ACTION => self.action = Some(value.to_string()),
            _ => self
                .annotations
                .push((field.to_string(), value.to_string())),
        }
    }
}

/// Parser for source-tag lines.
///
/// Immutable and shareable across threads; build one at startup and
/// reuse it for every line.
///
/// # Example
///
/// ```
/// use sourcetag_rs::{Action, ParseContext, SourceTagFormat};
///
/// let format = SourceTagFormat::new();
/// let ctx = ParseContext::default();
/// let tag = format
///     .parse(r#"source=host1 description="test box" action=save"#, &ctx)
///     .unwrap();
/// assert_eq!(tag.source, "host1");
/// assert_eq!(tag.action, Action::Save);
/// assert_eq!(tag.description.as_deref(), Some("test box"));
/// ```
#[derive(Debug, Clone)]
pub struct SourceTagFormat {
    formatter: Formatter,
}

impl SourceTagFormat {
    /// The canonical line shape: `source=<id>`, optional
    /// `description=<text>`, `action=save|delete`, in that order.
    ///
    /// Each pair matches only when its keyword is present, so a line
    /// missing one reaches validation, which reports the absent field
    /// by name rather than a position mismatch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            formatter: Formatter::from_elements(vec![
                FormatElement::Field {
                    keyword: SOURCE.to_string(),
                    field: SOURCE.to_string(),
                    mandatory: false,
                },
                FormatElement::Field {
                    keyword: DESCRIPTION.to_string(),
                    field: DESCRIPTION.to_string(),
                    mandatory: false,
                },
                FormatElement::Field {
                    keyword: ACTION.to_string(),
                    field: ACTION.to_string(),
                    mandatory: false,
                },
            ]),
        }
    }

    /// Run a caller-declared element sequence against the source-tag
    /// record shape. Fields other than `source`, `description`, and
    /// `action` land in [`SourceTag::annotations`].
    ///
    /// ```
    /// use sourcetag_rs::{FormatBuilder, ParseContext, SourceTagFormat};
    ///
    /// let format = SourceTagFormat::custom(
    ///     FormatBuilder::new()
    ///         .literal("@SourceTag")
    ///         .field("action", "action")
    ///         .field("source", "source")
    ///         .remainder("description")
    ///         .build()
    ///         .unwrap(),
    /// );
    /// let tag = format
    ///     .parse("@SourceTag action=save source=host1 db primary", &ParseContext::default())
    ///     .unwrap();
    /// assert_eq!(tag.description.as_deref(), Some("db primary"));
    /// ```
    #[must_use]
    pub const fn custom(formatter: Formatter) -> Self {
        Self { formatter }
    }

    /// Parse one line into a validated [`SourceTag`].
    ///
    /// `ctx.default_source` fills the source field only when the line
    /// did not set it; with no default supplied a missing source is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` carrying the raw line on lexical,
    /// structural, residual-token, or validation failure. No partial
    /// record is ever returned.
    pub fn parse(&self, line: &str, ctx: &ParseContext) -> Result<SourceTag, ParseError> {
        let mut wrapper = SourceTagWrapper::default();
        self.formatter.drive(line, &mut wrapper)?;

        let SourceTagWrapper {
            source,
            description,
            action,
            annotations,
        } = wrapper;

        let source = source
            .filter(|s| !s.is_empty())
            .or_else(|| ctx.default_source.clone())
            .ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::MissingField {
                        field: SOURCE.to_string(),
                    },
                    line,
                )
            })?;

        let action = action.ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::MissingField {
                    field: ACTION.to_string(),
                },
                line,
            )
        })?;
        let action = Action::from_keyword(&action).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidValue {
                    field: ACTION.to_string(),
                    value: action.clone(),
                    expected: "'save' or 'delete'".to_string(),
                },
                line,
            )
        })?;

        Ok(SourceTag {
            source,
            action,
            description,
            annotations,
        })
    }
}

impl Default for SourceTagFormat {
    fn default() -> Self {
        Self::new()
    }
}
