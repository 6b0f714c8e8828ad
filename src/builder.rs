use crate::element::FormatElement;
use crate::format::Formatter;

/// Error produced when sealing a format.
///
/// These are configuration mistakes; they surface at startup so a
/// malformed format never reaches traffic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Two elements write the same field.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    /// A remainder element is followed by further elements, which
    /// could never match.
    #[error("remainder element must be last")]
    RemainderNotLast,
}

/// Accumulates an ordered sequence of format elements, then seals
/// them into an immutable [`Formatter`].
///
/// Configured once at startup; the sealed formatter is reused across
/// every line it parses.
///
/// # Example
///
/// ```
/// use sourcetag_rs::FormatBuilder;
///
/// let formatter = FormatBuilder::new()
///     .field("source", "source")
///     .optional_field("description", "description")
///     .field("action", "action")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FormatBuilder {
    elements: Vec<FormatElement>,
}

impl FormatBuilder {
    /// Create an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Append a literal keyword that is consumed and discarded, such
    /// as a line-type marker at the front of the line.
    #[must_use]
    pub fn literal(mut self, keyword: &str) -> Self {
        self.elements.push(FormatElement::Literal {
            keyword: keyword.to_string(),
        });
        self
    }

    /// Append a mandatory `keyword=value` pair written under `field`.
    #[must_use]
    pub fn field(self, keyword: &str, field: &str) -> Self {
        self.push_field(keyword, field, true)
    }

    /// Append an optional `keyword=value` pair written under `field`.
    /// When the keyword is absent at this position the element is a
    /// no-op.
    #[must_use]
    pub fn optional_field(self, keyword: &str, field: &str) -> Self {
        self.push_field(keyword, field, false)
    }

    /// Append a greedy capture of every remaining token, joined with
    /// single spaces and written under `field`. Must be the last
    /// element.
    #[must_use]
    pub fn remainder(mut self, field: &str) -> Self {
        self.elements.push(FormatElement::Remainder {
            field: field.to_string(),
        });
        self
    }

    /// Seal the accumulated elements into an immutable [`Formatter`].
    ///
    /// # Errors
    ///
    /// Returns `BuildError` when two elements bind the same field
    /// name or when a remainder element is not last.
    pub fn build(self) -> Result<Formatter, BuildError> {
        let mut seen = Vec::new();
        for (index, element) in self.elements.iter().enumerate() {
            let field = match element {
                FormatElement::Literal { .. } => continue,
                FormatElement::Field { field, .. } => field,
                FormatElement::Remainder { field } => {
                    if index + 1 != self.elements.len() {
                        return Err(BuildError::RemainderNotLast);
                    }
                    field
                }
            };
            if seen.contains(&field.as_str()) {
                return Err(BuildError::DuplicateField(field.clone()));
            }
            seen.push(field);
        }
        Ok(Formatter::from_elements(self.elements))
    }

    fn push_field(mut self, keyword: &str, field: &str, mandatory: bool) -> Self {
        self.elements.push(FormatElement::Field {
            keyword: keyword.to_string(),
            field: field.to_string(),
            mandatory,
        });
        self
    }
}

impl Default for FormatBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_ordered_elements() {
        let result = FormatBuilder::new()
            .literal("@SourceTag")
            .field("source", "source")
            .optional_field("description", "description")
            .field("action", "action")
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn duplicate_field_rejected() {
        let err = FormatBuilder::new()
            .field("source", "source")
            .field("src", "source")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::DuplicateField("source".to_string()));
    }

    #[test]
    fn duplicate_between_field_and_remainder_rejected() {
        let err = FormatBuilder::new()
            .field("description", "description")
            .remainder("description")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::DuplicateField("description".to_string()));
    }

    #[test]
    fn remainder_must_be_last() {
        let err = FormatBuilder::new()
            .remainder("description")
            .field("action", "action")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::RemainderNotLast);
    }

    #[test]
    fn same_keyword_different_fields_allowed() {
        // keywords may repeat as long as the fields differ
        let result = FormatBuilder::new()
            .field("tag", "first_tag")
            .optional_field("tag", "second_tag")
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn literals_do_not_bind_fields() {
        let result = FormatBuilder::new()
            .literal("source")
            .field("source", "source")
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn empty_format_builds() {
        assert!(FormatBuilder::new().build().is_ok());
    }
}
