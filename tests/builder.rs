//! Builder API tests: declare formats, seal them, and drive them.

use sourcetag_rs::{
    BuildError, FormatBuilder, ParseContext, ParseErrorKind, SourceTagFormat,
};

#[test]
fn build_and_drive_declared_order() {
    let format = SourceTagFormat::custom(
        FormatBuilder::new()
            .field("source", "source")
            .optional_field("description", "description")
            .field("action", "action")
            .build()
            .expect("build"),
    );

    let tag = format
        .parse("source=host1 action=save", &ParseContext::default())
        .expect("parse");
    assert_eq!(tag.source, "host1");
}

#[test]
fn build_literal_prefix() {
    let format = SourceTagFormat::custom(
        FormatBuilder::new()
            .literal("@SourceTag")
            .field("source", "source")
            .field("action", "action")
            .build()
            .expect("build"),
    );

    assert!(
        format
            .parse("@SourceTag source=host1 action=save", &ParseContext::default())
            .is_ok()
    );
    let err = format
        .parse("source=host1 action=save", &ParseContext::default())
        .unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::ExpectedKeyword { .. }));
}

#[test]
fn build_mandatory_field_enforced_structurally() {
    let format = SourceTagFormat::custom(
        FormatBuilder::new()
            .field("source", "source")
            .field("action", "action")
            .build()
            .expect("build"),
    );

    let err = format
        .parse("action=save", &ParseContext::default())
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ParseErrorKind::ExpectedKeyword { ref keyword, .. } if keyword == "source"
    ));
}

#[test]
fn build_duplicate_field_fails_fast() {
    let err = FormatBuilder::new()
        .field("source", "source")
        .optional_field("host", "source")
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::DuplicateField("source".to_string()));
}

#[test]
fn build_remainder_not_last_fails_fast() {
    let err = FormatBuilder::new()
        .remainder("description")
        .literal("@SourceTag")
        .build()
        .unwrap_err();
    assert_eq!(err, BuildError::RemainderNotLast);
}

#[test]
fn build_error_display() {
    let err = FormatBuilder::new()
        .field("source", "source")
        .field("src", "source")
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "duplicate field name: source");
}

#[test]
fn built_formatter_is_reusable() {
    let format = SourceTagFormat::custom(
        FormatBuilder::new()
            .field("source", "source")
            .field("action", "action")
            .build()
            .expect("build"),
    );
    let ctx = ParseContext::default();

    for line in ["source=a action=save", "source=b action=delete"] {
        assert!(format.parse(line, &ctx).is_ok());
    }
}
