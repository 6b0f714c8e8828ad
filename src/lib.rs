//! Line-format lexer, format builder, and parse driver for telemetry
//! source-tag ingestion.
//!
//! One line of text describes one administrative action on a named
//! source (a host or entity identifier): attach or replace a tag or
//! description, or remove one. This crate turns such lines into typed
//! [`SourceTag`] records through a reusable skeleton: a lexer splits
//! the line into tokens, a sealed sequence of grammar elements
//! consumes them in order, and a validation pass enforces required
//! fields and the enumerated action set.
//!
//! # Quick start
//!
//! ## Parse source-tag lines
//!
//! ```
//! use sourcetag_rs::{Action, ParseContext, SourceTagFormat};
//!
//! let format = SourceTagFormat::new();
//! let ctx = ParseContext::default();
//!
//! let tag = format
//!     .parse(r#"source=host1 description="test box" action=save"#, &ctx)
//!     .unwrap();
//! assert_eq!(tag.source, "host1");
//! assert_eq!(tag.description.as_deref(), Some("test box"));
//! assert_eq!(tag.action, Action::Save);
//!
//! // failures carry the offending line
//! let err = format.parse("source=host1 action=rename", &ctx).unwrap_err();
//! assert!(err.to_string().contains("action=rename"));
//! ```
//!
//! ## Declare a custom line shape
//!
//! ```
//! use sourcetag_rs::{FormatBuilder, ParseContext, SourceTagFormat};
//!
//! let format = SourceTagFormat::custom(
//!     FormatBuilder::new()
//!         .literal("@SourceTag")
//!         .field("action", "action")
//!         .field("source", "source")
//!         .remainder("description")
//!         .build()
//!         .unwrap(),
//! );
//!
//! let tag = format
//!     .parse("@SourceTag action=delete source=host1 retired host", &ParseContext::default())
//!     .unwrap();
//! assert_eq!(tag.description.as_deref(), Some("retired host"));
//! ```
//!
//! The format is immutable once built; share one instance across as
//! many threads as needed. All per-parse state lives on the stack of
//! a single `parse` call.

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod builder;
mod element;
pub mod format;
pub mod lexer;
pub mod source_tag;
pub mod token;

pub use builder::{BuildError, FormatBuilder};
pub use format::{Formatter, ParseContext, ParseError, ParseErrorKind, RecordWrapper};
pub use lexer::{LexError, LexErrorKind, tokenize};
pub use source_tag::{ACTION, Action, DESCRIPTION, SOURCE, SourceTag, SourceTagFormat};
pub use token::{Span, Token, TokenKind};
