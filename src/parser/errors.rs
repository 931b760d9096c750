//! Error types for statement-tree construction
//!
//! This module defines [`StructureError`]. Most variants never escape the
//! engine: a recognizer that hits [`StructureError::NotRecognized`] or
//! [`StructureError::TruncatedInput`] simply answers "no", and a builder that
//! hits one skips the optional step it was attempting. The ones a caller sees
//! are [`StructureError::MissingScope`] (from [`Statement::scope`]),
//! [`StructureError::DepthLimitExceeded`] (from a parse) and the configuration
//! errors (from [`BuilderConfig::validate`]).
//!
//! [`Statement::scope`]: crate::parser::ast::Statement::scope
//! [`BuilderConfig::validate`]: crate::config::BuilderConfig::validate

use super::ast::{SourceLocation, StatementKind};
use super::recognizer::ConstructKind;
use thiserror::Error;

fn describe(location: &Option<SourceLocation>) -> String {
    match location {
        Some(loc) => format!("line {}, column {}", loc.line, loc.column),
        None => "an empty range".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A sub-grammar met a token it cannot accept
    #[error("unexpected {found} at line {}, column {} while parsing {step}", .location.line, .location.column)]
    NotRecognized {
        step: &'static str,
        found: String,
        location: SourceLocation,
    },

    /// Scope requested from a statement that has no body
    #[error("{kind} statement at {} has no scope", describe(.location))]
    MissingScope {
        kind: StatementKind,
        location: Option<SourceLocation>,
    },

    /// End of the token range reached before a sub-grammar completed
    #[error("input ended while parsing {step}")]
    TruncatedInput { step: &'static str },

    /// Source nesting deeper than the configured limit
    #[error("nesting depth limit of {limit} exceeded at line {}, column {}", .location.line, .location.column)]
    DepthLimitExceeded {
        limit: usize,
        location: SourceLocation,
    },

    #[error("construct {0} appears more than once in the precedence order")]
    DuplicateConstruct(ConstructKind),

    #[error("precedence order must list at least one construct")]
    EmptyPrecedence,

    #[error("maximum nesting depth must be at least 1")]
    ZeroDepth,
}
