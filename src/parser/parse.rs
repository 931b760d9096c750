//! Statement tree entry point
//!
//! This module provides [`StructureParser`], which owns a validated
//! [`BuilderConfig`] and turns token slices into statement trees.
//!
//! # Architecture
//!
//! The work is split across sibling modules:
//! - `recognizer`: side-effect free lookahead per construct kind
//! - `declarations`: commit-and-build logic per construct kind
//! - `statements`: the generic builder that dispatches between them
//! - `clauses` and `scope`: shared sub-grammars and brace matching
//!
//! A parser is immutable once built, so one instance can serve any number
//! of token streams, including from several threads.

use super::ast::{Statement, StatementKind};
use super::cursor::TokenCursor;
use super::errors::StructureError;
use super::lexer::Token;
use super::recognizer::ConstructKind;
use super::statements::StatementsBuilder;
use crate::config::BuilderConfig;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct StructureParser {
    config: BuilderConfig,
}

impl StructureParser {
    pub fn new(config: BuilderConfig) -> Result<Self, StructureError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build the statement tree for the whole token slice.
    pub fn parse<'a>(&self, tokens: &'a [Token]) -> Result<Statement<'a>, StructureError> {
        debug!(tokens = tokens.len(), "building statement tree");

        let mut root = Statement::new(StatementKind::Root);
        StatementsBuilder::new(&self.config).build_range(TokenCursor::new(tokens), &mut root, 0)?;

        debug!(
            statements = root.iter().count(),
            depth = root.nesting_depth(),
            "statement tree built"
        );
        Ok(root)
    }

    /// Which construct, if any, starts at `position` when looking no further
    /// than `end`.
    pub fn recognize(&self, tokens: &[Token], position: usize, end: usize) -> Option<ConstructKind> {
        StatementsBuilder::new(&self.config).recognize(&TokenCursor::with_bounds(tokens, position, end))
    }
}

/// Parse with the default configuration.
pub fn parse_tokens(tokens: &[Token]) -> Result<Statement<'_>, StructureError> {
    StructureParser::default().parse(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_parse_struct_definition() {
        let tokens = tokenize("struct Point { int x; int y; };").unwrap();
        let root = parse_tokens(&tokens).unwrap();

        assert_eq!(root.kind(), StatementKind::Root);
        assert_eq!(root.children().len(), 1);

        let point = &root.children()[0];
        assert_eq!(point.kind(), StatementKind::Struct);
        assert_eq!(point.name_text(), Some("Point"));
        assert_eq!(point.scope().unwrap().children().len(), 2);
    }

    #[test]
    fn test_parse_empty_input() {
        let root = parse_tokens(&[]).unwrap();
        assert!(root.is_empty());
        assert_eq!(root.nesting_depth(), 0);
    }

    #[test]
    fn test_default_parser_uses_default_config() {
        assert_eq!(StructureParser::default().config(), &BuilderConfig::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BuilderConfig::default().with_max_depth(0);
        assert!(matches!(StructureParser::new(config), Err(StructureError::ZeroDepth)));
    }

    #[test]
    fn test_recognize_at_position() {
        let tokens = tokenize("int x; union U { int a; float b; } u;").unwrap();
        let parser = StructureParser::default();

        assert_eq!(parser.recognize(&tokens, 0, tokens.len()), None);
        assert_eq!(parser.recognize(&tokens, 3, tokens.len()), Some(ConstructKind::Union));
        assert_eq!(parser.recognize(&tokens, 3, 10), None);
    }
}
