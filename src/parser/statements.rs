//! Generic statement builder
//!
//! Walks a bounded token range and sorts every token into the tree:
//!
//! - noise goes to whichever node is open (the pending flat run, or the
//!   container itself)
//! - at a position some [`ConstructKind`] recognizes, the pending flat run
//!   is closed and the construct is built as a child
//! - anything else extends the pending flat run, which a `;` closes
//!
//! A `{` that continues an expression in the pending run (after `=`, `,`,
//! `(`, `[`, an operator or `return`) is a brace initializer. It joins the run
//! whole, matching brace included, instead of starting a block.
//!
//! Recognizers are tried in the configured precedence order; the first one
//! that accepts wins.

use super::ast::{Statement, StatementKind};
use super::cursor::TokenCursor;
use super::errors::StructureError;
use super::lexer::{Token, TokenKind};
use super::recognizer::ConstructKind;
use super::scope::find_matching_brace;
use crate::config::BuilderConfig;
use tracing::trace;

pub struct StatementsBuilder<'c> {
    config: &'c BuilderConfig,
}

impl<'c> StatementsBuilder<'c> {
    pub fn new(config: &'c BuilderConfig) -> Self {
        Self { config }
    }

    /// First construct kind, in precedence order, that starts at the cursor.
    pub fn recognize(&self, cursor: &TokenCursor<'_>) -> Option<ConstructKind> {
        let token = cursor.peek()?;
        if !token.is_valid_for_statement() {
            return None;
        }

        let recognized = self
            .config
            .precedence
            .iter()
            .copied()
            .find(|kind| kind.recognize(cursor));
        if let Some(kind) = recognized {
            trace!(construct = %kind, location = %token.location, "construct recognized");
        }
        recognized
    }

    /// Build every statement in the cursor's range into `container`.
    pub(crate) fn build_range<'a>(
        &self,
        mut cursor: TokenCursor<'a>,
        container: &mut Statement<'a>,
        depth: usize,
    ) -> Result<(), StructureError> {
        let mut pending: Option<Statement<'a>> = None;

        while let Some(token) = cursor.peek() {
            if token.is_noise() {
                pending.as_mut().unwrap_or(&mut *container).push(token);
                cursor.advance();
                continue;
            }

            if token.is(TokenKind::LBrace) {
                if let Some(flat) = pending.as_mut().filter(|flat| expects_operand(flat)) {
                    let open = cursor.position();
                    if let Some(close) = find_matching_brace(cursor.tokens(), open, cursor.end()) {
                        flat.extend(&cursor.tokens()[open..=close]);
                        cursor.seek(close + 1);
                        continue;
                    }
                }
            }

            if let Some(kind) = self.recognize(&cursor) {
                close_pending(&mut pending, container);
                let child = kind.build(&mut cursor, self, depth)?;
                container.push_child(child);
                continue;
            }

            pending
                .get_or_insert_with(|| Statement::new(StatementKind::Flat))
                .push(token);
            cursor.advance();

            if token.is(TokenKind::Semicolon) {
                close_pending(&mut pending, container);
            }
        }

        close_pending(&mut pending, container);
        Ok(())
    }

    /// Build the braces at `open`/`close` and everything between them as a
    /// `Scope` node at nesting level `depth`.
    pub(crate) fn build_scope<'a>(
        &self,
        tokens: &'a [Token],
        open: usize,
        close: usize,
        depth: usize,
    ) -> Result<Statement<'a>, StructureError> {
        if depth > self.config.max_depth {
            return Err(StructureError::DepthLimitExceeded {
                limit: self.config.max_depth,
                location: tokens[open].location,
            });
        }

        let mut scope = Statement::new(StatementKind::Scope);
        scope.push(&tokens[open]);
        self.build_range(TokenCursor::with_bounds(tokens, open + 1, close), &mut scope, depth)?;
        scope.push(&tokens[close]);
        Ok(scope)
    }
}

/// Whether the run ends where an operand must follow, so a `{` there is an
/// initializer list rather than a block.
fn expects_operand(flat: &Statement<'_>) -> bool {
    flat.significant_tokens().last().is_some_and(|last| match last.kind {
        TokenKind::Operator | TokenKind::Comma | TokenKind::LParen | TokenKind::LBracket => true,
        TokenKind::Keyword => last.text == "return",
        _ => false,
    })
}

fn close_pending<'a>(pending: &mut Option<Statement<'a>>, container: &mut Statement<'a>) {
    if let Some(flat) = pending.take() {
        container.push_child(flat);
    }
}
