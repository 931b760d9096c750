//! Construct builders
//!
//! Commit phase for every [`ConstructKind`]. A builder only runs after the
//! matching recognizer said yes at the cursor, and from then on it always
//! produces a node: each optional part (name, heritage, scope, declarator
//! tail) is attempted in turn and simply left unset if it does not parse.
//!
//! Steps that can fail partway work on a cursor copy and a staging node and
//! are only attached to the construct once they succeed. The one failure
//! that escapes is [`StructureError::DepthLimitExceeded`], which aborts the
//! whole parse.

use super::ast::{Statement, StatementKind};
use super::clauses::parse_declarators;
use super::cursor::TokenCursor;
use super::errors::StructureError;
use super::lexer::TokenKind;
use super::recognizer::{is_final, ConstructKind};
use super::scope::find_matching_brace;
use super::statements::StatementsBuilder;
use tracing::debug;

impl ConstructKind {
    /// Build the construct at the cursor and advance past it.
    pub(crate) fn build<'a>(
        self,
        cursor: &mut TokenCursor<'a>,
        builder: &StatementsBuilder<'_>,
        depth: usize,
    ) -> Result<Statement<'a>, StructureError> {
        match self {
            ConstructKind::Block => build_block(cursor, builder, depth),
            ConstructKind::Namespace => build_namespace(cursor, builder, depth),
            ConstructKind::Class
            | ConstructKind::Struct
            | ConstructKind::Union
            | ConstructKind::Enum => build_aggregate(self, cursor, builder, depth),
        }
    }
}

/// struct / class / union / enum
fn build_aggregate<'a>(
    kind: ConstructKind,
    cursor: &mut TokenCursor<'a>,
    builder: &StatementsBuilder<'_>,
    depth: usize,
) -> Result<Statement<'a>, StructureError> {
    let mut node = Statement::new(kind.statement_kind());

    node.extend(cursor.advance());
    cursor.flush_noise(&mut node);

    if kind == ConstructKind::Enum
        && (cursor.check(TokenKind::Class) || cursor.check(TokenKind::Struct))
    {
        node.extend(cursor.advance());
        cursor.flush_noise(&mut node);
    }

    let named = parse_name(cursor, &mut node);
    if named && kind.accepts_final() && cursor.peek().is_some_and(is_final) {
        node.extend(cursor.advance());
        cursor.flush_noise(&mut node);
    }
    parse_heritage(kind, cursor, &mut node);
    parse_scope(cursor, &mut node, builder, depth)?;

    cursor.flush_noise(&mut node);
    if let Err(error) = parse_declarators(cursor, &mut node) {
        debug!(construct = %kind, %error, "no declarator tail");
    }

    Ok(node)
}

fn build_namespace<'a>(
    cursor: &mut TokenCursor<'a>,
    builder: &StatementsBuilder<'_>,
    depth: usize,
) -> Result<Statement<'a>, StructureError> {
    let mut node = Statement::new(StatementKind::Namespace);

    node.extend(cursor.advance());
    cursor.flush_noise(&mut node);

    if parse_name(cursor, &mut node) {
        // a::b::c - the first segment is the name, the rest stays in the span
        while cursor.check(TokenKind::ColonColon) {
            node.extend(cursor.advance());
            cursor.flush_noise(&mut node);
            if !cursor.check(TokenKind::Identifier) {
                break;
            }
            node.extend(cursor.advance());
            cursor.flush_noise(&mut node);
        }
    }

    parse_scope(cursor, &mut node, builder, depth)?;
    Ok(node)
}

fn build_block<'a>(
    cursor: &mut TokenCursor<'a>,
    builder: &StatementsBuilder<'_>,
    depth: usize,
) -> Result<Statement<'a>, StructureError> {
    let mut node = Statement::new(StatementKind::Block);
    parse_scope(cursor, &mut node, builder, depth)?;
    Ok(node)
}

/// Record an identifier at the cursor as the construct name.
fn parse_name<'a>(cursor: &mut TokenCursor<'a>, node: &mut Statement<'a>) -> bool {
    match cursor.peek() {
        Some(token) if token.is(TokenKind::Identifier) => {
            node.push(token);
            node.name = Some(token);
            cursor.advance();
            cursor.flush_noise(node);
            true
        }
        _ => false,
    }
}

/// Build the `:` clause into its own child, attached only on success.
fn parse_heritage<'a>(kind: ConstructKind, cursor: &mut TokenCursor<'a>, node: &mut Statement<'a>) {
    if !cursor.check(TokenKind::Colon) {
        return;
    }

    let mut lookahead = *cursor;
    let mut heritage = Statement::new(StatementKind::Heritage);
    match kind.parse_heritage(&mut lookahead, &mut heritage) {
        Ok(()) => {
            *cursor = lookahead;
            node.heritage = Some(node.push_child(heritage));
            cursor.flush_noise(node);
        }
        Err(error) => debug!(construct = %kind, %error, "heritage skipped"),
    }
}

/// Build the `{ ... }` at the cursor as a `Scope` child.
fn parse_scope<'a>(
    cursor: &mut TokenCursor<'a>,
    node: &mut Statement<'a>,
    builder: &StatementsBuilder<'_>,
    depth: usize,
) -> Result<(), StructureError> {
    if !cursor.check(TokenKind::LBrace) {
        debug!(statement = %node.kind(), location = %cursor.location(), "construct has no scope");
        return Ok(());
    }

    let open = cursor.position();
    let Some(close) = find_matching_brace(cursor.tokens(), open, cursor.end()) else {
        let error = StructureError::TruncatedInput { step: "scope" };
        debug!(statement = %node.kind(), %error, "scope skipped");
        return Ok(());
    };

    let scope = builder.build_scope(cursor.tokens(), open, close, depth + 1)?;
    cursor.seek(close + 1);
    node.scope = Some(node.push_child(scope));
    Ok(())
}
