//! Clause sub-grammars shared by the construct builders
//!
//! - Base list: `: [virtual|public|protected|private]* [::]name[<...>](::name[<...>])* [...]`,
//!   comma separated
//! - Enum underlying type: `: (identifier | keyword | ::)+`
//! - Declarator tail: everything between a closing brace and the `;` that
//!   ends the declaration
//!
//! Every function here writes into a node it is handed and moves the cursor
//! it is handed. Callers that must stay side-effect free on failure pass a
//! scratch node and a cursor copy.

use super::ast::{Statement, StatementKind};
use super::cursor::TokenCursor;
use super::errors::StructureError;
use super::lexer::{Token, TokenKind};
use super::scope::{closing_kind, find_closing};

const BASE_LIST: &str = "base list";
const UNDERLYING_TYPE: &str = "enum underlying type";
const TEMPLATE_ARGUMENTS: &str = "template arguments";
const DECLARATORS: &str = "declarators";

fn unexpected(step: &'static str, token: &Token) -> StructureError {
    StructureError::NotRecognized {
        step,
        found: token.to_string(),
        location: token.location,
    }
}

/// Consume the next significant token into `node` if it is of `kind`.
fn accept<'a>(cursor: &mut TokenCursor<'a>, node: &mut Statement<'a>, kind: TokenKind) -> bool {
    match cursor.peek_significant() {
        Some(token) if token.is(kind) => {
            cursor.flush_noise(node);
            node.push(token);
            cursor.advance();
            true
        }
        _ => false,
    }
}

/// Like [`accept`], but a mismatch is an error.
fn expect<'a>(
    cursor: &mut TokenCursor<'a>,
    node: &mut Statement<'a>,
    kind: TokenKind,
    step: &'static str,
) -> Result<(), StructureError> {
    match cursor.peek_significant() {
        None => Err(StructureError::TruncatedInput { step }),
        Some(token) if !token.is(kind) => Err(unexpected(step, token)),
        Some(_) => {
            accept(cursor, node, kind);
            Ok(())
        }
    }
}

/// Parse a base list starting at `:`.
pub(crate) fn parse_base_list<'a>(
    cursor: &mut TokenCursor<'a>,
    node: &mut Statement<'a>,
) -> Result<(), StructureError> {
    expect(cursor, node, TokenKind::Colon, BASE_LIST)?;

    loop {
        parse_base_specifier(cursor, node)?;
        if !accept(cursor, node, TokenKind::Comma) {
            return Ok(());
        }
    }
}

fn parse_base_specifier<'a>(
    cursor: &mut TokenCursor<'a>,
    node: &mut Statement<'a>,
) -> Result<(), StructureError> {
    while cursor
        .peek_significant()
        .is_some_and(|token| token.kind.is_base_qualifier())
    {
        cursor.flush_noise(node);
        node.extend(cursor.advance());
    }

    accept(cursor, node, TokenKind::ColonColon);
    loop {
        expect(cursor, node, TokenKind::Identifier, BASE_LIST)?;
        if cursor.peek_significant().is_some_and(|token| token.is(TokenKind::Less)) {
            cursor.flush_noise(node);
            parse_template_arguments(cursor, node)?;
        }
        if !accept(cursor, node, TokenKind::ColonColon) {
            break;
        }
    }
    accept(cursor, node, TokenKind::Ellipsis);

    Ok(())
}

/// Balanced `< ... >`. Parenthesised groups are skipped whole so a `>`
/// inside them does not close the list.
fn parse_template_arguments<'a>(
    cursor: &mut TokenCursor<'a>,
    node: &mut Statement<'a>,
) -> Result<(), StructureError> {
    let mut depth = 0usize;

    loop {
        let token = cursor
            .peek()
            .ok_or(StructureError::TruncatedInput { step: TEMPLATE_ARGUMENTS })?;

        match token.kind {
            TokenKind::Less => depth += 1,
            TokenKind::Greater => depth -= 1,
            TokenKind::LParen => {
                let close = find_closing(
                    cursor.tokens(),
                    cursor.position(),
                    cursor.end(),
                    TokenKind::LParen,
                    TokenKind::RParen,
                )
                .ok_or(StructureError::TruncatedInput { step: TEMPLATE_ARGUMENTS })?;
                node.tokens.extend(&cursor.tokens()[cursor.position()..close]);
                cursor.seek(close);
            }
            TokenKind::LBrace | TokenKind::RBrace | TokenKind::Semicolon => {
                return Err(unexpected(TEMPLATE_ARGUMENTS, token));
            }
            _ => {}
        }

        node.extend(cursor.advance());
        if depth == 0 {
            return Ok(());
        }
    }
}

/// Parse `: type-name` after an enum head.
pub(crate) fn parse_underlying_type<'a>(
    cursor: &mut TokenCursor<'a>,
    node: &mut Statement<'a>,
) -> Result<(), StructureError> {
    expect(cursor, node, TokenKind::Colon, UNDERLYING_TYPE)?;

    let mut consumed = 0usize;
    while let Some(token) = cursor.peek_significant() {
        let part_of_type = matches!(
            token.kind,
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::ColonColon
        );
        if !part_of_type {
            break;
        }
        cursor.flush_noise(node);
        node.extend(cursor.advance());
        consumed += 1;
    }

    match (consumed, cursor.peek_significant()) {
        (0, None) => Err(StructureError::TruncatedInput { step: UNDERLYING_TYPE }),
        (0, Some(token)) => Err(unexpected(UNDERLYING_TYPE, token)),
        _ => Ok(()),
    }
}

/// Consume declarators up to and including the terminating `;`.
///
/// Declarator tokens land in a `Variables` child of `owner`; the `;` and
/// any noise right before it belong to `owner`. A bare `;` creates no
/// child. Balanced `{}`, `()` and `[]` groups (initializers, array bounds,
/// parameter lists) are part of the declarators, except a `{` right after a
/// `)`, which starts a function body. A construct keyword also ends the scan.
/// The cursor only moves when the whole tail parsed.
pub(crate) fn parse_declarators<'a>(
    cursor: &mut TokenCursor<'a>,
    owner: &mut Statement<'a>,
) -> Result<(), StructureError> {
    let mut lookahead = *cursor;
    let mut declarators: Vec<&'a Token> = Vec::new();

    let terminator = loop {
        let token = lookahead
            .peek()
            .ok_or(StructureError::TruncatedInput { step: DECLARATORS })?;

        match token.kind {
            TokenKind::Semicolon => break token,
            // a body after `)` belongs to a following function definition
            TokenKind::LBrace
                if declarators
                    .iter()
                    .rev()
                    .find(|previous| previous.is_valid_for_statement())
                    .is_some_and(|last| last.is(TokenKind::RParen)) =>
            {
                return Err(unexpected(DECLARATORS, token));
            }
            TokenKind::Namespace
            | TokenKind::Class
            | TokenKind::Struct
            | TokenKind::Union
            | TokenKind::Enum => return Err(unexpected(DECLARATORS, token)),
            TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => {
                let close = closing_kind(token.kind)
                    .and_then(|closing| {
                        find_closing(
                            lookahead.tokens(),
                            lookahead.position(),
                            lookahead.end(),
                            token.kind,
                            closing,
                        )
                    })
                    .ok_or(StructureError::TruncatedInput { step: DECLARATORS })?;
                declarators.extend(&lookahead.tokens()[lookahead.position()..=close]);
                lookahead.seek(close + 1);
            }
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                return Err(unexpected(DECLARATORS, token));
            }
            _ => {
                declarators.push(token);
                lookahead.advance();
            }
        }
    };

    let significant_len = declarators
        .iter()
        .rposition(|token| token.is_valid_for_statement())
        .map_or(0, |index| index + 1);
    let trailing_noise = declarators.split_off(significant_len);

    if !declarators.is_empty() {
        let mut variables = Statement::new(StatementKind::Variables);
        variables.tokens = declarators;
        owner.variables = Some(owner.push_child(variables));
    }
    owner.tokens.extend(trailing_noise);
    owner.push(terminator);
    lookahead.advance();

    *cursor = lookahead;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn texts(node: &Statement) -> Vec<String> {
        node.tokens().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn test_base_list_with_qualifiers_and_templates() {
        let tokens =
            tokenize(": public virtual ::ns::Base<std::map<int, (a > b)>>, private Mixin... {")
                .unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut node = Statement::new(StatementKind::Heritage);

        parse_base_list(&mut cursor, &mut node).unwrap();

        assert!(cursor.check(TokenKind::LBrace));
        assert_eq!(node.tokens().len(), tokens.len() - 1);
        assert_eq!(texts(&node).last().map(String::as_str), Some("..."));
    }

    #[test]
    fn test_base_list_stops_before_trailing_noise() {
        let tokens = tokenize(": Base /* note */ {").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut node = Statement::new(StatementKind::Heritage);

        parse_base_list(&mut cursor, &mut node).unwrap();

        assert_eq!(texts(&node), vec![":", "Base"]);
        assert!(cursor.check(TokenKind::BlockComment));
    }

    #[test]
    fn test_base_list_failures() {
        let tokens = tokenize(": public {").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let err = parse_base_list(&mut cursor, &mut Statement::new(StatementKind::Heritage))
            .unwrap_err();
        assert!(matches!(err, StructureError::NotRecognized { step: "base list", .. }));

        let tokens = tokenize(": Base<int").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let err = parse_base_list(&mut cursor, &mut Statement::new(StatementKind::Heritage))
            .unwrap_err();
        assert_eq!(err, StructureError::TruncatedInput { step: "template arguments" });

        let tokens = tokenize(": A,").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let err = parse_base_list(&mut cursor, &mut Statement::new(StatementKind::Heritage))
            .unwrap_err();
        assert_eq!(err, StructureError::TruncatedInput { step: "base list" });
    }

    #[test]
    fn test_underlying_type() {
        let tokens = tokenize(": unsigned long {").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut node = Statement::new(StatementKind::Heritage);

        parse_underlying_type(&mut cursor, &mut node).unwrap();
        assert_eq!(texts(&node), vec![":", "unsigned", "long"]);

        let tokens = tokenize(": {").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut scratch = Statement::new(StatementKind::Heritage);
        assert!(parse_underlying_type(&mut cursor, &mut scratch).is_err());
    }

    #[test]
    fn test_declarators_capture_tail() {
        let tokens = tokenize("a, *b[2] = { {1}, {2} } /* end */ ; next").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut owner = Statement::new(StatementKind::Struct);

        parse_declarators(&mut cursor, &mut owner).unwrap();

        let variables = owner.variables().unwrap();
        assert_eq!(variables.tokens().first().map(|t| t.text.as_str()), Some("a"));
        assert_eq!(variables.tokens().last().map(|t| t.text.as_str()), Some("}"));
        assert_eq!(texts(&owner), vec!["/* end */", ";"]);
        assert_eq!(cursor.peek().map(|t| t.text.as_str()), Some("next"));
    }

    #[test]
    fn test_bare_semicolon_has_no_variables() {
        let tokens = tokenize(";").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut owner = Statement::new(StatementKind::Struct);

        parse_declarators(&mut cursor, &mut owner).unwrap();

        assert!(owner.variables().is_none());
        assert!(owner.children().is_empty());
        assert_eq!(texts(&owner), vec![";"]);
    }

    #[test]
    fn test_declarators_leave_cursor_on_failure() {
        let tokens = tokenize("a, b }").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut owner = Statement::new(StatementKind::Struct);

        assert!(parse_declarators(&mut cursor, &mut owner).is_err());
        assert_eq!(cursor.position(), 0);
        assert!(owner.is_empty());

        let tokens = tokenize("a, b").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        assert_eq!(
            parse_declarators(&mut cursor, &mut owner),
            Err(StructureError::TruncatedInput { step: "declarators" })
        );
    }

    #[test]
    fn test_declarators_stop_at_next_definition() {
        for source in ["int main ( ) { return 0; } int y;", "x struct B { } ;"] {
            let tokens = tokenize(source).unwrap();
            let mut cursor = TokenCursor::new(&tokens);
            let mut owner = Statement::new(StatementKind::Struct);

            assert!(matches!(
                parse_declarators(&mut cursor, &mut owner),
                Err(StructureError::NotRecognized { step: "declarators", .. })
            ));
            assert_eq!(cursor.position(), 0);
            assert!(owner.is_empty());
        }

        let tokens = tokenize("f(int) = delete, g[2] = { 1 };").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut owner = Statement::new(StatementKind::Struct);
        parse_declarators(&mut cursor, &mut owner).unwrap();
        assert_eq!(owner.variables().unwrap().tokens().len(), 15);
    }
}
