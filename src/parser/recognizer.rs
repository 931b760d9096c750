//! Construct recognizers
//!
//! Each [`ConstructKind`] answers two lookahead questions at a token
//! position: does a *named* construct of this kind start here, and does a
//! *nameless* one. Both work on a copy of the caller's cursor and on scratch
//! nodes, so a "no" leaves nothing behind and the dispatcher can go on to the
//! next kind in its precedence order.
//!
//! # Grammar
//!
//! ```text
//! aggregate ::= ("struct" | "class" | "union") [identifier] [base_list] "{" ... "}"
//! enum      ::= "enum" ["class" | "struct"] [identifier] [":" type] "{" ... "}"
//! namespace ::= "namespace" [identifier ("::" identifier)*] "{" ... "}"
//! block     ::= "{" ... "}"
//! ```
//!
//! The body's closing brace must exist inside the lookahead window; a
//! construct whose scope never closes is not recognized.

use super::ast::{Statement, StatementKind};
use super::clauses::{parse_base_list, parse_underlying_type};
use super::cursor::TokenCursor;
use super::errors::StructureError;
use super::lexer::{Token, TokenKind};
use super::scope::find_matching_brace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of constructs the statement builder knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    Block,
}

impl ConstructKind {
    /// Leading keyword, `None` for a bare block.
    pub fn keyword(self) -> Option<TokenKind> {
        match self {
            ConstructKind::Namespace => Some(TokenKind::Namespace),
            ConstructKind::Class => Some(TokenKind::Class),
            ConstructKind::Struct => Some(TokenKind::Struct),
            ConstructKind::Union => Some(TokenKind::Union),
            ConstructKind::Enum => Some(TokenKind::Enum),
            ConstructKind::Block => None,
        }
    }

    pub fn statement_kind(self) -> StatementKind {
        match self {
            ConstructKind::Namespace => StatementKind::Namespace,
            ConstructKind::Class => StatementKind::Class,
            ConstructKind::Struct => StatementKind::Struct,
            ConstructKind::Union => StatementKind::Union,
            ConstructKind::Enum => StatementKind::Enum,
            ConstructKind::Block => StatementKind::Block,
        }
    }

    /// Whether a `:` clause may follow the head.
    pub fn has_heritage(self) -> bool {
        matches!(
            self,
            ConstructKind::Class | ConstructKind::Struct | ConstructKind::Union | ConstructKind::Enum
        )
    }

    /// Whether a contextual `final` may follow the name.
    pub fn accepts_final(self) -> bool {
        matches!(self, ConstructKind::Class | ConstructKind::Struct | ConstructKind::Union)
    }

    /// Named or nameless construct of this kind starting at the cursor.
    pub fn recognize(self, cursor: &TokenCursor<'_>) -> bool {
        self.recognize_named(cursor) || self.recognize_nameless(cursor)
    }

    /// `keyword identifier [heritage] {...}`
    pub fn recognize_named(self, cursor: &TokenCursor<'_>) -> bool {
        let mut lookahead = *cursor;
        if self == ConstructKind::Block || !self.skip_head(&mut lookahead) {
            return false;
        }

        lookahead.skip_noise();
        if !lookahead.check(TokenKind::Identifier) {
            return false;
        }
        lookahead.advance();

        if self == ConstructKind::Namespace && !skip_nested_names(&mut lookahead) {
            return false;
        }
        if self.accepts_final() {
            lookahead.skip_noise();
            if lookahead.peek().is_some_and(is_final) {
                lookahead.advance();
            }
        }

        self.recognize_body(lookahead)
    }

    /// `keyword [heritage] {...}`, or a bare `{...}` for blocks
    pub fn recognize_nameless(self, cursor: &TokenCursor<'_>) -> bool {
        let mut lookahead = *cursor;
        if !self.skip_head(&mut lookahead) {
            return false;
        }

        self.recognize_body(lookahead)
    }

    /// Skip the keyword (and an enum's `class`/`struct`). Blocks have no
    /// head and only require that the cursor is not exhausted.
    fn skip_head(self, lookahead: &mut TokenCursor<'_>) -> bool {
        let Some(keyword) = self.keyword() else {
            return !lookahead.is_at_end();
        };
        if !lookahead.check(keyword) {
            return false;
        }
        lookahead.advance();

        if self == ConstructKind::Enum {
            lookahead.skip_noise();
            if lookahead.check(TokenKind::Class) || lookahead.check(TokenKind::Struct) {
                lookahead.advance();
            }
        }
        true
    }

    /// `[heritage] {` with a matching `}` before the window ends.
    fn recognize_body(self, mut lookahead: TokenCursor<'_>) -> bool {
        lookahead.skip_noise();

        if self.has_heritage() && lookahead.check(TokenKind::Colon) {
            let mut scratch = Statement::new(StatementKind::Heritage);
            if self.parse_heritage(&mut lookahead, &mut scratch).is_err() {
                return false;
            }
            lookahead.skip_noise();
        }

        lookahead.check(TokenKind::LBrace)
            && find_matching_brace(lookahead.tokens(), lookahead.position(), lookahead.end())
                .is_some()
    }

    /// Run this kind's `:` clause grammar into `node`.
    pub(crate) fn parse_heritage<'a>(
        self,
        cursor: &mut TokenCursor<'a>,
        node: &mut Statement<'a>,
    ) -> Result<(), StructureError> {
        if self == ConstructKind::Enum {
            parse_underlying_type(cursor, node)
        } else {
            parse_base_list(cursor, node)
        }
    }
}

pub(crate) fn is_final(token: &Token) -> bool {
    token.is(TokenKind::Identifier) && token.text == "final"
}

/// Skip `:: identifier` pairs of a nested namespace name (`a::b::c`).
fn skip_nested_names(lookahead: &mut TokenCursor<'_>) -> bool {
    loop {
        lookahead.skip_noise();
        if !lookahead.check(TokenKind::ColonColon) {
            return true;
        }
        lookahead.advance();
        lookahead.skip_noise();
        if !lookahead.check(TokenKind::Identifier) {
            return false;
        }
        lookahead.advance();
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.statement_kind(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn at_start(kind: ConstructKind, source: &str) -> (bool, bool) {
        let tokens: Vec<Token> = tokenize(source).unwrap();
        let cursor = TokenCursor::new(&tokens);
        (kind.recognize_named(&cursor), kind.recognize_nameless(&cursor))
    }

    #[test]
    fn test_named_struct() {
        assert_eq!(at_start(ConstructKind::Struct, "struct A { } ;"), (true, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct /* x */ A // y\n { }"), (true, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct A : public B, C<int> { }"), (true, false));
        assert_eq!(at_start(ConstructKind::Class, "class A final { };"), (true, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct A final : B { }"), (true, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct final { }"), (true, false));
        assert_eq!(at_start(ConstructKind::Enum, "enum E final { }"), (false, false));
    }

    #[test]
    fn test_nameless_struct() {
        assert_eq!(at_start(ConstructKind::Struct, "struct { } a, b;"), (false, true));
        assert_eq!(at_start(ConstructKind::Struct, "struct : Base { } ;"), (false, true));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(at_start(ConstructKind::Struct, "struct A;"), (false, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct A a;"), (false, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct A { int x;"), (false, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct A : { }"), (false, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct A : B"), (false, false));
        assert_eq!(at_start(ConstructKind::Struct, "struct"), (false, false));
        assert_eq!(at_start(ConstructKind::Class, "struct A { }"), (false, false));
    }

    #[test]
    fn test_enum_heads() {
        assert_eq!(at_start(ConstructKind::Enum, "enum class Color : unsigned char { Red };"), (true, false));
        assert_eq!(at_start(ConstructKind::Enum, "enum { A, B } e;"), (false, true));
        assert_eq!(at_start(ConstructKind::Enum, "enum E : { A };"), (false, false));
    }

    #[test]
    fn test_namespace_heads() {
        assert_eq!(at_start(ConstructKind::Namespace, "namespace a::b::c { }"), (true, false));
        assert_eq!(at_start(ConstructKind::Namespace, "namespace { }"), (false, true));
        assert_eq!(at_start(ConstructKind::Namespace, "namespace fs = std::filesystem;"), (false, false));
        assert_eq!(at_start(ConstructKind::Namespace, "namespace a : b { }"), (false, false));
    }

    #[test]
    fn test_block() {
        assert_eq!(at_start(ConstructKind::Block, "{ x; }"), (false, true));
        assert_eq!(at_start(ConstructKind::Block, "{ x;"), (false, false));
        assert_eq!(at_start(ConstructKind::Block, "x { }"), (false, false));
        assert_eq!(at_start(ConstructKind::Block, ""), (false, false));
    }

    #[test]
    fn test_window_end_bounds_lookahead() {
        let tokens = tokenize("struct A { } ;").unwrap();
        let narrow = TokenCursor::with_bounds(&tokens, 0, 3);
        let wide = TokenCursor::with_bounds(&tokens, 0, 4);

        assert!(!ConstructKind::Struct.recognize(&narrow));
        assert!(ConstructKind::Struct.recognize(&wide));
    }
}
