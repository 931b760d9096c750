//! Bounded cursor over an immutable token slice
//!
//! [`TokenCursor`] is `Copy`: lookahead works on a copy and throws it away,
//! so a failed recognizer cannot move the caller's position. Builders take
//! `&mut TokenCursor` and commit by assigning a copy back once a step has
//! succeeded.

use super::ast::{SourceLocation, Statement};
use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
    end: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            end: tokens.len(),
        }
    }

    /// Cursor over `tokens[start..end]`; both bounds are clamped to the slice.
    pub fn with_bounds(tokens: &'a [Token], start: usize, end: usize) -> Self {
        let end = end.min(tokens.len());
        Self {
            tokens,
            position: start.min(end),
            end,
        }
    }

    pub fn tokens(&self) -> &'a [Token] {
        self.tokens
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.end
    }

    pub fn peek(&self) -> Option<&'a Token> {
        if self.is_at_end() {
            None
        } else {
            self.tokens.get(self.position)
        }
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.is(kind))
    }

    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        self.position += 1;
        Some(token)
    }

    /// Move to `position`, never past the end bound.
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.end);
    }

    /// Advance to the next token that may start a statement.
    pub fn skip_noise(&mut self) {
        while self.peek().is_some_and(Token::is_noise) {
            self.position += 1;
        }
    }

    /// The next statement-starting token, without moving.
    pub fn peek_significant(&self) -> Option<&'a Token> {
        let mut lookahead = *self;
        lookahead.skip_noise();
        lookahead.peek()
    }

    /// Attach every noise token at the current position to `node`.
    pub(crate) fn flush_noise(&mut self, node: &mut Statement<'a>) {
        while let Some(token) = self.peek().filter(|token| token.is_noise()) {
            node.push(token);
            self.position += 1;
        }
    }

    /// Location of the current token, or of the last token in range when
    /// the cursor is exhausted.
    pub fn location(&self) -> SourceLocation {
        self.peek()
            .or_else(|| self.tokens[..self.end].last())
            .map(|token| token.location)
            .unwrap_or(SourceLocation::new(1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::StatementKind;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_copy_does_not_move_original() {
        let tokens = tokenize("struct /* c */ A {}").unwrap();
        let cursor = TokenCursor::new(&tokens);

        let mut lookahead = cursor;
        lookahead.advance();
        lookahead.skip_noise();

        assert_eq!(lookahead.peek().map(|t| t.text.as_str()), Some("A"));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_bounds_are_respected() {
        let tokens = tokenize("a b c d").unwrap();
        let mut cursor = TokenCursor::with_bounds(&tokens, 1, 3);

        assert_eq!(cursor.advance().map(|t| t.text.as_str()), Some("b"));
        assert_eq!(cursor.advance().map(|t| t.text.as_str()), Some("c"));
        assert!(cursor.advance().is_none());
        assert!(cursor.is_at_end());

        cursor.seek(10);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_flush_noise_attaches_to_node() {
        let tokens = tokenize("// one\n/* two */ x").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut node = Statement::new(StatementKind::Flat);

        cursor.flush_noise(&mut node);

        assert_eq!(node.tokens().len(), 2);
        assert_eq!(cursor.peek().map(|t| t.text.as_str()), Some("x"));
        assert_eq!(cursor.peek_significant().map(|t| t.text.as_str()), Some("x"));
    }
}
