//! Balanced delimiter matching
//!
//! Plain depth-counting scans. Only the two delimiter kinds being matched
//! are looked at; whatever is nested between them is transparent.

use super::lexer::{Token, TokenKind};

/// Position of the `}` matching the `{` at `open`, searching before `end`.
pub fn find_matching_brace(tokens: &[Token], open: usize, end: usize) -> Option<usize> {
    find_closing(tokens, open, end, TokenKind::LBrace, TokenKind::RBrace)
}

/// Position of the `closing` token that returns the depth opened at `open`
/// to zero. `None` when `tokens[open]` is not `opening` or the range ends
/// first.
pub fn find_closing(
    tokens: &[Token],
    open: usize,
    end: usize,
    opening: TokenKind,
    closing: TokenKind,
) -> Option<usize> {
    let end = end.min(tokens.len());
    if open >= end || !tokens[open].is(opening) {
        return None;
    }

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().take(end).skip(open) {
        if token.is(opening) {
            depth += 1;
        } else if token.is(closing) {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }

    None
}

/// The closing partner of a grouping token.
pub fn closing_kind(opening: TokenKind) -> Option<TokenKind> {
    match opening {
        TokenKind::LBrace => Some(TokenKind::RBrace),
        TokenKind::LParen => Some(TokenKind::RParen),
        TokenKind::LBracket => Some(TokenKind::RBracket),
        _ => None,
    }
}
