//! Lexer (tokenizer) for C and C++ source code
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the
//! statement builder. Unlike a compiler front-end, nothing is thrown away:
//! comments, preprocessor directives and `[[...]]` attributes are kept as
//! *noise* tokens so that every byte of structure stays attributable to some
//! statement. Whitespace is the only thing dropped.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Token kinds produced by the lexer.
///
/// Only the kinds the structure engine looks at get their own variant; every
/// other reserved word collapses into [`TokenKind::Keyword`] and every other
/// operator into [`TokenKind::Operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Construct keywords
    Struct,
    Class,
    Union,
    Enum,
    Namespace,

    // Base specifier qualifiers
    Public,
    Protected,
    Private,
    Virtual,

    /// Any other reserved word (`int`, `const`, `template`, ...)
    Keyword,
    Identifier,

    // Literals
    Number,
    StringLiteral,
    CharLiteral,

    // Punctuation
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Semicolon,  // ;
    Colon,      // :
    ColonColon, // ::
    Comma,      // ,
    Less,       // <
    Greater,    // >
    Ellipsis,   // ...
    Operator,

    // Noise
    LineComment,
    BlockComment,
    Directive,
    Attribute,
}

impl TokenKind {
    /// Noise never starts or terminates a statement; builders attach it to
    /// whatever node is currently open.
    pub fn is_noise(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::Directive
                | TokenKind::Attribute
        )
    }

    pub fn is_base_qualifier(self) -> bool {
        matches!(
            self,
            TokenKind::Public | TokenKind::Protected | TokenKind::Private | TokenKind::Virtual
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Struct => "'struct'",
            TokenKind::Class => "'class'",
            TokenKind::Union => "'union'",
            TokenKind::Enum => "'enum'",
            TokenKind::Namespace => "'namespace'",
            TokenKind::Public => "'public'",
            TokenKind::Protected => "'protected'",
            TokenKind::Private => "'private'",
            TokenKind::Virtual => "'virtual'",
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "char literal",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::ColonColon => "'::'",
            TokenKind::Comma => "','",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Operator => "operator",
            TokenKind::LineComment => "line comment",
            TokenKind::BlockComment => "block comment",
            TokenKind::Directive => "preprocessor directive",
            TokenKind::Attribute => "attribute",
        };
        f.write_str(text)
    }
}

/// A single lexed token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_noise(&self) -> bool {
        self.kind.is_noise()
    }

    /// Whether this token may begin (or continue) a statement.
    pub fn is_valid_for_statement(&self) -> bool {
        !self.kind.is_noise()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Keyword | TokenKind::Operator | TokenKind::Number => {
                write!(f, "'{}'", self.text)
            }
            kind => write!(f, "{}", kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("struct", TokenKind::Struct),
    ("class", TokenKind::Class),
    ("union", TokenKind::Union),
    ("enum", TokenKind::Enum),
    ("namespace", TokenKind::Namespace),
    ("public", TokenKind::Public),
    ("protected", TokenKind::Protected),
    ("private", TokenKind::Private),
    ("virtual", TokenKind::Virtual),
];

const OTHER_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "asm", "auto", "bool", "break", "case", "catch", "char",
    "char8_t", "char16_t", "char32_t", "concept", "const", "consteval", "constexpr",
    "constinit", "const_cast", "continue", "co_await", "co_return", "co_yield",
    "decltype", "default", "delete", "do", "double", "dynamic_cast", "else",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if",
    "inline", "int", "long", "mutable", "new", "noexcept", "nullptr", "operator",
    "register", "reinterpret_cast", "requires", "return", "short", "signed", "sizeof",
    "static", "static_assert", "static_cast", "switch", "template", "this",
    "thread_local", "throw", "true", "try", "typedef", "typeid", "typename",
    "unsigned", "using", "void", "volatile", "wchar_t", "while",
];

/// Operators longer than one character, longest first so the scan is
/// maximal-munch. `<<` and `>>` are deliberately absent: they lex as two
/// angle tokens so template argument lists stay balanced.
const COMPOUND_OPERATORS: &[&str] = &[
    "<=>", "<<=", ">>=", "->*", "->", "++", "--", "==", "!=", "<=", ">=", "&&", "||",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", ".*",
];

/// Lexer for C and C++ source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: FxHashMap<&'static str, TokenKind>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        let mut keywords = FxHashMap::default();
        keywords.extend(KEYWORDS.iter().copied());
        keywords.extend(OTHER_KEYWORDS.iter().map(|&word| (word, TokenKind::Keyword)));

        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.peek().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '/' if self.peek_ahead(1) == Some('/') => Ok(self.line_comment(loc)),
            '/' if self.peek_ahead(1) == Some('*') => self.block_comment(loc),
            '#' => Ok(self.directive(loc)),
            '[' if self.peek_ahead(1) == Some('[') => self.attribute(loc),
            '"' => self.quoted(loc, String::new(), '"', TokenKind::StringLiteral),
            '\'' => self.quoted(loc, String::new(), '\'', TokenKind::CharLiteral),
            '0'..='9' => Ok(self.number(loc)),
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                Ok(self.number(loc))
            }
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(loc),
            _ => self.punctuation(loc, ch),
        }
    }

    fn punctuation(&mut self, loc: SourceLocation, ch: char) -> Result<Token, LexError> {
        let single = match ch {
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            ';' => Some(TokenKind::Semicolon),
            ',' => Some(TokenKind::Comma),
            _ => None,
        };
        if let Some(kind) = single {
            self.advance();
            return Ok(Token::new(kind, ch.to_string(), loc));
        }

        if self.starts_with("::") {
            return Ok(self.take(2, TokenKind::ColonColon, loc));
        }
        if self.starts_with("...") {
            return Ok(self.take(3, TokenKind::Ellipsis, loc));
        }
        if let Some(op) = COMPOUND_OPERATORS.iter().find(|op| self.starts_with(op)) {
            return Ok(self.take(op.chars().count(), TokenKind::Operator, loc));
        }

        match ch {
            ':' => Ok(self.take(1, TokenKind::Colon, loc)),
            '<' => Ok(self.take(1, TokenKind::Less, loc)),
            '>' => Ok(self.take(1, TokenKind::Greater, loc)),
            '+' | '-' | '*' | '/' | '%' | '=' | '!' | '&' | '|' | '^' | '~' | '?' | '.' => {
                Ok(self.take(1, TokenKind::Operator, loc))
            }
            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Consume `count` characters as a single token of `kind`.
    fn take(&mut self, count: usize, kind: TokenKind, loc: SourceLocation) -> Token {
        let mut text = String::with_capacity(count);
        for _ in 0..count {
            if let Some(ch) = self.advance() {
                text.push(ch);
            }
        }
        Token::new(kind, text, loc)
    }

    /// Single-line comment (// ...), newline excluded
    fn line_comment(&mut self, loc: SourceLocation) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            text.push(ch);
            self.advance();
        }
        Token::new(TokenKind::LineComment, text, loc)
    }

    /// Multi-line comment (/* ... */)
    fn block_comment(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::new();
        text.extend(self.advance());
        text.extend(self.advance());

        while !self.is_at_end() {
            if self.starts_with("*/") {
                text.extend(self.advance());
                text.extend(self.advance());
                return Ok(Token::new(TokenKind::BlockComment, text, loc));
            }
            text.extend(self.advance());
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: loc,
        })
    }

    /// Preprocessor directive up to the end of the line, following `\`
    /// continuations.
    fn directive(&mut self, loc: SourceLocation) -> Token {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            if ch == '\\' && self.peek_ahead(1) == Some('\n') {
                text.extend(self.advance());
                text.extend(self.advance());
                continue;
            }
            text.push(ch);
            self.advance();
        }
        let trimmed_len = text.trim_end().len();
        text.truncate(trimmed_len);
        Token::new(TokenKind::Directive, text, loc)
    }

    /// `[[ ... ]]` attribute specifier
    fn attribute(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::new();
        let mut depth = 0usize;

        while let Some(ch) = self.advance() {
            text.push(ch);
            match ch {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Token::new(TokenKind::Attribute, text, loc));
                    }
                }
                _ => {}
            }
        }

        Err(LexError {
            message: "Unterminated attribute".to_string(),
            location: loc,
        })
    }

    /// String or character literal, escapes kept verbatim.
    fn quoted(
        &mut self,
        loc: SourceLocation,
        mut text: String,
        quote: char,
        kind: TokenKind,
    ) -> Result<Token, LexError> {
        text.extend(self.advance()); // opening quote

        while let Some(ch) = self.advance() {
            text.push(ch);
            if ch == '\\' {
                text.extend(self.advance());
            } else if ch == quote {
                return Ok(Token::new(kind, text, loc));
            } else if ch == '\n' {
                break;
            }
        }

        Err(LexError {
            message: format!("Unterminated {}", kind),
            location: loc,
        })
    }

    /// Raw string literal: `R"delim( ... )delim"`
    fn raw_string(&mut self, loc: SourceLocation, mut text: String) -> Result<Token, LexError> {
        text.extend(self.advance()); // opening quote

        let mut delimiter = String::new();
        while let Some(ch) = self.advance() {
            text.push(ch);
            if ch == '(' {
                break;
            }
            delimiter.push(ch);
        }

        let terminator = format!("){}\"", delimiter);
        while !self.is_at_end() {
            if self.starts_with(&terminator) {
                for _ in 0..terminator.chars().count() {
                    text.extend(self.advance());
                }
                return Ok(Token::new(TokenKind::StringLiteral, text, loc));
            }
            text.extend(self.advance());
        }

        Err(LexError {
            message: "Unterminated raw string literal".to_string(),
            location: loc,
        })
    }

    /// Numeric literal: integers, floats, hex, suffixes, digit separators.
    fn number(&mut self, loc: SourceLocation) -> Token {
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            let hex = text.starts_with("0x") || text.starts_with("0X");
            let exponent_sign = (ch == '+' || ch == '-')
                && match text.chars().last() {
                    Some('p' | 'P') => true,
                    Some('e' | 'E') => !hex,
                    _ => false,
                };
            let separator = ch == '\'' && self.peek_ahead(1).is_some_and(|c| c.is_ascii_alphanumeric());

            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || exponent_sign || separator {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Number, text, loc)
    }

    /// Parse identifier or keyword, including prefixed literals (`L"..."`,
    /// `u8'x'`, `R"(...)"`).
    fn identifier_or_keyword(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut ident = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match (ident.as_str(), self.peek()) {
            ("L" | "u" | "U" | "u8", Some('"')) => {
                return self.quoted(loc, ident, '"', TokenKind::StringLiteral)
            }
            ("L" | "u" | "U" | "u8", Some('\'')) => {
                return self.quoted(loc, ident, '\'', TokenKind::CharLiteral)
            }
            ("R" | "LR" | "uR" | "UR" | "u8R", Some('"')) => return self.raw_string(loc, ident),
            _ => {}
        }

        let kind = self
            .keywords
            .get(ident.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);

        Ok(Token::new(kind, ident, loc))
    }

    /// Skip whitespace and line continuations
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || (ch == '\\' && self.peek_ahead(1) == Some('\n')) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(offset, expected)| self.peek_ahead(offset) == Some(expected))
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_struct_declaration_tokens() {
        let tokens = tokenize("struct Point : public Base { int x; };").unwrap();

        assert!(tokens[0].is(TokenKind::Struct));
        assert!(tokens[1].is(TokenKind::Identifier));
        assert_eq!(tokens[1].text, "Point");
        assert!(tokens[2].is(TokenKind::Colon));
        assert!(tokens[3].is(TokenKind::Public));
        assert!(tokens[4].is(TokenKind::Identifier));
        assert!(tokens[5].is(TokenKind::LBrace));
        assert!(tokens[6].is(TokenKind::Keyword));
        assert_eq!(tokens[6].text, "int");
        assert!(tokens[8].is(TokenKind::Semicolon));
        assert!(tokens[9].is(TokenKind::RBrace));
        assert!(tokens[10].is(TokenKind::Semicolon));
        assert_eq!(tokens.len(), 11);
    }

    #[test]
    fn test_comments_are_kept_as_noise() {
        let tokens = tokenize("int x; // trailing\n/* block\ncomment */ int y;").unwrap();

        assert!(tokens[3].is(TokenKind::LineComment));
        assert_eq!(tokens[3].text, "// trailing");
        assert!(tokens[4].is(TokenKind::BlockComment));
        assert!(tokens[4].is_noise());
        assert!(!tokens[4].is_valid_for_statement());
        assert_eq!(tokens[5].location, SourceLocation::new(3, 12));
    }

    #[test]
    fn test_directive_with_continuation() {
        let tokens = tokenize("#define MAX(a, b) \\\n  ((a) > (b))\nint x;").unwrap();

        assert!(tokens[0].is(TokenKind::Directive));
        assert!(tokens[0].text.ends_with("((a) > (b))"));
        assert!(tokens[1].is(TokenKind::Keyword));
        assert_eq!(tokens[1].location.line, 3);
    }

    #[test]
    fn test_scope_and_angle_punctuation() {
        assert_eq!(
            kinds("::a::b<c<d>> ..."),
            vec![
                TokenKind::ColonColon,
                TokenKind::Identifier,
                TokenKind::ColonColon,
                TokenKind::Identifier,
                TokenKind::Less,
                TokenKind::Identifier,
                TokenKind::Less,
                TokenKind::Identifier,
                TokenKind::Greater,
                TokenKind::Greater,
                TokenKind::Ellipsis,
            ]
        );
    }

    #[test]
    fn test_attribute_and_literals() {
        let tokens = tokenize(r#"[[nodiscard]] auto s = u8"a{b"; char c = '}'; x = 1'000.5e-3f;"#)
            .unwrap();

        assert!(tokens[0].is(TokenKind::Attribute));
        assert_eq!(tokens[0].text, "[[nodiscard]]");
        assert!(tokens[4].is(TokenKind::StringLiteral));
        assert_eq!(tokens[4].text, r#"u8"a{b""#);
        assert!(tokens[9].is(TokenKind::CharLiteral));
        assert_eq!(tokens[13].text, "1'000.5e-3f");
    }

    #[test]
    fn test_raw_string_hides_braces() {
        let tokens = tokenize(r#"auto s = R"x({ } ")x";"#).unwrap();

        assert!(tokens[3].is(TokenKind::StringLiteral));
        assert!(tokens[4].is(TokenKind::Semicolon));
        assert!(!tokens.iter().any(|t| t.is(TokenKind::LBrace)));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("int x; /* never closed").unwrap_err();
        assert_eq!(err.message, "Unterminated block comment");
        assert_eq!(err.location, SourceLocation::new(1, 8));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("int @x;").unwrap_err();
        assert!(err.to_string().contains("Unexpected character: '@'"));
    }
}
