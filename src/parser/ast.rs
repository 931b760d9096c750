// Statement tree definitions consumed by style rules

use super::errors::StructureError;
use super::lexer::Token;
use serde::Serialize;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What a [`Statement`] node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Top of the tree; owns the whole token range
    Root,
    /// A run of tokens no construct recognizer accepted
    Flat,
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    /// Bare `{ ... }` at statement position (function bodies, compound statements)
    Block,
    /// Brace-delimited body of a construct
    Scope,
    /// Base list (`: public A, B`) or enum underlying type
    Heritage,
    /// Declarators between a closing brace and the terminating semicolon
    Variables,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatementKind::Root => "root",
            StatementKind::Flat => "flat",
            StatementKind::Namespace => "namespace",
            StatementKind::Class => "class",
            StatementKind::Struct => "struct",
            StatementKind::Union => "union",
            StatementKind::Enum => "enum",
            StatementKind::Block => "block",
            StatementKind::Scope => "scope",
            StatementKind::Heritage => "heritage",
            StatementKind::Variables => "variables",
        };
        f.write_str(text)
    }
}

/// A node of the statement tree.
///
/// `tokens` holds only what this node owns directly (its keyword, name,
/// punctuation and any noise attached while it was being built). Descendant
/// tokens live in `children`. The optional parts (`heritage`, `scope`,
/// `variables`) are indices into `children`, never copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement<'a> {
    pub(crate) kind: StatementKind,
    pub(crate) tokens: Vec<&'a Token>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) children: Vec<Statement<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<&'a Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) heritage: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scope: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) variables: Option<usize>,
}

impl<'a> Statement<'a> {
    pub(crate) fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            tokens: Vec::new(),
            children: Vec::new(),
            name: None,
            heritage: None,
            scope: None,
            variables: None,
        }
    }

    pub(crate) fn push(&mut self, token: &'a Token) {
        self.tokens.push(token);
    }

    pub(crate) fn extend(&mut self, tokens: impl IntoIterator<Item = &'a Token>) {
        self.tokens.extend(tokens);
    }

    /// Append a finished child and return its index.
    pub(crate) fn push_child(&mut self, child: Statement<'a>) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn tokens(&self) -> &[&'a Token] {
        &self.tokens
    }

    pub fn children(&self) -> &[Statement<'a>] {
        &self.children
    }

    pub fn name(&self) -> Option<&'a Token> {
        self.name
    }

    pub fn name_text(&self) -> Option<&'a str> {
        self.name.map(|token| token.text.as_str())
    }

    pub fn heritage(&self) -> Option<&Statement<'a>> {
        self.heritage.map(|index| &self.children[index])
    }

    /// The brace-delimited body.
    ///
    /// A construct that never acquired a body (forward declaration shape,
    /// malformed input) yields [`StructureError::MissingScope`]; an empty
    /// body is a `Scope` node with no children.
    pub fn scope(&self) -> Result<&Statement<'a>, StructureError> {
        self.scope
            .map(|index| &self.children[index])
            .ok_or_else(|| StructureError::MissingScope {
                kind: self.kind,
                location: self.location(),
            })
    }

    pub fn has_scope(&self) -> bool {
        self.scope.is_some()
    }

    pub fn variables(&self) -> Option<&Statement<'a>> {
        self.variables.map(|index| &self.children[index])
    }

    /// Own tokens that are not comments, directives or attributes.
    pub fn significant_tokens(&self) -> impl Iterator<Item = &'a Token> + '_ {
        self.tokens.iter().copied().filter(|token| token.is_valid_for_statement())
    }

    /// Earliest source position covered by this node or its descendants.
    pub fn location(&self) -> Option<SourceLocation> {
        let own = self.tokens.first().map(|token| token.location);
        let child = self.children.first().and_then(Statement::location);
        match (own, child) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.children.is_empty()
    }

    /// Number of tokens owned by this node and all of its descendants.
    pub fn token_count(&self) -> usize {
        self.tokens.len() + self.children.iter().map(Statement::token_count).sum::<usize>()
    }

    /// Deepest chain of nested `Scope` nodes below and including this one.
    pub fn nesting_depth(&self) -> usize {
        let own = usize::from(self.kind == StatementKind::Scope);
        own + self
            .children
            .iter()
            .map(Statement::nesting_depth)
            .max()
            .unwrap_or(0)
    }

    /// Preorder traversal of this node and every descendant.
    pub fn iter(&self) -> Walk<'_, 'a> {
        Walk { stack: vec![self] }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:width$}{}", "", self.kind, width = indent * 2)?;
        if let Some(name) = self.name {
            write!(f, " {}", name.text)?;
        }
        if matches!(
            self.kind,
            StatementKind::Flat | StatementKind::Heritage | StatementKind::Variables
        ) {
            let text: Vec<&str> = self.significant_tokens().map(|t| t.text.as_str()).collect();
            write!(f, " `{}`", text.join(" "))?;
        }
        writeln!(f)?;

        for child in &self.children {
            child.write_outline(f, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

/// Preorder iterator returned by [`Statement::iter`]
pub struct Walk<'s, 'a> {
    stack: Vec<&'s Statement<'a>>,
}

impl<'s, 'a> Iterator for Walk<'s, 'a> {
    type Item = &'s Statement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
