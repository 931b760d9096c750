//! # Introduction
//!
//! stylescope builds a lossless statement tree out of C and C++ source, as the
//! structural front-end of a style checker. Every token, comments included,
//! lands in exactly one node, so rules can inspect both layout and structure.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → StructureParser → Statement tree
//! ```
//!
//! 1. [`parser::lexer`] tokenises the source, keeping comments, directives and
//!    attributes as tokens of their own.
//! 2. [`parser::parse::StructureParser`] runs the construct recognizers over
//!    the tokens and builds [`parser::ast::Statement`] nodes that borrow them.
//! 3. [`config`] holds the nesting limit and recognizer precedence, loadable
//!    from JSON.
//!
//! ```
//! use stylescope::parser::{lexer::tokenize, parse::parse_tokens};
//!
//! let tokens = tokenize("struct A : Base { int x; } a;").unwrap();
//! let tree = parse_tokens(&tokens).unwrap();
//! let a = &tree.children()[0];
//! assert_eq!(a.name_text(), Some("A"));
//! assert!(a.heritage().is_some());
//! assert_eq!(a.variables().unwrap().tokens().len(), 1);
//! ```

pub mod config;
pub mod parser;

pub use config::BuilderConfig;
pub use parser::ast::{SourceLocation, Statement, StatementKind};
pub use parser::errors::StructureError;
pub use parser::lexer::{tokenize, LexError, Token, TokenKind};
pub use parser::parse::{parse_tokens, StructureParser};
pub use parser::recognizer::ConstructKind;
