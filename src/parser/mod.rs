//! C and C++ structure parser
//!
//! This module turns source text into a statement tree:
//! - [`lexer`]: Tokenization (source text → tokens, comments and directives kept)
//! - [`parse`]: Entry point (tokens → [`ast::Statement`] tree)
//! - [`ast`]: Tree node definitions and queries
//!
//! # Recognized constructs
//!
//! - `namespace`, `class`, `struct`, `union` and `enum`, named or nameless
//! - base lists (`: public Base<T>, virtual Other`) and enum underlying types
//! - brace bodies, recursively, and bare `{ ... }` blocks
//! - declarators after a body (`struct { } a, *b;`)
//!
//! Everything else is grouped into flat statements ending at `;`. There is no
//! expression parsing and no preprocessing; directives stay in the tree as
//! single tokens.

pub mod ast;
mod clauses;
pub mod cursor;
mod declarations;
pub mod errors;
pub mod lexer;
pub mod parse;
pub mod recognizer;
pub mod scope;
pub mod statements;
