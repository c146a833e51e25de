//! Monkey lexer - tokenization for the Monkey programming language.
//!
//! This crate provides the lexer for Monkey, which converts source code into tokens
//! for parsing.
//!
//! # Example
//!
//! ```
//! use monkey_lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("let x = 42;");
//! let token = lexer.next_token();
//! assert_eq!(token.kind, TokenKind::Let);
//! ```

pub mod lexer;
pub mod token;

pub use lexer::{Lexer, tokenize};
pub use token::{Position, Token, TokenKind, lookup_identifier};
