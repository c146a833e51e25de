//! Monkey parser - AST construction for the Monkey programming language.
//!
//! This crate provides the parser for Monkey, which converts tokens into an AST.
//!
//! # Example
//!
//! ```
//! use monkey_parser::{Lexer, Parser};
//!
//! let mut parser = Parser::new(Lexer::new("let x = 1 + 2;"));
//! let program = parser.parse_program();
//! assert!(parser.errors().is_empty());
//! assert_eq!(program.to_string(), "let x = (1 + 2);");
//! ```

pub mod ast;
pub mod parser;
pub mod precedence;

pub use ast::*;
pub use monkey_lexer::Lexer;
pub use parser::{Parser, ParserConfig, ParserError, parse};
pub use precedence::Precedence;
