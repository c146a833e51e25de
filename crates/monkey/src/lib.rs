//! Monkey - lexer and Pratt parser for the Monkey programming language.
//!
//! Source text is turned into tokens by [`Lexer`] and into a [`Program`] by
//! [`Parser`]. Evaluation is left to the consumer of the tree.
//!
//! # Example
//!
//! ```
//! use monkey::parse;
//!
//! let program = parse("let x = 10;\nx * 2").unwrap();
//! assert_eq!(program.to_string(), "let x = 10;(x * 2)");
//! ```

use std::fmt;

use thiserror::Error;

pub use monkey_lexer as lexer;
pub use monkey_parser as parser;

// Re-export commonly used types
pub use monkey_lexer::{Lexer, Position, Token, TokenKind, tokenize};
pub use monkey_parser::{Expr, Node, Parser, ParserConfig, ParserError, Program, Stmt};

/// Every error recorded while parsing a source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(pub Vec<ParserError>);

impl ParseErrors {
    /// The individual errors, in source order.
    pub fn errors(&self) -> &[ParserError] {
        &self.0
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("\n"))
    }
}

/// Parse Monkey source code into a [`Program`].
///
/// This is a convenience function that runs a parser with the default
/// [`ParserConfig`] and fails if any error was recorded.
///
/// # Example
///
/// ```
/// use monkey::parse;
///
/// let err = parse("let = 5;").unwrap_err();
/// assert_eq!(err.errors().len(), 1);
/// ```
pub fn parse(source: &str) -> Result<Program, ParseErrors> {
    parse_with_config(source, ParserConfig::default())
}

/// Parse Monkey source code with explicit parser settings.
pub fn parse_with_config(source: &str, config: ParserConfig) -> Result<Program, ParseErrors> {
    let mut parser = Parser::with_config(Lexer::new(source), config);
    let program = parser.parse_program();
    let errors = parser.into_errors();
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(ParseErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkey_parser::{LetStmt, ReturnStmt};
    use pretty_assertions::assert_eq;

    fn parse_ok(source: &str) -> Program {
        parse(source).unwrap_or_else(|e| panic!("parse failed for {:?}:\n{}", source, e))
    }

    fn parse_err(source: &str) -> ParseErrors {
        match parse(source) {
            Ok(program) => panic!("expected errors for {:?}, got {}", source, program),
            Err(e) => e,
        }
    }

    #[test]
    fn test_whitespace_only() {
        assert!(parse_ok("").stmts.is_empty());
        assert!(parse_ok(" \n\t \r\n").stmts.is_empty());
    }

    #[test]
    fn test_let_statements() {
        let program = parse_ok("let x = 5;\nlet y = 10;\nlet foobar = 1337;");
        let names: Vec<&str> = program
            .stmts
            .iter()
            .map(|s| match s {
                Stmt::Let(LetStmt { name, .. }) => name.name.as_str(),
                other => panic!("expected let statement, got {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["x", "y", "foobar"]);
        assert!(program.stmts.iter().all(|s| s.token_literal() == "let"));
    }

    #[test]
    fn test_return_statements() {
        let program = parse_ok("return 5; return 1337;");
        assert_eq!(program.stmts.len(), 2);
        for stmt in &program.stmts {
            assert!(matches!(stmt, Stmt::Return(ReturnStmt { .. })));
            assert_eq!(stmt.token_literal(), "return");
        }
    }

    #[test]
    fn test_rendering_round_trip() {
        let source = "let a = 1 + 2 * 3;\nreturn -a;\nlet f = fn(x) { x };\nf(a)";
        let program = parse_ok(source);

        let mut expected = String::new();
        for stmt in &program.stmts {
            match stmt {
                Stmt::Let(s) => expected.push_str(&format!("let {} = {};", s.name, s.value)),
                Stmt::Return(s) => expected.push_str(&format!("return {};", s.value)),
                Stmt::Expr(s) => expected.push_str(&s.expr.to_string()),
            }
        }
        assert_eq!(program.to_string(), expected);
        assert_eq!(
            program.to_string(),
            "let a = (1 + (2 * 3));return (-a);let f = fn(x) { x };f(a)"
        );

        // Rendering is itself valid source that parses to the same text.
        assert_eq!(parse_ok(&program.to_string()).to_string(), program.to_string());
    }

    #[test]
    fn test_two_char_operators_tokenize_once() {
        for (source, kind) in [
            ("==", TokenKind::Eq),
            ("!=", TokenKind::NotEq),
            ("<=", TokenKind::LtEquals),
            (">=", TokenKind::GtEquals),
        ] {
            let tokens = tokenize(source);
            assert_eq!(tokens.len(), 2);
            assert_eq!(tokens[0].kind, kind);
            assert_eq!(tokens[1].kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_malformed_let_keeps_parsing() {
        let err = parse_err("let x 5;\nlet y = 10;");
        assert_eq!(
            err.to_string(),
            "expected next token to be =, got INT at line 1, column 7"
        );

        let mut parser = Parser::new(Lexer::new("let x 5;\nlet y = 10;"));
        let program = parser.parse_program();
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(program.to_string(), "let y = 10;");
    }

    #[test]
    fn test_errors_display_one_per_line() {
        let err = parse_err("let = 1;\n@;");
        assert_eq!(err.errors().len(), 2);
        assert_eq!(
            err.to_string(),
            "expected next token to be IDENT, got = at line 1, column 5\n\
             no prefix parse function for ILLEGAL found at line 2, column 1"
        );
    }

    #[test]
    fn test_config_is_honored() {
        let source = "-(-(-(-1)))";
        assert!(parse(source).is_ok());
        let err = parse_with_config(source, ParserConfig { max_depth: 3 }).unwrap_err();
        assert!(matches!(err.errors(), [ParserError::MaxDepth { .. }]));
    }
}
