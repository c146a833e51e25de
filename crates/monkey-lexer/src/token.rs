//! Token types for the Monkey lexer.

use std::fmt;

/// Token kinds for the Monkey language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // Literals
    Int,
    Ident,

    // Operators
    Assign,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Bang,

    // Comparison
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEquals,
    GtEquals,

    // Punctuation
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // Keywords
    Function,
    Let,
    If,
    Else,
    Return,
    True,
    False,

    // Special
    Eof,
    Illegal,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Int => "INT",
            TokenKind::Ident => "IDENT",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEquals => "<=",
            TokenKind::GtEquals => ">=",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Function => "fn",
            TokenKind::Let => "let",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
        };
        write!(f, "{}", s)
    }
}

/// Look up an identifier to see if it's a keyword.
pub fn lookup_identifier(ident: &str) -> TokenKind {
    match ident {
        "fn" => TokenKind::Function,
        "let" => TokenKind::Let,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => TokenKind::Ident,
    }
}

/// Position in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset within the source.
    pub offset: usize,
    /// Byte offset of the start of the current line.
    pub line_start: usize,
    /// 0-indexed line number.
    pub line: usize,
    /// 0-indexed column number.
    pub column: usize,
}

impl Position {
    /// Create a new Position.
    pub fn new(offset: usize, line_start: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line_start,
            line,
            column,
        }
    }

    /// Returns the 1-indexed line number.
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// Returns the 1-indexed column number.
    pub fn column_number(&self) -> usize {
        self.column + 1
    }

    /// Advance this position by n bytes on the same line.
    pub fn advance(&self, n: usize) -> Self {
        Self {
            offset: self.offset + n,
            line_start: self.line_start,
            line: self.line,
            column: self.column + n,
        }
    }

    /// Text of the line containing this position, without the line break.
    ///
    /// Returns an empty string if the position lies outside `source`.
    pub fn line_in<'a>(&self, source: &'a str) -> &'a str {
        let Some(rest) = source.get(self.line_start..) else {
            return "";
        };
        let end = rest.find(|c: char| c == '\n' || c == '\r').unwrap_or(rest.len());
        &rest[..end]
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The literal source text.
    pub literal: String,
    /// Start position in source.
    pub start: Position,
    /// End position in source (exclusive).
    pub end: Position,
}

impl Token {
    /// Create a new Token.
    pub fn new(kind: TokenKind, literal: String, start: Position, end: Position) -> Self {
        Self {
            kind,
            literal,
            start,
            end,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.kind, self.literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_identifier() {
        assert_eq!(lookup_identifier("fn"), TokenKind::Function);
        assert_eq!(lookup_identifier("let"), TokenKind::Let);
        assert_eq!(lookup_identifier("if"), TokenKind::If);
        assert_eq!(lookup_identifier("else"), TokenKind::Else);
        assert_eq!(lookup_identifier("return"), TokenKind::Return);
        assert_eq!(lookup_identifier("true"), TokenKind::True);
        assert_eq!(lookup_identifier("false"), TokenKind::False);
        assert_eq!(lookup_identifier("foo"), TokenKind::Ident);
    }

    #[test]
    fn test_lookup_is_exact_and_case_sensitive() {
        assert_eq!(lookup_identifier("Let"), TokenKind::Ident);
        assert_eq!(lookup_identifier("LET"), TokenKind::Ident);
        assert_eq!(lookup_identifier("le"), TokenKind::Ident);
        assert_eq!(lookup_identifier("lets"), TokenKind::Ident);
        assert_eq!(lookup_identifier("function"), TokenKind::Ident);
    }

    #[test]
    fn test_position() {
        let pos = Position::new(10, 5, 1, 5);
        assert_eq!(pos.line_number(), 2);
        assert_eq!(pos.column_number(), 6);

        let advanced = pos.advance(3);
        assert_eq!(advanced.offset, 13);
        assert_eq!(advanced.column, 8);
    }

    #[test]
    fn test_line_in() {
        let source = "let x = 1;\nlet y 2;\r\nz";
        assert_eq!(Position::new(15, 11, 1, 4).line_in(source), "let y 2;");
        assert_eq!(Position::new(0, 0, 0, 0).line_in(source), "let x = 1;");
        assert_eq!(Position::new(21, 21, 2, 0).line_in(source), "z");
        assert_eq!(Position::new(99, 99, 9, 0).line_in(source), "");
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Eq.to_string(), "==");
        assert_eq!(TokenKind::Ident.to_string(), "IDENT");
        let tok = Token::new(
            TokenKind::Int,
            "5".to_string(),
            Position::default(),
            Position::default().advance(1),
        );
        assert_eq!(tok.to_string(), "Int \"5\"");
    }
}
