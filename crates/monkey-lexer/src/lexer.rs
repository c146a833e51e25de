//! Lexer for the Monkey programming language.
//!
//! The lexer works on single bytes. Identifiers, integers and operators are
//! ASCII. Any other character becomes one `Illegal` token whose literal is
//! the whole character as written in the source, so spans always fall on
//! character boundaries. Columns count bytes.

use crate::token::{Position, Token, TokenKind, lookup_identifier};

/// Lexer tokenizes Monkey source code on demand.
pub struct Lexer {
    input: String,
    position: usize,
    next_position: usize,
    ch: u8,
    line: usize,
    line_start: usize,
    token_start: Position,
}

impl Lexer {
    /// Create a new lexer for the given input.
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.to_string(),
            position: 0,
            next_position: 0,
            ch: 0,
            line: 0,
            line_start: 0,
            token_start: Position::default(),
        };
        lexer.read_char();
        lexer
    }

    /// Get the current position.
    fn current_position(&self) -> Position {
        Position::new(
            self.position,
            self.line_start,
            self.line,
            self.position - self.line_start,
        )
    }

    /// Read the next byte. Past the end of input `ch` is 0.
    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.line_start = self.next_position;
        }
        let bytes = self.input.as_bytes();
        if self.next_position >= bytes.len() {
            self.ch = 0;
            self.position = bytes.len();
            self.next_position = bytes.len() + 1;
        } else {
            self.ch = bytes[self.next_position];
            self.position = self.next_position;
            self.next_position += 1;
        }
    }

    /// Peek at the next byte without consuming it.
    fn peek_char(&self) -> u8 {
        self.input
            .as_bytes()
            .get(self.next_position)
            .copied()
            .unwrap_or(0)
    }

    /// True once every byte of the input has been consumed.
    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Skip spaces, tabs, newlines and carriage returns.
    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            self.read_char();
        }
    }

    /// Start tracking a new token.
    fn start_token(&mut self) {
        self.token_start = self.current_position();
    }

    /// Create a token spanning every byte consumed since the token started.
    fn make_token(&self, kind: TokenKind, literal: String) -> Token {
        let end = self.token_start.advance(self.position - self.token_start.offset);
        Token::new(kind, literal, self.token_start, end)
    }

    /// Get the next token.
    ///
    /// Once the input is exhausted every call returns an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start_token();
        let token = self.scan_token();
        tracing::trace!(
            kind = ?token.kind,
            literal = %token.literal,
            line = token.start.line_number(),
            column = token.start.column_number(),
            "token"
        );
        token
    }

    fn scan_token(&mut self) -> Token {
        if self.at_end() {
            return self.make_token(TokenKind::Eof, String::new());
        }

        // Identifiers and numbers leave the cursor on the byte after the lexeme.
        if is_letter(self.ch) {
            return self.read_identifier();
        }
        if self.ch.is_ascii_digit() {
            return self.read_number();
        }

        if let Some(tok) = self.read_operator() {
            return tok;
        }

        // Unknown character, consumed whole even when it spans several bytes.
        let start = self.position;
        let width = self
            .input
            .get(start..)
            .and_then(|rest| rest.chars().next())
            .map_or(1, char::len_utf8);
        for _ in 0..width {
            self.read_char();
        }
        let literal = self.input[start..self.position].to_string();
        self.make_token(TokenKind::Illegal, literal)
    }

    /// Read an identifier or keyword.
    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        while is_letter(self.ch) {
            self.read_char();
        }
        let literal = self.input[start..self.position].to_string();
        let kind = lookup_identifier(&literal);
        self.make_token(kind, literal)
    }

    /// Read a decimal integer literal. The text is converted by the parser.
    fn read_number(&mut self) -> Token {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        let literal = self.input[start..self.position].to_string();
        self.make_token(TokenKind::Int, literal)
    }

    /// Read an operator or punctuation token.
    fn read_operator(&mut self) -> Option<Token> {
        let start = self.position;

        let two_char = match (self.ch, self.peek_char()) {
            (b'=', b'=') => Some(TokenKind::Eq),
            (b'!', b'=') => Some(TokenKind::NotEq),
            (b'<', b'=') => Some(TokenKind::LtEquals),
            (b'>', b'=') => Some(TokenKind::GtEquals),
            _ => None,
        };

        if let Some(kind) = two_char {
            self.read_char();
            self.read_char();
            let literal = self.input[start..self.position].to_string();
            return Some(self.make_token(kind, literal));
        }

        let kind = match self.ch {
            b'=' => TokenKind::Assign,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Asterisk,
            b'/' => TokenKind::Slash,
            b'!' => TokenKind::Bang,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            _ => return None,
        };

        self.read_char();
        let literal = self.input[start..self.position].to_string();
        Some(self.make_token(kind, literal))
    }
}

/// Yields tokens up to, but not including, `Eof`.
impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Check if a byte can appear in an identifier.
fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

/// Tokenize an input string into a vector of tokens, ending with `Eof`.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token();
        let is_eof = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if is_eof {
            break;
        }
    }
    tokens
}
