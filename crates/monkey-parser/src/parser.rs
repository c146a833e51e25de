//! Pratt parser for Monkey.

use crate::ast::*;
use crate::precedence::Precedence;
use monkey_lexer::{Lexer, Position, Token, TokenKind};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error(
        "expected next token to be {expected}, got {got} at line {line}, column {column}",
        line = .pos.line_number(),
        column = .pos.column_number()
    )]
    UnexpectedToken {
        expected: TokenKind,
        got: TokenKind,
        pos: Position,
    },

    #[error(
        "no prefix parse function for {kind} found at line {line}, column {column}",
        line = .pos.line_number(),
        column = .pos.column_number()
    )]
    NoPrefixParseFn { kind: TokenKind, pos: Position },

    #[error(
        "could not parse {literal:?} as integer at line {line}, column {column}",
        line = .pos.line_number(),
        column = .pos.column_number()
    )]
    InvalidInteger { literal: String, pos: Position },

    #[error(
        "maximum expression depth exceeded at line {line}, column {column}",
        line = .pos.line_number(),
        column = .pos.column_number()
    )]
    MaxDepth { pos: Position },
}

impl ParserError {
    /// Source position the error points at.
    pub fn pos(&self) -> Position {
        match self {
            ParserError::UnexpectedToken { pos, .. }
            | ParserError::NoPrefixParseFn { pos, .. }
            | ParserError::InvalidInteger { pos, .. }
            | ParserError::MaxDepth { pos } => *pos,
        }
    }
}

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of expressions before parsing gives up.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: 500 }
    }
}

type PrefixParseFn = fn(&mut Parser) -> Option<Expr>;
type InfixParseFn = fn(&mut Parser, Expr) -> Option<Expr>;

/// Pratt parser for Monkey source code.
///
/// Parsing never aborts: problems are collected and can be inspected with
/// [`Parser::errors`] once [`Parser::parse_program`] returns. A program is
/// only trustworthy when that list is empty.
pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParserError>,
    prefix_fns: HashMap<TokenKind, PrefixParseFn>,
    infix_fns: HashMap<TokenKind, InfixParseFn>,
    config: ParserConfig,
    depth: usize,
    block_depth: usize,
}

impl Parser {
    /// Create a new parser for the given lexer.
    pub fn new(lexer: Lexer) -> Self {
        Self::with_config(lexer, ParserConfig::default())
    }

    /// Create a new parser with explicit settings.
    pub fn with_config(mut lexer: Lexer, config: ParserConfig) -> Self {
        // Fill both cur_token and peek_token. On empty input both are Eof.
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();

        let mut parser = Self {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
            prefix_fns: HashMap::new(),
            infix_fns: HashMap::new(),
            config,
            depth: 0,
            block_depth: 0,
        };

        parser.register_prefix(TokenKind::Ident, Parser::parse_ident);
        parser.register_prefix(TokenKind::Int, Parser::parse_int);
        parser.register_prefix(TokenKind::True, Parser::parse_bool);
        parser.register_prefix(TokenKind::False, Parser::parse_bool);
        parser.register_prefix(TokenKind::Bang, Parser::parse_prefix);
        parser.register_prefix(TokenKind::Minus, Parser::parse_prefix);
        parser.register_prefix(TokenKind::LParen, Parser::parse_grouped);
        parser.register_prefix(TokenKind::If, Parser::parse_if);
        parser.register_prefix(TokenKind::Function, Parser::parse_func);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::LtEquals,
            TokenKind::Gt,
            TokenKind::GtEquals,
        ] {
            parser.register_infix(kind, Parser::parse_infix);
        }
        parser.register_infix(TokenKind::LParen, Parser::parse_call);

        parser
    }

    fn register_prefix(&mut self, kind: TokenKind, f: PrefixParseFn) {
        self.prefix_fns.insert(kind, f);
    }

    fn register_infix(&mut self, kind: TokenKind, f: InfixParseFn) {
        self.infix_fns.insert(kind, f);
    }

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advance if the peek token has the given kind, otherwise record an
    /// error and stay on the current token.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            self.peek_error(kind);
            false
        }
    }

    fn push_error(&mut self, error: ParserError) {
        tracing::debug!(%error, "parse error");
        self.errors.push(error);
    }

    fn peek_error(&mut self, kind: TokenKind) {
        self.push_error(ParserError::UnexpectedToken {
            expected: kind,
            got: self.peek_token.kind,
            pos: self.peek_token.start,
        });
    }

    fn no_prefix_parse_fn_error(&mut self, kind: TokenKind) {
        self.push_error(ParserError::NoPrefixParseFn {
            kind,
            pos: self.cur_token.start,
        });
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::from_token(self.cur_token.kind)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::from_token(self.peek_token.kind)
    }

    /// Skip the rest of a malformed statement.
    ///
    /// Stops on a `;` or at end of input. Inside a block it also stops on
    /// the token before a closing `}` so the block can still see its
    /// terminator. Outside any block a stray `}` ends the statement, taking
    /// a directly following `;` with it.
    fn synchronize(&mut self) {
        loop {
            match self.cur_token.kind {
                TokenKind::Semicolon | TokenKind::Eof => return,
                TokenKind::RBrace
                    if self.block_depth == 0 && !self.peek_token_is(TokenKind::Semicolon) =>
                {
                    return;
                }
                _ => {}
            }
            if self.block_depth > 0 && self.peek_token_is(TokenKind::RBrace) {
                return;
            }
            self.next_token();
        }
    }

    /// Parse the entire program.
    ///
    /// Statements that fail to parse are left out of the program; the
    /// reason is recorded in [`Parser::errors`].
    pub fn parse_program(&mut self) -> Program {
        let mut stmts = Vec::new();

        while !self.cur_token_is(TokenKind::Eof) {
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
            self.next_token();
        }

        tracing::debug!(
            statements = stmts.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Program { stmts }
    }

    /// Get all parse errors.
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Consume the parser and return its errors.
    pub fn into_errors(self) -> Vec<ParserError> {
        self.errors
    }

    // =========================================================================
    // Statement Parsing
    // =========================================================================

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Return => self.parse_return(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Ident {
            token: self.cur_token.clone(),
            name: self.cur_token.literal.clone(),
        };

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token(); // consume '='

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Stmt::Let(LetStmt { token, name, value }))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        self.next_token(); // consume 'return'

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Stmt::Return(ReturnStmt { token, value }))
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let token = self.cur_token.clone();
        let expr = self.parse_expression(Precedence::Lowest)?;

        // The terminator is optional, e.g. at end of input.
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Stmt::Expr(ExprStmt { token, expr }))
    }

    fn parse_block(&mut self) -> Option<BlockStmt> {
        self.block_depth += 1;
        let block = self.parse_block_stmts();
        self.block_depth -= 1;
        block
    }

    fn parse_block_stmts(&mut self) -> Option<BlockStmt> {
        let token = self.cur_token.clone();
        self.next_token(); // consume '{'

        let mut stmts = Vec::new();
        while !self.cur_token_is(TokenKind::RBrace) {
            if self.cur_token_is(TokenKind::Eof) {
                self.push_error(ParserError::UnexpectedToken {
                    expected: TokenKind::RBrace,
                    got: TokenKind::Eof,
                    pos: self.cur_token.start,
                });
                return None;
            }
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => {
                    // The failed statement may have stopped on our own '}'.
                    if self.cur_token_is(TokenKind::RBrace) {
                        break;
                    }
                    self.synchronize();
                }
            }
            self.next_token();
        }

        Some(BlockStmt { token, stmts })
    }

    // =========================================================================
    // Expression Parsing
    // =========================================================================

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        if self.depth >= self.config.max_depth {
            self.push_error(ParserError::MaxDepth {
                pos: self.cur_token.start,
            });
            return None;
        }

        self.depth += 1;
        let expr = self.parse_expression_inner(precedence);
        self.depth -= 1;
        expr
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expr> {
        let Some(prefix_fn) = self.prefix_fns.get(&self.cur_token.kind).copied() else {
            self.no_prefix_parse_fn_error(self.cur_token.kind);
            return None;
        };

        let mut left = prefix_fn(self)?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix_fn) = self.infix_fns.get(&self.peek_token.kind).copied() else {
                break;
            };
            self.next_token();
            left = infix_fn(self, left)?;
        }

        Some(left)
    }

    // =========================================================================
    // Prefix Handlers
    // =========================================================================

    fn parse_ident(&mut self) -> Option<Expr> {
        Some(Expr::Ident(Ident {
            token: self.cur_token.clone(),
            name: self.cur_token.literal.clone(),
        }))
    }

    fn parse_int(&mut self) -> Option<Expr> {
        let Ok(value) = self.cur_token.literal.parse::<i64>() else {
            self.push_error(ParserError::InvalidInteger {
                literal: self.cur_token.literal.clone(),
                pos: self.cur_token.start,
            });
            return None;
        };
        Some(Expr::Int(IntLit {
            token: self.cur_token.clone(),
            value,
        }))
    }

    fn parse_bool(&mut self) -> Option<Expr> {
        Some(Expr::Bool(BoolLit {
            token: self.cur_token.clone(),
            value: self.cur_token_is(TokenKind::True),
        }))
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let op = token.literal.clone();
        self.next_token(); // consume operator

        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expr::Prefix(Box::new(PrefixExpr { token, op, right })))
    }

    fn parse_grouped(&mut self) -> Option<Expr> {
        self.next_token(); // consume '('

        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token(); // consume '('
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RParen) || !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block()?;

        let mut alternative = None;
        if self.peek_token_is(TokenKind::Else) {
            self.next_token(); // move to 'else'
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            alternative = Some(self.parse_block()?);
        }

        Some(Expr::If(Box::new(IfExpr {
            token,
            condition,
            consequence,
            alternative,
        })))
    }

    fn parse_func(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_func_params()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;

        Some(Expr::Func(Box::new(FuncLit {
            token,
            params,
            body,
        })))
    }

    fn parse_func_params(&mut self) -> Option<Vec<Ident>> {
        let mut params = Vec::new();

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(params);
        }

        loop {
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            params.push(Ident {
                token: self.cur_token.clone(),
                name: self.cur_token.literal.clone(),
            });
            if !self.peek_token_is(TokenKind::Comma) {
                break;
            }
            self.next_token(); // move to ','
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(params)
    }

    // =========================================================================
    // Infix Handlers
    // =========================================================================

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let op = token.literal.clone();
        let precedence = self.cur_precedence();
        self.next_token(); // consume operator

        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix(Box::new(InfixExpr {
            token,
            left,
            op,
            right,
        })))
    }

    fn parse_call(&mut self, function: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let args = self.parse_call_args()?;

        Some(Expr::Call(Box::new(CallExpr {
            token,
            function,
            args,
        })))
    }

    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(args);
        }

        self.next_token(); // consume '('
        args.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token(); // move to ','
            self.next_token(); // consume ','
            args.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(args)
    }
}

/// Parse source code into an AST.
///
/// Returns every recorded error when the source is malformed.
pub fn parse(source: &str) -> Result<Program, Vec<ParserError>> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    let errors = parser.into_errors();
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(errors)
    }
}
