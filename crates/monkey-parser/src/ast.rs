//! AST node types for the Monkey parser.
//!
//! Every node keeps the token it was built from so diagnostics and
//! evaluators can point back into the source. Children are owned by their
//! parent; a `Program` drops its whole tree at once.

use monkey_lexer::{Position, Token};
use std::fmt;

/// Base trait for all AST nodes.
pub trait Node: fmt::Display {
    /// Literal text of the token this node was built from.
    fn token_literal(&self) -> &str;
    fn pos(&self) -> Position;
}

// ============================================================================
// Expressions
// ============================================================================

/// Expression node enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Int(IntLit),
    Bool(BoolLit),
    Prefix(Box<PrefixExpr>),
    Infix(Box<InfixExpr>),
    If(Box<IfExpr>),
    Func(Box<FuncLit>),
    Call(Box<CallExpr>),
}

impl Node for Expr {
    fn token_literal(&self) -> &str {
        match self {
            Expr::Ident(e) => e.token_literal(),
            Expr::Int(e) => e.token_literal(),
            Expr::Bool(e) => e.token_literal(),
            Expr::Prefix(e) => e.token_literal(),
            Expr::Infix(e) => e.token_literal(),
            Expr::If(e) => e.token_literal(),
            Expr::Func(e) => e.token_literal(),
            Expr::Call(e) => e.token_literal(),
        }
    }

    fn pos(&self) -> Position {
        match self {
            Expr::Ident(e) => e.pos(),
            Expr::Int(e) => e.pos(),
            Expr::Bool(e) => e.pos(),
            Expr::Prefix(e) => e.pos(),
            Expr::Infix(e) => e.pos(),
            Expr::If(e) => e.pos(),
            Expr::Func(e) => e.pos(),
            Expr::Call(e) => e.pos(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(e) => write!(f, "{}", e),
            Expr::Int(e) => write!(f, "{}", e),
            Expr::Bool(e) => write!(f, "{}", e),
            Expr::Prefix(e) => write!(f, "{}", e),
            Expr::Infix(e) => write!(f, "{}", e),
            Expr::If(e) => write!(f, "{}", e),
            Expr::Func(e) => write!(f, "{}", e),
            Expr::Call(e) => write!(f, "{}", e),
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Statement node enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Return(ReturnStmt),
    Expr(ExprStmt),
}

impl Node for Stmt {
    fn token_literal(&self) -> &str {
        match self {
            Stmt::Let(s) => s.token_literal(),
            Stmt::Return(s) => s.token_literal(),
            Stmt::Expr(s) => s.token_literal(),
        }
    }

    fn pos(&self) -> Position {
        match self {
            Stmt::Let(s) => s.pos(),
            Stmt::Return(s) => s.pos(),
            Stmt::Expr(s) => s.pos(),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let(s) => write!(f, "{}", s),
            Stmt::Return(s) => write!(f, "{}", s),
            Stmt::Expr(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Identifier and Literals
// ============================================================================

/// A name reference, e.g. `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

impl Node for Ident {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Integer literal (e.g., `42`).
#[derive(Debug, Clone, PartialEq)]
pub struct IntLit {
    pub token: Token,
    pub value: i64,
}

impl Node for IntLit {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for IntLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

/// Boolean literal (`true` or `false`).
#[derive(Debug, Clone, PartialEq)]
pub struct BoolLit {
    pub token: Token,
    pub value: bool,
}

impl Node for BoolLit {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for BoolLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token.literal)
    }
}

// ============================================================================
// Operator Expressions
// ============================================================================

/// Prefix operator expression (e.g., `-x`, `!ok`).
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub token: Token,
    pub op: String,
    pub right: Expr,
}

impl Node for PrefixExpr {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for PrefixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.op, self.right)
    }
}

/// Binary operator expression. `token` is the operator token.
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub token: Token,
    pub left: Expr,
    pub op: String,
    pub right: Expr,
}

impl Node for InfixExpr {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.left.pos()
    }
}

impl fmt::Display for InfixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.op, self.right)
    }
}

// ============================================================================
// Control Flow and Functions
// ============================================================================

/// A `{ ... }` statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub token: Token,
    pub stmts: Vec<Stmt>,
}

impl Node for BlockStmt {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for BlockStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stmts.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        for stmt in &self.stmts {
            write!(f, "{}", stmt)?;
        }
        write!(f, " }}")
    }
}

/// Conditional expression with an optional `else` block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub token: Token,
    pub condition: Expr,
    pub consequence: BlockStmt,
    pub alternative: Option<BlockStmt>,
}

impl Node for IfExpr {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for IfExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if ({}) {}", self.condition, self.consequence)?;
        if let Some(alt) = &self.alternative {
            write!(f, " else {}", alt)?;
        }
        Ok(())
    }
}

/// Function literal (e.g., `fn(x, y) { x + y }`).
#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub token: Token,
    pub params: Vec<Ident>,
    pub body: BlockStmt,
}

impl Node for FuncLit {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for FuncLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "{}({}) {}",
            self.token.literal,
            params.join(", "),
            self.body
        )
    }
}

/// Function application. `token` is the opening parenthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub token: Token,
    pub function: Expr,
    pub args: Vec<Expr>,
}

impl Node for CallExpr {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.function.pos()
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.function, args.join(", "))
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Binding statement: `let name = value;`.
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub token: Token,
    pub name: Ident,
    pub value: Expr,
}

impl Node for LetStmt {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for LetStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} = {};",
            self.token.literal, self.name, self.value
        )
    }
}

/// `return value;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub token: Token,
    pub value: Expr,
}

impl Node for ReturnStmt {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for ReturnStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {};", self.token.literal, self.value)
    }
}

/// A bare expression used as a statement, e.g. `x + 10;`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub token: Token,
    pub expr: Expr,
}

impl Node for ExprStmt {
    fn token_literal(&self) -> &str {
        &self.token.literal
    }
    fn pos(&self) -> Position {
        self.token.start
    }
}

impl fmt::Display for ExprStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

// ============================================================================
// Program
// ============================================================================

/// Root of the tree: the top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.stmts.first().map(|s| s.token_literal()).unwrap_or("")
    }
    fn pos(&self) -> Position {
        self.stmts.first().map(|s| s.pos()).unwrap_or_default()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monkey_lexer::TokenKind;

    fn tok(kind: TokenKind, literal: &str) -> Token {
        Token::new(
            kind,
            literal.to_string(),
            Position::default(),
            Position::default().advance(literal.len()),
        )
    }

    fn ident(name: &str) -> Ident {
        Ident {
            token: tok(TokenKind::Ident, name),
            name: name.to_string(),
        }
    }

    fn int(value: i64) -> Expr {
        Expr::Int(IntLit {
            token: tok(TokenKind::Int, &value.to_string()),
            value,
        })
    }

    #[test]
    fn test_let_display() {
        let program = Program {
            stmts: vec![Stmt::Let(LetStmt {
                token: tok(TokenKind::Let, "let"),
                name: ident("myVar"),
                value: Expr::Ident(ident("anotherVar")),
            })],
        };
        assert_eq!(program.to_string(), "let myVar = anotherVar;");
        assert_eq!(program.token_literal(), "let");
    }

    #[test]
    fn test_return_display() {
        let stmt = Stmt::Return(ReturnStmt {
            token: tok(TokenKind::Return, "return"),
            value: int(5),
        });
        assert_eq!(stmt.to_string(), "return 5;");
        assert_eq!(stmt.token_literal(), "return");
    }

    #[test]
    fn test_program_concatenates_statements() {
        let program = Program {
            stmts: vec![
                Stmt::Let(LetStmt {
                    token: tok(TokenKind::Let, "let"),
                    name: ident("x"),
                    value: int(1),
                }),
                Stmt::Expr(ExprStmt {
                    token: tok(TokenKind::Ident, "x"),
                    expr: Expr::Ident(ident("x")),
                }),
                Stmt::Return(ReturnStmt {
                    token: tok(TokenKind::Return, "return"),
                    value: int(2),
                }),
            ],
        };
        assert_eq!(program.to_string(), "let x = 1;xreturn 2;");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert_eq!(program.to_string(), "");
        assert_eq!(program.token_literal(), "");
        assert_eq!(program.pos(), Position::default());
    }

    #[test]
    fn test_operator_display() {
        let prefix = Expr::Prefix(Box::new(PrefixExpr {
            token: tok(TokenKind::Minus, "-"),
            op: "-".to_string(),
            right: int(5),
        }));
        assert_eq!(prefix.to_string(), "(-5)");

        let infix = Expr::Infix(Box::new(InfixExpr {
            token: tok(TokenKind::Asterisk, "*"),
            left: prefix,
            op: "*".to_string(),
            right: Expr::Ident(ident("b")),
        }));
        assert_eq!(infix.to_string(), "((-5) * b)");
        assert_eq!(infix.token_literal(), "*");
    }

    #[test]
    fn test_function_and_call_display() {
        let body = BlockStmt {
            token: tok(TokenKind::LBrace, "{"),
            stmts: vec![Stmt::Expr(ExprStmt {
                token: tok(TokenKind::Ident, "x"),
                expr: Expr::Ident(ident("x")),
            })],
        };
        let func = Expr::Func(Box::new(FuncLit {
            token: tok(TokenKind::Function, "fn"),
            params: vec![ident("x"), ident("y")],
            body,
        }));
        assert_eq!(func.to_string(), "fn(x, y) { x }");

        let call = Expr::Call(Box::new(CallExpr {
            token: tok(TokenKind::LParen, "("),
            function: Expr::Ident(ident("add")),
            args: vec![int(1), int(2)],
        }));
        assert_eq!(call.to_string(), "add(1, 2)");
    }

    #[test]
    fn test_if_display() {
        let block = |name: &str| BlockStmt {
            token: tok(TokenKind::LBrace, "{"),
            stmts: vec![Stmt::Expr(ExprStmt {
                token: tok(TokenKind::Ident, name),
                expr: Expr::Ident(ident(name)),
            })],
        };
        let mut expr = IfExpr {
            token: tok(TokenKind::If, "if"),
            condition: Expr::Ident(ident("c")),
            consequence: block("x"),
            alternative: None,
        };
        assert_eq!(expr.to_string(), "if (c) { x }");

        expr.alternative = Some(block("y"));
        assert_eq!(expr.to_string(), "if (c) { x } else { y }");

        expr.consequence.stmts.clear();
        assert_eq!(expr.to_string(), "if (c) { } else { y }");
    }
}
