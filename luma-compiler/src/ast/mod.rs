//! The abstract syntax tree.
//!
//! One enum per syntactic category with a payload struct per node kind.
//! Every node carries a [`Range`]; identifier and callee names are
//! [`Text`] views into the source buffer, so the tree borrows the
//! `SourceFile` it was parsed from.

pub mod dump;
pub mod walker;

use std::fmt;

use crate::source::{Range, Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinOp::Assign => "=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        };
        f.write_str(op)
    }
}

// --- Expressions ---

#[derive(Debug)]
pub enum Expr<'src> {
    Number(NumberExpr),
    Identifier(IdentifierExpr<'src>),
    Call(CallExpr<'src>),
    Binary(BinaryExpr<'src>),
}

impl Expr<'_> {
    pub fn range(&self) -> Range {
        match self {
            Expr::Number(number) => number.range,
            Expr::Identifier(identifier) => identifier.range(),
            Expr::Call(call) => call.range,
            Expr::Binary(binary) => binary.range,
        }
    }
}

#[derive(Debug)]
pub struct NumberExpr {
    pub value: f64,
    pub range: Range,
}

#[derive(Debug)]
pub struct IdentifierExpr<'src> {
    pub name: Text<'src>,
}

impl IdentifierExpr<'_> {
    pub fn range(&self) -> Range {
        self.name.range
    }
}

#[derive(Debug)]
pub struct CallExpr<'src> {
    pub callee: Text<'src>,
    pub args: Vec<Expr<'src>>,
    pub range: Range,
}

#[derive(Debug)]
pub struct BinaryExpr<'src> {
    pub op: BinOp,
    pub lhs: Box<Expr<'src>>,
    pub rhs: Box<Expr<'src>>,
    pub range: Range,
}

// --- Statements ---

#[derive(Debug)]
pub enum Stmt<'src> {
    Expr(ExprStmt<'src>),
    Return(ReturnStmt<'src>),
}

impl Stmt<'_> {
    pub fn range(&self) -> Range {
        match self {
            Stmt::Expr(stmt) => stmt.range(),
            Stmt::Return(stmt) => stmt.range,
        }
    }
}

/// An expression evaluated for its side effects.
#[derive(Debug)]
pub struct ExprStmt<'src> {
    pub expr: Expr<'src>,
}

impl ExprStmt<'_> {
    pub fn range(&self) -> Range {
        self.expr.range()
    }
}

#[derive(Debug)]
pub struct ReturnStmt<'src> {
    pub value: Expr<'src>,
    pub range: Range,
}

/// A function body: statements up to the closing `end`.
#[derive(Debug)]
pub struct CompoundStmt<'src> {
    pub stmts: Vec<Stmt<'src>>,
    pub range: Range,
}

// --- Declarations ---

#[derive(Debug)]
pub struct ParamDecl<'src> {
    pub name: Text<'src>,
}

impl ParamDecl<'_> {
    pub fn range(&self) -> Range {
        self.name.range
    }
}

#[derive(Debug)]
pub struct FunctionDecl<'src> {
    pub name: Text<'src>,
    pub params: Vec<ParamDecl<'src>>,
    pub body: CompoundStmt<'src>,
    pub range: Range,
}

/// The AST root, one per source file.
#[derive(Debug)]
pub struct TranslationUnit<'src> {
    pub functions: Vec<FunctionDecl<'src>>,
    pub range: Range,
}
