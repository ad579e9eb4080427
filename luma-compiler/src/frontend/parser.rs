//! Recursive-descent parser with precedence climbing for expressions.
//!
//! Parsing stops at the first unexpected token: a single diagnostic of the
//! shape `expected <what> <context>` is written to the sink and the parse
//! returns `None`. No recovery is attempted.

use std::fmt;

use crate::ast::{
    BinOp, BinaryExpr, CallExpr, CompoundStmt, Expr, ExprStmt, FunctionDecl, IdentifierExpr,
    NumberExpr, ParamDecl, ReturnStmt, Stmt, TranslationUnit,
};
use crate::diagnostics::DiagnosticEngine;
use crate::frontend::lexer::{Lexer, Token};
use crate::source::{Range, SourceFile};

/// Parse a source file into a translation unit, or write one diagnostic to
/// `out` and return `None`.
pub fn parse<'src>(
    file: &'src SourceFile,
    out: &mut dyn fmt::Write,
) -> Option<TranslationUnit<'src>> {
    Parser {
        lexer: Lexer::new(file),
        diags: DiagnosticEngine::new(file, out),
    }
    .translation_unit()
}

/// What the parser was looking for when it stopped.
enum Expected {
    Token(Token),
    Expr,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(token) => write!(f, "{token}"),
            Expected::Expr => f.write_str("expression"),
        }
    }
}

fn binary_op(token: Token) -> Option<BinOp> {
    match token {
        Token::Equal => Some(BinOp::Assign),
        Token::Plus => Some(BinOp::Add),
        Token::Minus => Some(BinOp::Sub),
        Token::Star => Some(BinOp::Mul),
        Token::Slash => Some(BinOp::Div),
        _ => None,
    }
}

fn precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Assign => 10,
        BinOp::Add | BinOp::Sub => 20,
        BinOp::Mul | BinOp::Div => 30,
    }
}

fn right_associative(op: BinOp) -> bool {
    matches!(op, BinOp::Assign)
}

struct Parser<'src, 'a> {
    lexer: Lexer<'src>,
    diags: DiagnosticEngine<'a>,
}

impl<'src> Parser<'src, '_> {
    fn translation_unit(mut self) -> Option<TranslationUnit<'src>> {
        let begin = Range::new(0, 0);

        let mut functions = Vec::new();
        while !self.lexer.at_eof() {
            functions.push(self.function_decl("at top level")?);
        }
        let end = self.lexer.range();

        Some(TranslationUnit {
            functions,
            range: Range::span(begin, end),
        })
    }

    fn function_decl(&mut self, context: &str) -> Option<FunctionDecl<'src>> {
        if !self.lexer.at(Token::Function) {
            return self.expected(Expected::Token(Token::Function), context);
        }
        let begin = self.lexer.range();
        self.lexer.advance();

        if !self.lexer.at(Token::Identifier) {
            return self.expected(Expected::Token(Token::Identifier), "after 'function'");
        }
        let name = self.lexer.text();
        self.lexer.advance();

        if !self.lexer.at(Token::LParen) {
            return self.expected(Expected::Token(Token::LParen), "after function identifier");
        }
        self.lexer.advance();

        let mut params = Vec::new();
        while !self.lexer.at(Token::RParen) {
            if !self.lexer.at(Token::Identifier) {
                return self.expected(
                    Expected::Token(Token::Identifier),
                    "in function parameter list",
                );
            }
            params.push(ParamDecl {
                name: self.lexer.text(),
            });
            self.lexer.advance();

            if !self.lexer.at(Token::Comma) {
                break;
            }
            self.lexer.advance();
        }

        if !self.lexer.at(Token::RParen) {
            return self.expected(Expected::Token(Token::RParen), "after function parameter list");
        }
        self.lexer.advance();

        let body = self.compound_stmt("in function body")?;
        let range = Range::span(begin, body.range);

        Some(FunctionDecl {
            name,
            params,
            body,
            range,
        })
    }

    fn compound_stmt(&mut self, context: &str) -> Option<CompoundStmt<'src>> {
        let begin = self.lexer.range();

        let mut stmts = Vec::new();
        while !self.lexer.at(Token::End) {
            stmts.push(self.stmt(context)?);
        }
        let end = self.lexer.range();
        self.lexer.advance();

        Some(CompoundStmt {
            stmts,
            range: Range::span(begin, end),
        })
    }

    fn stmt(&mut self, context: &str) -> Option<Stmt<'src>> {
        if self.lexer.at(Token::Return) {
            self.return_stmt()
        } else {
            self.expr_stmt(context)
        }
    }

    fn return_stmt(&mut self) -> Option<Stmt<'src>> {
        let begin = self.lexer.range();
        self.lexer.advance();

        let value = self.expr("after 'return'")?;
        let range = Range::span(begin, value.range());

        Some(Stmt::Return(ReturnStmt { value, range }))
    }

    fn expr_stmt(&mut self, context: &str) -> Option<Stmt<'src>> {
        let expr = self.expr(context)?;
        Some(Stmt::Expr(ExprStmt { expr }))
    }

    fn expr(&mut self, context: &str) -> Option<Expr<'src>> {
        self.binary_expr(0, context)
    }

    fn binary_expr(&mut self, min_prec: u8, context: &str) -> Option<Expr<'src>> {
        let mut lhs = self.primary_expr(context)?;

        loop {
            let Some(op) = self.lexer.current().and_then(binary_op) else {
                break;
            };
            let prec = precedence(op);
            if prec < min_prec {
                break;
            }
            self.lexer.advance();

            let next_min_prec = if right_associative(op) { prec } else { prec + 1 };
            let rhs =
                self.binary_expr(next_min_prec, "in the right-hand side of a binary expression")?;

            let range = Range::span(lhs.range(), rhs.range());
            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                range,
            });
        }

        Some(lhs)
    }

    fn primary_expr(&mut self, context: &str) -> Option<Expr<'src>> {
        match self.lexer.current() {
            Some(Token::Number) => self.number_expr(context),
            Some(Token::Identifier) => self.identifier_or_call_expr(),
            _ => self.expected(Expected::Expr, context),
        }
    }

    fn number_expr(&mut self, context: &str) -> Option<Expr<'src>> {
        let text = self.lexer.text();
        let Ok(value) = text.as_str().parse::<f64>() else {
            return self.expected(Expected::Token(Token::Number), context);
        };
        self.lexer.advance();

        Some(Expr::Number(NumberExpr {
            value,
            range: text.range,
        }))
    }

    fn identifier_or_call_expr(&mut self) -> Option<Expr<'src>> {
        let name = self.lexer.text();
        self.lexer.advance();

        if !self.lexer.at(Token::LParen) {
            return Some(Expr::Identifier(IdentifierExpr { name }));
        }
        self.lexer.advance();

        let mut args = Vec::new();
        while !self.lexer.at(Token::RParen) {
            args.push(self.expr("in call argument list")?);

            if !self.lexer.at(Token::Comma) {
                break;
            }
            self.lexer.advance();
        }

        if !self.lexer.at(Token::RParen) {
            return self.expected(Expected::Token(Token::RParen), "after call argument list");
        }
        let end = self.lexer.range();
        self.lexer.advance();

        Some(Expr::Call(CallExpr {
            callee: name,
            args,
            range: Range::span(name.range, end),
        }))
    }

    fn expected<T>(&mut self, what: Expected, context: &str) -> Option<T> {
        let range = self.lexer.range();
        self.diags
            .error(range, format_args!("expected {what} {context}"));
        None
    }
}
