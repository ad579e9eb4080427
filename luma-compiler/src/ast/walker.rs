//! Document-order AST traversal with enter/exit hooks.

use super::{
    BinaryExpr, CallExpr, CompoundStmt, Expr, ExprStmt, FunctionDecl, IdentifierExpr, NumberExpr,
    ParamDecl, ReturnStmt, Stmt, TranslationUnit,
};

/// Per-node enter/exit hooks with no-op defaults.
///
/// An `enter_*` hook returning `false` suppresses both the node's children
/// and its matching `exit_*` hook.
pub trait Visitor<'src> {
    fn enter_unit(&mut self, _unit: &TranslationUnit<'src>) -> bool {
        true
    }
    fn exit_unit(&mut self, _unit: &TranslationUnit<'src>) {}

    fn enter_function(&mut self, _function: &FunctionDecl<'src>) -> bool {
        true
    }
    fn exit_function(&mut self, _function: &FunctionDecl<'src>) {}

    fn enter_param(&mut self, _param: &ParamDecl<'src>) -> bool {
        true
    }
    fn exit_param(&mut self, _param: &ParamDecl<'src>) {}

    fn enter_compound(&mut self, _compound: &CompoundStmt<'src>) -> bool {
        true
    }
    fn exit_compound(&mut self, _compound: &CompoundStmt<'src>) {}

    fn enter_expr_stmt(&mut self, _stmt: &ExprStmt<'src>) -> bool {
        true
    }
    fn exit_expr_stmt(&mut self, _stmt: &ExprStmt<'src>) {}

    fn enter_return(&mut self, _stmt: &ReturnStmt<'src>) -> bool {
        true
    }
    fn exit_return(&mut self, _stmt: &ReturnStmt<'src>) {}

    fn enter_number(&mut self, _number: &NumberExpr) -> bool {
        true
    }
    fn exit_number(&mut self, _number: &NumberExpr) {}

    fn enter_identifier(&mut self, _identifier: &IdentifierExpr<'src>) -> bool {
        true
    }
    fn exit_identifier(&mut self, _identifier: &IdentifierExpr<'src>) {}

    fn enter_call(&mut self, _call: &CallExpr<'src>) -> bool {
        true
    }
    fn exit_call(&mut self, _call: &CallExpr<'src>) {}

    fn enter_binary(&mut self, _binary: &BinaryExpr<'src>) -> bool {
        true
    }
    fn exit_binary(&mut self, _binary: &BinaryExpr<'src>) {}
}

pub fn walk_unit<'src, V: Visitor<'src>>(visitor: &mut V, unit: &TranslationUnit<'src>) {
    if visitor.enter_unit(unit) {
        for function in &unit.functions {
            walk_function(visitor, function);
        }
        visitor.exit_unit(unit);
    }
}

pub fn walk_function<'src, V: Visitor<'src>>(visitor: &mut V, function: &FunctionDecl<'src>) {
    if visitor.enter_function(function) {
        for param in &function.params {
            walk_param(visitor, param);
        }
        walk_compound(visitor, &function.body);
        visitor.exit_function(function);
    }
}

pub fn walk_param<'src, V: Visitor<'src>>(visitor: &mut V, param: &ParamDecl<'src>) {
    if visitor.enter_param(param) {
        visitor.exit_param(param);
    }
}

pub fn walk_compound<'src, V: Visitor<'src>>(visitor: &mut V, compound: &CompoundStmt<'src>) {
    if visitor.enter_compound(compound) {
        for stmt in &compound.stmts {
            walk_stmt(visitor, stmt);
        }
        visitor.exit_compound(compound);
    }
}

pub fn walk_stmt<'src, V: Visitor<'src>>(visitor: &mut V, stmt: &Stmt<'src>) {
    match stmt {
        Stmt::Expr(stmt) => {
            if visitor.enter_expr_stmt(stmt) {
                walk_expr(visitor, &stmt.expr);
                visitor.exit_expr_stmt(stmt);
            }
        }
        Stmt::Return(stmt) => {
            if visitor.enter_return(stmt) {
                walk_expr(visitor, &stmt.value);
                visitor.exit_return(stmt);
            }
        }
    }
}

pub fn walk_expr<'src, V: Visitor<'src>>(visitor: &mut V, expr: &Expr<'src>) {
    match expr {
        Expr::Number(number) => {
            if visitor.enter_number(number) {
                visitor.exit_number(number);
            }
        }
        Expr::Identifier(identifier) => {
            if visitor.enter_identifier(identifier) {
                visitor.exit_identifier(identifier);
            }
        }
        Expr::Call(call) => {
            if visitor.enter_call(call) {
                for arg in &call.args {
                    walk_expr(visitor, arg);
                }
                visitor.exit_call(call);
            }
        }
        Expr::Binary(binary) => {
            if visitor.enter_binary(binary) {
                walk_expr(visitor, &binary.lhs);
                walk_expr(visitor, &binary.rhs);
                visitor.exit_binary(binary);
            }
        }
    }
}
