//! Stable textual AST dump: one node per line, two-space indent per depth.

use std::fmt::{self, Write as _};

use super::walker::{self, Visitor};
use super::{
    BinaryExpr, CallExpr, CompoundStmt, ExprStmt, FunctionDecl, IdentifierExpr, NumberExpr,
    ParamDecl, ReturnStmt, TranslationUnit,
};
use crate::source::{Range, SourceFile};

pub fn dump(unit: &TranslationUnit, file: &SourceFile, out: &mut dyn fmt::Write) {
    let mut visitor = DumpVisitor {
        file,
        out,
        level: 0,
    };
    walker::walk_unit(&mut visitor, unit);
}

struct DumpVisitor<'a> {
    file: &'a SourceFile,
    out: &'a mut dyn fmt::Write,
    level: usize,
}

impl DumpVisitor<'_> {
    fn line(&mut self, node: fmt::Arguments, range: Range) {
        let _ = writeln!(
            self.out,
            "{:indent$}{} [{}]",
            "",
            node,
            self.file.display_range(range),
            indent = self.level * 2
        );
    }
}

impl<'src> Visitor<'src> for DumpVisitor<'_> {
    fn enter_unit(&mut self, unit: &TranslationUnit<'src>) -> bool {
        self.line(format_args!("TranslationUnit"), unit.range);
        self.level += 1;
        true
    }

    fn exit_unit(&mut self, _unit: &TranslationUnit<'src>) {
        self.level -= 1;
    }

    fn enter_function(&mut self, function: &FunctionDecl<'src>) -> bool {
        self.line(format_args!("FunctionDecl {}", function.name), function.range);
        self.level += 1;
        true
    }

    fn exit_function(&mut self, _function: &FunctionDecl<'src>) {
        self.level -= 1;
    }

    fn enter_param(&mut self, param: &ParamDecl<'src>) -> bool {
        self.line(format_args!("ParamDecl {}", param.name), param.range());
        true
    }

    fn enter_compound(&mut self, compound: &CompoundStmt<'src>) -> bool {
        self.line(format_args!("CompoundStmt"), compound.range);
        self.level += 1;
        true
    }

    fn exit_compound(&mut self, _compound: &CompoundStmt<'src>) {
        self.level -= 1;
    }

    fn enter_expr_stmt(&mut self, stmt: &ExprStmt<'src>) -> bool {
        self.line(format_args!("ExprStmt"), stmt.range());
        self.level += 1;
        true
    }

    fn exit_expr_stmt(&mut self, _stmt: &ExprStmt<'src>) {
        self.level -= 1;
    }

    fn enter_return(&mut self, stmt: &ReturnStmt<'src>) -> bool {
        self.line(format_args!("ReturnStmt"), stmt.range);
        self.level += 1;
        true
    }

    fn exit_return(&mut self, _stmt: &ReturnStmt<'src>) {
        self.level -= 1;
    }

    fn enter_number(&mut self, number: &NumberExpr) -> bool {
        self.line(format_args!("NumberExpr {}", number.value), number.range);
        true
    }

    fn enter_identifier(&mut self, identifier: &IdentifierExpr<'src>) -> bool {
        self.line(
            format_args!("IdentifierExpr {}", identifier.name),
            identifier.range(),
        );
        true
    }

    fn enter_call(&mut self, call: &CallExpr<'src>) -> bool {
        self.line(format_args!("CallExpr {}", call.callee), call.range);
        self.level += 1;
        true
    }

    fn exit_call(&mut self, _call: &CallExpr<'src>) {
        self.level -= 1;
    }

    fn enter_binary(&mut self, binary: &BinaryExpr<'src>) -> bool {
        self.line(format_args!("BinaryExpr {}", binary.op), binary.range);
        self.level += 1;
        true
    }

    fn exit_binary(&mut self, _binary: &BinaryExpr<'src>) {
        self.level -= 1;
    }
}
