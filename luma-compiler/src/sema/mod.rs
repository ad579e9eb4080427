//! Semantic analysis: one AST walk that builds the scope tree and checks
//! name, call, assignment, and return-placement rules.

pub mod scope;

pub use scope::{ScopeId, ScopeTree, Symbol, SymbolId, SymbolKind};

use std::fmt;

use crate::ast::{
    BinOp, BinaryExpr, CallExpr, Expr, FunctionDecl, IdentifierExpr, ParamDecl, Stmt,
    TranslationUnit,
};
use crate::ast::walker::{self, Visitor};
use crate::diagnostics::DiagnosticEngine;
use crate::source::SourceFile;

/// Analyze a parsed translation unit. Returns the populated scope tree, or
/// `None` after writing one or more diagnostics to `out`.
pub fn analyze<'src>(
    file: &'src SourceFile,
    unit: &TranslationUnit<'src>,
    out: &mut dyn fmt::Write,
) -> Option<ScopeTree<'src>> {
    let tree = ScopeTree::new();
    let current = tree.root();
    let mut analyzer = Analyzer {
        diags: DiagnosticEngine::new(file, out),
        tree,
        current,
    };
    walker::walk_unit(&mut analyzer, unit);
    analyzer.finish()
}

struct Analyzer<'src, 'a> {
    diags: DiagnosticEngine<'a>,
    tree: ScopeTree<'src>,
    current: ScopeId,
}

impl<'src> Analyzer<'src, '_> {
    fn finish(self) -> Option<ScopeTree<'src>> {
        if self.diags.has_errors() {
            None
        } else {
            Some(self.tree)
        }
    }
}

impl<'src> Visitor<'src> for Analyzer<'src, '_> {
    fn enter_function(&mut self, function: &FunctionDecl<'src>) -> bool {
        match self.tree.declare(self.current, SymbolKind::Function, function.name) {
            Ok(id) => {
                let Some(scope) = self.tree.symbol(id).scope else {
                    unreachable!("function symbols always own a scope");
                };
                self.current = scope;
                true
            }
            Err(existing) => {
                self.diags.error(
                    function.range,
                    format_args!("redefinition of function {}", function.name),
                );
                self.diags.note(
                    self.tree.symbol(existing).name.range,
                    "previous definition is here",
                );
                false
            }
        }
    }

    fn exit_function(&mut self, function: &FunctionDecl<'src>) {
        match function.body.stmts.last() {
            None => self.diags.error(
                function.range,
                format_args!(
                    "function {} must end with a return statement",
                    function.name
                ),
            ),
            Some(Stmt::Return(_)) => {}
            Some(last) => self.diags.error(
                last.range(),
                format_args!(
                    "last statement of function {} must be a return statement",
                    function.name
                ),
            ),
        }

        let Some(parent) = self.tree.parent(self.current) else {
            unreachable!("function scopes always have a parent");
        };
        self.current = parent;
    }

    fn enter_param(&mut self, param: &ParamDecl<'src>) -> bool {
        match self.tree.declare(self.current, SymbolKind::Param, param.name) {
            Ok(_) => true,
            Err(existing) => {
                self.diags.error(
                    param.range(),
                    format_args!("redefinition of parameter {}", param.name),
                );
                self.diags.note(
                    self.tree.symbol(existing).name.range,
                    "previous definition is here",
                );
                false
            }
        }
    }

    fn enter_call(&mut self, call: &CallExpr<'src>) -> bool {
        let Some(id) = self.tree.lookup(self.current, call.callee.as_str()) else {
            self.diags.error(
                call.range,
                format_args!("use of undeclared function {}", call.callee),
            );
            return false;
        };

        let symbol = self.tree.symbol(id);
        if symbol.kind != SymbolKind::Function {
            let previous = symbol.name.range;
            self.diags.error(
                call.range,
                format_args!("called object {} is not a function", call.callee),
            );
            self.diags.note(previous, "previous definition is here");
            return false;
        }

        let Some(scope) = symbol.scope else {
            unreachable!("function symbols always own a scope");
        };
        let param_count = self.tree.symbols_in(scope, Some(SymbolKind::Param)).len();
        if call.args.len() != param_count {
            self.diags.error(
                call.range,
                format_args!(
                    "call to function {} with incorrect number of arguments",
                    call.callee
                ),
            );
            return false;
        }

        true
    }

    fn enter_binary(&mut self, binary: &BinaryExpr<'src>) -> bool {
        if binary.op == BinOp::Assign && !matches!(binary.lhs.as_ref(), Expr::Identifier(_)) {
            self.diags
                .error(binary.lhs.range(), "expression is not assignable");
            return false;
        }
        true
    }

    fn enter_identifier(&mut self, identifier: &IdentifierExpr<'src>) -> bool {
        // First appearance of a name implicitly declares a local variable.
        let _ = self
            .tree
            .declare(self.current, SymbolKind::Var, identifier.name);
        true
    }
}
