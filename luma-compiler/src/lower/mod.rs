//! Lowering of a validated AST into the numeric SSA module.
//!
//! The walk mirrors the analyzer's scope walk; a symbol-to-slot map built
//! per function lives only for the duration of the run. Lowering trusts the
//! semantic invariants and has no user-facing error path; the verifier acts
//! as an internal safety net in debug builds.

use std::collections::HashMap;

use crate::ast::walker::{self, Visitor};
use crate::ast::{self, Expr, ExprStmt, FunctionDecl, ReturnStmt, TranslationUnit};
use crate::ir::{self, Inst, Operand, ValueId};
use crate::sema::{ScopeId, ScopeTree, SymbolId, SymbolKind};
use crate::source::SourceFile;

/// Lower a successfully analyzed translation unit into an IR module.
pub fn lower_to_ir<'src>(
    file: &SourceFile,
    unit: &TranslationUnit<'src>,
    scopes: &ScopeTree<'src>,
) -> ir::Module {
    let mut lowerer = Lowerer {
        scopes,
        current: scopes.root(),
        module: ir::Module {
            source_filename: file.name().to_string(),
            functions: Vec::new(),
        },
        slots: HashMap::new(),
    };
    walker::walk_unit(&mut lowerer, unit);
    lowerer.module
}

struct Lowerer<'src, 'a> {
    scopes: &'a ScopeTree<'src>,
    current: ScopeId,
    module: ir::Module,
    slots: HashMap<SymbolId, ValueId>,
}

impl<'src> Lowerer<'src, '_> {
    fn func(&mut self) -> &mut ir::Function {
        match self.module.functions.last_mut() {
            Some(function) => function,
            None => unreachable!("instruction emitted outside a function"),
        }
    }

    fn slot_of(&self, name: &str) -> ValueId {
        let Some(symbol) = self.scopes.lookup(self.current, name) else {
            unreachable!("identifier was resolved during analysis");
        };
        self.slots[&symbol]
    }

    fn lower_expr(&mut self, expr: &Expr<'src>) -> Operand {
        match expr {
            Expr::Number(number) => Operand::Const(number.value),
            Expr::Identifier(identifier) => {
                let slot = self.slot_of(identifier.name.as_str());
                Operand::Inst(self.func().push(Inst::Load { slot }))
            }
            Expr::Call(call) => {
                let args: Vec<Operand> = call.args.iter().map(|arg| self.lower_expr(arg)).collect();
                let callee = call.callee.as_str().to_string();
                Operand::Inst(self.func().push(Inst::Call { callee, args }))
            }
            Expr::Binary(binary) => {
                if binary.op == ast::BinOp::Assign {
                    let Expr::Identifier(target) = binary.lhs.as_ref() else {
                        unreachable!("non-identifier assignment target survived analysis");
                    };
                    let slot = self.slot_of(target.name.as_str());
                    let value = self.lower_expr(&binary.rhs);
                    self.func().push(Inst::Store { value, slot });
                    return value;
                }

                let lhs = self.lower_expr(&binary.lhs);
                let rhs = self.lower_expr(&binary.rhs);
                let op = match binary.op {
                    ast::BinOp::Add => ir::BinOp::Fadd,
                    ast::BinOp::Sub => ir::BinOp::Fsub,
                    ast::BinOp::Mul => ir::BinOp::Fmul,
                    ast::BinOp::Div => ir::BinOp::Fdiv,
                    ast::BinOp::Assign => unreachable!(),
                };
                Operand::Inst(self.func().push(Inst::Bin { op, lhs, rhs }))
            }
        }
    }
}

impl<'src> Visitor<'src> for Lowerer<'src, '_> {
    fn exit_unit(&mut self, _unit: &TranslationUnit<'src>) {
        debug_assert!(
            self.module.verify().is_ok(),
            "lowered module failed verification: {:?}",
            self.module.verify()
        );
    }

    fn enter_function(&mut self, function: &FunctionDecl<'src>) -> bool {
        let Some(symbol) = self.scopes.lookup(self.current, function.name.as_str()) else {
            unreachable!("function was declared during analysis");
        };
        let Some(scope) = self.scopes.symbol(symbol).scope else {
            unreachable!("function symbols always own a scope");
        };

        let params = self.scopes.symbols_in(scope, Some(SymbolKind::Param));
        let param_names = params
            .iter()
            .map(|&param| self.scopes.symbol(param).name.as_str().to_string())
            .collect();
        let mut func = ir::Function::new(function.name.as_str().to_string(), param_names);

        for (index, &param) in params.iter().enumerate() {
            let slot = func.push(Inst::Alloca {
                name: self.scopes.symbol(param).name.as_str().to_string(),
            });
            func.push(Inst::Store {
                value: Operand::Arg(index),
                slot,
            });
            self.slots.insert(param, slot);
        }
        for var in self.scopes.symbols_in(scope, Some(SymbolKind::Var)) {
            let slot = func.push(Inst::Alloca {
                name: self.scopes.symbol(var).name.as_str().to_string(),
            });
            self.slots.insert(var, slot);
        }

        self.module.functions.push(func);
        self.current = scope;
        true
    }

    fn exit_function(&mut self, _function: &FunctionDecl<'src>) {
        debug_assert!(
            self.module
                .functions
                .last()
                .is_some_and(|function| function.verify(&self.module).is_ok()),
            "lowered function failed verification"
        );

        let Some(parent) = self.scopes.parent(self.current) else {
            unreachable!("function scopes always have a parent");
        };
        self.current = parent;
    }

    fn enter_expr_stmt(&mut self, stmt: &ExprStmt<'src>) -> bool {
        self.lower_expr(&stmt.expr);
        false
    }

    fn enter_return(&mut self, stmt: &ReturnStmt<'src>) -> bool {
        let value = self.lower_expr(&stmt.value);
        self.func().push(Inst::Ret { value });
        false
    }
}
