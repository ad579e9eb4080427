//! The scope tree: an arena of scopes and symbols addressed by handle.
//!
//! Parent links are plain back-references (handles), so the tree needs no
//! owning cycles. The root scope belongs to no function; every Function
//! symbol owns exactly one child scope, created at declaration time.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;

use crate::source::{SourceFile, Text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Param,
    Function,
    Var,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            SymbolKind::Param => "Param",
            SymbolKind::Function => "Function",
            SymbolKind::Var => "Var",
        };
        f.write_str(kind)
    }
}

/// A named entity. `scope` is `Some` only for Function symbols.
#[derive(Debug)]
pub struct Symbol<'src> {
    pub kind: SymbolKind,
    pub name: Text<'src>,
    pub scope: Option<ScopeId>,
}

#[derive(Debug)]
struct ScopeData<'src> {
    parent: Option<ScopeId>,
    owner: Option<SymbolId>,
    entries: IndexMap<&'src str, SymbolId>,
}

#[derive(Debug)]
pub struct ScopeTree<'src> {
    scopes: Vec<ScopeData<'src>>,
    symbols: Vec<Symbol<'src>>,
}

impl<'src> ScopeTree<'src> {
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData {
                parent: None,
                owner: None,
                entries: IndexMap::new(),
            }],
            symbols: Vec::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol<'src> {
        &self.symbols[id.0]
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    /// The Function symbol a scope belongs to; `None` for the root.
    pub fn owner(&self, scope: ScopeId) -> Option<SymbolId> {
        self.scopes[scope.0].owner
    }

    /// Resolve `name` in `from` or any ancestor scope.
    pub fn lookup(&self, from: ScopeId, name: &str) -> Option<SymbolId> {
        let mut next = Some(from);
        while let Some(scope) = next {
            let data = &self.scopes[scope.0];
            if let Some(&symbol) = data.entries.get(name) {
                return Some(symbol);
            }
            next = data.parent;
        }
        None
    }

    /// Declare a symbol in `scope`. Fails with the already-declared symbol
    /// if the name resolves in the scope or any ancestor.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        kind: SymbolKind,
        name: Text<'src>,
    ) -> Result<SymbolId, SymbolId> {
        if let Some(existing) = self.lookup(scope, name.as_str()) {
            return Err(existing);
        }

        let id = SymbolId(self.symbols.len());
        let child = (kind == SymbolKind::Function).then(|| {
            let child = ScopeId(self.scopes.len());
            self.scopes.push(ScopeData {
                parent: Some(scope),
                owner: Some(id),
                entries: IndexMap::new(),
            });
            child
        });
        self.symbols.push(Symbol {
            kind,
            name,
            scope: child,
        });
        self.scopes[scope.0].entries.insert(name.as_str(), id);

        Ok(id)
    }

    /// Symbols declared directly in `scope`, ordered by defining range and
    /// optionally filtered by kind.
    pub fn symbols_in(&self, scope: ScopeId, kind: Option<SymbolKind>) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self.scopes[scope.0]
            .entries
            .values()
            .copied()
            .filter(|id| kind.map_or(true, |kind| self.symbols[id.0].kind == kind))
            .collect();
        ids.sort_by_key(|id| self.symbols[id.0].name.range);
        ids
    }

    pub fn dump(&self, file: &SourceFile, out: &mut dyn fmt::Write) {
        self.dump_scope(self.root(), file, out, 0);
    }

    fn dump_scope(&self, scope: ScopeId, file: &SourceFile, out: &mut dyn fmt::Write, indent: usize) {
        match self.owner(scope) {
            Some(owner) => {
                let _ = writeln!(
                    out,
                    "{:pad$}{} : Scope",
                    "",
                    self.symbol(owner).name,
                    pad = indent * 2
                );
            }
            None => {
                let _ = writeln!(out, "{:pad$}<<unnamed>> : Scope", "", pad = indent * 2);
            }
        }

        for id in self.symbols_in(scope, None) {
            let symbol = self.symbol(id);
            let _ = writeln!(
                out,
                "{:pad$}{} : {} : {}",
                "",
                symbol.name,
                symbol.kind,
                file.display_range(symbol.name.range),
                pad = (indent + 1) * 2
            );
            if let Some(child) = symbol.scope {
                self.dump_scope(child, file, out, indent + 2);
            }
        }
    }
}

impl Default for ScopeTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}
