use luma_compiler::sema::SymbolKind;
use luma_compiler::source::SourceFile;
use luma_compiler::{analyze, compile_to_ir, parse, CompileError};

// ── Scope construction ───────────────────────────────────────────────────

#[test]
fn global_scope_holds_the_function() {
    let file = SourceFile::new("test.luma", "function f() return 0 end");
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    let tree = analyze(&file, &unit, &mut sink).expect("analysis failed");

    let globals = tree.symbols_in(tree.root(), None);
    assert_eq!(globals.len(), 1);
    let f = tree.symbol(globals[0]);
    assert_eq!(f.kind, SymbolKind::Function);
    assert_eq!(f.name.as_str(), "f");

    let scope = f.scope.expect("function symbols own a scope");
    assert!(tree.symbols_in(scope, None).is_empty());
}

#[test]
fn params_and_locals_get_their_kinds() {
    let file = SourceFile::new("test.luma", "function f(x) y = x + 1 return y end");
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    let tree = analyze(&file, &unit, &mut sink).expect("analysis failed");

    let globals = tree.symbols_in(tree.root(), None);
    let scope = tree.symbol(globals[0]).scope.expect("function scope");

    let symbols: Vec<(String, SymbolKind)> = tree
        .symbols_in(scope, None)
        .into_iter()
        .map(|id| {
            let symbol = tree.symbol(id);
            (symbol.name.as_str().to_string(), symbol.kind)
        })
        .collect();
    assert_eq!(
        symbols,
        [
            ("x".to_string(), SymbolKind::Param),
            ("y".to_string(), SymbolKind::Var),
        ]
    );
}

#[test]
fn parameter_order_follows_the_source() {
    let file = SourceFile::new("test.luma", "function f(b, a) return a end");
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    let tree = analyze(&file, &unit, &mut sink).expect("analysis failed");

    let globals = tree.symbols_in(tree.root(), None);
    let scope = tree.symbol(globals[0]).scope.expect("function scope");
    let params: Vec<&str> = tree
        .symbols_in(scope, Some(SymbolKind::Param))
        .into_iter()
        .map(|id| tree.symbol(id).name.as_str())
        .collect();
    assert_eq!(params, ["b", "a"]);
}

#[test]
fn implicit_variable_is_declared_once() {
    let file = SourceFile::new("test.luma", "function f() x = x + 1 return x end");
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    let tree = analyze(&file, &unit, &mut sink).expect("analysis failed");

    let globals = tree.symbols_in(tree.root(), None);
    let scope = tree.symbol(globals[0]).scope.expect("function scope");
    let vars = tree.symbols_in(scope, Some(SymbolKind::Var));
    assert_eq!(vars.len(), 1);
}

#[test]
fn recursion_resolves_through_the_global_scope() {
    let file = SourceFile::new("test.luma", "function f(x) return f(x) end");
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    assert!(analyze(&file, &unit, &mut sink).is_some(), "{sink}");
}

#[test]
fn later_function_may_call_an_earlier_one() {
    let source = "function g() return 0 end function f() return g() end";
    let file = SourceFile::new("test.luma", source);
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    assert!(analyze(&file, &unit, &mut sink).is_some(), "{sink}");
}

// ── Scope dump ───────────────────────────────────────────────────────────

#[test]
fn scope_dump_is_stable() {
    let file = SourceFile::new("test.luma", "function f(x) y = x + 1 return y end");
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    let tree = analyze(&file, &unit, &mut sink).expect("analysis failed");

    let mut out = String::new();
    tree.dump(&file, &mut out);
    assert_eq!(
        out,
        "<<unnamed>> : Scope\n\
         \x20 f : Function : test.luma:1:10-11\n\
         \x20   f : Scope\n\
         \x20     x : Param : test.luma:1:12-13\n\
         \x20     y : Var : test.luma:1:15-16\n"
    );
}

#[test]
fn analysis_is_idempotent() {
    let file = SourceFile::new("test.luma", "function f(x) y = x return y end");
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");

    let first_tree = analyze(&file, &unit, &mut sink).expect("first analysis failed");
    let second_tree = analyze(&file, &unit, &mut sink).expect("second analysis failed");

    let mut first = String::new();
    first_tree.dump(&file, &mut first);
    let mut second = String::new();
    second_tree.dump(&file, &mut second);
    assert_eq!(first, second);
}

// ── Diagnostics ──────────────────────────────────────────────────────────

#[test]
fn undeclared_function() {
    let sink = analyze_err("function f() return g() end");
    let expected = format!(
        "error: use of undeclared function g\n\
         test.luma:1:21-24\n\
         function f() return g() end\n\
         {}^^^\n",
        " ".repeat(20)
    );
    assert_eq!(sink, expected);
}

#[test]
fn redefinition_of_parameter() {
    let sink = analyze_err("function f(x,x) return x end");
    assert!(sink.contains("error: redefinition of parameter x"), "{sink}");
    assert!(sink.contains("note: previous definition is here"), "{sink}");
    // The note points at the first `x`.
    assert!(sink.contains("test.luma:1:12-13"), "{sink}");
}

#[test]
fn redefinition_of_function() {
    let sink = analyze_err("function f() return 0 end function f() return 1 end");
    assert!(sink.contains("error: redefinition of function f"), "{sink}");
    assert!(sink.contains("note: previous definition is here"), "{sink}");
}

#[test]
fn parameter_may_not_shadow_its_function() {
    let sink = analyze_err("function f(f) return 0 end");
    assert!(sink.contains("error: redefinition of parameter f"), "{sink}");
}

#[test]
fn called_object_is_not_a_function() {
    let sink = analyze_err("function f(x) return x(1) end");
    assert!(sink.contains("error: called object x is not a function"), "{sink}");
    assert!(sink.contains("note: previous definition is here"), "{sink}");
}

#[test]
fn call_with_too_many_arguments() {
    let sink = analyze_err(
        "function add(a, b) return a + b end function f() return add(1, 2, 3) end",
    );
    assert!(
        sink.contains("error: call to function add with incorrect number of arguments"),
        "{sink}"
    );
}

#[test]
fn call_with_too_few_arguments() {
    let sink = analyze_err("function add(a, b) return a + b end function f() return add(1) end");
    assert!(
        sink.contains("error: call to function add with incorrect number of arguments"),
        "{sink}"
    );
}

#[test]
fn number_is_not_assignable() {
    let sink = analyze_err("function f() 1 = 2 return 0 end");
    assert!(sink.contains("error: expression is not assignable"), "{sink}");
}

#[test]
fn arithmetic_result_is_not_assignable() {
    let sink = analyze_err("function f() a + 1 = 2 return 0 end");
    assert!(sink.contains("error: expression is not assignable"), "{sink}");
}

#[test]
fn empty_function_body() {
    let sink = analyze_err("function f() end");
    assert!(
        sink.contains("error: function f must end with a return statement"),
        "{sink}"
    );
}

#[test]
fn last_statement_must_be_a_return() {
    let sink = analyze_err("function f() 1 + 2 end");
    assert!(
        sink.contains("error: last statement of function f must be a return statement"),
        "{sink}"
    );
}

#[test]
fn call_error_suppresses_the_arguments() {
    // `h()` is never reached: the undeclared `g` stops descent into the call.
    let sink = analyze_err("function f() return g(h()) end");
    assert_eq!(sink.matches("error: ").count(), 1, "{sink}");
    assert!(sink.contains("use of undeclared function g"), "{sink}");
}

#[test]
fn analyzer_reports_every_reachable_error() {
    let source = "function f() 1 = 2 return 0 end function g() return h() end";
    let sink = analyze_err(source);
    assert_eq!(sink.matches("error: ").count(), 2, "{sink}");
}

// ── Pipeline surface ─────────────────────────────────────────────────────

#[test]
fn compile_error_carries_the_semantic_diagnostics() {
    let file = SourceFile::new("test.luma", "function f() 1 + 2 end");
    let err = compile_to_ir(&file).expect_err("compilation should fail");
    match err {
        CompileError::Semantic { diagnostics } => {
            assert!(diagnostics.contains("must be a return statement"), "{diagnostics}");
        }
        other => panic!("expected a semantic error, got: {other:?}"),
    }
}

#[test]
fn compile_error_distinguishes_parse_failures() {
    let file = SourceFile::new("test.luma", "function f(");
    let err = compile_to_ir(&file).expect_err("compilation should fail");
    assert!(matches!(err, CompileError::Parse { .. }), "{err:?}");
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn analyze_err(source: &str) -> String {
    let file = SourceFile::new("test.luma", source);
    let mut sink = String::new();
    let unit = parse(&file, &mut sink).expect("parse failed");
    let result = analyze(&file, &unit, &mut sink);
    assert!(result.is_none(), "analysis unexpectedly succeeded");
    assert!(!sink.is_empty(), "no diagnostic was written");
    sink
}
