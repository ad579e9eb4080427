//! Front-end for the luma language.
//!
//! Three passes compose into a pipeline: [`parse`] builds the AST,
//! [`analyze`] builds and validates the scope tree, and [`lower_to_ir`]
//! emits the numeric SSA module. Each analysis pass writes its diagnostics
//! to a caller-supplied sink and returns `None` on failure; compilation
//! stops at the first failing pass.

pub mod ast;
pub mod diagnostics;
pub mod frontend;
pub mod ir;
pub mod lower;
pub mod sema;
pub mod source;

use thiserror::Error;

pub use frontend::parser::parse;
pub use lower::lower_to_ir;
pub use sema::analyze;

/// Failure of a front-end pass, carrying the rendered diagnostics.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{diagnostics}")]
    Parse { diagnostics: String },

    #[error("{diagnostics}")]
    Semantic { diagnostics: String },
}

/// Run the whole front-end over one source file.
pub fn compile_to_ir(file: &source::SourceFile) -> Result<ir::Module, CompileError> {
    let mut diagnostics = String::new();

    let Some(unit) = parse(file, &mut diagnostics) else {
        return Err(CompileError::Parse { diagnostics });
    };
    let Some(scopes) = analyze(file, &unit, &mut diagnostics) else {
        return Err(CompileError::Semantic { diagnostics });
    };

    Ok(lower_to_ir(file, &unit, &scopes))
}
