use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use luma_compiler::source::SourceFile;
use luma_compiler::{analyze, ast, lower_to_ir, parse};

#[derive(Parser)]
#[command(name = "lumac")]
#[command(about = "Compiler for the luma language")]
struct Args {
    /// Path to the source file to compile
    file: PathBuf,

    /// Stop after the selected stage and print its representation
    #[arg(long, value_enum)]
    emit: Option<Emit>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The abstract syntax tree
    Ast,
    /// The scope and symbol tree
    Sema,
    /// The SSA module
    Ir,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let file = match SourceFile::open(&args.file) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("error: could not open file {}: {err}", args.file.display());
            return ExitCode::from(2);
        }
    };

    let mut diagnostics = String::new();

    let Some(unit) = parse(&file, &mut diagnostics) else {
        eprint!("{diagnostics}");
        return ExitCode::from(3);
    };
    if args.emit == Some(Emit::Ast) {
        let mut out = String::new();
        ast::dump::dump(&unit, &file, &mut out);
        print!("{out}");
        return ExitCode::SUCCESS;
    }

    let Some(scopes) = analyze(&file, &unit, &mut diagnostics) else {
        eprint!("{diagnostics}");
        return ExitCode::from(4);
    };
    if args.emit == Some(Emit::Sema) {
        let mut out = String::new();
        scopes.dump(&file, &mut out);
        print!("{out}");
        return ExitCode::SUCCESS;
    }

    let module = lower_to_ir(&file, &unit, &scopes);
    if args.emit == Some(Emit::Ir) {
        print!("{module}");
    }

    ExitCode::SUCCESS
}
