//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::frontend::ast::{Declaration, Module};
use crate::frontend::lexer;
use crate::{Package, ParseError, ParseMode};

use super::{CliError, CliResult, ExitCode};

/// Parse the package at `path`, mapping failures to CLI errors.
fn load_package(path: &Path, mode: ParseMode) -> CliResult<Package> {
    crate::parse(path, mode).map_err(|err| match err {
        // Already rendered to stderr.
        ParseError::Reported { .. } => CliError::failure(format!("error: {}", err)),
        ParseError::Diagnostics(report) => CliError::failure(report.to_string()),
        ParseError::Unresolved => CliError::failure(format!("error: {}", err)),
    })
}

/// Parse a package and summarize it.
pub fn parse_file(path: &Path, mode: ParseMode) -> CliResult<ExitCode> {
    let package = load_package(path, mode)?;
    println!(
        "Parsed {} module(s): {}",
        package.len(),
        package.order.join(", ")
    );
    Ok(ExitCode::SUCCESS)
}

/// Print every module in dependency order.
pub fn print_ast(path: &Path, mode: ParseMode) -> CliResult<ExitCode> {
    let package = load_package(path, mode)?;
    for (i, (name, module)) in package.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_module(name, module));
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the parse order, one module per line.
pub fn print_order(path: &Path, mode: ParseMode) -> CliResult<ExitCode> {
    let package = load_package(path, mode)?;
    for name in &package.order {
        match package.path(name) {
            Some(file) => println!("{}\t{}", name, file.display()),
            None => println!("{}", name),
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Tokenize and display tokens.
pub fn lex_file(path: &Path) -> CliResult<ExitCode> {
    let source = fs::read_to_string(path)
        .map_err(|e| CliError::failure(format!("Error reading '{}': {}", path.display(), e)))?;
    let tokens = match lexer::lex(&source) {
        Ok(toks) => toks,
        Err(errs) => {
            let mut msg = String::new();
            for err in &errs {
                let (line, col) = crate::diagnostics::line_col(&source, err.span.start);
                let _ = writeln!(msg, "{}:{}:{}: {}", path.display(), line, col, err);
            }
            return Err(CliError::failure(msg.trim_end()));
        }
    };

    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Render a module as its header followed by one line per declaration, with every infix expression parenthesized.
pub fn format_module(name: &str, module: &Module) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "module {}", name);
    for import in &module.imports {
        let import = &import.node;
        let _ = write!(out, "import {}", import.module.node);
        if let Some(alias) = &import.alias {
            let _ = write!(out, " as {}", alias);
        }
        out.push('\n');
    }
    for native in &module.native_imports {
        let _ = writeln!(out, "native {}", native.display());
    }
    for decl in &module.declarations {
        match &decl.node {
            Declaration::Infix(infix) => {
                let _ = writeln!(
                    out,
                    "{} {} {}",
                    infix.associativity.keyword(),
                    infix.precedence,
                    infix.operator.node
                );
            }
            Declaration::Annotation(annotation) => {
                let _ = writeln!(out, "{} : {}", annotation.name, annotation.ty.node);
            }
            Declaration::Value(value) => {
                let _ = write!(out, "{}", value.name.node);
                for param in &value.params {
                    let _ = write!(out, " {}", param.node);
                }
                let _ = writeln!(out, " = {}", value.body.node);
            }
        }
    }
    out
}
