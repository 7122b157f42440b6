//! Integration tests for the Quill package frontend
//!
//! Each directory under `tests/fixtures/` is a small package with its own `quill.json`.

use std::path::PathBuf;

use quill::ast::{Expr, Module};
use quill::diagnostics::ErrorKind;
use quill::{Package, ParseError, ParseMode, parse, parse_from};

fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(relative)
}

fn body<'a>(module: &'a Module, value: &str) -> &'a Expr {
    module
        .values()
        .find(|(decl, _)| decl.name.node.as_str() == value)
        .map(|(decl, _)| &decl.body.node)
        .unwrap()
}

fn parse_ok(relative: &str, mode: ParseMode) -> Package {
    match parse(fixture(relative), mode) {
        Ok(package) => package,
        Err(err) => panic!("{relative} failed to parse:\n{err}"),
    }
}

fn parse_err(relative: &str, mode: ParseMode) -> quill::DiagnosticReport {
    match parse(fixture(relative), mode) {
        Ok(package) => panic!("{relative} parsed unexpectedly: {:?}", package.order),
        Err(ParseError::Diagnostics(report)) => report,
        Err(other) => panic!("expected collected diagnostics, got {other}"),
    }
}

mod package_tests {
    use super::*;

    #[test]
    fn imported_operator_groups_right() {
        let package = parse_ok("e2e/src/Main.quill", ParseMode::FULL_PARSE);
        assert_eq!(package.order, vec!["Math", "Main"]);
        assert_eq!(package.entry, "Main");

        let main = package.module("Main").unwrap();
        insta::assert_snapshot!(body(main, "main"), @"(1 +% (2 +% (square 3)))");
    }

    #[test]
    fn pipe_defined_in_another_module_groups_left() {
        let package = parse_ok("pipes/Main.quill", ParseMode::FULL_PARSE);
        assert_eq!(package.order, vec!["Pipes", "Main"]);

        let main = package.module("Main").unwrap();
        insta::assert_snapshot!(body(main, "main"), @"((3 |> inc) |> double)");
    }

    #[test]
    fn exposed_fixity_overrides_the_builtin_one() {
        let package = parse_ok("flow/Main.quill", ParseMode::FULL_PARSE);
        assert_eq!(package.order, vec!["Flow", "Main"]);

        // The built-in `|>` is left-associative; Flow redeclares it as `infixr 0`.
        let main = package.module("Main").unwrap();
        insta::assert_snapshot!(body(main, "main"), @"(inc |> (double |> 3))");
    }

    #[test]
    fn dependency_packages_are_searched() {
        let package = parse_ok("app/src/Main.quill", ParseMode::FULL_PARSE);
        assert_eq!(package.order, vec!["Shape.Area", "Main"]);
        assert!(package.path("Shape.Area").unwrap().ends_with("geometry/Shape/Area.quill"));

        let main = package.module("Main").unwrap();
        insta::assert_snapshot!(
            body(main, "main"),
            @"((Area.circle 2) <+> ((Area.circle 3) <+> 1))"
        );
    }

    #[test]
    fn native_imports_are_recorded_but_not_ordered() {
        let package = parse_ok("native/Main.quill", ParseMode::FULL_PARSE);
        assert_eq!(package.order, vec!["Main"]);
        let natives = &package.module("Main").unwrap().native_imports;
        assert_eq!(natives.len(), 1);
        assert!(natives[0].ends_with("Clock.rs"));
    }
}

mod mode_tests {
    use super::*;

    #[test]
    fn just_module_has_a_single_node() {
        let package = parse_ok(
            "e2e/src/Main.quill",
            ParseMode::JUST_MODULE | ParseMode::SKIP_WARNINGS,
        );
        assert_eq!(package.order, vec!["Main"]);
        assert_eq!(package.modules.len(), 1);
        assert!(package.module("Math").is_none());
    }

    #[test]
    fn skip_definitions_keeps_imports_and_fixities() {
        let package = parse_ok("e2e/src/Main.quill", ParseMode::SKIP_DEFINITIONS);
        let main = package.module("Main").unwrap();
        assert_eq!(main.imports.len(), 1);
        assert!(main.declarations.is_empty());

        let math = package.module("Math").unwrap();
        assert_eq!(math.fixities().count(), 1);
        assert_eq!(math.values().count(), 0);
    }

    #[test]
    fn stderr_sink_reports_error_count() {
        let err = parse(fixture("missing/Main.quill"), ParseMode::STDERR_DIAGNOSTICS).unwrap_err();
        assert!(matches!(err, ParseError::Reported { errors: 1 }), "{err}");
    }
}

mod failure_tests {
    use super::*;

    #[test]
    fn self_import_is_a_circular_dependency() {
        let report = parse_err("cycle/Loop.quill", ParseMode::FULL_PARSE);
        let cycle: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.kind() == ErrorKind::CircularDependency)
            .collect();
        assert_eq!(cycle.len(), 1);
        assert_eq!(cycle[0].message(), "Module 'Loop' imports itself");
    }

    #[test]
    fn missing_module_names_the_import() {
        let report = parse_err("missing/Main.quill", ParseMode::FULL_PARSE);
        assert_eq!(report.len(), 1, "{report}");
        let diagnostic = &report.diagnostics[0];
        assert_eq!(diagnostic.kind(), ErrorKind::MissingModule);
        assert_eq!(diagnostic.message(), "Cannot find module 'Data.Missing'");
        assert_eq!(diagnostic.position, Some((3, 8)));
    }

    #[test]
    fn syntax_and_fixity_errors_are_all_collected() {
        let report = parse_err("broken/Main.quill", ParseMode::FULL_PARSE);
        assert!(report.has_kind(ErrorKind::Fixity), "{report}");
        assert!(report.has_kind(ErrorKind::Syntax), "{report}");
        assert!(report.to_string().contains("Main.quill:3:"), "{report}");
    }

    #[test]
    fn missing_entry_file_is_an_io_error() {
        let report = parse_err("e2e/src/Nope.quill", ParseMode::FULL_PARSE);
        assert_eq!(report.len(), 1);
        assert_eq!(report.diagnostics[0].kind(), ErrorKind::Io);
    }
}

mod parse_from_tests {
    use super::*;

    #[test]
    fn buffer_imports_are_not_followed() {
        let source = "module Scratch exposing (..)\n\nimport Nowhere exposing (x)\n\ny = x + 1\n";
        let module = parse_from("Scratch", source.as_bytes(), ParseMode::FULL_PARSE).unwrap();
        assert_eq!(module.imports.len(), 1);
        insta::assert_snapshot!(body(&module, "y"), @"(x + 1)");
    }

    #[test]
    fn undeclared_operator_is_reported() {
        let source = "module Scratch exposing (..)\n\ny = 1 <?> 2\n";
        let err = parse_from("Scratch", source.as_bytes(), ParseMode::STDERR_DIAGNOSTICS).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.diagnostics[0].message().contains("'<?>'"));
        assert!(!report.diagnostics[0].is_error());
    }
}

mod cli_tests {
    use super::*;
    use quill::cli::commands::format_module;

    #[test]
    fn ast_output_shows_grouping() {
        let package = parse_ok("pipes/Main.quill", ParseMode::FULL_PARSE);
        let out: Vec<String> = package.iter().map(|(name, module)| format_module(name, module)).collect();
        insta::assert_snapshot!(out.join("\n").trim_end(), @r"
        module Pipes
        infixl 0 |>
        (|>) x f = (f x)

        module Main
        import Pipes
        inc n = (n + 1)
        double n = (n * 2)
        main = ((3 |> inc) |> double)
        ");
    }
}
