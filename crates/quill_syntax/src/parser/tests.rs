#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on operator grouping, the two parse modes, and error recovery (avoiding cascaded errors).
mod tests {
    use super::*;
    use crate::diagnostics::{ErrorKind, Severity};
    use crate::fixity::FrozenOperatorTable;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Module, Vec<CompileError>> {
        let tokens = lexer::lex(source)?;
        parse(&tokens)
    }

    fn parse_with(source: &str, mode: ParseMode, table: &FrozenOperatorTable, module: &str) -> Parsed {
        let tokens = lexer::lex(source).unwrap();
        parse_module(&tokens, mode, table.scope(module))
    }

    /// Body of `x`, fully parenthesized.
    fn grouped(prelude: &str, expr: &str) -> String {
        let source = format!("module T exposing (..)\n\n{prelude}\nx = {expr}\n");
        let module = parse_str(&source).unwrap_or_else(|errs| panic!("parse failed: {errs:?}"));
        let (value, _) = module.values().next().expect("value declaration");
        value.body.node.to_string()
    }

    fn lenient() -> FrozenOperatorTable {
        OperatorTable::builtin().freeze().0
    }

    fn strict() -> FrozenOperatorTable {
        OperatorTable::full().freeze().0
    }

    #[test]
    fn test_parse_header() {
        let module = parse_str("module Math.Vector exposing (add, Shape(..), Point, (+%))\n").unwrap();
        let header = module.header.expect("header");
        assert_eq!(header.node.name, "Math.Vector");
        let Exposing::Items(items) = &header.node.exposing.node else {
            panic!("expected explicit exposing list");
        };
        let names: Vec<&str> = items.iter().map(|i| i.node.name()).collect();
        assert_eq!(names, vec!["add", "Shape", "Point", "+%"]);
        assert_eq!(
            items[1].node,
            ExposedItem::Type {
                name: "Shape".to_string(),
                constructors: true
            }
        );
        assert!(items[3].node.is_operator());
    }

    #[test]
    fn test_parse_imports() {
        let source = "module Main exposing (main)\n\nimport Math exposing ((+%), square)\nimport Data.List as L\nimport Pipes exposing (..)\n\nmain = 1\n";
        let module = parse_str(source).unwrap();
        assert_eq!(module.imports.len(), 3);

        let math = &module.imports[0].node;
        assert_eq!(math.module.node, "Math");
        let exposing = math.exposing.as_ref().expect("exposing");
        let ops: Vec<&str> = exposing.node.operators().map(|i| i.node.name()).collect();
        assert_eq!(ops, vec!["+%"]);

        let list = &module.imports[1].node;
        assert_eq!(list.alias.as_deref(), Some("L"));
        assert_eq!(list.qualifier(), "L");
        assert_eq!(module.imports[2].node.exposing.as_ref().map(|e| &e.node), Some(&Exposing::All));
    }

    #[test]
    fn test_parse_declarations() {
        let source = "module Math exposing (..)\n\ninfixr 6 +%\n\nsquare : Int -> Int\nsquare x = x * x\n\n(+%) : Int -> Int -> Int\n(+%) a b = a + b\n";
        let module = parse_str(source).unwrap();
        assert_eq!(module.declarations.len(), 5);

        let fixities: Vec<(&str, u8)> = module
            .fixities()
            .map(|(f, _)| (f.operator.node.as_str(), f.precedence))
            .collect();
        assert_eq!(fixities, vec![("+%", 6)]);

        let values: Vec<String> = module.values().map(|(v, _)| v.name.node.to_string()).collect();
        assert_eq!(values, vec!["square", "(+%)"]);

        match &module.declarations[1].node {
            Declaration::Annotation(a) => assert_eq!(a.ty.node.to_string(), "(Int -> Int)"),
            other => panic!("expected annotation, got {other:?}"),
        }
    }

    #[test]
    fn test_builtin_grouping() {
        insta::assert_snapshot!(grouped("", "1 + 2 * 3"), @"(1 + (2 * 3))");
        insta::assert_snapshot!(grouped("", "a |> f |> g"), @"((a |> f) |> g)");
        insta::assert_snapshot!(grouped("", "a ^ b ^ c"), @"(a ^ (b ^ c))");
        insta::assert_snapshot!(grouped("", "f x + g y"), @"((f x) + (g y))");
        insta::assert_snapshot!(grouped("", "a :: b ++ c"), @"(a :: (b ++ c))");
        insta::assert_snapshot!(grouped("", "-x * 2"), @"((-x) * 2)");
        insta::assert_snapshot!(grouped("", "a < b && b < c || d"), @"(((a < b) && (b < c)) || d)");
    }

    #[test]
    fn test_atoms_extend_right() {
        insta::assert_snapshot!(grouped("", "f <| \\n -> n + 1"), @r"(f <| (\n -> (n + 1)))");
        insta::assert_snapshot!(grouped("", "if a then b else c + 1"), @"(if a then b else (c + 1))");
        insta::assert_snapshot!(grouped("", "let (a, b) = p in a * b"), @"(let (a, b) = p in (a * b))");
        insta::assert_snapshot!(grouped("", "List.map (+) [1, 2] |> Math.sum"), @"((List.map (+) [1, 2]) |> Math.sum)");
    }

    #[test]
    fn test_local_fixity_declarations() {
        insta::assert_snapshot!(grouped("infixr 6 +%\n", "1 +% 2 +% 3"), @"(1 +% (2 +% 3))");
        insta::assert_snapshot!(grouped("infixl 6 +%\n", "1 +% 2 +% 3"), @"((1 +% 2) +% 3)");
        insta::assert_snapshot!(grouped("infixl 1 +%\n", "1 +% 2 * 3"), @"(1 +% (2 * 3))");
        // A local declaration replaces the built-in fixity.
        insta::assert_snapshot!(grouped("infixr 0 |>\n", "a |> f |> g"), @"(a |> (f |> g))");
    }

    #[test]
    fn test_exposed_fixity_from_table() {
        let mut table = OperatorTable::full();
        table.define("|>", "Pipes", Associativity::Left, 0, Span::default()).unwrap();
        table.define("<+>", "Pipes", Associativity::Right, 5, Span::default()).unwrap();
        table.register_module("Main");
        table.expose_into("Main", "Pipes", "|>", Span::default());
        table.expose_into("Main", "Pipes", "<+>", Span::default());
        let (table, errors) = table.freeze();
        assert!(errors.is_empty());

        let parsed = parse_with(
            "module Main exposing (..)\n\nx = a |> f |> g\ny = a <+> b <+> c\n",
            ParseMode::FULL_PARSE,
            &table,
            "Main",
        );
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let bodies: Vec<String> = parsed.module.values().map(|(v, _)| v.body.node.to_string()).collect();
        assert_eq!(bodies, vec!["((a |> f) |> g)", "(a <+> (b <+> c))"]);
    }

    #[test]
    fn test_non_associative_chain_is_rejected() {
        let errs = parse_str("module T exposing (..)\n\nx = a == b == c\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::Fixity);
        assert!(errs[0].message.contains("non-associative"), "{}", errs[0].message);
    }

    #[test]
    fn test_mixed_associativity_is_rejected() {
        let errs = parse_str("module T exposing (..)\n\nx = a <| b |> c\ny = a |> b <| c\n").unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.message.contains("Cannot mix")));
    }

    #[test]
    fn test_unknown_operator_lenient_is_one_warning() {
        let parsed = parse_with(
            "module T exposing (..)\n\nx = a + b ?? c\n",
            ParseMode::FULL_PARSE,
            &lenient(),
            "T",
        );
        assert_eq!(parsed.errors.len(), 1, "{:?}", parsed.errors);
        assert_eq!(parsed.errors[0].severity, Severity::Warning);
        assert!(!parsed.has_errors());
        let (value, _) = parsed.module.values().next().unwrap();
        assert_eq!(value.body.node.to_string(), "(a + (b ?? c))");
    }

    #[test]
    fn test_unknown_operator_strict_becomes_error_node() {
        let parsed = parse_with(
            "module T exposing (..)\n\nx = a ?? b\n",
            ParseMode::FULL_PARSE,
            &strict(),
            "T",
        );
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.has_errors());
        assert!(parsed.errors[0].message.contains("Unknown operator '??'"));
        let (value, _) = parsed.module.values().next().unwrap();
        assert_eq!(value.body.node, Expr::Error);
    }

    #[test]
    fn test_skip_definitions_keeps_header_imports_and_fixities() {
        let source = "module Main exposing (..)\n\nimport Foo exposing ((+%))\n\ninfixl 6 <+>\n\nvalue = 1 +% 2 +% (3\n\nother : Int\n";
        let parsed = parse_with(source, ParseMode::SKIP_DEFINITIONS, &strict(), "Main");
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.module.imports.len(), 1);
        assert_eq!(parsed.module.declarations.len(), 1);
        assert_eq!(parsed.module.fixities().count(), 1);
    }

    #[test]
    fn test_recovery_reports_each_bad_declaration_once() {
        let source = "module T exposing (..)\n\na = (1\nb = 2\nc = = 3\nd = 4\n";
        let errs = parse_str(source).unwrap_err();
        assert_eq!(errs.len(), 2, "{errs:?}");

        let tokens = lexer::lex(source).unwrap();
        let parsed = parse_module(&tokens, ParseMode::FULL_PARSE, lenient().scope("T"));
        let names: Vec<String> = parsed.module.values().map(|(v, _)| v.name.node.to_string()).collect();
        assert_eq!(names, vec!["b", "d"]);
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let errs = parse_str("x = 1\n").unwrap_err();
        assert!(errs[0].message.contains("Expected 'module' declaration"));
    }

    #[test]
    fn test_import_after_declaration_is_an_error() {
        let errs = parse_str("module T exposing (..)\n\nx = 1\nimport Foo\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("Imports must come before declarations"));
    }

    #[test]
    fn test_precedence_out_of_range() {
        let errs = parse_str("module T exposing (..)\n\ninfixl 12 +%\n").unwrap_err();
        assert_eq!(errs[0].kind, ErrorKind::Fixity);
    }

    #[test]
    fn test_duplicate_fixity_declaration() {
        let errs = parse_str("module T exposing (..)\n\ninfixl 6 +%\ninfixr 2 +%\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("already defined"));
    }

    #[test]
    fn test_parse_mode_flags() {
        let mode = ParseMode::SKIP_DEFINITIONS | ParseMode::SKIP_WARNINGS;
        assert!(mode.is(ParseMode::SKIP_DEFINITIONS));
        assert!(mode.is(ParseMode::SKIP_WARNINGS));
        assert!(!mode.is(ParseMode::JUST_MODULE));
        assert!(!mode.is(ParseMode::FULL_PARSE));
        assert!(ParseMode::STDERR_DIAGNOSTICS.is(ParseMode::FULL_PARSE));
        assert!(mode.without(ParseMode::SKIP_DEFINITIONS).is(ParseMode::FULL_PARSE));
    }

    /// Run `test` on a thread with room for the deepest recursion the parser allows.
    fn with_big_stack(test: impl FnOnce() + Send + 'static) {
        std::thread::Builder::new()
            .stack_size(64 << 20)
            .spawn(test)
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        with_big_stack(|| {
            let depth = 200_000;
            let source = format!("module T exposing (..)\n\nx = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
            let errs = parse_str(&source).unwrap_err();
            assert!(
                errs.iter()
                    .any(|e| e.kind == ErrorKind::Syntax && e.message.contains("nested more than 200 levels")),
                "{errs:?}"
            );
        });
    }

    #[test]
    fn test_nesting_below_the_limit_parses() {
        with_big_stack(|| {
            let depth = MAX_NESTING / 2;
            let expr = format!("{}1 + 2{}", "(".repeat(depth), ")".repeat(depth));
            assert_eq!(grouped("", &expr), "(1 + 2)");

            let negated = format!("{}1", "- ".repeat(depth));
            assert_eq!(grouped("", &negated).matches("(-").count(), depth);
        });
    }
}
