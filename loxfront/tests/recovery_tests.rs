use loxfront::diagnostics::{Diagnostics, Found, Phase, Severity};
use loxfront::ir::ast::StmtKind;
use loxfront::ir::printer;
use loxfront::parser::{lexer, parse_tokens};
use loxfront::{ParserConfig, parse, parse_with_config};

fn rendered(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}

#[test]
fn error_in_first_statement_does_not_affect_second() {
    let output = parse("1 + ; 2;");
    assert_eq!(rendered(&output.diagnostics), vec!["[line 1] Error at ';': expected expression"]);
    assert_eq!(output.statements.len(), 1);
    assert_eq!(printer::sexpr_stmt(&output.statements[0]), "(expr 2)");
}

#[test]
fn independent_errors_are_all_reported_in_source_order() {
    let source = "print ;\nvar = 2;\nprint (1;\nprint 4;";
    let output = parse(source);
    assert_eq!(
        rendered(&output.diagnostics),
        vec![
            "[line 1] Error at ';': expected expression",
            "[line 2] Error at '=': expected variable name",
            "[line 3] Error at ';': expected ')' after expression",
        ]
    );
    assert_eq!(
        printer::sexpr_program(&output.statements),
        "(print (group 1))\n(print 4)"
    );
}

#[test]
fn missing_close_paren_keeps_a_degraded_grouping() {
    let output = parse("print (1 + 2;");
    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.message, "expected ')' after expression");
    assert_eq!(diagnostic.expected.as_deref(), Some(")"));

    let stmt = &output.statements[0];
    assert!(stmt.has_errors());
    let StmtKind::Print(value) = &stmt.kind else {
        panic!("expected a print statement");
    };
    assert!(matches!(
        value.kind,
        loxfront::ExprKind::Grouping { degraded: true, .. }
    ));
}

#[test]
fn missing_paren_does_not_cascade() {
    let output = parse("(1 + 2 3; print 4;");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(printer::sexpr_program(&output.statements), "(print 4)");
}

#[test]
fn invalid_assignment_target_is_reported() {
    let output = parse("a + b = c;\n(d) = 1;");
    assert_eq!(
        rendered(&output.diagnostics),
        vec![
            "[line 1] Error at '=': invalid assignment target",
            "[line 2] Error at '=': invalid assignment target",
        ]
    );
    assert_eq!(
        printer::sexpr_program(&output.statements),
        "(expr (+ a b))\n(expr (group d))"
    );
}

#[test]
fn missing_semicolon_at_end_of_input() {
    let output = parse("print 1");
    assert_eq!(
        rendered(&output.diagnostics),
        vec!["[line 1] Error at end: expected ';' after value"]
    );
    assert_eq!(output.diagnostics.as_slice()[0].found, Some(Found::End));
    assert!(output.statements.is_empty());
}

#[test]
fn unclosed_block_is_reported_once() {
    let output = parse("{ print 1;");
    assert_eq!(
        rendered(&output.diagnostics),
        vec!["[line 1] Error at end: expected '}' after block"]
    );
    assert!(output.statements.is_empty());
}

#[test]
fn two_bad_characters_give_two_lexical_diagnostics() {
    let mut diagnostics = Diagnostics::new();
    let tokens = lexer::tokenize("a @ b\n  # c", &mut diagnostics);
    assert_eq!(tokens.len(), 4);

    let positions: Vec<(usize, usize)> =
        diagnostics.iter().map(|d| (d.line(), d.column())).collect();
    assert_eq!(positions, vec![(1, 3), (2, 3)]);
    assert!(diagnostics.iter().all(|d| d.phase == Phase::Lexical));
    assert_eq!(
        rendered(&diagnostics),
        vec![
            "[line 1] Error: unexpected character '@'",
            "[line 2] Error: unexpected character '#'",
        ]
    );
}

#[test]
fn lexical_and_syntax_errors_in_one_parse() {
    let output = parse("var s = \"open;\nprint 1 +;");
    let phases: Vec<Phase> = output.diagnostics.iter().map(|d| d.phase).collect();
    assert_eq!(phases, vec![Phase::Lexical, Phase::Syntax]);
    assert_eq!(output.diagnostics.as_slice()[0].message, "unterminated string");
}

#[test]
fn syntax_error_before_lexical_error_keeps_source_order() {
    let output = parse("print ;\n@");
    assert_eq!(
        rendered(&output.diagnostics),
        vec![
            "[line 1] Error at ';': expected expression",
            "[line 2] Error: unexpected character '@'",
        ]
    );
    let phases: Vec<Phase> = output.diagnostics.iter().map(|d| d.phase).collect();
    assert_eq!(phases, vec![Phase::Syntax, Phase::Lexical]);
}

#[test]
fn deep_parentheses_hit_the_depth_limit_once() {
    let depth = 10_000;
    let source = format!("{}1{}; print 2;", "(".repeat(depth), ")".repeat(depth));
    let output = parse(&source);

    assert_eq!(output.diagnostics.len(), 1);
    let diagnostic = &output.diagnostics.as_slice()[0];
    assert_eq!(diagnostic.severity, Severity::Fatal);
    assert_eq!(diagnostic.message, "expression nested too deeply");
    assert_eq!(printer::sexpr_program(&output.statements), "(print 2)");
}

#[test]
fn deep_unary_chain_hits_the_depth_limit() {
    let source = format!("{}1;\nprint 3;", "-".repeat(50_000));
    let output = parse(&source);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.diagnostics.has_fatal());
    assert_eq!(printer::sexpr_program(&output.statements), "(print 3)");
}

#[test]
fn deep_blocks_abandon_only_the_block_past_the_limit() {
    let source = format!("{}{} print 1;", "{".repeat(300), "}".repeat(300));
    let output = parse(&source);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.diagnostics.has_fatal());

    // the 64 blocks within the limit survive, the innermost one left empty
    assert_eq!(output.statements.len(), 2);
    let outer = printer::sexpr_stmt(&output.statements[0]);
    assert_eq!(outer.matches("(block").count(), 64);
    assert_eq!(printer::sexpr_stmt(&output.statements[1]), "(print 1)");
}

#[test]
fn depth_limit_inside_a_block_keeps_its_siblings() {
    let config = ParserConfig::default().with_max_depth(4);
    let output = parse_with_config("{ print 1; print ((((((1)))))); print 2; } print 3;", &config);

    assert_eq!(
        rendered(&output.diagnostics),
        vec!["[line 1] Error at '(': expression nested too deeply"]
    );
    assert_eq!(
        printer::sexpr_program(&output.statements),
        "(block (print 1) (print 2))\n(print 3)"
    );
}

#[test]
fn nested_block_past_the_limit_keeps_the_enclosing_block() {
    let config = ParserConfig::default().with_max_depth(2);
    let output = parse_with_config("{ print 1; { { print 2; } } print 3; } print 4;", &config);

    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics.as_slice()[0].severity, Severity::Fatal);
    assert_eq!(
        printer::sexpr_program(&output.statements),
        "(block (print 1) (block) (print 3))\n(print 4)"
    );
}

#[test]
fn depth_limit_is_configurable() {
    let config = ParserConfig::default().with_max_depth(3);

    let output = parse_with_config("((1));", &config);
    assert!(output.is_clean(), "{}", output.diagnostics);

    let output = parse_with_config("(((1)));", &config);
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.statements.is_empty());
}

#[test]
fn reparsing_the_same_tokens_is_deterministic() {
    let mut scan_diagnostics = Diagnostics::new();
    let tokens = lexer::tokenize("var a = (1 + ;\nprint a * 2;", &mut scan_diagnostics);
    let config = ParserConfig::default();

    let mut first = Diagnostics::new();
    let mut second = Diagnostics::new();
    let a = parse_tokens(&tokens, &config, &mut first);
    let b = parse_tokens(&tokens, &config, &mut second);

    assert_eq!(a, b);
    assert_eq!(first.as_slice(), second.as_slice());
    assert_eq!(first.len(), 1);
}
