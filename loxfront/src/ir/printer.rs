//! Text renderings of the AST used by tests and the inspection binary.
//!
//! `sexpr` is the fully-parenthesized form, e.g. `(+ 1 (* 3 2))`.
//! `source` turns the tree back into parseable source text; only grouping
//! nodes introduce parentheses, so parsing the output rebuilds the same tree.

use super::ast::{Expr, ExprKind, LiteralValue, Stmt, StmtKind};

pub fn sexpr(expr: &Expr) -> String {
    let mut out = String::new();
    write_sexpr(&mut out, expr);
    out
}

pub fn sexpr_stmt(stmt: &Stmt) -> String {
    let mut out = String::new();
    write_sexpr_stmt(&mut out, stmt);
    out
}

/// One line per top-level statement.
pub fn sexpr_program(statements: &[Stmt]) -> String {
    statements.iter().map(sexpr_stmt).collect::<Vec<_>>().join("\n")
}

pub fn source(expr: &Expr) -> String {
    let mut out = String::new();
    write_source(&mut out, expr);
    out
}

pub fn source_stmt(stmt: &Stmt) -> String {
    let mut out = String::new();
    write_source_stmt(&mut out, stmt);
    out
}

pub fn source_program(statements: &[Stmt]) -> String {
    statements.iter().map(source_stmt).collect::<Vec<_>>().join("\n")
}

fn write_sexpr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(value) => write_literal(out, value),
        ExprKind::Variable(name) => out.push_str(name),
        ExprKind::Grouping { inner, .. } => {
            out.push_str("(group ");
            write_sexpr(out, inner);
            out.push(')');
        }
        ExprKind::Unary { operator, operand } => {
            open_form(out, operator.as_str());
            write_sexpr(out, operand);
            out.push(')');
        }
        ExprKind::Binary { operator, left, right } => {
            open_form(out, operator.as_str());
            write_sexpr(out, left);
            out.push(' ');
            write_sexpr(out, right);
            out.push(')');
        }
        ExprKind::Assignment { target, value } => {
            open_form(out, "=");
            out.push_str(target);
            out.push(' ');
            write_sexpr(out, value);
            out.push(')');
        }
    }
}

fn write_sexpr_stmt(out: &mut String, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Expression(expr) => {
            out.push_str("(expr ");
            write_sexpr(out, expr);
            out.push(')');
        }
        StmtKind::Print(expr) => {
            out.push_str("(print ");
            write_sexpr(out, expr);
            out.push(')');
        }
        StmtKind::VarDeclaration { name, initializer } => {
            out.push_str("(var ");
            out.push_str(name);
            if let Some(init) = initializer {
                out.push(' ');
                write_sexpr(out, init);
            }
            out.push(')');
        }
        StmtKind::Block(statements) => {
            out.push_str("(block");
            for inner in statements {
                out.push(' ');
                write_sexpr_stmt(out, inner);
            }
            out.push(')');
        }
    }
}

fn write_source(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(value) => write_literal(out, value),
        ExprKind::Variable(name) => out.push_str(name),
        ExprKind::Grouping { inner, degraded } => {
            out.push('(');
            write_source(out, inner);
            if !degraded {
                out.push(')');
            }
        }
        ExprKind::Unary { operator, operand } => {
            out.push_str(operator.as_str());
            write_source(out, operand);
        }
        ExprKind::Binary { operator, left, right } => {
            write_source(out, left);
            out.push(' ');
            out.push_str(operator.as_str());
            out.push(' ');
            write_source(out, right);
        }
        ExprKind::Assignment { target, value } => {
            out.push_str(target);
            out.push_str(" = ");
            write_source(out, value);
        }
    }
}

fn write_source_stmt(out: &mut String, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Expression(expr) => {
            write_source(out, expr);
            out.push(';');
        }
        StmtKind::Print(expr) => {
            out.push_str("print ");
            write_source(out, expr);
            out.push(';');
        }
        StmtKind::VarDeclaration { name, initializer } => {
            out.push_str("var ");
            out.push_str(name);
            if let Some(init) = initializer {
                out.push_str(" = ");
                write_source(out, init);
            }
            out.push(';');
        }
        StmtKind::Block(statements) => {
            out.push('{');
            for inner in statements {
                out.push(' ');
                write_source_stmt(out, inner);
            }
            out.push_str(" }");
        }
    }
}

/// Writes `(op ` ahead of the operands.
fn open_form(out: &mut String, operator: &str) {
    out.push('(');
    out.push_str(operator);
    out.push(' ');
}

fn write_literal(out: &mut String, value: &LiteralValue) {
    match value {
        // f64's Display never uses exponent notation, so this re-scans as the same number
        LiteralValue::Number(n) => out.push_str(&n.to_string()),
        LiteralValue::Str(s) => {
            out.push('"');
            for ch in s.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    '\r' => out.push_str("\\r"),
                    '\0' => out.push_str("\\0"),
                    other => out.push(other),
                }
            }
            out.push('"');
        }
        LiteralValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        LiteralValue::Nil => out.push_str("nil"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ast::{BinaryOperator, UnaryOperator};
    use crate::span::Span;

    fn num(n: f64) -> Expr {
        Expr::literal(LiteralValue::Number(n), Span::default())
    }

    #[test]
    fn sexpr_of_nested_binary() {
        let expr = Expr::binary(
            BinaryOperator::Multiply,
            Expr::unary(UnaryOperator::Negate, num(123.0), Span::default()),
            Expr::grouping(num(45.67), false, Span::default()),
        );
        assert_eq!(sexpr(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn source_only_parenthesizes_groupings() {
        let expr = Expr::binary(
            BinaryOperator::Multiply,
            Expr::grouping(
                Expr::binary(BinaryOperator::Add, num(1.0), num(2.0)),
                false,
                Span::default(),
            ),
            num(3.0),
        );
        assert_eq!(source(&expr), "(1 + 2) * 3");
    }

    #[test]
    fn strings_are_escaped() {
        let expr = Expr::literal(LiteralValue::Str("say \"hi\"\n".to_string()), Span::default());
        assert_eq!(source(&expr), r#""say \"hi\"\n""#);
    }

    #[test]
    fn statements_render_in_both_forms() {
        let stmt = Stmt::new(
            StmtKind::Block(vec![
                Stmt::new(
                    StmtKind::VarDeclaration {
                        name: "a".to_string(),
                        initializer: Some(num(1.0)),
                    },
                    Span::default(),
                ),
                Stmt::new(
                    StmtKind::Print(Expr::variable("a", Span::default())),
                    Span::default(),
                ),
            ]),
            Span::default(),
        );
        assert_eq!(sexpr_stmt(&stmt), "(block (var a 1) (print a))");
        assert_eq!(source_stmt(&stmt), "{ var a = 1; print a; }");
    }
}
