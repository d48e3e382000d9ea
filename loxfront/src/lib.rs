//! Front-end for a small Lox-style language: scanner, recursive-descent
//! parser and AST, with diagnostics collected instead of thrown.
//!
//! ```
//! let output = loxfront::parse("var a = 1 + 3 * 2;");
//! assert!(output.is_clean());
//! assert_eq!(
//!     loxfront::ir::printer::sexpr_program(&output.statements),
//!     "(var a (+ 1 (* 3 2)))"
//! );
//! ```

pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod parser;
pub mod span;

pub use diagnostics::{Diagnostic, Diagnostics, Found, Phase, Severity};
pub use error::{FrontendError, SyntaxError};
pub use ir::ast::{Expr, ExprKind, Stmt, StmtKind};
pub use parser::{
    ParseOutput, Parser, ParserConfig, parse, parse_expression, parse_with_config,
};
pub use span::Span;
