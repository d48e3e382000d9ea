pub mod config;
pub mod lexer;
pub mod parser;
pub mod token;

use crate::diagnostics::Diagnostics;
use crate::ir::ast;

pub use config::ParserConfig;
pub use parser::Parser;

/// Everything one parse produces.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub statements: Vec<ast::Stmt>,
    pub diagnostics: Diagnostics,
}

impl ParseOutput {
    /// No lexical or syntax problems were found.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Scans and parses one source unit with the default configuration.
pub fn parse(source: &str) -> ParseOutput {
    parse_with_config(source, &ParserConfig::default())
}

/// Diagnostics from both phases come back merged in source order.
pub fn parse_with_config(source: &str, config: &ParserConfig) -> ParseOutput {
    let mut diagnostics = Diagnostics::new();
    let tokens = lexer::tokenize(source, &mut diagnostics);
    let statements = parse_tokens(&tokens, config, &mut diagnostics);
    diagnostics.sort_by_position();
    ParseOutput { statements, diagnostics }
}

/// Parses an already scanned token sequence. Re-running it on the same
/// tokens gives the same statements and diagnostics.
pub fn parse_tokens(
    tokens: &[token::Token],
    config: &ParserConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<ast::Stmt> {
    Parser::new(tokens, config.clone(), diagnostics).parse()
}

/// Parses `source` as a single expression, without a trailing `;`.
pub fn parse_expression(source: &str) -> (Option<ast::Expr>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = lexer::tokenize(source, &mut diagnostics);
    let expr = Parser::new(&tokens, ParserConfig::default(), &mut diagnostics)
        .parse_expression();
    diagnostics.sort_by_position();
    (expr, diagnostics)
}
