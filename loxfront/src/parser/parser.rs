use log::{debug, info};

use crate::diagnostics::{Diagnostic, Diagnostics, Found};
use crate::error::{ParseResult, SyntaxError};
use crate::ir::ast::{
    BinaryOperator, Expr, ExprKind, LiteralValue, Stmt, StmtKind, Tier, UnaryOperator,
};
use crate::span::Span;

use super::config::ParserConfig;
use super::token::{Keyword, Symbol, Token, TokenKind, TokenValue};

// Stand-in for a token slice that lacks its own Eof.
static END_OF_INPUT: Token = Token {
    kind: TokenKind::Eof,
    lexeme: String::new(),
    value: None,
    span: Span {
        line: 1,
        column: 1,
        start: 0,
        end: 0,
    },
};

/// Recursive-descent parser over a scanned token slice.
///
/// Each binary precedence tier is one method that parses the next tighter
/// tier for its operands, so precedence falls out of the call structure.
/// Syntax errors are recorded in the shared [`Diagnostics`] and the parser
/// resynchronizes at the next statement boundary.
pub struct Parser<'t, 'd> {
    tokens: &'t [Token],
    position: usize,
    config: ParserConfig,
    diagnostics: &'d mut Diagnostics,
    // set by the first error of a statement, suppresses follow-up reports
    panic_mode: bool,
    depth: usize,
    open_blocks: usize,
    // blocks open when the depth limit was hit, including the one refused
    abandoned_blocks: usize,
}

impl<'t, 'd> Parser<'t, 'd> {
    pub fn new(
        tokens: &'t [Token],
        config: ParserConfig,
        diagnostics: &'d mut Diagnostics,
    ) -> Self {
        Self {
            tokens,
            position: 0,
            config,
            diagnostics,
            panic_mode: false,
            depth: 0,
            open_blocks: 0,
            abandoned_blocks: 0,
        }
    }

    /// Parses top-level statements until end of input.
    ///
    /// Statements that fail to parse are left out; their diagnostics are in
    /// the collector.
    pub fn parse(&mut self) -> Vec<Stmt> {
        info!("parsing {} tokens", self.tokens.len());
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        info!("parsed {} statements", statements.len());
        statements
    }

    /// Parses a single expression that must span the whole input.
    pub fn parse_expression(&mut self) -> Option<Expr> {
        let expr = match self.expression() {
            Ok(expr) => expr,
            Err(err) => {
                debug!("{} while parsing a lone expression", err);
                return None;
            }
        };

        if !self.is_at_end() {
            let token = self.peek();
            self.report(token, "expected end of expression", None);
            return None;
        }
        Some(expr)
    }

    // Statements

    /// `None` means the statement failed and the parser resynchronized.
    ///
    /// Only the innermost statement is dropped, so a failure inside a block
    /// leaves the sibling statements of that block intact.
    fn declaration(&mut self) -> Option<Stmt> {
        let start = self.position;
        let open_blocks = self.open_blocks;

        let result = if self.match_keyword(Keyword::Var) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(statement) => {
                self.panic_mode = false;
                Some(statement)
            }
            Err(err) if err.is_fatal() => {
                debug!("{} at token {}, abandoning statement", err, self.position);
                // blocks this statement entered before the limit was hit
                let unclosed = self.abandoned_blocks.saturating_sub(open_blocks);
                self.skip_statement(unclosed);
                None
            }
            Err(_) => {
                self.synchronize(start);
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous();
        let name = self.consume_identifier("expected variable name")?;

        let initializer = if self.match_symbol(Symbol::Equal) {
            Some(self.expression()?)
        } else {
            None
        };

        let end = self.consume(Symbol::Semicolon, "expected ';' after variable declaration")?;
        Ok(Stmt::new(
            StmtKind::VarDeclaration {
                name: name.lexeme.clone(),
                initializer,
            },
            keyword.span.to(&end.span),
        ))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_keyword(Keyword::Print) {
            self.print_statement()
        } else if self.match_symbol(Symbol::LeftBrace) {
            self.block()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous();
        let value = self.expression()?;
        let end = self.consume(Symbol::Semicolon, "expected ';' after value")?;
        Ok(Stmt::new(StmtKind::Print(value), keyword.span.to(&end.span)))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        let end = self.consume(Symbol::Semicolon, "expected ';' after expression")?;
        let span = expr.span.to(&end.span);
        Ok(Stmt::new(StmtKind::Expression(expr), span))
    }

    fn block(&mut self) -> ParseResult<Stmt> {
        let open = self.previous();

        self.open_blocks += 1;
        let result = self.nested(|parser| parser.block_body());
        self.open_blocks -= 1;

        let (statements, close) = result?;
        Ok(Stmt::new(StmtKind::Block(statements), open.span.to(&close.span)))
    }

    fn block_body(&mut self) -> ParseResult<(Vec<Stmt>, &'t Token)> {
        let mut statements = Vec::new();

        while !self.check_symbol(Symbol::RightBrace) && !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        let close = self.consume(Symbol::RightBrace, "expected '}' after block")?;
        Ok((statements, close))
    }

    // Expressions, loosest binding first

    fn expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::assignment)
    }

    /// Right-associative: the value side recurses before combining.
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.equality()?;

        if !self.match_symbol(Symbol::Equal) {
            return Ok(expr);
        }

        let equals = self.previous();
        let value = self.nested(Self::assignment)?;
        let span = expr.span;

        match expr.kind {
            ExprKind::Variable(name) => {
                let full = span.to(&value.span);
                Ok(Expr::assignment(name, value, full))
            }
            kind => {
                // the left side is kept, the statement itself still parses
                self.report(equals, "invalid assignment target", None);
                Ok(Expr::new(kind, span))
            }
        }
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.fold_left(Tier::Equality, Self::comparison)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.fold_left(Tier::Comparison, Self::term)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.fold_left(Tier::Term, Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.fold_left(Tier::Factor, Self::unary)
    }

    /// `operand ( OP operand )*` where OP belongs to `tier`, folded to the left.
    fn fold_left(
        &mut self,
        tier: Tier,
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while let Some(operator) = self.binary_operator(tier) {
            self.advance();
            let right = operand(self)?;
            expr = Expr::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        let operator = match self.peek().kind {
            TokenKind::Symbol(Symbol::Minus) => UnaryOperator::Negate,
            TokenKind::Symbol(Symbol::Bang) => UnaryOperator::Not,
            _ => return self.primary(),
        };

        let token = self.advance();
        let operand = self.nested(Self::unary)?;
        let span = token.span.to(&operand.span);
        Ok(Expr::unary(operator, operand, span))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek();

        let expr = match token.kind {
            TokenKind::Keyword(Keyword::False) => {
                Expr::literal(LiteralValue::Bool(false), token.span)
            }
            TokenKind::Keyword(Keyword::True) => {
                Expr::literal(LiteralValue::Bool(true), token.span)
            }
            TokenKind::Keyword(Keyword::Nil) => Expr::literal(LiteralValue::Nil, token.span),
            TokenKind::Number | TokenKind::String => match literal_value(token) {
                Some(value) => Expr::literal(value, token.span),
                None => {
                    self.report(token, "malformed literal", None);
                    return Err(SyntaxError::Recoverable);
                }
            },
            TokenKind::Identifier => Expr::variable(token.lexeme.clone(), token.span),
            TokenKind::Symbol(Symbol::LeftParen) => {
                self.advance();
                return self.grouping(token);
            }
            _ => {
                self.report(token, "expected expression", None);
                return Err(SyntaxError::Recoverable);
            }
        };

        self.advance();
        Ok(expr)
    }

    /// A missing `)` is reported but the inner expression survives in a
    /// grouping marked as degraded.
    fn grouping(&mut self, open: &'t Token) -> ParseResult<Expr> {
        let inner = self.expression()?;

        if self.check_symbol(Symbol::RightParen) {
            let close = self.advance();
            return Ok(Expr::grouping(inner, false, open.span.to(&close.span)));
        }

        let found = self.peek();
        self.report(found, "expected ')' after expression", Some(Symbol::RightParen.as_str()));
        let span = open.span.to(&inner.span);
        Ok(Expr::grouping(inner, true, span))
    }

    fn binary_operator(&self, tier: Tier) -> Option<BinaryOperator> {
        let TokenKind::Symbol(symbol) = self.peek().kind else {
            return None;
        };

        let operator = match symbol {
            Symbol::EqualEqual => BinaryOperator::Equal,
            Symbol::BangEqual => BinaryOperator::NotEqual,
            Symbol::Less => BinaryOperator::Less,
            Symbol::LessEqual => BinaryOperator::LessEqual,
            Symbol::Greater => BinaryOperator::Greater,
            Symbol::GreaterEqual => BinaryOperator::GreaterEqual,
            Symbol::Plus => BinaryOperator::Add,
            Symbol::Minus => BinaryOperator::Subtract,
            Symbol::Star => BinaryOperator::Multiply,
            Symbol::Slash => BinaryOperator::Divide,
            Symbol::Percent => BinaryOperator::Modulo,
            _ => return None,
        };

        (operator.tier() == tier).then_some(operator)
    }

    // Depth guard and recovery

    /// Runs `parse` one nesting level deeper, failing fatally past the limit.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.config.max_depth {
            return Err(self.too_deep());
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn too_deep(&mut self) -> SyntaxError {
        let token = self.peek();
        debug!("nesting limit {} reached at {}", self.config.max_depth, token.span);

        self.diagnostics.push(
            Diagnostic::syntax(token.span, "expression nested too deeply", found(token)).fatal(),
        );
        self.panic_mode = true;
        self.abandoned_blocks = self.open_blocks;
        SyntaxError::TooDeep
    }

    /// Discards tokens until a plausible statement boundary.
    ///
    /// Stops after a `;`, or in front of a configured boundary token, or in
    /// front of the `}` closing the enclosing block. At least one token of
    /// the failed statement is always consumed.
    fn synchronize(&mut self, start: usize) {
        debug!("synchronizing from token {}", self.position);

        if self.position == start && !self.is_at_end() {
            if self.advance().is_symbol(Symbol::Semicolon) {
                self.panic_mode = false;
                return;
            }
        }

        while !self.is_at_end() {
            let token = self.peek();
            if token.is_symbol(Symbol::Semicolon) {
                self.advance();
                break;
            }
            if self.config.is_boundary(token.kind) {
                break;
            }
            if token.is_symbol(Symbol::RightBrace) && self.open_blocks > 0 {
                break;
            }
            self.advance();
        }

        self.panic_mode = false;
    }

    /// Skips the rest of a statement abandoned at the depth limit, keeping
    /// braces balanced. `unclosed` counts the statement's own blocks that were
    /// already entered. Stops in front of the `}` of an enclosing block.
    fn skip_statement(&mut self, unclosed: usize) {
        let mut open = unclosed;

        while !self.is_at_end() {
            let token = self.peek();
            match token.kind {
                TokenKind::Symbol(Symbol::LeftBrace) => open += 1,
                TokenKind::Symbol(Symbol::RightBrace) if open > 0 => {
                    open -= 1;
                    if open == 0 {
                        self.advance();
                        break;
                    }
                }
                TokenKind::Symbol(Symbol::RightBrace) if self.open_blocks > 0 => break,
                TokenKind::Symbol(Symbol::Semicolon) if open == 0 => {
                    self.advance();
                    break;
                }
                _ => {}
            }
            self.advance();
        }

        self.abandoned_blocks = 0;
        self.panic_mode = false;
    }

    fn report(&mut self, token: &Token, message: &str, expected: Option<&str>) {
        if self.panic_mode {
            debug!("suppressed while synchronizing: {}", message);
            return;
        }
        self.panic_mode = true;

        let mut diagnostic = Diagnostic::syntax(token.span, message, found(token));
        if let Some(expected) = expected {
            diagnostic = diagnostic.expecting(expected);
        }
        self.diagnostics.push(diagnostic);
    }

    // Token cursor

    fn consume(&mut self, symbol: Symbol, message: &str) -> ParseResult<&'t Token> {
        if self.check_symbol(symbol) {
            return Ok(self.advance());
        }

        let token = self.peek();
        self.report(token, message, Some(symbol.as_str()));
        Err(SyntaxError::Recoverable)
    }

    fn consume_identifier(&mut self, message: &str) -> ParseResult<&'t Token> {
        if self.peek().kind == TokenKind::Identifier {
            return Ok(self.advance());
        }

        let token = self.peek();
        self.report(token, message, Some("identifier"));
        Err(SyntaxError::Recoverable)
    }

    fn match_symbol(&mut self, symbol: Symbol) -> bool {
        if self.check_symbol(symbol) {
            self.advance();
            return true;
        }
        false
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek().is_keyword(keyword) {
            self.advance();
            return true;
        }
        false
    }

    fn check_symbol(&self, symbol: Symbol) -> bool {
        self.peek().is_symbol(symbol)
    }

    fn peek(&self) -> &'t Token {
        self.tokens.get(self.position).unwrap_or(&END_OF_INPUT)
    }

    fn previous(&self) -> &'t Token {
        match self.position.checked_sub(1) {
            Some(index) => self.tokens.get(index).unwrap_or(&END_OF_INPUT),
            None => &END_OF_INPUT,
        }
    }

    fn advance(&mut self) -> &'t Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }
}

fn found(token: &Token) -> Found {
    if token.is_eof() {
        Found::End
    } else {
        Found::Lexeme(token.lexeme.clone())
    }
}

/// Tokens built by the scanner always carry their value; hand-built ones may
/// not, so fall back to the lexeme.
fn literal_value(token: &Token) -> Option<LiteralValue> {
    match (&token.kind, &token.value) {
        (_, Some(TokenValue::Number(n))) => Some(LiteralValue::Number(*n)),
        (_, Some(TokenValue::Str(s))) => Some(LiteralValue::Str(s.clone())),
        (TokenKind::Number, None) => token.lexeme.parse().ok().map(LiteralValue::Number),
        (TokenKind::String, None) => token
            .lexeme
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .map(|s| LiteralValue::Str(s.to_string())),
        _ => None,
    }
}
