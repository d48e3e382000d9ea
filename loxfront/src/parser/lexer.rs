use log::trace;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::span::Span;

use super::token::{Keyword, Symbol, Token, TokenKind, TokenValue};

/// Scans the whole source, recording lexical problems in `diagnostics`.
///
/// The returned vector always ends with exactly one `Eof` token.
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    Scanner::new(source, diagnostics).collect()
}

/// Pull-based scanner. Yields tokens on demand and finishes with a single
/// `Eof` token, after which the iterator is exhausted.
pub struct Scanner<'src, 'd> {
    source: &'src str,
    diagnostics: &'d mut Diagnostics,
    // byte offset of the next unread character
    current: usize,
    line: usize,
    column: usize,
    // position where the token being scanned began
    start: usize,
    start_line: usize,
    start_column: usize,
    finished: bool,
}

impl<'src, 'd> Scanner<'src, 'd> {
    pub fn new(source: &'src str, diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            source,
            diagnostics,
            current: 0,
            line: 1,
            column: 1,
            start: 0,
            start_line: 1,
            start_column: 1,
            finished: false,
        }
    }

    fn next_token(&mut self) -> Token {
        loop {
            self.skip_trivia();
            self.mark_start();

            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, "", self.token_span());
            };

            let kind = match ch {
                '(' => TokenKind::Symbol(Symbol::LeftParen),
                ')' => TokenKind::Symbol(Symbol::RightParen),
                '{' => TokenKind::Symbol(Symbol::LeftBrace),
                '}' => TokenKind::Symbol(Symbol::RightBrace),
                ',' => TokenKind::Symbol(Symbol::Comma),
                '.' => TokenKind::Symbol(Symbol::Dot),
                '-' => TokenKind::Symbol(Symbol::Minus),
                '+' => TokenKind::Symbol(Symbol::Plus),
                ';' => TokenKind::Symbol(Symbol::Semicolon),
                '*' => TokenKind::Symbol(Symbol::Star),
                '/' => TokenKind::Symbol(Symbol::Slash),
                '%' => TokenKind::Symbol(Symbol::Percent),
                '?' => TokenKind::Symbol(Symbol::Question),
                ':' => TokenKind::Symbol(Symbol::Colon),
                '!' => self.one_or_two('=', Symbol::BangEqual, Symbol::Bang),
                '=' => self.one_or_two('=', Symbol::EqualEqual, Symbol::Equal),
                '<' => self.one_or_two('=', Symbol::LessEqual, Symbol::Less),
                '>' => self.one_or_two('=', Symbol::GreaterEqual, Symbol::Greater),
                '"' => match self.string() {
                    Some(token) => return token,
                    None => continue,
                },
                c if c.is_ascii_digit() => match self.number() {
                    Some(token) => return token,
                    None => continue,
                },
                c if is_alpha(c) => return self.identifier(),
                other => {
                    let span = self.token_span();
                    self.diagnostics.push(Diagnostic::lexical(
                        span,
                        format!("unexpected character '{}'", other),
                    ));
                    continue;
                }
            };

            return self.make_token(kind);
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\r' | '\t' | '\n') => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => self.block_comment(),
                _ => return,
            }
        }
    }

    /// Block comments nest: every `/*` needs its own `*/`.
    fn block_comment(&mut self) {
        self.mark_start();
        self.advance();
        self.advance();
        let mut depth = 1usize;

        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.advance();
                }
                (None, _) => {
                    let span =
                        Span::new(self.start_line, self.start_column, self.start, self.start + 2);
                    self.diagnostics
                        .push(Diagnostic::lexical(span, "unterminated block comment"));
                    return;
                }
            }
        }
    }

    fn string(&mut self) -> Option<Token> {
        let mut value = String::new();

        loop {
            match self.peek() {
                None => {
                    let span =
                        Span::new(self.start_line, self.start_column, self.start, self.current);
                    self.diagnostics
                        .push(Diagnostic::lexical(span, "unterminated string"));
                    return None;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let (line, column, offset) = (self.line, self.column, self.current);
                    self.advance();
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('0') => value.push('\0'),
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some(other) => {
                            let span = Span::new(line, column, offset, self.current);
                            self.diagnostics.push(Diagnostic::lexical(
                                span,
                                format!("unknown escape sequence '\\{}'", other),
                            ));
                            value.push(other);
                        }
                        // reported as unterminated on the next pass
                        None => {}
                    }
                }
                Some(ch) => {
                    self.advance();
                    value.push(ch);
                }
            }
        }

        Some(self.make_token(TokenKind::String).with_value(TokenValue::Str(value)))
    }

    fn number(&mut self) -> Option<Token> {
        self.eat_digits();

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.eat_digits();
        }

        // digits past f64 range parse to infinity, which has no literal form
        let lexeme = &self.source[self.start..self.current];
        match lexeme.parse::<f64>() {
            Ok(n) if n.is_finite() => {
                Some(self.make_token(TokenKind::Number).with_value(TokenValue::Number(n)))
            }
            _ => {
                let span = self.token_span();
                self.diagnostics.push(Diagnostic::lexical(span, "invalid number literal"));
                None
            }
        }
    }

    fn identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_alpha_numeric) {
            self.advance();
        }

        let word = &self.source[self.start..self.current];
        let kind = match Keyword::from_word(word) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        };
        self.make_token(kind)
    }

    fn eat_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn one_or_two(&mut self, second: char, double: Symbol, single: Symbol) -> TokenKind {
        if self.peek() == Some(second) {
            self.advance();
            TokenKind::Symbol(double)
        } else {
            TokenKind::Symbol(single)
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        let token = Token::new(kind, &self.source[self.start..self.current], self.token_span());
        trace!("scanned {:?} {:?} at {}", token.kind, token.lexeme, token.span);
        token
    }

    fn mark_start(&mut self) {
        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn token_span(&self) -> Span {
        Span::new(self.start_line, self.start_column, self.start, self.current)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
}

impl Iterator for Scanner<'_, '_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.finished = true;
        }
        Some(token)
    }
}

fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_alpha_numeric(ch: char) -> bool {
    is_alpha(ch) || ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, &mut diagnostics);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {}", diagnostics);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \n\t // nothing here"), vec![TokenKind::Eof]);
    }

    #[test]
    fn two_character_operators_win() {
        assert_eq!(
            kinds("!= ! == = <= < >= >"),
            vec![
                TokenKind::Symbol(Symbol::BangEqual),
                TokenKind::Symbol(Symbol::Bang),
                TokenKind::Symbol(Symbol::EqualEqual),
                TokenKind::Symbol(Symbol::Equal),
                TokenKind::Symbol(Symbol::LessEqual),
                TokenKind::Symbol(Symbol::Less),
                TokenKind::Symbol(Symbol::GreaterEqual),
                TokenKind::Symbol(Symbol::Greater),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_after_greedy_identifier_match() {
        assert_eq!(
            kinds("var variable nil"),
            vec![
                TokenKind::Keyword(Keyword::Var),
                TokenKind::Identifier,
                TokenKind::Keyword(Keyword::Nil),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn number_values() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("12 3.25 7.", &mut diagnostics);
        assert_eq!(tokens[0].value, Some(TokenValue::Number(12.0)));
        assert_eq!(tokens[1].value, Some(TokenValue::Number(3.25)));
        assert_eq!(tokens[2].lexeme, "7");
        assert!(tokens[3].is_symbol(Symbol::Dot));
    }

    #[test]
    fn string_escapes_are_decoded() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(r#""a\n\"b\"\\""#, &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert_eq!(tokens[0].value, Some(TokenValue::Str("a\n\"b\"\\".to_string())));
        assert_eq!(tokens[0].lexeme, r#""a\n\"b\"\\""#);
    }

    #[test]
    fn nested_block_comment_is_skipped() {
        assert_eq!(
            kinds("1 /* outer /* inner */ still outer */ 2"),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("a\n  bc", &mut diagnostics);
        assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
        assert_eq!((tokens[1].span.line, tokens[1].span.column), (2, 3));
        assert_eq!((tokens[1].span.start, tokens[1].span.end), (4, 6));
        assert_eq!((tokens[2].span.line, tokens[2].span.column), (2, 5));
    }

    #[test]
    fn unexpected_characters_do_not_stop_scanning() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("1 # 2\n @ 3", &mut diagnostics);
        assert_eq!(tokens.len(), 4);
        assert_eq!(diagnostics.len(), 2);
        let first = &diagnostics.as_slice()[0];
        let second = &diagnostics.as_slice()[1];
        assert_eq!((first.line(), first.column()), (1, 3));
        assert_eq!((second.line(), second.column()), (2, 2));
    }

    #[test]
    fn unterminated_string_reports_opening_quote() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("x = \"abc", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.as_slice()[0].message, "unterminated string");
        assert_eq!(diagnostics.as_slice()[0].column(), 5);
        assert!(tokens.last().unwrap().is_eof());
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn unterminated_block_comment_is_reported() {
        let mut diagnostics = Diagnostics::new();
        tokenize("1 /* /* */", &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.as_slice()[0].message, "unterminated block comment");
    }

    #[test]
    fn unknown_escape_keeps_scanning_the_string() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(r#""a\qb""#, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens[0].value, Some(TokenValue::Str("aqb".to_string())));
    }

    #[test]
    fn out_of_range_number_is_rejected() {
        let mut diagnostics = Diagnostics::new();
        let source = format!("{};", "9".repeat(400));
        let tokens = tokenize(&source, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics.as_slice()[0];
        assert_eq!(diagnostic.message, "invalid number literal");
        assert_eq!((diagnostic.span.start, diagnostic.span.end), (0, 400));
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Symbol(Symbol::Semicolon), TokenKind::Eof]);
    }

    #[test]
    fn large_finite_number_keeps_its_value() {
        let mut diagnostics = Diagnostics::new();
        let source = "9".repeat(300);
        let tokens = tokenize(&source, &mut diagnostics);
        assert!(diagnostics.is_empty());
        let Some(TokenValue::Number(n)) = tokens[0].value else {
            panic!("expected a number value");
        };
        assert!(n.is_finite());
    }

    #[test]
    fn scanner_is_exhausted_after_eof() {
        let mut diagnostics = Diagnostics::new();
        let mut scanner = Scanner::new("x", &mut diagnostics);
        assert_eq!(scanner.next().map(|t| t.kind), Some(TokenKind::Identifier));
        assert_eq!(scanner.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert!(scanner.next().is_none());
    }
}
