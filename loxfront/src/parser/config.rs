use super::token::{Keyword, Symbol, TokenKind};

/// Deepest nesting accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for one parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Maximum nesting of parentheses, unary operators, assignments and
    /// blocks before the statement is abandoned.
    pub max_depth: usize,
    /// Tokens that start a new statement. Error recovery stops in front of
    /// any of these.
    pub boundaries: Vec<TokenKind>,
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_boundaries(mut self, boundaries: Vec<TokenKind>) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn is_boundary(&self, kind: TokenKind) -> bool {
        self.boundaries.contains(&kind)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            boundaries: vec![
                TokenKind::Keyword(Keyword::Class),
                TokenKind::Keyword(Keyword::Fun),
                TokenKind::Keyword(Keyword::Var),
                TokenKind::Keyword(Keyword::For),
                TokenKind::Keyword(Keyword::If),
                TokenKind::Keyword(Keyword::While),
                TokenKind::Keyword(Keyword::Print),
                TokenKind::Keyword(Keyword::Return),
                TokenKind::Symbol(Symbol::LeftBrace),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_boundaries_cover_declarations_and_blocks() {
        let config = ParserConfig::default();
        assert!(config.is_boundary(TokenKind::Keyword(Keyword::Var)));
        assert!(config.is_boundary(TokenKind::Symbol(Symbol::LeftBrace)));
        assert!(!config.is_boundary(TokenKind::Symbol(Symbol::Semicolon)));
        assert!(!config.is_boundary(TokenKind::Identifier));
    }

    #[test]
    fn builders_override_defaults() {
        let config = ParserConfig::default()
            .with_max_depth(4)
            .with_boundaries(vec![TokenKind::Keyword(Keyword::Print)]);
        assert_eq!(config.max_depth, 4);
        assert!(!config.is_boundary(TokenKind::Keyword(Keyword::Var)));
    }
}
