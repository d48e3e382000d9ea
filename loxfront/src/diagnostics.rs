//! Lexical and syntax diagnostics collected during one parse.

use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    /// The statement containing it was abandoned outright.
    Fatal,
}

/// Which stage of the front-end detected the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lexical,
    Syntax,
}

/// The token a syntax diagnostic was reported against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Lexeme(String),
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub span: Span,
    pub severity: Severity,
    pub phase: Phase,
    pub message: String,
    pub expected: Option<String>,
    pub found: Option<Found>,
}

impl Diagnostic {
    pub fn lexical(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            severity: Severity::Error,
            phase: Phase::Lexical,
            message: message.into(),
            expected: None,
            found: None,
        }
    }

    pub fn syntax(span: Span, message: impl Into<String>, found: Found) -> Self {
        Self {
            span,
            severity: Severity::Error,
            phase: Phase::Syntax,
            message: message.into(),
            expected: None,
            found: Some(found),
        }
    }

    /// Records what the parser was looking for (builder-style).
    pub fn expecting(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn fatal(mut self) -> Self {
        self.severity = Severity::Fatal;
        self
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error", self.span.line)?;
        match &self.found {
            Some(Found::Lexeme(lexeme)) => write!(f, " at '{}'", lexeme)?,
            Some(Found::End) => write!(f, " at end")?,
            None => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// Append-only, detection-ordered list of diagnostics for one parse.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("diagnostic recorded: {}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Fatal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }

    /// Orders diagnostics by where they occur in the source. Diagnostics at
    /// the same offset keep their detection order.
    pub fn sort_by_position(&mut self) {
        self.items.sort_by_key(|d| d.span.start);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.items {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
