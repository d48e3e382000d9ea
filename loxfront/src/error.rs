use thiserror::Error;

/// Errors surfaced by the `loxfront` binary.
#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("{count} error(s) reported in {path}")]
    Rejected { path: String, count: usize },
}

/// Why the parser abandoned the statement it was working on.
///
/// The diagnostic itself has already been recorded when one of these is
/// returned; the value only drives unwinding and resynchronization.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("statement abandoned after a syntax error")]
    Recoverable,

    #[error("expression nested too deeply")]
    TooDeep,
}

impl SyntaxError {
    /// Fatal errors unwind to the enclosing top-level statement.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyntaxError::TooDeep)
    }
}

pub type ParseResult<T> = Result<T, SyntaxError>;
