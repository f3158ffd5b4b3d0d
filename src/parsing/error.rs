use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("expected {expected} columns, found {found}")]
    UnexpectedColumnCount { expected: usize, found: usize },
}
