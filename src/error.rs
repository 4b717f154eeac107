use crate::ast::Value;
use crate::context::RootName;
use thiserror::Error;

/// Errors that invalidate the whole context for evaluation purposes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    #[error("Failed to parse '{root}' input data: {message}")]
    InvalidRoot { root: RootName, message: String },
}

/// Errors produced while lexing or parsing expression text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprParseError {
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },

    #[error("Invalid number literal at position {pos}")]
    InvalidNumber { pos: usize },

    #[error("Unexpected token '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,
}

/// Errors raised while evaluating a parsed expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("'{name}' is not defined")]
    UnknownIdentifier { name: String },

    #[error("Unknown context root '${name}'")]
    UnknownRoot { name: String },

    #[error("Cannot read property '{property}' of {of}")]
    PropertyOfMissing { property: String, of: &'static str },

    #[error("'{method}' is not a function on {kind} values")]
    NotAFunction { method: String, kind: &'static str },

    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },
}
