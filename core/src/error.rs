//! Error types for prompting and schema declaration.
//!
//! Data-shape problems are not errors of this kind: they are reported as
//! [`ValidationError`](crate::ValidationError) values and always recovered
//! from by falling back to interactive construction.

use thiserror::Error;

/// Errors that end an interactive prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The operator cancelled a read (Ctrl-C, Ctrl-D, or end of scripted
    /// input). Aborts the whole construction.
    #[error("prompt cancelled")]
    Cancelled,

    /// The terminal failed to read or write.
    #[error("terminal error: {0}")]
    Terminal(String),

    /// Terminal output failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors in a schema's declaration that only surface when it is used.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An autocomplete delimiter is not a valid regular expression.
    #[error("invalid delimiter pattern {pattern:?}: {source}")]
    InvalidDelimiter {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
