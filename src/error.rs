//! Error types for the recoverable failures of the crate.
//!
//! Caller bugs (non-permutations, empty worksets, self edges) are not errors:
//! they panic at the point of violation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid graph text at line {line}: {reason}")]
    InvalidGraphText { line: usize, reason: String },

    #[error("Invalid value \"{value}\" for option \"{option}\": {reason}")]
    InvalidOption {
        option: &'static str,
        value: String,
        reason: String,
    },

    #[error("The {kind} orderer requires at least two orderers, got {count}")]
    TooFewOrderers { kind: &'static str, count: usize },
}

impl Error {
    pub(crate) fn graph_text(line: usize, reason: impl Into<String>) -> Self {
        Error::InvalidGraphText {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn option(option: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidOption {
            option,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
