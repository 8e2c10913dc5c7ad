//! Error types for the note layer.

use num_bigint::BigUint;
use thiserror::Error;

use crate::field::Field;

/// Failures of checked field construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Exceeds SNARK field: {0}")]
    OutOfRange(BigUint),

    #[error("Field overflow")]
    Overflow,

    #[error("Field underflow")]
    Underflow,

    #[error("Value does not fit in {0} bytes")]
    Encoding(usize),

    #[error("Invalid field literal: {0:?}")]
    Parse(String),
}

/// Failures while building, hashing, serializing or encrypting notes.
///
/// A memo that simply does not belong to the caller is not an error; trial
/// decryption reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    #[error("Token {} is not registered", .0.to_hex())]
    UnknownToken(Field),

    #[error("Token registry is full: at most {max} tokens, got {got}")]
    TooManyTokens { max: usize, got: usize },

    #[error("Note carries more than one asset quantity")]
    MixedAssets,

    #[error("Token note needs a non-zero token address")]
    MissingToken,

    #[error("Malformed memo: expected {expected} bytes, got {got}")]
    MalformedMemo { expected: usize, got: usize },

    #[error("Invalid memo encoding: {0}")]
    MemoHex(#[from] hex::FromHexError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
