//! Error types for matcher construction, pattern parsing and compilation.
//!
//! Matching and searching themselves never raise: [`crate::byte_matcher::ByteMatcher::matches`]
//! returns `bool`, [`crate::search::Searcher::search_forward`] returns `Option<Position>`.
//! `Error` is only produced by fallible *construction*.

use thiserror::Error;

/// Errors produced while building matchers, compiling pattern trees or
/// parsing textual patterns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("parse error at byte {pos}: {kind}")]
    Parse { pos: usize, kind: ParseErrorKind },

    #[error("compile error: {0}")]
    Compile(#[from] CompileErrorKind),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Why a textual pattern failed to parse. Carries no position; [`Error::Parse`]
/// adds that.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of pattern")]
    UnexpectedEof,
    #[error("unexpected byte {byte:#04x}")]
    UnexpectedByte { byte: u8 },
    #[error("invalid hex byte literal {text:?}")]
    InvalidHexByte { text: String },
    #[error("invalid bitmask literal {text:?}")]
    InvalidBitmask { text: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated set, expected ']'")]
    UnterminatedSet,
    #[error("empty set")]
    EmptySet,
    #[error("invalid range, start {lo:#04x} greater than end {hi:#04x}")]
    InvalidRange { lo: u8, hi: u8 },
    #[error("invalid quantifier bounds {{{lo},{hi:?}}}")]
    InvalidQuantifier { lo: u64, hi: Option<u64> },
    #[error("unknown escape sequence \\{0}")]
    UnknownEscape(char),
    #[error("unmatched closing parenthesis")]
    UnmatchedCloseParen,
    #[error("missing closing parenthesis")]
    MissingCloseParen,
}

/// Why a pattern tree ([`crate::compile::Node`]) failed to compile into a matcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileErrorKind {
    #[error("unknown node kind")]
    UnknownNode,
    #[error("empty alternation")]
    EmptyAlternation,
    #[error("target cannot be quantified")]
    UnquantifiableTarget,
    #[error("byte literal {0} out of range")]
    OutOfRangeByte(u32),
    #[error("invalid repeat bounds {{{lo},{hi}}}")]
    InvalidRepeatBounds { lo: u64, hi: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
