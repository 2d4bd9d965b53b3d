//! A minimal textual front-end for [`crate::compile::Node`] (spec §6).
//!
//! Patterns are written as hex byte pairs, quoted strings, bitmasks, sets and
//! the usual regex quantifiers/alternation/grouping. [`lexer`] tokenises with
//! [`logos`]; [`parser`] is a hand-written recursive-descent parser over that
//! token stream, producing a [`crate::compile::Node`] tree ready for
//! [`crate::compile::compile`].
//!
//! Gated behind the `syntax` feature: callers who only need [`crate::compile::Node`]
//! built programmatically (e.g. from their own file-format parser) don't pay
//! for a lexer they never use.

mod lexer;
mod parser;

pub use parser::parse;
