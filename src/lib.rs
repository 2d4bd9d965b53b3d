/*!
A byte-oriented pattern matching and sub-linear search library.

## Features
- Single-byte predicates ([`byte_matcher::ByteMatcher`]) through ordered
  sequences ([`sequence::SequenceMatcher`]), sets of sequences
  ([`multi_sequence::MultiSequenceMatcher`]) and full automata
  ([`automaton::Automaton`]) — callers pick the cheapest representation that
  fits their pattern, and [`compile::compile`] does that picking
  automatically from a [`compile::Node`] tree.
- A windowed I/O abstraction ([`reader::WindowReader`]) so matching can run
  over paged or streamed sources without ever materialising the whole input.
- Several sub-linear [`search::Searcher`]s (Horspool, Sunday, Set-Horspool,
  Wu-Manber) plus a brute-force oracle used to check them against each other
  in tests.
- An optional textual pattern syntax ([`syntax`], behind the `syntax`
  feature) compiling hex bytes, quoted strings, sets, ranges and the usual
  regex quantifiers/alternation down to a [`compile::Node`].

And all of the above is composable piece by piece: a caller who only needs
literal-string search never touches [`automaton`] at all.
*/
//! ## Usage
//! ```
//! use binseek::search::{horspool::HorspoolSearcher, Searcher};
//! use binseek::sequence::ByteString;
//!
//! let needle = ByteString::new(b"needle".to_vec());
//! let searcher = HorspoolSearcher::new(needle);
//! let hay = b"a needle in a haystack";
//! let pos = searcher.search_forward(hay, 0, hay.len()).unwrap();
//! assert_eq!(&hay[pos.start..pos.end], b"needle");
//! ```
//!
//! ## Crate features
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod automaton;
pub mod byte_matcher;
pub mod compile;
pub mod error;
pub mod multi_sequence;
pub mod reader;
pub mod search;
pub mod sequence;
#[cfg(feature = "syntax")]
pub mod syntax;

pub use error::{Error, Result};
