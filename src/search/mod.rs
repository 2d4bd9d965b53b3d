//! Sub-linear search algorithms over [`SequenceMatcher`](crate::sequence::SequenceMatcher)s,
//! [`MultiSequenceMatcher`](crate::multi_sequence::MultiSequenceMatcher)s and
//! [`Automaton`](crate::automaton::Automaton)s (component C7, spec §4.6).
//!
//! Every searcher here lazily builds its shift/hash tables behind a
//! `std::sync::OnceLock`, so a `&SearcherImpl` can be shared across threads
//! and the (possibly expensive) table construction happens at most once
//! (spec §5).

pub mod horspool;
pub mod naive;
pub mod set_horspool;
pub mod sunday;
pub mod wu_manber;

use std::sync::Arc;

use bon::bon;

use crate::error::{Error, Result};
use crate::multi_sequence::{MultiMatch, MultiSequenceMatcher};
use crate::reader::WindowReader;
use crate::sequence::SequenceMatcher;

/// A match span: `[start, end)` in the searched buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

/// A single-pattern searcher over a byte buffer or a [`WindowReader`]
/// (spec §4.6). `search_forward`/`search_backward` take an explicit `to`
/// bound per spec §3: `search_forward` reports only positions in
/// `[from, min(to, length) - min_len]`.
pub trait Searcher {
    /// The next match in `[from, to)`, scanning left to right.
    fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position>;

    /// The nearest match ending at or before `from` and starting at or after
    /// `to`, scanning right to left. `from` is an exclusive upper bound,
    /// mirroring `search_forward`'s inclusive lower bound.
    fn search_backward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position>;

    /// Reader-based counterpart to [`Self::search_forward`], for sources
    /// that don't fit in memory (spec §4.6/§6.3). There's no generic way to
    /// replay a buffer-only shift table against a reader, so the default
    /// just reports unsupported; `horspool` and `sunday` override this with
    /// a reader-driven walk of their own shift tables.
    fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<Position> {
        let _ = (reader, from, to);
        None
    }

    /// Every match in `[from, to)`, lazily, left to right (spec §3's
    /// `search_forward_all`). Matches may overlap: the next search resumes
    /// just past the *start* of the previous match, not its end, so every
    /// matching position is reported (spec §8 invariant 8's soundness
    /// requirement covers every reported position, overlapping or not).
    fn search_forward_all<'a>(&'a self, buf: &'a [u8], from: usize, to: usize) -> ForwardAll<'a> {
        ForwardAll {
            searcher: self,
            buf,
            pos: from,
            to,
        }
    }
}

/// Lazy iterator of every match a [`Searcher`] finds in `[from, to)`,
/// restartable only by constructing a fresh one (spec §9).
pub struct ForwardAll<'a> {
    searcher: &'a dyn Searcher,
    buf: &'a [u8],
    pos: usize,
    to: usize,
}

impl<'a> Iterator for ForwardAll<'a> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let pos = self.searcher.search_forward(self.buf, self.pos, self.to)?;
        self.pos = pos.start + 1;
        Some(pos)
    }
}

/// Which searcher implementation to build (spec §4.6). `Naive`/`SetHorspool`/
/// `WuManber` each only apply to one of [`AnySearcher`]/[`AnyMultiSearcher`];
/// passing one to the wrong builder is an [`Error::InvalidArgument`], not a
/// panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Horspool,
    Sunday,
    SetHorspool,
    WuManber,
    Naive,
}

/// A single-pattern searcher over any of the algorithms that take one
/// [`SequenceMatcher`](crate::sequence::SequenceMatcher). Pairs with
/// [`MultiSequenceMatcher::builder`] the same way the teacher pairs
/// `IbMatcher::builder` with its own config builders.
pub struct AnySearcher;

#[bon]
impl AnySearcher {
    #[builder]
    pub fn new(
        #[builder(start_fn)] pattern: Arc<dyn SequenceMatcher>,
        #[builder(default)] algorithm: Algorithm,
    ) -> Result<Box<dyn Searcher>> {
        log::debug!("building a {algorithm:?} searcher for a {}-byte pattern", pattern.len());
        match algorithm {
            Algorithm::Horspool => Ok(Box::new(horspool::HorspoolSearcher::new(pattern))),
            Algorithm::Sunday => Ok(Box::new(sunday::SundaySearcher::new(pattern))),
            Algorithm::Naive => Ok(Box::new(naive::NaiveSearcher::new(naive::NaivePattern::Sequence(pattern)))),
            Algorithm::SetHorspool | Algorithm::WuManber => Err(Error::InvalidArgument(format!(
                "{algorithm:?} searches a MultiSequenceMatcher, not a single pattern; use AnyMultiSearcher"
            ))),
        }
    }
}

/// A searcher over several patterns at once, reporting which one matched.
pub trait MultiSearcher {
    /// The next match in `[from, to)`, scanning left to right.
    fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<(Position, MultiMatch)>;

    /// Reader-based counterpart to [`Self::search_forward`] (spec §4.6/§6.3).
    /// See [`Searcher::search_forward_reader`] for why there's no generic
    /// default beyond "unsupported".
    fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        let _ = (reader, from, to);
        None
    }

    /// Every match in `[from, to)`, lazily, left to right.
    fn search_forward_all<'a>(&'a self, buf: &'a [u8], from: usize, to: usize) -> MultiForwardAll<'a> {
        MultiForwardAll {
            searcher: self,
            buf,
            pos: from,
            to,
        }
    }
}

/// Lazy iterator of every match a [`MultiSearcher`] finds in `[from, to)`.
pub struct MultiForwardAll<'a> {
    searcher: &'a dyn MultiSearcher,
    buf: &'a [u8],
    pos: usize,
    to: usize,
}

impl<'a> Iterator for MultiForwardAll<'a> {
    type Item = (Position, MultiMatch);

    fn next(&mut self) -> Option<(Position, MultiMatch)> {
        let (pos, m) = self.searcher.search_forward(self.buf, self.pos, self.to)?;
        self.pos = pos.start + 1;
        Some((pos, m))
    }
}

impl MultiSearcher for set_horspool::SetHorspoolSearcher<'_> {
    fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        set_horspool::SetHorspoolSearcher::search_forward(self, buf, from, to)
    }

    fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        set_horspool::SetHorspoolSearcher::search_forward_reader(self, reader, from, to)
    }
}

impl MultiSearcher for wu_manber::WuManberSearcher<'_> {
    fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        wu_manber::WuManberSearcher::search_forward(self, buf, from, to)
    }

    fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        wu_manber::WuManberSearcher::search_forward_reader(self, reader, from, to)
    }
}

pub struct AnyMultiSearcher;

#[bon]
impl AnyMultiSearcher {
    #[builder]
    pub fn new<'a>(
        #[builder(start_fn)] trie: &'a MultiSequenceMatcher,
        #[builder(default)] algorithm: Algorithm,
    ) -> Result<Box<dyn MultiSearcher + 'a>> {
        log::debug!("building a {algorithm:?} searcher for {} patterns", trie.len());
        match algorithm {
            Algorithm::SetHorspool => Ok(Box::new(set_horspool::SetHorspoolSearcher::new(trie))),
            Algorithm::WuManber => Ok(Box::new(wu_manber::WuManberSearcher::new(trie)?)),
            Algorithm::Horspool | Algorithm::Sunday | Algorithm::Naive => Err(Error::InvalidArgument(format!(
                "{algorithm:?} searches a single pattern, not a MultiSequenceMatcher; use AnySearcher"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::ByteString;

    #[test]
    fn any_searcher_defaults_to_horspool() {
        let searcher = AnySearcher::builder(ByteString::new(b"needle".to_vec())).build().unwrap();
        let buf = b"a needle in a haystack";
        let pos = searcher.search_forward(buf, 0, buf.len()).unwrap();
        assert_eq!(pos, Position { start: 2, end: 8 });
    }

    #[test]
    fn any_searcher_can_pick_sunday() {
        let searcher = AnySearcher::builder(ByteString::new(b"needle".to_vec()))
            .algorithm(Algorithm::Sunday)
            .build()
            .unwrap();
        let buf = b"a needle in a haystack";
        assert!(searcher.search_forward(buf, 0, buf.len()).is_some());
    }

    #[test]
    fn search_forward_all_reports_every_match() {
        let searcher = AnySearcher::builder(ByteString::new(b"Here".to_vec())).build().unwrap();
        let buf = b"xHereHerey";
        let starts: Vec<usize> = searcher.search_forward_all(buf, 0, buf.len()).map(|p| p.start).collect();
        assert_eq!(starts, vec![1, 5]);
    }

    #[test]
    fn any_searcher_rejects_multi_pattern_algorithms() {
        let err = AnySearcher::builder(ByteString::new(b"needle".to_vec()))
            .algorithm(Algorithm::WuManber)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn any_multi_searcher_builds_set_horspool() {
        let sequences = vec![
            ByteString::new(b"cat".to_vec()),
            ByteString::new(b"dog".to_vec()),
        ];
        let trie = MultiSequenceMatcher::builder(sequences).build();
        let searcher = AnyMultiSearcher::builder(&trie).algorithm(Algorithm::SetHorspool).build().unwrap();
        let buf = b"xxdogyy";
        let (pos, m) = searcher.search_forward(buf, 0, buf.len()).unwrap();
        assert_eq!(pos, Position { start: 2, end: 5 });
        assert_eq!(m.sequence_index, 1);
    }

    #[test]
    fn any_multi_searcher_rejects_single_pattern_algorithms() {
        let sequences = vec![ByteString::new(b"cat".to_vec())];
        let trie = MultiSequenceMatcher::builder(sequences).build();
        let err = AnyMultiSearcher::builder(&trie).algorithm(Algorithm::Horspool).build();
        assert!(err.is_err());
    }
}
