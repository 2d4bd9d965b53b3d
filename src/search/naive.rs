//! Brute-force search (spec §4.6.5): tries every position in turn. Used as
//! the correctness oracle the other searchers' results are checked against,
//! never for production throughput.

use std::sync::Arc;

use crate::automaton::Automaton;
use crate::sequence::SequenceMatcher;

use super::{Position, Searcher};

/// What `NaiveSearcher` tests at each candidate position.
pub enum NaivePattern {
    Sequence(Arc<dyn SequenceMatcher>),
    Automaton(Automaton),
}

impl NaivePattern {
    fn min_len(&self) -> usize {
        match self {
            NaivePattern::Sequence(s) => s.len(),
            NaivePattern::Automaton(_) => 0,
        }
    }

    /// The end offset of the match starting at `pos`, if any. For a fixed
    /// sequence this is always `pos + len()`; an automaton may accept
    /// several lengths, in which case the longest is returned (spec §4.4).
    fn match_end_at(&self, buf: &[u8], pos: usize) -> Option<usize> {
        match self {
            NaivePattern::Sequence(s) => s.matches(buf, pos).then(|| pos + s.len()),
            NaivePattern::Automaton(a) => a.matches_at(buf, pos),
        }
    }
}

pub struct NaiveSearcher {
    pattern: NaivePattern,
}

impl NaiveSearcher {
    pub fn new(pattern: NaivePattern) -> Self {
        NaiveSearcher { pattern }
    }
}

impl Searcher for NaiveSearcher {
    fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position> {
        let min_len = self.pattern.min_len();
        let limit = to.min(buf.len());
        for j in from..=limit.saturating_sub(min_len) {
            if let Some(end) = self.pattern.match_end_at(buf, j) {
                if end <= limit {
                    return Some(Position { start: j, end });
                }
            }
        }
        None
    }

    fn search_backward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position> {
        let upper = from.min(buf.len());
        for j in (to..upper).rev() {
            if let Some(end) = self.pattern.match_end_at(buf, j) {
                if end <= from {
                    return Some(Position { start: j, end });
                }
            }
        }
        None
    }
}
