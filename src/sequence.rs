//! Ordered sequences of [`ByteMatcher`]s (component C2).
//!
//! Mirrors the teacher's ASCII fast-path split (`AsciiMatcher::Ac` vs the
//! general pinyin/romaji path in `matcher/mod.rs`): an all-[`ByteMatcher::OneByte`]
//! sequence degenerates to a plain byte string with a specialised,
//! allocation-free fast path (`ByteString`); everything else goes through
//! [`GenericSequence`], which stores a slice of `ByteMatcher`.

use std::sync::Arc;

use crate::byte_matcher::ByteMatcher;
use crate::reader::WindowReader;

/// A fixed-length, ordered sequence of [`ByteMatcher`]s.
///
/// Implemented by [`ByteString`] (the fast path for all-literal sequences)
/// and [`GenericSequence`]. Subsequence and reversed views share the backing
/// storage (spec §4.2) via `Arc`, so they're O(1) to construct and never
/// outlive it.
pub trait SequenceMatcher: std::fmt::Debug {
    /// Number of positions in this sequence. Always >= 1.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The matcher at position `i`, `0 <= i < len()`.
    fn matcher_at(&self, i: usize) -> ByteMatcher;

    /// Does this sequence match `buf[pos..pos+len()]`? Bounds-checked: an
    /// out-of-range `pos` is a mismatch (`false`), never a panic.
    fn matches(&self, buf: &[u8], pos: usize) -> bool {
        if pos.checked_add(self.len()).map_or(true, |end| end > buf.len()) {
            return false;
        }
        self.matches_no_check(buf, pos)
    }

    /// Like [`Self::matches`], but caller guarantees `pos + len() <= buf.len()`.
    /// Exhibits undefined-behaviour-adjacent panics/OOB reads otherwise (spec §7).
    fn matches_no_check(&self, buf: &[u8], pos: usize) -> bool;

    /// Matches against a [`WindowReader`] at absolute position `abs_pos`,
    /// transparently handling sequences that straddle window boundaries
    /// (spec §4.2, the "critical correctness point").
    fn matches_reader(&self, reader: &mut dyn WindowReader, abs_pos: usize) -> bool {
        matches_reader_generic(self, reader, abs_pos)
    }

    /// A view of positions `[begin, end)`. O(1): shares backing storage.
    fn subsequence(&self, begin: usize, end: usize) -> Arc<dyn SequenceMatcher>;

    /// A view matching the same bytes in reverse order.
    fn reverse(&self) -> Arc<dyn SequenceMatcher>;

    /// A `k`-fold concatenation of this sequence with itself.
    fn repeat(&self, k: usize) -> Arc<dyn SequenceMatcher>;

    /// Renders each position's [`ByteMatcher::to_regex`], space-separated
    /// when `pretty` (spec §6.2). Re-parsing the result must yield an
    /// equivalent sequence.
    fn to_regex(&self, pretty: bool) -> String {
        let parts: Vec<String> = (0..self.len()).map(|i| self.matcher_at(i).to_regex(pretty)).collect();
        if pretty {
            parts.join(" ")
        } else {
            parts.concat()
        }
    }
}

/// Shared algorithm for window-spanning matches: used by both
/// [`ByteString`] and [`GenericSequence`] so the boundary-handling logic
/// (the part spec §4.2 calls out as "the critical correctness point") is
/// written and tested once.
fn matches_reader_generic(
    seq: &(impl SequenceMatcher + ?Sized),
    reader: &mut dyn WindowReader,
    abs_pos: usize,
) -> bool {
    let len = seq.len();
    let mut matched = 0usize;
    while matched < len {
        let pos = abs_pos + matched;
        let Some(window) = reader.window(pos) else {
            return false;
        };
        let window_start = window.start();
        let window_end = window.end();
        let bytes = window.bytes();
        let remaining = len - matched;
        let consume_end = (pos + remaining).min(window_end);
        if consume_end <= pos {
            return false;
        }
        for abs in pos..consume_end {
            let rel = abs - window_start;
            if !seq.matcher_at(matched).matches(bytes[rel]) {
                return false;
            }
            matched += 1;
        }
    }
    true
}

/// A [`SequenceMatcher`] where every element is [`ByteMatcher::OneByte`],
/// stored as a contiguous byte array with `[start, end)` indices so that
/// subsequences and reversed views share storage (spec §4.2).
#[derive(Clone)]
pub struct ByteString {
    bytes: Arc<[u8]>,
    start: usize,
    end: usize,
    reversed: bool,
}

impl std::fmt::Debug for ByteString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteString")
            .field("bytes", &&self.bytes[self.start..self.end])
            .field("reversed", &self.reversed)
            .finish()
    }
}

impl ByteString {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Arc<dyn SequenceMatcher> {
        let bytes = bytes.into();
        let end = bytes.len();
        Arc::new(ByteString {
            bytes,
            start: 0,
            end,
            reversed: false,
        })
    }

    #[inline]
    fn byte_at(&self, i: usize) -> u8 {
        debug_assert!(i < self.len());
        if self.reversed {
            self.bytes[self.end - 1 - i]
        } else {
            self.bytes[self.start + i]
        }
    }

    /// The raw bytes in logical (possibly reversed) order, as a fresh `Vec`.
    /// Used by searchers that want a plain `&[u8]` pattern.
    pub fn to_vec(&self) -> Vec<u8> {
        (0..self.len()).map(|i| self.byte_at(i)).collect()
    }
}

impl SequenceMatcher for ByteString {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn matcher_at(&self, i: usize) -> ByteMatcher {
        ByteMatcher::byte(self.byte_at(i))
    }

    fn matches_no_check(&self, buf: &[u8], pos: usize) -> bool {
        (0..self.len()).all(|i| buf[pos + i] == self.byte_at(i))
    }

    fn subsequence(&self, begin: usize, end: usize) -> Arc<dyn SequenceMatcher> {
        assert!(begin <= end && end <= self.len());
        if begin == 0 && end == self.len() {
            return Arc::new(self.clone());
        }
        let (start, end) = if self.reversed {
            (self.end - end, self.end - begin)
        } else {
            (self.start + begin, self.start + end)
        };
        Arc::new(ByteString {
            bytes: self.bytes.clone(),
            start,
            end,
            reversed: self.reversed,
        })
    }

    fn reverse(&self) -> Arc<dyn SequenceMatcher> {
        Arc::new(ByteString {
            bytes: self.bytes.clone(),
            start: self.start,
            end: self.end,
            reversed: !self.reversed,
        })
    }

    fn repeat(&self, k: usize) -> Arc<dyn SequenceMatcher> {
        assert!(k >= 1);
        if k == 1 {
            return Arc::new(self.clone());
        }
        let unit = self.to_vec();
        let mut bytes = Vec::with_capacity(unit.len() * k);
        for _ in 0..k {
            bytes.extend_from_slice(&unit);
        }
        ByteString::new(bytes)
    }
}

/// A [`SequenceMatcher`] over arbitrary [`ByteMatcher`]s, stored as a shared
/// slice with `[start, end)` indices, mirroring [`ByteString`]'s sharing
/// scheme.
#[derive(Clone, Debug)]
pub struct GenericSequence {
    matchers: Arc<[ByteMatcher]>,
    start: usize,
    end: usize,
    reversed: bool,
}

impl GenericSequence {
    pub fn new(matchers: impl Into<Arc<[ByteMatcher]>>) -> Arc<dyn SequenceMatcher> {
        let matchers = matchers.into();
        let end = matchers.len();
        // Degenerate to the fast path when every element is a single literal byte.
        if matchers.iter().all(|m| matches!(m, ByteMatcher::OneByte(_))) {
            let bytes: Vec<u8> = matchers
                .iter()
                .map(|m| match m {
                    ByteMatcher::OneByte(b) => *b,
                    _ => unreachable!(),
                })
                .collect();
            return ByteString::new(bytes);
        }
        Arc::new(GenericSequence {
            matchers,
            start: 0,
            end,
            reversed: false,
        })
    }

    #[inline]
    fn matcher_logical(&self, i: usize) -> &ByteMatcher {
        debug_assert!(i < self.len());
        if self.reversed {
            &self.matchers[self.end - 1 - i]
        } else {
            &self.matchers[self.start + i]
        }
    }
}

impl SequenceMatcher for GenericSequence {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn matcher_at(&self, i: usize) -> ByteMatcher {
        self.matcher_logical(i).clone()
    }

    fn matches_no_check(&self, buf: &[u8], pos: usize) -> bool {
        (0..self.len()).all(|i| self.matcher_logical(i).matches(buf[pos + i]))
    }

    fn subsequence(&self, begin: usize, end: usize) -> Arc<dyn SequenceMatcher> {
        assert!(begin <= end && end <= self.len());
        if begin == 0 && end == self.len() {
            return Arc::new(self.clone());
        }
        if end - begin == 1 {
            return Arc::new(GenericSequence {
                matchers: Arc::from(vec![self.matcher_at(begin)]),
                start: 0,
                end: 1,
                reversed: false,
            });
        }
        let (start, end) = if self.reversed {
            (self.end - end, self.end - begin)
        } else {
            (self.start + begin, self.start + end)
        };
        Arc::new(GenericSequence {
            matchers: self.matchers.clone(),
            start,
            end,
            reversed: self.reversed,
        })
    }

    fn reverse(&self) -> Arc<dyn SequenceMatcher> {
        Arc::new(GenericSequence {
            matchers: self.matchers.clone(),
            start: self.start,
            end: self.end,
            reversed: !self.reversed,
        })
    }

    fn repeat(&self, k: usize) -> Arc<dyn SequenceMatcher> {
        assert!(k >= 1);
        if k == 1 {
            return Arc::new(self.clone());
        }
        let unit: Vec<ByteMatcher> = (0..self.len()).map(|i| self.matcher_at(i)).collect();
        let mut matchers = Vec::with_capacity(unit.len() * k);
        for _ in 0..k {
            matchers.extend(unit.iter().cloned());
        }
        GenericSequence::new(matchers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;

    fn bytes_seq(s: &[u8]) -> Arc<dyn SequenceMatcher> {
        ByteString::new(s.to_vec())
    }

    #[test]
    fn matches_buffer_positions() {
        let seq = bytes_seq(b"abc");
        assert!(seq.matches(b"xxabcxx", 2));
        assert!(!seq.matches(b"xxabdxx", 2));
        assert!(!seq.matches(b"ab", 0));
        assert!(!seq.matches(b"abc", 1)); // pos + len > buf.len()
    }

    #[test]
    fn subsequence_len_and_positions() {
        let seq = bytes_seq(b"abcdef");
        let sub = seq.subsequence(2, 5);
        assert_eq!(sub.len(), 3);
        assert!(sub.matches(b"cde", 0));
        assert!(!sub.matches(b"cdx", 0));
    }

    #[test]
    fn reverse_is_involutive() {
        let seq = bytes_seq(b"abc");
        let rev = seq.reverse();
        assert_eq!(rev.matcher_at(0).matches(b'c'), true);
        assert_eq!(rev.matcher_at(2).matches(b'a'), true);
        let back = rev.reverse();
        for i in 0..seq.len() {
            assert_eq!(seq.matcher_at(i), back.matcher_at(i));
        }
    }

    #[test]
    fn repeat_k_copies() {
        let seq = bytes_seq(b"ab");
        let r = seq.repeat(3);
        assert_eq!(r.len(), 6);
        assert!(r.matches(b"ababab", 0));
        assert!(!r.matches(b"ababaa", 0));
    }

    #[test]
    fn repeat_one_is_self() {
        let seq = bytes_seq(b"ab");
        let r = seq.repeat(1);
        assert_eq!(r.len(), seq.len());
    }

    // spec §4.2 / §8 invariant 10: window-spanning matches behave like
    // contiguous-array matches, tested with the match straddling every
    // possible window boundary.
    #[test]
    fn matches_reader_straddles_every_boundary() {
        let data = b"xxxHelloxxx";
        let seq = bytes_seq(b"Hello");
        for window_size in 1..=data.len() {
            let mut reader = SliceReader::with_window_size(data, window_size);
            assert!(
                seq.matches_reader(&mut reader, 3),
                "window_size={window_size} should still find the match"
            );
            assert!(!seq.matches_reader(&mut reader, 2));
        }
    }

    #[test]
    fn matches_reader_fails_when_window_runs_out() {
        let data = b"Hell";
        let seq = bytes_seq(b"Hello");
        let mut reader = SliceReader::new(data);
        assert!(!seq.matches_reader(&mut reader, 0));
    }

    // spec §6.4 scenario S6: pattern "Gutenberg" (9 bytes) against
    // "AAAAAAAGutenberg" with window size 8 must match at offset 7, spanning
    // the boundary at offset 8.
    #[test]
    fn scenario_s6_window_boundary() {
        let data = b"AAAAAAAGutenberg";
        let seq = bytes_seq(b"Gutenberg");
        let mut reader = SliceReader::with_window_size(data, 8);
        assert!(seq.matches_reader(&mut reader, 7));
        assert!(!seq.matches_reader(&mut reader, 6));
    }

    #[test]
    fn generic_sequence_with_sets() {
        let matchers = vec![
            ByteMatcher::from_bytes([b'a', b'A']),
            ByteMatcher::byte(b'b'),
        ];
        let seq = GenericSequence::new(matchers);
        assert!(seq.matches(b"ab", 0));
        assert!(seq.matches(b"Ab", 0));
        assert!(!seq.matches(b"cb", 0));
    }

    #[test]
    fn to_regex_space_separates_when_pretty() {
        let seq = bytes_seq(b"ab");
        assert_eq!(seq.to_regex(false), "6162");
        assert_eq!(seq.to_regex(true), "'a' 'b'");
    }

    #[test]
    fn generic_sequence_degenerates_to_byte_string() {
        let matchers = vec![ByteMatcher::byte(b'a'), ByteMatcher::byte(b'b')];
        let seq = GenericSequence::new(matchers);
        // Confirm the fast path kicks in by checking the Debug impl names it
        // ByteString (the only SequenceMatcher impl whose Debug mentions that).
        assert!(format!("{:?}", seq).contains("ByteString"));
    }
}
