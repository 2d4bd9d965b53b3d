//! Boyer-Moore-Horspool search (spec §4.6.1), generalised from literal bytes
//! to arbitrary [`SequenceMatcher`]s: the shift table is keyed by concrete
//! byte value, but built from whichever positions' [`ByteMatcher`](crate::byte_matcher::ByteMatcher)s
//! accept that byte, taking the rightmost (safest, smallest) shift.

use std::sync::{Arc, OnceLock};

use crate::reader::WindowReader;
use crate::sequence::SequenceMatcher;

use super::{Position, Searcher};

/// A single-pattern Horspool searcher. Builds its forward and backward shift
/// tables on first use, caching them behind [`OnceLock`] (spec §5).
pub struct HorspoolSearcher {
    pattern: Arc<dyn SequenceMatcher>,
    forward_table: OnceLock<[usize; 256]>,
    backward: OnceLock<(Arc<dyn SequenceMatcher>, [usize; 256])>,
}

impl HorspoolSearcher {
    pub fn new(pattern: Arc<dyn SequenceMatcher>) -> Self {
        HorspoolSearcher {
            pattern,
            forward_table: OnceLock::new(),
            backward: OnceLock::new(),
        }
    }

    fn forward_table(&self) -> &[usize; 256] {
        self.forward_table.get_or_init(|| build_table(self.pattern.as_ref()))
    }

    fn backward(&self) -> &(Arc<dyn SequenceMatcher>, [usize; 256]) {
        self.backward.get_or_init(|| {
            let reversed = self.pattern.reverse();
            let table = build_table(reversed.as_ref());
            (reversed, table)
        })
    }
}

/// `table[b]` is the distance it's safe to advance the window start when the
/// byte aligned with the pattern's last position is `b`: `len()` if `b`
/// doesn't occur in any but the last position, otherwise `len() - 1 - i` for
/// the rightmost `i < len() - 1` whose matcher accepts `b`.
fn build_table(pattern: &(impl SequenceMatcher + ?Sized)) -> [usize; 256] {
    let len = pattern.len();
    log::debug!("building horspool shift table for a {len}-byte pattern");
    let mut table = [len; 256];
    for i in 0..len.saturating_sub(1) {
        for b in pattern.matcher_at(i).matching_bytes() {
            table[b as usize] = len - 1 - i;
        }
    }
    table
}

impl Searcher for HorspoolSearcher {
    fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position> {
        let len = self.pattern.len();
        if len == 0 {
            return None;
        }
        let limit = to.min(buf.len());
        let table = self.forward_table();
        let mut j = from;
        while j + len <= limit {
            // Quick reject on the last byte before paying for a full scan.
            if self.pattern.matcher_at(len - 1).matches(buf[j + len - 1]) && self.pattern.matches_no_check(buf, j) {
                return Some(Position { start: j, end: j + len });
            }
            let shift = table[buf[j + len - 1] as usize].max(1);
            j += shift;
        }
        None
    }

    fn search_backward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position> {
        let len = self.pattern.len();
        if len == 0 || from < len {
            return None;
        }
        let (reversed, table) = self.backward();
        let mut j = from - len;
        loop {
            if j < to {
                return None;
            }
            if reversed.matcher_at(len - 1).matches(buf[j]) && self.pattern.matches_no_check(buf, j) {
                return Some(Position { start: j, end: j + len });
            }
            let shift = table[buf[j] as usize].max(1);
            if j < shift {
                return None;
            }
            j -= shift;
        }
    }

    /// Walks the same shift table as [`Self::search_forward`], but reads
    /// every byte through the [`WindowReader`] instead of indexing a buffer,
    /// so a pattern can be searched for across a source that never resides
    /// fully in memory (spec §4.6/§6.3).
    fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<Position> {
        let len = self.pattern.len();
        if len == 0 {
            return None;
        }
        let limit = to.min(reader.length());
        let table = self.forward_table();
        let mut j = from;
        while j + len <= limit {
            let last_byte = reader.read_byte(j + len - 1)?;
            if self.pattern.matcher_at(len - 1).matches(last_byte) && self.pattern.matches_reader(reader, j) {
                return Some(Position { start: j, end: j + len });
            }
            let shift = table[last_byte as usize].max(1);
            j += shift;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;
    use crate::sequence::ByteString;

    fn searcher(pattern: &[u8]) -> HorspoolSearcher {
        HorspoolSearcher::new(ByteString::new(pattern.to_vec()))
    }

    #[test]
    fn finds_forward_match() {
        let s = searcher(b"abc");
        let buf = b"xxabcxx";
        let pos = s.search_forward(buf, 0, buf.len()).unwrap();
        assert_eq!(pos, Position { start: 2, end: 5 });
    }

    #[test]
    fn no_match_returns_none() {
        let s = searcher(b"abc");
        let buf = b"xxxxxxx";
        assert_eq!(s.search_forward(buf, 0, buf.len()), None);
    }

    #[test]
    fn finds_backward_match() {
        let s = searcher(b"abc");
        let buf = b"abcxxabc";
        let pos = s.search_backward(buf, 8, 0).unwrap();
        assert_eq!(pos, Position { start: 5, end: 8 });
    }

    #[test]
    fn search_backward_respects_lower_bound() {
        let s = searcher(b"abc");
        let buf = b"abcxxabc";
        assert_eq!(s.search_backward(buf, 8, 1), None);
    }

    #[test]
    fn forward_from_respects_lower_bound() {
        let s = searcher(b"abc");
        let buf = b"abcxxabc";
        let pos = s.search_forward(buf, 1, buf.len()).unwrap();
        assert_eq!(pos, Position { start: 5, end: 8 });
    }

    #[test]
    fn forward_to_respects_upper_bound() {
        let s = searcher(b"abc");
        let buf = b"abcxxabc";
        assert_eq!(s.search_forward(buf, 1, 7), None);
    }

    // spec §8 scenario S7: the shift table for pattern 'abc'. Excluding the
    // final position, 'a' occurs at index 0 (shift 2) and 'b' at index 1
    // (shift 1); every other byte gets the default shift of 3.
    #[test]
    fn scenario_s7_shift_table() {
        let s = searcher(b"abc");
        let table = s.forward_table();
        assert_eq!(table[b'a' as usize], 2);
        assert_eq!(table[b'b' as usize], 1);
        assert_eq!(table[b'z' as usize], 3);
        // 'c' only occurs at the excluded last position, so it keeps the default.
        assert_eq!(table[b'c' as usize], 3);
    }

    #[test]
    fn matches_at_start_of_buffer() {
        let s = searcher(b"abc");
        assert_eq!(s.search_forward(b"abc", 0, 3), Some(Position { start: 0, end: 3 }));
    }

    #[test]
    fn reader_search_agrees_with_buffer_search_across_window_sizes() {
        let s = searcher(b"abc");
        let buf = b"ababcxxabc";
        for window_size in 1..=buf.len() {
            let mut reader = SliceReader::with_window_size(buf, window_size);
            assert_eq!(
                s.search_forward_reader(&mut reader, 0, buf.len()),
                s.search_forward(buf, 0, buf.len()),
                "window_size={window_size}"
            );
        }
    }
}
