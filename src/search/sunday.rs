//! Sunday's "quick search" algorithm (spec §4.6.2): like Horspool, but the
//! shift is keyed by the byte *just past* the window rather than the
//! window's last byte, and every position (including the last) contributes
//! to the table — often skipping further on small alphabets.

use std::sync::{Arc, OnceLock};

use crate::reader::WindowReader;
use crate::sequence::SequenceMatcher;

use super::{Position, Searcher};

pub struct SundaySearcher {
    pattern: Arc<dyn SequenceMatcher>,
    forward_table: OnceLock<[usize; 256]>,
    backward: OnceLock<(Arc<dyn SequenceMatcher>, [usize; 256])>,
}

impl SundaySearcher {
    pub fn new(pattern: Arc<dyn SequenceMatcher>) -> Self {
        SundaySearcher {
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

/// `table[b]` is the distance to advance when the byte one past the window
/// is `b`: `len() + 1` by default, or `len() - i` for the rightmost `i` (over
/// every position, `0..len()`) whose matcher accepts `b`.
fn build_table(pattern: &(impl SequenceMatcher + ?Sized)) -> [usize; 256] {
    let len = pattern.len();
    log::debug!("building sunday shift table for a {len}-byte pattern");
    let mut table = [len + 1; 256];
    for i in 0..len {
        for b in pattern.matcher_at(i).matching_bytes() {
            table[b as usize] = len - i;
        }
    }
    table
}

impl Searcher for SundaySearcher {
    fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position> {
        let len = self.pattern.len();
        if len == 0 {
            return None;
        }
        let limit = to.min(buf.len());
        let table = self.forward_table();
        let mut j = from;
        while j + len <= limit {
            if self.pattern.matches_no_check(buf, j) {
                return Some(Position { start: j, end: j + len });
            }
            let Some(&next_byte) = buf.get(j + len) else {
                return None;
            };
            j += table[next_byte as usize];
        }
        None
    }

    fn search_backward(&self, buf: &[u8], from: usize, to: usize) -> Option<Position> {
        let len = self.pattern.len();
        if len == 0 || from < len {
            return None;
        }
        let (_, table) = self.backward();
        let mut j = from - len;
        loop {
            if j < to {
                return None;
            }
            if self.pattern.matches_no_check(buf, j) {
                return Some(Position { start: j, end: j + len });
            }
            let Some(prev_pos) = j.checked_sub(1) else {
                return None;
            };
            let prev_byte = buf[prev_pos];
            let shift = table[prev_byte as usize];
            if j < shift {
                return None;
            }
            j -= shift;
        }
    }

    /// Reader-based counterpart to [`Self::search_forward`] (spec §4.6/§6.3).
    fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<Position> {
        let len = self.pattern.len();
        if len == 0 {
            return None;
        }
        let limit = to.min(reader.length());
        let table = self.forward_table();
        let mut j = from;
        while j + len <= limit {
            if self.pattern.matches_reader(reader, j) {
                return Some(Position { start: j, end: j + len });
            }
            let next_byte = reader.read_byte(j + len)?;
            j += table[next_byte as usize];
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;
    use crate::sequence::ByteString;

    fn searcher(pattern: &[u8]) -> SundaySearcher {
        SundaySearcher::new(ByteString::new(pattern.to_vec()))
    }

    #[test]
    fn finds_forward_match() {
        let s = searcher(b"needle");
        let buf = b"xxneedlexx";
        let pos = s.search_forward(buf, 0, buf.len()).unwrap();
        assert_eq!(pos, Position { start: 2, end: 8 });
    }

    #[test]
    fn no_match_in_unrelated_text() {
        let s = searcher(b"needle");
        let buf = b"haystack text";
        assert_eq!(s.search_forward(buf, 0, buf.len()), None);
    }

    #[test]
    fn finds_backward_match() {
        let s = searcher(b"needle");
        let buf = b"needlexxneedle";
        let pos = s.search_backward(buf, 14, 0).unwrap();
        assert_eq!(pos, Position { start: 8, end: 14 });
    }

    #[test]
    fn reader_search_agrees_with_buffer_search_across_window_sizes() {
        let s = searcher(b"needle");
        let buf = b"xxneedlexxneedlexx";
        for window_size in 1..=buf.len() {
            let mut reader = SliceReader::with_window_size(buf, window_size);
            assert_eq!(
                s.search_forward_reader(&mut reader, 0, buf.len()),
                s.search_forward(buf, 0, buf.len()),
                "window_size={window_size}"
            );
        }
    }

    #[test]
    fn table_shift_uses_byte_past_window() {
        let s = searcher(b"abc");
        let table = s.forward_table();
        // 'a' occurs at index 0 -> shift len-0=3, overridden by no later a.
        assert_eq!(table[b'a' as usize], 3);
        // 'c' occurs at index 2 -> shift len-2=1.
        assert_eq!(table[b'c' as usize], 1);
        assert_eq!(table[b'z' as usize], 4); // default len+1
    }
}
