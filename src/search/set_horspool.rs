//! Set-Horspool: Horspool generalised to search for any of several
//! sequences at once (spec §4.6.3), built on top of [`MultiSequenceMatcher`]'s
//! trie. The shift table uses only the shortest contributing pattern's
//! length as the window size, since no shift can safely exceed it.

use std::sync::OnceLock;

use crate::multi_sequence::{MultiMatch, MultiSequenceMatcher};
use crate::reader::WindowReader;
use crate::sequence::SequenceMatcher;

use super::Position;

pub struct SetHorspoolSearcher<'a> {
    trie: &'a MultiSequenceMatcher,
    table: OnceLock<Vec<usize>>,
}

impl<'a> SetHorspoolSearcher<'a> {
    pub fn new(trie: &'a MultiSequenceMatcher) -> Self {
        SetHorspoolSearcher {
            trie,
            table: OnceLock::new(),
        }
    }

    fn table(&self) -> &[usize] {
        self.table.get_or_init(|| build_table(self.trie))
    }

    /// The first match in `[from, to)`.
    pub fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        let min_len = self.trie.min_len();
        if min_len == 0 {
            return None;
        }
        let limit = to.min(buf.len());
        let table = self.table();
        let mut j = from;
        while j + min_len <= limit {
            if let Some(m) = self.trie.first_match(buf, j) {
                return Some((Position { start: m.start, end: m.start + self.trie.sequence(m.sequence_index).len() }, m));
            }
            let shift = table[buf[j + min_len - 1] as usize].max(1);
            j += shift;
        }
        None
    }

    /// Reader-based counterpart to [`Self::search_forward`] (spec §4.6/§6.3).
    pub fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        let min_len = self.trie.min_len();
        if min_len == 0 {
            return None;
        }
        let limit = to.min(reader.length());
        let table = self.table();
        let mut j = from;
        while j + min_len <= limit {
            if let Some(m) = self.trie.first_match_reader(reader, j) {
                return Some((Position { start: m.start, end: m.start + self.trie.sequence(m.sequence_index).len() }, m));
            }
            let last_byte = reader.read_byte(j + min_len - 1)?;
            let shift = table[last_byte as usize].max(1);
            j += shift;
        }
        None
    }

    /// Every match in `[from, to)`, in left-to-right, then
    /// shortest-match-first order.
    pub fn search_all_forward(&self, buf: &[u8], from: usize, to: usize) -> Vec<(Position, MultiMatch)> {
        let min_len = self.trie.min_len();
        if min_len == 0 {
            return Vec::new();
        }
        let limit = to.min(buf.len());
        let table = self.table();
        let mut out = Vec::new();
        let mut j = from;
        while j + min_len <= limit {
            let matches = self.trie.all_matches(buf, j);
            if !matches.is_empty() {
                out.extend(matches.into_iter().map(|m| {
                    let end = m.start + self.trie.sequence(m.sequence_index).len();
                    (Position { start: m.start, end }, m)
                }));
                j += 1;
                continue;
            }
            let shift = table[buf[j + min_len - 1] as usize].max(1);
            j += shift;
        }
        out
    }
}

/// `table[b]` is the smallest shift that stays safe for every contributing
/// sequence, built only from each sequence's first `min_len` bytes (anything
/// past that can never influence how far the window is allowed to move).
fn build_table(trie: &MultiSequenceMatcher) -> Vec<usize> {
    let min_len = trie.min_len();
    log::debug!("building set-horspool shift table for {} patterns, min length {min_len}", trie.len());
    let mut table = vec![min_len; 256];
    for idx in 0..trie.len() {
        let seq = trie.sequence(idx);
        let scan_len = seq.len().min(min_len);
        for i in 0..scan_len.saturating_sub(1) {
            for b in seq.matcher_at(i).matching_bytes() {
                let candidate = min_len - 1 - i;
                if candidate < table[b as usize] {
                    table[b as usize] = candidate;
                }
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::SliceReader;
    use crate::sequence::ByteString;
    use std::sync::Arc;

    fn trie(words: &[&[u8]]) -> MultiSequenceMatcher {
        let sequences = words.iter().map(|w| ByteString::new(w.to_vec()) as Arc<_>).collect();
        MultiSequenceMatcher::builder(sequences).build()
    }

    #[test]
    fn finds_first_match() {
        let t = trie(&[b"cat", b"dog"]);
        let s = SetHorspoolSearcher::new(&t);
        let buf = b"xxdogyy";
        let (pos, m) = s.search_forward(buf, 0, buf.len()).unwrap();
        assert_eq!(pos, Position { start: 2, end: 5 });
        assert_eq!(m.sequence_index, 1);
    }

    #[test]
    fn finds_all_matches_scenario_s4() {
        let t = trie(&[b"Mid", b"and"]);
        let s = SetHorspoolSearcher::new(&t);
        let buf = b"Midsommer and";
        let results = s.search_all_forward(buf, 0, buf.len());
        let starts: Vec<usize> = results.iter().map(|(p, _)| p.start).collect();
        assert_eq!(starts, vec![0, 10]);
    }

    #[test]
    fn no_match_returns_none() {
        let t = trie(&[b"cat", b"dog"]);
        let s = SetHorspoolSearcher::new(&t);
        let buf = b"no pets here";
        assert_eq!(s.search_forward(buf, 0, buf.len()), None);
    }

    #[test]
    fn reader_search_agrees_with_buffer_search_across_window_sizes() {
        let t = trie(&[b"cat", b"dog"]);
        let s = SetHorspoolSearcher::new(&t);
        let buf = b"xxcatyyxxdogyy";
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
