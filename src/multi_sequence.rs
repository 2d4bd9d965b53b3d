//! A set of [`SequenceMatcher`]s queryable by absolute position, backed by a
//! trie of byte transitions (component C3).
//!
//! Grounded on the teacher's `AsciiMatcher::Ac` path (`matcher/mod.rs`),
//! which also builds a trie-like automaton (`aho_corasick::AhoCorasick`)
//! over a set of byte strings; here the trie is hand-rolled because spec §4.3
//! requires exposing `min_len`/`max_len` and a two-mode walk (`first_match`
//! vs `all_matches`) rather than `aho-corasick`'s API.

use std::sync::Arc;

use bon::bon;

use crate::reader::WindowReader;
use crate::sequence::SequenceMatcher;

type NodeId = u32;

struct TrieNode {
    children: [Option<NodeId>; 256],
    /// Sequences whose final byte lands on this node, in insertion order.
    terminal: Vec<u32>,
}

impl Default for TrieNode {
    fn default() -> Self {
        TrieNode {
            children: [None; 256],
            terminal: Vec::new(),
        }
    }
}

/// A set of [`SequenceMatcher`]s, queried by absolute position.
///
/// Construction walks each contributing sequence byte-by-byte from the root,
/// creating a transition per required byte and attaching the sequence index
/// to the terminal state (spec §4.3). Because `SequenceMatcher` elements can
/// themselves be sets (not just literal bytes), a node may transition on
/// several bytes for the same input position across different sequences;
/// the trie simply branches on the concrete byte matched at search time, so
/// sequences containing non-literal `ByteMatcher`s are expanded over their
/// `matching_bytes()` at build time.
pub struct MultiSequenceMatcher {
    sequences: Vec<Arc<dyn SequenceMatcher>>,
    nodes: Vec<TrieNode>,
    min_len: usize,
    max_len: usize,
}

/// A single match result: the absolute offset it starts at, plus which
/// contributing sequence matched there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiMatch {
    pub start: usize,
    pub sequence_index: usize,
}

#[bon]
impl MultiSequenceMatcher {
    #[builder]
    pub fn new(#[builder(start_fn)] sequences: Vec<Arc<dyn SequenceMatcher>>) -> Self {
        assert!(!sequences.is_empty(), "MultiSequenceMatcher needs at least one sequence");

        let min_len = sequences.iter().map(|s| s.len()).min().unwrap();
        let max_len = sequences.iter().map(|s| s.len()).max().unwrap();

        let mut nodes = vec![TrieNode::default()];
        for (idx, seq) in sequences.iter().enumerate() {
            let mut node = 0u32;
            Self::insert(&mut nodes, &mut node, seq.as_ref(), 0, idx as u32);
        }

        MultiSequenceMatcher {
            sequences,
            nodes,
            min_len,
            max_len,
        }
    }
}

impl MultiSequenceMatcher {
    /// Recursively branch the trie over every byte the matcher at position
    /// `depth` accepts; when the matcher is an exact literal this is a
    /// single branch, otherwise it fans out (e.g. a 2-byte case-insensitive
    /// set, per the compiler table in spec §4.5).
    fn insert(
        nodes: &mut Vec<TrieNode>,
        node: &mut u32,
        seq: &dyn SequenceMatcher,
        depth: usize,
        seq_index: u32,
    ) {
        if depth == seq.len() {
            nodes[*node as usize].terminal.push(seq_index);
            return;
        }
        let matcher = seq.matcher_at(depth);
        for b in matcher.matching_bytes() {
            let next = match nodes[*node as usize].children[b as usize] {
                Some(id) => id,
                None => {
                    let id = nodes.len() as NodeId;
                    nodes.push(TrieNode::default());
                    nodes[*node as usize].children[b as usize] = Some(id);
                    id
                }
            };
            let mut next_mut = next;
            Self::insert(nodes, &mut next_mut, seq, depth + 1, seq_index);
        }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn sequence(&self, index: usize) -> &Arc<dyn SequenceMatcher> {
        &self.sequences[index]
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// The first contributing sequence that matches starting at `p`, walking
    /// the trie byte by byte and stopping at the first final state reached
    /// (spec §4.3).
    pub fn first_match(&self, buf: &[u8], p: usize) -> Option<MultiMatch> {
        if p.checked_add(self.min_len).map_or(true, |end| end > buf.len()) {
            return None;
        }
        let mut node = 0u32;
        let mut i = p;
        loop {
            let n = &self.nodes[node as usize];
            if let Some(&seq_index) = n.terminal.first() {
                return Some(MultiMatch {
                    start: p,
                    sequence_index: seq_index as usize,
                });
            }
            if i >= buf.len() {
                return None;
            }
            match n.children[buf[i] as usize] {
                Some(next) => {
                    node = next;
                    i += 1;
                }
                None => return None,
            }
        }
    }

    /// Every contributing sequence that matches starting at `p`: continues
    /// past the first final state, walking deeper along the same byte path
    /// until no further transition exists (spec §4.3).
    pub fn all_matches(&self, buf: &[u8], p: usize) -> Vec<MultiMatch> {
        if p.checked_add(self.min_len).map_or(true, |end| end > buf.len()) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut node = 0u32;
        let mut i = p;
        loop {
            let n = &self.nodes[node as usize];
            out.extend(n.terminal.iter().map(|&seq_index| MultiMatch {
                start: p,
                sequence_index: seq_index as usize,
            }));
            if i >= buf.len() {
                break;
            }
            match n.children[buf[i] as usize] {
                Some(next) => {
                    node = next;
                    i += 1;
                }
                None => break,
            }
        }
        out
    }

    /// Like [`Self::first_match`], but walks a [`WindowReader`] instead of a
    /// resident buffer, so the trie can be matched against a source larger
    /// than memory (spec §4.3/§6.3) the same way [`SequenceMatcher::matches_reader`]
    /// does for a single sequence.
    pub fn first_match_reader(&self, reader: &mut dyn WindowReader, p: usize) -> Option<MultiMatch> {
        if p.checked_add(self.min_len).map_or(true, |end| end > reader.length()) {
            return None;
        }
        let mut node = 0u32;
        let mut i = p;
        loop {
            let n = &self.nodes[node as usize];
            if let Some(&seq_index) = n.terminal.first() {
                return Some(MultiMatch {
                    start: p,
                    sequence_index: seq_index as usize,
                });
            }
            let Some(byte) = reader.read_byte(i) else {
                return None;
            };
            match n.children[byte as usize] {
                Some(next) => {
                    node = next;
                    i += 1;
                }
                None => return None,
            }
        }
    }

    /// Reader-based counterpart to [`Self::all_matches`].
    pub fn all_matches_reader(&self, reader: &mut dyn WindowReader, p: usize) -> Vec<MultiMatch> {
        if p.checked_add(self.min_len).map_or(true, |end| end > reader.length()) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut node = 0u32;
        let mut i = p;
        loop {
            let n = &self.nodes[node as usize];
            out.extend(n.terminal.iter().map(|&seq_index| MultiMatch {
                start: p,
                sequence_index: seq_index as usize,
            }));
            let Some(byte) = reader.read_byte(i) else {
                break;
            };
            match n.children[byte as usize] {
                Some(next) => {
                    node = next;
                    i += 1;
                }
                None => break,
            }
        }
        out
    }
}
