//! Wu-Manber multi-pattern search (spec §4.6.4): a block-hashed shift table
//! (here, 2-byte blocks) gets a window past the point of any possible match
//! almost for free; when the shift hits zero, candidates sharing that hash
//! are verified against the [`MultiSequenceMatcher`] trie directly.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::multi_sequence::{MultiMatch, MultiSequenceMatcher};
use crate::reader::WindowReader;
use crate::sequence::SequenceMatcher;

use super::Position;

const BLOCK: usize = 2;

#[inline]
fn hash(b0: u8, b1: u8) -> u16 {
    ((b0 as u16) << 8) | b1 as u16
}

struct Tables {
    shift: Vec<u16>,
    candidates: HashMap<u16, Vec<usize>>,
}

pub struct WuManberSearcher<'a> {
    trie: &'a MultiSequenceMatcher,
    tables: OnceLock<Tables>,
}

impl<'a> WuManberSearcher<'a> {
    /// Errors if the shortest contributing pattern is too short for a
    /// 2-byte block (the classical Wu-Manber constraint).
    pub fn new(trie: &'a MultiSequenceMatcher) -> Result<Self> {
        if trie.min_len() < BLOCK {
            return Err(Error::InvalidArgument(format!(
                "Wu-Manber needs every pattern to be at least {BLOCK} bytes, shortest is {}",
                trie.min_len()
            )));
        }
        Ok(WuManberSearcher {
            trie,
            tables: OnceLock::new(),
        })
    }

    fn tables(&self) -> &Tables {
        self.tables.get_or_init(|| build_tables(self.trie))
    }

    pub fn search_forward(&self, buf: &[u8], from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        let min_len = self.trie.min_len();
        let limit = to.min(buf.len());
        let tables = self.tables();
        let mut j = from;
        while j + min_len <= limit {
            let block_hash = hash(buf[j + min_len - BLOCK], buf[j + min_len - BLOCK + 1]);
            let shift = tables.shift[block_hash as usize];
            if shift == 0 {
                if let Some(idx_list) = tables.candidates.get(&block_hash) {
                    for &idx in idx_list {
                        let seq = self.trie.sequence(idx);
                        if seq.matches(buf, j) {
                            return Some((
                                Position {
                                    start: j,
                                    end: j + seq.len(),
                                },
                                MultiMatch {
                                    start: j,
                                    sequence_index: idx,
                                },
                            ));
                        }
                    }
                }
                j += 1;
            } else {
                j += shift as usize;
            }
        }
        None
    }

    /// Reader-based counterpart to [`Self::search_forward`] (spec §4.6/§6.3).
    pub fn search_forward_reader(&self, reader: &mut dyn WindowReader, from: usize, to: usize) -> Option<(Position, MultiMatch)> {
        let min_len = self.trie.min_len();
        let limit = to.min(reader.length());
        let tables = self.tables();
        let mut j = from;
        while j + min_len <= limit {
            let b0 = reader.read_byte(j + min_len - BLOCK)?;
            let b1 = reader.read_byte(j + min_len - BLOCK + 1)?;
            let block_hash = hash(b0, b1);
            let shift = tables.shift[block_hash as usize];
            if shift == 0 {
                if let Some(idx_list) = tables.candidates.get(&block_hash) {
                    for &idx in idx_list {
                        let seq = self.trie.sequence(idx);
                        if seq.matches_reader(reader, j) {
                            return Some((
                                Position {
                                    start: j,
                                    end: j + seq.len(),
                                },
                                MultiMatch {
                                    start: j,
                                    sequence_index: idx,
                                },
                            ));
                        }
                    }
                }
                j += 1;
            } else {
                j += shift as usize;
            }
        }
        None
    }
}

/// Builds the shift table (default `min_len - BLOCK + 1`, shrinking to the
/// smallest safe value per block hash across every pattern's first
/// `min_len` bytes) and the candidate list for hashes whose shift bottoms
/// out at zero.
fn build_tables(trie: &MultiSequenceMatcher) -> Tables {
    let min_len = trie.min_len();
    log::debug!("building wu-manber tables for {} patterns, min length {min_len}", trie.len());
    let default_shift = (min_len - BLOCK + 1) as u16;
    let mut shift = vec![default_shift; 1 << 16];
    let mut candidates: HashMap<u16, Vec<usize>> = HashMap::new();

    for idx in 0..trie.len() {
        let seq = trie.sequence(idx);
        for i in 0..=(min_len - BLOCK) {
            for b0 in seq.matcher_at(i).matching_bytes() {
                for b1 in seq.matcher_at(i + 1).matching_bytes() {
                    let h = hash(b0, b1);
                    let candidate_shift = (min_len - BLOCK - i) as u16;
                    if candidate_shift < shift[h as usize] {
                        shift[h as usize] = candidate_shift;
                    }
                }
            }
        }
        let last = min_len - BLOCK;
        for b0 in seq.matcher_at(last).matching_bytes() {
            for b1 in seq.matcher_at(last + 1).matching_bytes() {
                candidates.entry(hash(b0, b1)).or_default().push(idx);
            }
        }
    }

    Tables { shift, candidates }
}
