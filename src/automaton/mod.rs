//! Runtime automata for regular-expression matching (component C5).
//!
//! States live in an arena ([`Automaton::states`]) indexed by [`StateId`],
//! per spec §9's explicit guidance to prefer "arena + integer indices...
//! over pointer-linked cyclic graphs" — grounded on the teacher's own
//! `regex/nfa/mod.rs`, which wraps `regex_automata`'s arena-of-states
//! representation the same way.
//!
//! [`glushkov`] builds an NFA from a [`Regex`] tree (one state per symbol
//! occurrence, "position automaton" style, per spec §4.4). [`subset`] turns
//! any NFA into an equivalent DFA via the standard subset construction.

pub mod glushkov;
pub mod regex_tree;
pub mod subset;

pub use regex_tree::Regex;

use crate::byte_matcher::ByteMatcher;

/// Index into [`Automaton::states`]. `u32` keeps states dense and cheap to
/// copy; cycles (common in `*`/`+` constructions, per spec §4.4/§9) are just
/// back-edges in the transition list, no different from forward edges.
pub type StateId = u32;

/// An outgoing edge: accept any byte `matcher` matches, then move to `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub matcher: ByteMatcher,
    pub target: StateId,
}

/// A single automaton state: its outgoing transitions, frozen after the
/// automaton is built, and whether reaching this state (with no more input
/// required) constitutes a match.
#[derive(Clone, Debug, Default)]
pub struct State {
    pub transitions: Vec<Transition>,
    pub is_final: bool,
}

/// Is this automaton a DFA? A DFA requires every byte to map to at most one
/// target per state; an NFA allows several transitions for the same byte
/// value out of one state (spec §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Nfa,
    Dfa,
}

/// A directed graph of [`State`]s linked by [`Transition`]s (spec §3/§4.4).
#[derive(Clone, Debug)]
pub struct Automaton {
    states: Vec<State>,
    start: StateId,
    kind: Kind,
}

impl Automaton {
    pub fn new(states: Vec<State>, start: StateId, kind: Kind) -> Self {
        Automaton { states, start, kind }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Deep-copies this automaton into a fresh arena, remapping every
    /// transition target through an old-id -> new-id table. A single linear
    /// pass; cycles terminate trivially because we never recurse, we just
    /// walk `self.states` once (spec §4.4/§9).
    pub fn deep_copy(&self) -> Automaton {
        // Arena clone: identical topology, freshly allocated Vec. Since
        // StateIds are stable array indices, no remapping table is actually
        // needed for a same-arena clone — but constructions that *splice*
        // two automata together (alternation, repetition) need one, which
        // `splice_with_offset` below provides.
        Automaton {
            states: self.states.clone(),
            start: self.start,
            kind: self.kind,
        }
    }

    /// Appends a deep copy of `other`'s states to `states`, offsetting every
    /// transition target (and the returned start id) by the length of
    /// `states` before the append. This is the building block alternation
    /// and repetition constructions use to combine sub-automata without
    /// sharing mutable structure (spec §4.4).
    pub(crate) fn splice_with_offset(states: &mut Vec<State>, other: &Automaton) -> StateId {
        let offset = states.len() as StateId;
        for state in &other.states {
            let transitions = state
                .transitions
                .iter()
                .map(|t| Transition {
                    matcher: t.matcher.clone(),
                    target: t.target + offset,
                })
                .collect();
            states.push(State {
                transitions,
                is_final: state.is_final,
            });
        }
        other.start + offset
    }

    /// Tests whether this automaton accepts a prefix of `buf[pos..]`,
    /// returning the longest matching end offset (leftmost-longest over all
    /// paths reachable from `pos`). NFA states are simulated as an active
    /// set (Thompson-style); DFAs walk a single active state since subset
    /// construction guarantees determinism.
    ///
    /// Full regex search (anchoring, overlapping matches, capture groups) is
    /// out of scope here per spec §1/§4.4 — this exists so the automaton
    /// can be used as a `Matcher` by [`crate::search::naive::NaiveSearcher`]
    /// and so compiled `ALT`/`MANY`/`ONE_TO_MANY`/`OPTIONAL` patterns are
    /// independently testable.
    pub fn matches_at(&self, buf: &[u8], pos: usize) -> Option<usize> {
        use std::collections::BTreeSet;

        let mut active: BTreeSet<StateId> = BTreeSet::new();
        active.insert(self.start);
        let mut best = if self.state(self.start).is_final {
            Some(pos)
        } else {
            None
        };

        let mut i = pos;
        while i < buf.len() && !active.is_empty() {
            let b = buf[i];
            let mut next: BTreeSet<StateId> = BTreeSet::new();
            for &s in &active {
                for t in &self.state(s).transitions {
                    if t.matcher.matches(b) {
                        next.insert(t.target);
                    }
                }
            }
            i += 1;
            if next.iter().any(|&s| self.state(s).is_final) {
                best = Some(i);
            }
            active = next;
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_automaton(byte: u8) -> Automaton {
        let states = vec![
            State {
                transitions: vec![Transition {
                    matcher: ByteMatcher::byte(byte),
                    target: 1,
                }],
                is_final: false,
            },
            State {
                transitions: vec![],
                is_final: true,
            },
        ];
        Automaton::new(states, 0, Kind::Nfa)
    }

    #[test]
    fn matches_at_single_byte() {
        let a = literal_automaton(b'x');
        assert_eq!(a.matches_at(b"axb", 1), Some(2));
        assert_eq!(a.matches_at(b"ayb", 1), None);
    }

    #[test]
    fn deep_copy_is_independent() {
        let a = literal_automaton(b'x');
        let b = a.deep_copy();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.matches_at(b"x", 0), b.matches_at(b"x", 0));
    }

    #[test]
    fn splice_offsets_targets() {
        let a = literal_automaton(b'a');
        let b = literal_automaton(b'b');
        let mut states = Vec::new();
        let start_a = Automaton::splice_with_offset(&mut states, &a);
        let start_b = Automaton::splice_with_offset(&mut states, &b);
        assert_eq!(start_a, 0);
        assert_eq!(start_b, 2);
        assert_eq!(states.len(), 4);
        assert_eq!(states[0].transitions[0].target, 1);
        assert_eq!(states[2].transitions[0].target, 3);
    }
}
