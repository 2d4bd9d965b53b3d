//! Subset construction: turns any NFA into an equivalent DFA (spec §4.4).
//!
//! Each DFA state is a set of NFA states (a subset, hence the name). Transitions
//! out of a DFA state are derived by partitioning the union of the underlying
//! NFA states' outgoing [`ByteMatcher`]s into a set of disjoint byte classes,
//! then following each class to the subset it lands on. Byte-class
//! partitioning keeps the DFA's fan-out proportional to the NFA's, rather
//! than materialising 256 explicit transitions per state.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::automaton::{Automaton, Kind, State, StateId, Transition};
use crate::byte_matcher::ByteMatcher;

type NfaSet = Vec<StateId>;

fn nfa_set(ids: Vec<StateId>) -> NfaSet {
    ids.into_iter().sorted_unstable().dedup().collect()
}

/// Partitions `0..=255` into maximal groups of bytes that every matcher in
/// `matchers` treats identically (all-accept or all-reject). Two bytes land
/// in the same class iff they agree on membership in every matcher.
fn byte_classes(matchers: &[&ByteMatcher]) -> Vec<Vec<u8>> {
    let mut classes: BTreeMap<Vec<bool>, Vec<u8>> = BTreeMap::new();
    for b in 0u16..256 {
        let b = b as u8;
        let signature: Vec<bool> = matchers.iter().map(|m| m.matches(b)).collect();
        classes.entry(signature).or_default().push(b);
    }
    classes.into_values().collect()
}

/// Runs the subset construction on `nfa`, producing a deterministic automaton
/// with the same language. Byte 0 of each class representative decides which
/// matcher the synthesised DFA transition uses (spec §4.4: a DFA only needs
/// one transition per distinct outgoing byte value, per source state).
pub fn build(nfa: &Automaton) -> Automaton {
    let start_set = nfa_set(vec![nfa.start()]);

    let mut dfa_states: Vec<State> = Vec::new();
    let mut set_to_id: BTreeMap<NfaSet, StateId> = BTreeMap::new();
    let mut pending: Vec<NfaSet> = Vec::new();

    set_to_id.insert(start_set.clone(), 0);
    dfa_states.push(State::default());
    pending.push(start_set);

    while let Some(set) = pending.pop() {
        let id = set_to_id[&set];
        let is_final = set.iter().any(|&s| nfa.state(s).is_final);
        dfa_states[id as usize].is_final = is_final;

        let matchers: Vec<&ByteMatcher> = set
            .iter()
            .flat_map(|&s| nfa.state(s).transitions.iter().map(|t| &t.matcher))
            .collect();
        if matchers.is_empty() {
            continue;
        }

        for class in byte_classes(&matchers) {
            let rep = class[0];
            let targets: Vec<StateId> = set
                .iter()
                .flat_map(|&s| {
                    nfa.state(s)
                        .transitions
                        .iter()
                        .filter(move |t| t.matcher.matches(rep))
                        .map(|t| t.target)
                })
                .collect();
            if targets.is_empty() {
                continue;
            }
            let target_set = nfa_set(targets);
            let target_id = *set_to_id.entry(target_set.clone()).or_insert_with(|| {
                let id = dfa_states.len() as StateId;
                dfa_states.push(State::default());
                pending.push(target_set.clone());
                id
            });

            let matcher = ByteMatcher::from_bytes(class.iter().copied());
            dfa_states[id as usize].transitions.push(Transition {
                matcher,
                target: target_id,
            });
        }
    }

    Automaton::new(dfa_states, 0, Kind::Dfa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::glushkov;
    use crate::automaton::regex_tree::Regex;

    fn sym(b: u8) -> Regex {
        Regex::Symbol(ByteMatcher::byte(b))
    }

    #[test]
    fn dfa_accepts_same_language_as_nfa() {
        let re = Regex::concat([sym(b'a'), sym(b'b'), sym(b'c')]);
        let nfa = glushkov::build(&re);
        let dfa = build(&nfa);
        assert_eq!(dfa.kind(), Kind::Dfa);
        assert_eq!(dfa.matches_at(b"abc", 0), nfa.matches_at(b"abc", 0));
        assert_eq!(dfa.matches_at(b"abd", 0), nfa.matches_at(b"abd", 0));
    }

    #[test]
    fn dfa_has_at_most_one_transition_per_byte() {
        let alt = Regex::Union(Box::new(sym(b'a')), Box::new(sym(b'b')));
        let re = Regex::concat([Regex::Star(Box::new(alt)), sym(b'c')]);
        let nfa = glushkov::build(&re);
        let dfa = build(&nfa);
        for state in dfa.states() {
            for byte in 0u8..=255 {
                let hits = state.transitions.iter().filter(|t| t.matcher.matches(byte)).count();
                assert!(hits <= 1, "byte {byte} has {hits} transitions out of a DFA state");
            }
        }
    }

    #[test]
    fn dfa_matches_star_plus_alternation() {
        let alt = Regex::Union(Box::new(sym(b'a')), Box::new(sym(b'b')));
        let re = Regex::concat([Regex::Star(Box::new(alt)), sym(b'c')]);
        let nfa = glushkov::build(&re);
        let dfa = build(&nfa);
        for haystack in [&b"ababc"[..], b"c", b"ababx", b"aaaac"] {
            assert_eq!(
                dfa.matches_at(haystack, 0),
                nfa.matches_at(haystack, 0),
                "mismatch for {haystack:?}"
            );
        }
    }
}
