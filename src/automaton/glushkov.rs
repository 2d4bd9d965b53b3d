//! Glushkov ("position") automaton construction (spec §4.4).
//!
//! One state per position (symbol occurrence) in the expression, plus a
//! start state. This is the classical construction: linearise the
//! expression by numbering every symbol occurrence, compute `first`/`last`/
//! `nullable` bottom-up, derive `follow(p)` for every position `p`, then
//! wire up transitions `start -> first(e)` and `p -> follow(p)`.

use std::collections::BTreeSet;

use crate::automaton::regex_tree::Regex;
use crate::automaton::{Automaton, Kind, State, Transition};
use crate::byte_matcher::ByteMatcher;

/// The linearised tree: every [`Regex::Symbol`] is tagged with its unique
/// position (1-based; 0 is reserved for the start state).
enum Positioned {
    Epsilon,
    Symbol(u32),
    Concat(Box<Positioned>, Box<Positioned>),
    Union(Box<Positioned>, Box<Positioned>),
    Star(Box<Positioned>),
    Plus(Box<Positioned>),
    Optional(Box<Positioned>),
}

fn assign_positions(regex: &Regex, next: &mut u32, matchers: &mut Vec<ByteMatcher>) -> Positioned {
    match regex {
        Regex::Epsilon => Positioned::Epsilon,
        Regex::Symbol(m) => {
            let pos = *next;
            *next += 1;
            matchers.push(m.clone());
            Positioned::Symbol(pos)
        }
        Regex::Concat(a, b) => Positioned::Concat(
            Box::new(assign_positions(a, next, matchers)),
            Box::new(assign_positions(b, next, matchers)),
        ),
        Regex::Union(a, b) => Positioned::Union(
            Box::new(assign_positions(a, next, matchers)),
            Box::new(assign_positions(b, next, matchers)),
        ),
        Regex::Star(a) => Positioned::Star(Box::new(assign_positions(a, next, matchers))),
        Regex::Plus(a) => Positioned::Plus(Box::new(assign_positions(a, next, matchers))),
        Regex::Optional(a) => Positioned::Optional(Box::new(assign_positions(a, next, matchers))),
    }
}

struct Analysis {
    nullable: bool,
    first: BTreeSet<u32>,
    last: BTreeSet<u32>,
}

fn analyze(node: &Positioned) -> Analysis {
    match node {
        Positioned::Epsilon => Analysis {
            nullable: true,
            first: BTreeSet::new(),
            last: BTreeSet::new(),
        },
        Positioned::Symbol(p) => Analysis {
            nullable: false,
            first: BTreeSet::from([*p]),
            last: BTreeSet::from([*p]),
        },
        Positioned::Concat(a, b) => {
            let (a, b) = (analyze(a), analyze(b));
            let first = if a.nullable {
                &a.first | &b.first
            } else {
                a.first.clone()
            };
            let last = if b.nullable {
                &a.last | &b.last
            } else {
                b.last.clone()
            };
            Analysis {
                nullable: a.nullable && b.nullable,
                first,
                last,
            }
        }
        Positioned::Union(a, b) => {
            let (a, b) = (analyze(a), analyze(b));
            Analysis {
                nullable: a.nullable || b.nullable,
                first: &a.first | &b.first,
                last: &a.last | &b.last,
            }
        }
        Positioned::Star(a) => {
            let a = analyze(a);
            Analysis {
                nullable: true,
                first: a.first,
                last: a.last,
            }
        }
        Positioned::Plus(a) => {
            let a = analyze(a);
            Analysis {
                nullable: a.nullable,
                first: a.first,
                last: a.last,
            }
        }
        Positioned::Optional(a) => {
            let a = analyze(a);
            Analysis {
                nullable: true,
                first: a.first,
                last: a.last,
            }
        }
    }
}

/// Accumulates `follow(p)` for every position, recursing once over the tree.
fn compute_follow(node: &Positioned, follow: &mut [BTreeSet<u32>]) {
    match node {
        Positioned::Epsilon | Positioned::Symbol(_) => {}
        Positioned::Concat(a, b) => {
            compute_follow(a, follow);
            compute_follow(b, follow);
            let a_analysis = analyze(a);
            let b_analysis = analyze(b);
            for p in a_analysis.last {
                follow[p as usize] = &follow[p as usize] | &b_analysis.first;
            }
        }
        Positioned::Union(a, b) => {
            compute_follow(a, follow);
            compute_follow(b, follow);
        }
        Positioned::Star(a) | Positioned::Plus(a) => {
            compute_follow(a, follow);
            let a_analysis = analyze(a);
            for p in a_analysis.last.clone() {
                follow[p as usize] = &follow[p as usize] | &a_analysis.first;
            }
        }
        Positioned::Optional(a) => {
            compute_follow(a, follow);
        }
    }
}

/// Builds a Glushkov NFA for `regex`. State `0` is the start state; states
/// `1..=n` correspond to the `n` symbol occurrences in `regex`, in the order
/// they appear left to right.
pub fn build(regex: &Regex) -> Automaton {
    let mut next = 1u32;
    let mut matchers = Vec::new();
    let positioned = assign_positions(regex, &mut next, &mut matchers);
    let n = matchers.len();

    let mut follow: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); n + 1];
    compute_follow(&positioned, &mut follow);
    let whole = analyze(&positioned);

    let mut states: Vec<State> = vec![State::default(); n + 1];
    states[0].is_final = whole.nullable;
    for &p in &whole.first {
        states[0].transitions.push(Transition {
            matcher: matchers[p as usize - 1].clone(),
            target: p,
        });
    }
    for p in 1..=n as u32 {
        states[p as usize].is_final = whole.last.contains(&p);
        for &q in &follow[p as usize] {
            states[p as usize].transitions.push(Transition {
                matcher: matchers[q as usize - 1].clone(),
                target: q,
            });
        }
    }

    Automaton::new(states, 0, Kind::Nfa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(b: u8) -> Regex {
        Regex::Symbol(ByteMatcher::byte(b))
    }

    #[test]
    fn literal_concat() {
        let re = Regex::concat([sym(b'a'), sym(b'b'), sym(b'c')]);
        let nfa = build(&re);
        assert_eq!(nfa.matches_at(b"abc", 0), Some(3));
        assert_eq!(nfa.matches_at(b"abd", 0), None);
    }

    #[test]
    fn alternation() {
        let re = Regex::Union(Box::new(sym(b'a')), Box::new(sym(b'b')));
        let nfa = build(&re);
        assert_eq!(nfa.matches_at(b"a", 0), Some(1));
        assert_eq!(nfa.matches_at(b"b", 0), Some(1));
        assert_eq!(nfa.matches_at(b"c", 0), None);
    }

    #[test]
    fn star_matches_zero_or_more() {
        let re = Regex::Star(Box::new(sym(b'a')));
        let nfa = build(&re);
        assert_eq!(nfa.matches_at(b"", 0), Some(0));
        assert_eq!(nfa.matches_at(b"aaa", 0), Some(3));
        assert_eq!(nfa.matches_at(b"aaab", 0), Some(3));
    }

    #[test]
    fn plus_requires_at_least_one() {
        let re = Regex::Plus(Box::new(sym(b'a')));
        let nfa = build(&re);
        assert_eq!(nfa.matches_at(b"", 0), None);
        assert_eq!(nfa.matches_at(b"aaa", 0), Some(3));
    }

    #[test]
    fn optional_matches_zero_or_one() {
        let re = Regex::Optional(Box::new(sym(b'a')));
        let nfa = build(&re);
        assert_eq!(nfa.matches_at(b"", 0), Some(0));
        assert_eq!(nfa.matches_at(b"a", 0), Some(1));
        assert_eq!(nfa.matches_at(b"aa", 0), Some(1));
    }

    #[test]
    fn combined_alt_then_star() {
        // (a|b)*c
        let alt = Regex::Union(Box::new(sym(b'a')), Box::new(sym(b'b')));
        let re = Regex::concat([Regex::Star(Box::new(alt)), sym(b'c')]);
        let nfa = build(&re);
        assert_eq!(nfa.matches_at(b"ababc", 0), Some(5));
        assert_eq!(nfa.matches_at(b"c", 0), Some(1));
        assert_eq!(nfa.matches_at(b"ababx", 0), None);
    }
}
