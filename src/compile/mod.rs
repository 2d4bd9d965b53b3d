//! Compiles a pattern tree into the cheapest matcher that can represent it
//! (component C6, spec §4.5).
//!
//! [`Node`] is the public pattern syntax, produced either directly by callers
//! or by [`crate::syntax`] parsing the textual grammar. `compile` always picks
//! the tightest of [`ByteMatcher`], [`SequenceMatcher`] or [`Automaton`] that
//! the node's shape allows, mirroring the teacher's own preference for the
//! narrowest representation (`AsciiMatcher`'s literal/Ac/regex ladder in
//! `matcher/mod.rs`): a single byte test beats a sequence scan beats running
//! an automaton.

use std::sync::Arc;

use crate::automaton::{glushkov, Automaton, Regex};
use crate::byte_matcher::ByteMatcher;
use crate::error::{CompileErrorKind, Error, Result};
use crate::sequence::{ByteString, GenericSequence, SequenceMatcher};

/// The public pattern syntax tree (spec §4.5's compiler input table).
#[derive(Clone, Debug)]
pub enum Node {
    /// `BYTE`: a single exact byte.
    Byte(u8),
    /// `ALL_BITMASK`: `(v & mask) == mask`.
    AllBitmask(u8),
    /// `ANY_BITMASK`: `(v & mask) != 0`.
    AnyBitmask(u8),
    /// `ANY`: the wildcard byte.
    Any,
    /// `SET`: matches any byte in the list.
    Set(Vec<u8>),
    /// `INVERTED_SET`: matches any byte not in the list.
    InvertedSet(Vec<u8>),
    /// `RANGE`: `lo..=hi`.
    Range(u8, u8),
    /// `CASE_SENSITIVE_STRING`: a literal byte string.
    CaseSensitiveString(Vec<u8>),
    /// `CASE_INSENSITIVE_STRING`: a byte string where ASCII letters match
    /// either case.
    CaseInsensitiveString(Vec<u8>),
    /// `SEQUENCE`: concatenation of sub-patterns.
    Sequence(Vec<Node>),
    /// `REPEAT(n)` when `hi == Some(n)`, `REPEAT(n..m)` when `hi == Some(m)`,
    /// `REPEAT(n..)` (unbounded) when `hi == None`.
    Repeat(Box<Node>, u64, Option<u64>),
    /// `ALT`: alternation between two or more sub-patterns.
    Alt(Vec<Node>),
    /// `MANY` (`*`): zero or more repetitions.
    Many(Box<Node>),
    /// `ONE_TO_MANY` (`+`): one or more repetitions.
    OneToMany(Box<Node>),
    /// `OPTIONAL` (`?`): zero or one repetition.
    Optional(Box<Node>),
}

impl Node {
    fn kind_name(&self) -> &'static str {
        match self {
            Node::Byte(_) => "Byte",
            Node::AllBitmask(_) => "AllBitmask",
            Node::AnyBitmask(_) => "AnyBitmask",
            Node::Any => "Any",
            Node::Set(_) => "Set",
            Node::InvertedSet(_) => "InvertedSet",
            Node::Range(_, _) => "Range",
            Node::CaseSensitiveString(_) => "CaseSensitiveString",
            Node::CaseInsensitiveString(_) => "CaseInsensitiveString",
            Node::Sequence(_) => "Sequence",
            Node::Repeat(_, _, _) => "Repeat",
            Node::Alt(_) => "Alt",
            Node::Many(_) => "Many",
            Node::OneToMany(_) => "OneToMany",
            Node::Optional(_) => "Optional",
        }
    }
}

/// The tightest matcher `compile` could build for a [`Node`].
#[derive(Debug)]
pub enum Pattern {
    Byte(ByteMatcher),
    Sequence(Arc<dyn SequenceMatcher>),
    Automaton(Automaton),
}

impl Pattern {
    fn kind_name(&self) -> &'static str {
        match self {
            Pattern::Byte(_) => "Byte",
            Pattern::Sequence(_) => "Sequence",
            Pattern::Automaton(_) => "Automaton",
        }
    }
}

/// An intermediate result during compilation: the same ladder as [`Pattern`],
/// but additionally tracks `Regex` for nodes not yet promoted to a full
/// automaton, so composing `Concat`/`Union`/`Star` stays in the `Regex`
/// domain instead of round-tripping through a built `Automaton`.
enum Compiled {
    Byte(ByteMatcher),
    Sequence(Arc<dyn SequenceMatcher>),
    Regex(Regex),
}

impl Compiled {
    fn kind_name(&self) -> &'static str {
        match self {
            Compiled::Byte(_) => "Byte",
            Compiled::Sequence(_) => "Sequence",
            Compiled::Regex(_) => "Regex",
        }
    }
}

fn to_regex(c: Compiled) -> Regex {
    match c {
        Compiled::Byte(m) => Regex::Symbol(m),
        Compiled::Sequence(seq) => {
            Regex::concat((0..seq.len()).map(|i| Regex::Symbol(seq.matcher_at(i))))
        }
        Compiled::Regex(r) => r,
    }
}

fn case_insensitive_matcher(b: u8) -> ByteMatcher {
    if b.is_ascii_alphabetic() {
        ByteMatcher::from_bytes([b.to_ascii_lowercase(), b.to_ascii_uppercase()])
    } else {
        ByteMatcher::byte(b)
    }
}

/// Compiles `node` into the cheapest [`Pattern`] that can represent it.
pub fn compile(node: &Node) -> Result<Pattern> {
    let pattern = match compile_inner(node)? {
        Compiled::Byte(m) => Pattern::Byte(m),
        Compiled::Sequence(s) => Pattern::Sequence(s),
        Compiled::Regex(r) => Pattern::Automaton(glushkov::build(&r)),
    };
    log::debug!("compiled pattern to {}", pattern.kind_name());
    Ok(pattern)
}

fn compile_inner(node: &Node) -> Result<Compiled> {
    let compiled = match node {
        Node::Byte(b) => Ok(Compiled::Byte(ByteMatcher::byte(*b))),
        Node::AllBitmask(mask) => Ok(Compiled::Byte(ByteMatcher::all_bitmask(*mask))),
        Node::AnyBitmask(mask) => Ok(Compiled::Byte(ByteMatcher::any_bitmask(*mask))),
        Node::Any => Ok(Compiled::Byte(ByteMatcher::any())),
        Node::Set(bytes) => Ok(Compiled::Byte(ByteMatcher::from_bytes(bytes.iter().copied()))),
        Node::InvertedSet(bytes) => Ok(Compiled::Byte(
            ByteMatcher::from_bytes(bytes.iter().copied()).invert(),
        )),
        Node::Range(lo, hi) => Ok(Compiled::Byte(ByteMatcher::range(*lo, *hi))),
        Node::CaseSensitiveString(bytes) => Ok(Compiled::Sequence(ByteString::new(bytes.clone()))),
        Node::CaseInsensitiveString(bytes) => {
            let matchers: Vec<ByteMatcher> = bytes.iter().copied().map(case_insensitive_matcher).collect();
            Ok(Compiled::Sequence(GenericSequence::new(matchers)))
        }
        Node::Sequence(children) => compile_sequence(children),
        Node::Repeat(inner, lo, hi) => compile_repeat(inner, *lo, *hi),
        Node::Alt(children) => compile_alt(children),
        Node::Many(inner) => compile_quantified(inner, Regex::Star),
        Node::OneToMany(inner) => compile_quantified(inner, Regex::Plus),
        Node::Optional(inner) => compile_quantified(inner, Regex::Optional),
    }?;
    log::trace!("{} -> {}", node.kind_name(), compiled.kind_name());
    Ok(compiled)
}

fn compile_sequence(children: &[Node]) -> Result<Compiled> {
    let compiled: Vec<Compiled> = children.iter().map(compile_inner).collect::<Result<_>>()?;
    let all_fixed_width = compiled
        .iter()
        .all(|c| matches!(c, Compiled::Byte(_) | Compiled::Sequence(_)));

    if all_fixed_width {
        let mut matchers = Vec::new();
        for c in compiled {
            match c {
                Compiled::Byte(m) => matchers.push(m),
                Compiled::Sequence(seq) => matchers.extend((0..seq.len()).map(|i| seq.matcher_at(i))),
                Compiled::Regex(_) => unreachable!("excluded by all_fixed_width"),
            }
        }
        Ok(Compiled::Sequence(GenericSequence::new(matchers)))
    } else {
        Ok(Compiled::Regex(Regex::concat(compiled.into_iter().map(to_regex))))
    }
}

/// `Many`/`OneToMany`/`Optional` all share the rule that quantifying an
/// already-nullable sub-pattern (e.g. `a**`) is rejected as ambiguous rather
/// than silently accepted (spec §4.5, `UnquantifiableTarget`).
fn compile_quantified(inner: &Node, wrap: impl FnOnce(Box<Regex>) -> Regex) -> Result<Compiled> {
    let regex = to_regex(compile_inner(inner)?);
    if regex.nullable() {
        return Err(Error::Compile(CompileErrorKind::UnquantifiableTarget));
    }
    Ok(Compiled::Regex(wrap(Box::new(regex))))
}

fn compile_repeat(inner: &Node, lo: u64, hi: Option<u64>) -> Result<Compiled> {
    if let Some(hi) = hi {
        if hi < lo {
            return Err(Error::Compile(CompileErrorKind::InvalidRepeatBounds { lo, hi }));
        }
    }
    let regex = to_regex(compile_inner(inner)?);
    if regex.nullable() {
        return Err(Error::Compile(CompileErrorKind::UnquantifiableTarget));
    }

    let mandatory = (0..lo).map(|_| regex.clone());
    let tail: Vec<Regex> = match hi {
        Some(hi) if hi == lo => Vec::new(),
        Some(hi) => (0..(hi - lo)).map(|_| Regex::Optional(Box::new(regex.clone()))).collect(),
        None => vec![Regex::Star(Box::new(regex.clone()))],
    };
    Ok(Compiled::Regex(Regex::concat(mandatory.chain(tail))))
}

fn compile_alt(children: &[Node]) -> Result<Compiled> {
    if children.is_empty() {
        return Err(Error::Compile(CompileErrorKind::EmptyAlternation));
    }
    let regexes: Vec<Regex> = children
        .iter()
        .map(|c| compile_inner(c).map(to_regex))
        .collect::<Result<_>>()?;
    Ok(Compiled::Regex(
        Regex::union(regexes).expect("non-empty per the check above"),
    ))
}
