//! Dense transition tables consumed by the scanner
//!
//! A state has an exact edge for each code point some rule names explicitly
//! (the automaton's alphabet). Every other code point follows the edge for its
//! class signature: the set of Unicode classes it belongs to. Two code points
//! outside the alphabet with the same signature are indistinguishable to every
//! rule, so 32 signature slots cover the rest of Unicode.

use crate::grammar::ast::UnicodeClassKind;
use crate::tokens::TokenType;
use serde::{Deserialize, Serialize};

/// Number of distinct class signatures (five classes, one bit each)
pub const SIGNATURE_COUNT: usize = 1 << UnicodeClassKind::ALL.len();

/// Bitmask of the Unicode classes a code point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassMask(u8);

impl ClassMask {
    pub const EMPTY: ClassMask = ClassMask(0);

    pub fn of(c: char) -> Self {
        let bits = UnicodeClassKind::ALL
            .iter()
            .filter(|kind| kind.matches(c))
            .fold(0u8, |acc, kind| acc | kind.bit());
        Self(bits)
    }

    pub fn from_index(index: usize) -> Self {
        Self((index % SIGNATURE_COUNT) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn contains(self, kind: UnicodeClassKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Every signature, in index order
    pub fn all() -> impl Iterator<Item = ClassMask> {
        (0..SIGNATURE_COUNT).map(Self::from_index)
    }
}

/// Outgoing edges of one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransitions {
    /// Sorted by code point
    exact: Vec<(char, usize)>,
    by_class: [Option<usize>; SIGNATURE_COUNT],
}

impl Default for StateTransitions {
    fn default() -> Self {
        Self {
            exact: Vec::new(),
            by_class: [None; SIGNATURE_COUNT],
        }
    }
}

impl StateTransitions {
    fn exact(&self, c: char) -> Option<usize> {
        self.exact
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| self.exact[i].1)
    }

    fn set_exact(&mut self, c: char, target: usize) {
        match self.exact.binary_search_by_key(&c, |&(k, _)| k) {
            Ok(i) => self.exact[i].1 = target,
            Err(i) => self.exact.insert(i, (c, target)),
        }
    }

    /// Number of edges leaving this state
    pub fn edge_count(&self) -> usize {
        self.exact.len() + self.by_class.iter().filter(|t| t.is_some()).count()
    }
}

/// Deterministic automaton with start state 0. A missing transition is the
/// dead state; it is never a state index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automaton {
    /// Sorted code points with exact edges
    alphabet: Vec<char>,
    states: Vec<StateTransitions>,
    accept: Vec<TokenType>,
}

impl Automaton {
    pub const START: usize = 0;

    /// Automaton with only a non-accepting start state
    pub fn new() -> Self {
        Self {
            alphabet: Vec::new(),
            states: vec![StateTransitions::default()],
            accept: vec![TokenType::ERROR],
        }
    }

    /// Empty automaton whose exact edges will use `alphabet`
    pub(crate) fn with_alphabet(mut alphabet: Vec<char>) -> Self {
        alphabet.sort_unstable();
        alphabet.dedup();
        Self {
            alphabet,
            states: Vec::new(),
            accept: Vec::new(),
        }
    }

    /// Append a state accepting `accept` (`TokenType::ERROR` for none)
    pub fn add_state(&mut self, accept: TokenType) -> usize {
        self.states.push(StateTransitions::default());
        self.accept.push(accept);
        self.states.len() - 1
    }

    /// Exact edge on `c`. Adds `c` to the alphabet, so from then on `c` only
    /// follows exact edges in every state.
    pub fn add_transition(&mut self, from: usize, c: char, to: usize) {
        if let Err(i) = self.alphabet.binary_search(&c) {
            self.alphabet.insert(i, c);
        }
        if let Some(state) = self.states.get_mut(from) {
            state.set_exact(c, to);
        }
    }

    /// Edge for code points outside the alphabet whose signature is `mask`
    pub fn add_class_transition(&mut self, from: usize, mask: ClassMask, to: usize) {
        if let Some(state) = self.states.get_mut(from) {
            state.by_class[mask.index()] = Some(to);
        }
    }

    /// Edge for every code point outside the alphabet whose signature
    /// contains `kind`
    pub fn add_unicode_transition(&mut self, from: usize, kind: UnicodeClassKind, to: usize) {
        for mask in ClassMask::all().filter(|m| m.contains(kind)) {
            self.add_class_transition(from, mask, to);
        }
    }

    /// Next state from `state` on `c`, or `None` for the dead state
    pub fn next(&self, state: usize, c: char) -> Option<usize> {
        let transitions = self.states.get(state)?;
        if self.alphabet.binary_search(&c).is_ok() {
            transitions.exact(c)
        } else {
            transitions.by_class[ClassMask::of(c).index()]
        }
    }

    /// Category accepted in `state`, `TokenType::ERROR` when none
    pub fn accept(&self, state: usize) -> TokenType {
        self.accept.get(state).copied().unwrap_or(TokenType::ERROR)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn edge_count(&self) -> usize {
        self.states.iter().map(StateTransitions::edge_count).sum()
    }

    pub fn accepting_state_count(&self) -> usize {
        self.accept.iter().filter(|t| !t.is_error()).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}
