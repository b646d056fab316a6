//! Thompson construction from lexical rules to an epsilon-NFA
//!
//! Each rule becomes a fragment with one start and one accept state; the
//! combined automaton joins every fragment under a shared start state with
//! epsilon edges and tags each fragment's accept state with its rule index.

use crate::grammar::ast::{BracketKind, LexBase, LexBracket, LexSymbol, RegExp, UnicodeClassKind};
use crate::grammar::runeset::RuneSet;

use super::table::ClassMask;

/// Single code point matcher on an NFA edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharClass {
    Any,
    Char(char),
    Set(RuneSet),
    NotSet(RuneSet),
    Unicode(UnicodeClassKind),
}

impl CharClass {
    pub fn matches(&self, c: char) -> bool {
        match self {
            Self::Any => true,
            Self::Char(ch) => *ch == c,
            Self::Set(set) => set.contains(c),
            Self::NotSet(set) => !set.contains(c),
            Self::Unicode(kind) => kind.matches(c),
        }
    }

    /// Whether a code point outside every explicit set, with class signature
    /// `mask`, matches
    pub fn matches_signature(&self, mask: ClassMask) -> bool {
        match self {
            Self::Any | Self::NotSet(_) => true,
            Self::Char(_) | Self::Set(_) => false,
            Self::Unicode(kind) => mask.contains(*kind),
        }
    }

    /// Code points this matcher names explicitly
    pub fn explicit_chars(&self) -> Vec<char> {
        match self {
            Self::Char(c) => vec![*c],
            Self::Set(set) | Self::NotSet(set) => set.iter().collect(),
            Self::Any | Self::Unicode(_) => Vec::new(),
        }
    }
}

impl From<&LexBase> for CharClass {
    fn from(base: &LexBase) -> Self {
        match base {
            LexBase::Any(_) => Self::Any,
            LexBase::AnyOf(a) => Self::Set(a.set().clone()),
            LexBase::Not(n) => Self::NotSet(n.set().clone()),
            LexBase::CharLiteral(c) => Self::Char(c.char()),
            LexBase::UnicodeClass(u) => Self::Unicode(u.kind()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub transitions: Vec<(CharClass, usize)>,
    pub epsilon: Vec<usize>,
    /// Index of the rule this state accepts, in declaration order
    pub accept: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NfaFragment {
    pub start: usize,
    pub accept: usize,
}

/// The construction stopped because it outgrew the state limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLimitExceeded {
    pub max: usize,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start: usize,
    max_states: usize,
}

impl Nfa {
    /// Empty NFA with a shared start state
    pub fn new(max_states: usize) -> Self {
        Self {
            states: vec![NfaState::default()],
            start: 0,
            max_states,
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    fn add_state(&mut self) -> Result<usize, StateLimitExceeded> {
        if self.states.len() >= self.max_states {
            return Err(StateLimitExceeded {
                max: self.max_states,
            });
        }
        self.states.push(NfaState::default());
        Ok(self.states.len() - 1)
    }

    fn add_epsilon(&mut self, from: usize, to: usize) {
        self.states[from].epsilon.push(to);
    }

    fn add_transition(&mut self, from: usize, to: usize, class: CharClass) {
        self.states[from].transitions.push((class, to));
    }

    /// Compile `reg_exp` as rule number `rule_index` and hang it off the
    /// shared start state
    pub fn add_rule(&mut self, rule_index: usize, reg_exp: &RegExp) -> Result<(), StateLimitExceeded> {
        let frag = self.compile_reg_exp(reg_exp)?;
        let start = self.start;
        self.add_epsilon(start, frag.start);
        self.states[frag.accept].accept = Some(rule_index);
        Ok(())
    }

    /// Every code point some edge names explicitly, sorted and deduplicated
    pub fn alphabet(&self) -> Vec<char> {
        let mut chars: Vec<char> = self
            .states
            .iter()
            .flat_map(|s| s.transitions.iter())
            .flat_map(|(class, _)| class.explicit_chars())
            .collect();
        chars.sort_unstable();
        chars.dedup();
        chars
    }

    fn epsilon_fragment(&mut self) -> Result<NfaFragment, StateLimitExceeded> {
        let s = self.add_state()?;
        Ok(NfaFragment { start: s, accept: s })
    }

    fn compile_reg_exp(&mut self, reg_exp: &RegExp) -> Result<NfaFragment, StateLimitExceeded> {
        let mut fragments = reg_exp
            .symbols()
            .iter()
            .map(|symbol| self.compile_symbol(symbol))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        let Some(mut result) = fragments.next() else {
            return self.epsilon_fragment();
        };
        for next in fragments {
            self.add_epsilon(result.accept, next.start);
            result.accept = next.accept;
        }
        Ok(result)
    }

    fn compile_symbol(&mut self, symbol: &LexSymbol) -> Result<NfaFragment, StateLimitExceeded> {
        match symbol {
            LexSymbol::Base(base) => {
                let start = self.add_state()?;
                let accept = self.add_state()?;
                self.add_transition(start, accept, CharClass::from(base));
                Ok(NfaFragment { start, accept })
            }
            LexSymbol::Bracket(bracket) => self.compile_bracket(bracket),
        }
    }

    fn compile_bracket(&mut self, bracket: &LexBracket) -> Result<NfaFragment, StateLimitExceeded> {
        let start = self.add_state()?;
        let accept = self.add_state()?;
        for alt in bracket.alternates() {
            let frag = self.compile_reg_exp(alt)?;
            self.add_epsilon(start, frag.start);
            self.add_epsilon(frag.accept, accept);
        }

        match bracket.kind() {
            BracketKind::Group => {}
            BracketKind::Optional => self.add_epsilon(start, accept),
            BracketKind::ZeroOrMore => {
                self.add_epsilon(accept, start);
                self.add_epsilon(start, accept);
            }
            BracketKind::OneOrMore => self.add_epsilon(accept, start),
        }
        Ok(NfaFragment { start, accept })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Any, AnyOf, CharLiteral, Not, UnicodeClass};
    use std::collections::BTreeSet;

    fn closure(nfa: &Nfa, seed: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
        let mut set: BTreeSet<usize> = seed.into_iter().collect();
        let mut stack: Vec<usize> = set.iter().copied().collect();
        while let Some(s) = stack.pop() {
            for &t in &nfa.states[s].epsilon {
                if set.insert(t) {
                    stack.push(t);
                }
            }
        }
        set
    }

    /// Rule index accepted after consuming all of `input`
    fn run(nfa: &Nfa, input: &str) -> Option<usize> {
        let mut current = closure(nfa, [nfa.start]);
        for c in input.chars() {
            let moved: Vec<usize> = current
                .iter()
                .flat_map(|&s| nfa.states[s].transitions.iter())
                .filter(|(class, _)| class.matches(c))
                .map(|&(_, t)| t)
                .collect();
            current = closure(nfa, moved);
        }
        current.iter().filter_map(|&s| nfa.states[s].accept).min()
    }

    fn bracket(kind: BracketKind, c: char) -> LexSymbol {
        LexBracket::synthetic(kind, vec![RegExp::new(vec![CharLiteral::synthetic(c).into()])])
            .unwrap()
            .into()
    }

    #[test]
    fn test_bracket_shapes() {
        let cases = [
            (BracketKind::Group, ["", "a", "aa"], [false, true, false]),
            (BracketKind::Optional, ["", "a", "aa"], [true, true, false]),
            (BracketKind::ZeroOrMore, ["", "a", "aaa"], [true, true, true]),
            (BracketKind::OneOrMore, ["", "a", "aaa"], [false, true, true]),
        ];

        for (kind, inputs, expected) in cases {
            let mut nfa = Nfa::new(1000);
            nfa.add_rule(0, &RegExp::new(vec![bracket(kind, 'a')])).unwrap();
            for (input, accepted) in inputs.iter().zip(expected) {
                assert_eq!(run(&nfa, input).is_some(), accepted, "{:?} on {:?}", kind, input);
            }
        }
    }

    #[test]
    fn test_empty_alternative_is_epsilon() {
        let mut nfa = Nfa::new(1000);
        let alt = LexBracket::synthetic(
            BracketKind::Group,
            vec![RegExp::default(), RegExp::new(vec![CharLiteral::synthetic('x').into()])],
        )
        .unwrap();
        nfa.add_rule(0, &RegExp::new(vec![alt.into()])).unwrap();

        assert_eq!(run(&nfa, ""), Some(0));
        assert_eq!(run(&nfa, "x"), Some(0));
    }

    #[test]
    fn test_lowest_rule_index_reported() {
        let mut nfa = Nfa::new(1000);
        nfa.add_rule(0, &RegExp::new(vec![CharLiteral::synthetic('k').into()])).unwrap();
        nfa.add_rule(1, &RegExp::new(vec![UnicodeClass::synthetic(UnicodeClassKind::Lowcase).into()]))
            .unwrap();

        assert_eq!(run(&nfa, "k"), Some(0));
        assert_eq!(run(&nfa, "j"), Some(1));
    }

    #[test]
    fn test_alphabet_collects_explicit_chars() {
        let mut nfa = Nfa::new(1000);
        nfa.add_rule(
            0,
            &RegExp::new(vec![
                AnyOf::synthetic("ba").into(),
                Not::synthetic("c").into(),
                Any::synthetic().into(),
                CharLiteral::synthetic('a').into(),
            ]),
        )
        .unwrap();

        assert_eq!(nfa.alphabet(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_state_limit() {
        let mut nfa = Nfa::new(4);
        let rule = RegExp::new(vec![
            CharLiteral::synthetic('a').into(),
            CharLiteral::synthetic('b').into(),
        ]);
        assert_eq!(nfa.add_rule(0, &rule), Err(StateLimitExceeded { max: 4 }));
    }

    #[test]
    fn test_signature_matching() {
        let letter = ClassMask::of('q');
        assert!(CharClass::Any.matches_signature(letter));
        assert!(CharClass::NotSet("x".into()).matches_signature(letter));
        assert!(!CharClass::Set("x".into()).matches_signature(letter));
        assert!(!CharClass::Char('q').matches_signature(letter));
        assert!(CharClass::Unicode(UnicodeClassKind::Letter).matches_signature(letter));
        assert!(!CharClass::Unicode(UnicodeClassKind::Number).matches_signature(letter));
    }
}
