//! Subset construction from the rule NFA to the dense DFA
//!
//! The input partition is the NFA's explicit alphabet plus one block per class
//! signature. A DFA state accepting several rules reports the lowest rule
//! index, i.e. the rule declared first.

use super::nfa::{CharClass, Nfa, StateLimitExceeded};
use super::table::{Automaton, ClassMask};
use crate::tokens::TokenType;
use std::collections::{BTreeSet, HashMap, VecDeque};

type StateSet = BTreeSet<usize>;

fn epsilon_closure(nfa: &Nfa, seed: impl IntoIterator<Item = usize>) -> StateSet {
    let mut set: StateSet = seed.into_iter().collect();
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

fn step<F>(nfa: &Nfa, from: &StateSet, matches: F) -> StateSet
where
    F: Fn(&CharClass) -> bool,
{
    let targets = from
        .iter()
        .flat_map(|&s| nfa.states[s].transitions.iter())
        .filter(|(class, _)| matches(class))
        .map(|&(_, t)| t);
    epsilon_closure(nfa, targets)
}

/// Determinize `nfa`. `rule_types[i]` is the category reported for rule `i`.
pub fn subset_construction(
    nfa: &Nfa,
    rule_types: &[TokenType],
    max_states: usize,
) -> Result<Automaton, StateLimitExceeded> {
    let alphabet = nfa.alphabet();
    let mut dfa = Automaton::with_alphabet(alphabet.clone());
    let mut ids: HashMap<StateSet, usize> = HashMap::new();
    let mut worklist: VecDeque<StateSet> = VecDeque::new();

    let accept_of = |set: &StateSet| {
        set.iter()
            .filter_map(|&s| nfa.states[s].accept)
            .min()
            .and_then(|rule| rule_types.get(rule).copied())
            .unwrap_or(TokenType::ERROR)
    };

    let start = epsilon_closure(nfa, [nfa.start]);
    let start_id = dfa.add_state(accept_of(&start));
    ids.insert(start.clone(), start_id);
    worklist.push_back(start);

    // Returns the DFA id for `set`, allocating and queueing it when new
    let mut intern = |set: StateSet,
                      dfa: &mut Automaton,
                      worklist: &mut VecDeque<StateSet>|
     -> Result<usize, StateLimitExceeded> {
        if let Some(&id) = ids.get(&set) {
            return Ok(id);
        }
        if dfa.state_count() >= max_states {
            return Err(StateLimitExceeded { max: max_states });
        }
        let id = dfa.add_state(accept_of(&set));
        ids.insert(set.clone(), id);
        worklist.push_back(set);
        Ok(id)
    };

    let mut current_id = 0;
    while let Some(set) = worklist.pop_front() {
        for &c in &alphabet {
            let target = step(nfa, &set, |class| class.matches(c));
            if !target.is_empty() {
                let to = intern(target, &mut dfa, &mut worklist)?;
                dfa.add_transition(current_id, c, to);
            }
        }

        for mask in ClassMask::all() {
            let target = step(nfa, &set, |class| class.matches_signature(mask));
            if !target.is_empty() {
                let to = intern(target, &mut dfa, &mut worklist)?;
                dfa.add_class_transition(current_id, mask, to);
            }
        }

        current_id += 1;
    }

    Ok(dfa)
}
