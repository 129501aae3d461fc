//! The immutable transition table produced by the builder and shared by every run.

use crate::alphabet::Alphabet;
use crate::types::{State, Transition};
use std::collections::{BTreeMap, BTreeSet};

/// A complete, deterministic mapping from `(State, symbol)` to [`Transition`].
///
/// A missing key means "no transition": the engine rejects instead of falling back to
/// a default action. Tables are never mutated after construction, so a single table
/// can be shared across threads and runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    pub(crate) alphabet: Alphabet,
    pub(crate) rules: BTreeMap<(State, char), Transition>,
}

impl TransitionTable {
    pub(crate) fn new(alphabet: Alphabet, rules: BTreeMap<(State, char), Transition>) -> Self {
        Self { alphabet, rules }
    }

    /// Returns the alphabet the table was built from.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Returns the blank symbol.
    pub fn blank(&self) -> char {
        self.alphabet.blank
    }

    pub fn start_state(&self) -> State {
        State::START
    }

    pub fn accept_state(&self) -> State {
        State::Accept
    }

    pub fn reject_state(&self) -> State {
        State::Reject
    }

    /// Looks up the rule for `state` reading `symbol`.
    pub fn transition(&self, state: State, symbol: char) -> Option<&Transition> {
        self.rules.get(&(state, symbol))
    }

    /// Iterates over every rule in `(state, symbol)` order.
    pub fn rules(&self) -> impl Iterator<Item = (State, char, &Transition)> {
        self.rules
            .iter()
            .map(|(&(state, symbol), transition)| (state, symbol, transition))
    }

    /// Iterates over the rules leaving `state`, ordered by symbol.
    pub fn rules_for(&self, state: State) -> impl Iterator<Item = (char, &Transition)> {
        self.rules
            .range((state, char::MIN)..=(state, char::MAX))
            .map(|(&(_, symbol), transition)| (symbol, transition))
    }

    /// Returns every state that has at least one outgoing rule.
    pub fn states(&self) -> BTreeSet<State> {
        self.rules.keys().map(|&(state, _)| state).collect()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Checks if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
