//! This module provides functions for analyzing a generated transition table to detect
//! construction defects before any password is run through it. This includes checks for
//! halting states, reachable states, dangling targets, and per-phase symbol coverage.

use crate::table::TransitionTable;
use crate::types::{Phase, State, TuringMachineError};
use std::collections::{BTreeSet, HashSet};

/// Represents the defects the analyzer can find in a transition table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The start state has no outgoing rules.
    InvalidStartState(State),
    /// A halting state has outgoing rules.
    HaltingStateHasRules(State),
    /// Rules target states that are neither halting nor defined in the table.
    UndefinedNextStates(Vec<String>),
    /// States that cannot be reached from the start state.
    UnreachableStates(Vec<State>),
    /// A non-halting state lacks rules for symbols that can appear under the head in its phase.
    UncoveredSymbols(State, Vec<char>),
    /// Rules read symbols that are not part of the tape alphabet.
    InvalidTapeSymbols(Vec<char>),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidStartState(state) => {
                TuringMachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::HaltingStateHasRules(state) => TuringMachineError::ValidationError(
                format!("Halting state {} has outgoing rules", state),
            ),
            AnalysisError::UndefinedNextStates(transitions) => TuringMachineError::ValidationError(
                format!("Transitions reference undefined states: {:?}", transitions),
            ),
            AnalysisError::UnreachableStates(states) => {
                let names: Vec<String> = states.iter().map(State::to_string).collect();
                TuringMachineError::ValidationError(format!(
                    "Unreachable states detected: {:?}",
                    names
                ))
            }
            AnalysisError::UncoveredSymbols(state, symbols) => {
                TuringMachineError::ValidationError(format!(
                    "State {} has no rule for symbols: {:?}",
                    state, symbols
                ))
            }
            AnalysisError::InvalidTapeSymbols(symbols) => TuringMachineError::ValidationError(
                format!("Rules read symbols outside the tape alphabet: {:?}", symbols),
            ),
        }
    }
}

/// Analyzes a transition table for structural defects.
///
/// # Returns
///
/// * `Ok(())` if no defects are found.
/// * `Err(TuringMachineError::ValidationError)` describing the first defect found.
pub fn analyze(table: &TransitionTable) -> Result<(), TuringMachineError> {
    let errors = [
        check_valid_start_state,
        check_halting_states,
        check_undefined_next_states,
        check_unreachable_states,
        check_tape_symbols,
        check_symbol_coverage,
    ]
    .iter()
    .filter_map(|f| f(table).err())
    .collect::<Vec<_>>();

    match errors.into_iter().next() {
        Some(first_error) => Err(first_error.into()),
        None => Ok(()),
    }
}

/// Checks that the start state has outgoing rules.
fn check_valid_start_state(table: &TransitionTable) -> Result<(), AnalysisError> {
    if table.rules_for(table.start_state()).next().is_none() {
        return Err(AnalysisError::InvalidStartState(table.start_state()));
    }

    Ok(())
}

/// Checks that neither halting state has outgoing rules.
fn check_halting_states(table: &TransitionTable) -> Result<(), AnalysisError> {
    [table.accept_state(), table.reject_state()]
        .into_iter()
        .find(|&state| table.rules_for(state).next().is_some())
        .map_or(Ok(()), |state| Err(AnalysisError::HaltingStateHasRules(state)))
}

/// Checks that every rule targets a halting state or a state with rules of its own.
fn check_undefined_next_states(table: &TransitionTable) -> Result<(), AnalysisError> {
    let defined = table.states();

    let undefined: Vec<String> = table
        .rules()
        .filter(|(_, _, t)| !t.next_state.is_halting() && !defined.contains(&t.next_state))
        .map(|(state, symbol, t)| format!("{}[{:?}] -> {}", state, symbol, t.next_state))
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedNextStates(undefined));
    }

    Ok(())
}

/// Checks for unreachable states with a traversal from the start state.
///
/// Both halting states must be reachable as well: a table that can never accept or
/// never reject is as broken as one with dead states.
fn check_unreachable_states(table: &TransitionTable) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![table.start_state()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for (_, transition) in table.rules_for(state) {
            if !visited.contains(&transition.next_state) {
                queue.push(transition.next_state);
            }
        }
    }

    let mut all_states: BTreeSet<State> = table.states();
    all_states.insert(table.accept_state());
    all_states.insert(table.reject_state());

    let unreachable: Vec<State> = all_states
        .into_iter()
        .filter(|state| !visited.contains(state))
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that no rule reads a symbol outside the tape alphabet.
fn check_tape_symbols(table: &TransitionTable) -> Result<(), AnalysisError> {
    let alphabet = table.alphabet();
    let mut tape_symbols: HashSet<char> = alphabet.marked_symbols().collect();
    tape_symbols.insert(alphabet.blank);

    let foreign: BTreeSet<char> = table
        .rules()
        .map(|(_, symbol, _)| symbol)
        .filter(|symbol| !tape_symbols.contains(symbol))
        .collect();

    if !foreign.is_empty() {
        return Err(AnalysisError::InvalidTapeSymbols(foreign.into_iter().collect()));
    }

    Ok(())
}

/// Checks that every non-halting state handles each symbol that can legally be under
/// the head in its phase.
///
/// During the length check the tape holds only input symbols and blanks. Once the
/// class phases start, markers may appear anywhere on the tape.
fn check_symbol_coverage(table: &TransitionTable) -> Result<(), AnalysisError> {
    let alphabet = table.alphabet();

    for state in table.states() {
        let mut expected: Vec<char> = match state.phase() {
            Some(Phase::Length) => alphabet.input_symbols().collect(),
            Some(Phase::Class(_)) => alphabet.marked_symbols().collect(),
            None => continue,
        };
        expected.push(alphabet.blank);

        let mut missing: Vec<char> = expected
            .into_iter()
            .filter(|&symbol| table.transition(state, symbol).is_none())
            .collect();

        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return Err(AnalysisError::UncoveredSymbols(state, missing));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::builder::build;
    use crate::types::{CharClass, Direction, Transition};

    fn standard_table() -> TransitionTable {
        build(&Alphabet::standard()).unwrap()
    }

    fn transition(next_state: State) -> Transition {
        Transition {
            write: 'a',
            direction: Direction::Right,
            next_state,
        }
    }

    #[test]
    fn test_valid_table() {
        assert!(analyze(&standard_table()).is_ok());
    }

    #[test]
    fn test_invalid_start_state() {
        let mut table = standard_table();
        table
            .rules
            .retain(|&(state, _), _| state != State::START);

        assert_eq!(
            check_valid_start_state(&table),
            Err(AnalysisError::InvalidStartState(State::START))
        );
    }

    #[test]
    fn test_halting_state_with_rules() {
        let mut table = standard_table();
        table
            .rules
            .insert((State::Accept, 'a'), transition(State::Accept));

        assert_eq!(
            check_halting_states(&table),
            Err(AnalysisError::HaltingStateHasRules(State::Accept))
        );
    }

    #[test]
    fn test_undefined_next_states() {
        let mut table = standard_table();
        table
            .rules
            .retain(|&(state, _), _| state != State::Search(CharClass::Digit));

        let error = check_undefined_next_states(&table).unwrap_err();
        match error {
            AnalysisError::UndefinedNextStates(transitions) => {
                assert!(!transitions.is_empty());
                assert!(transitions.iter().all(|t| t.contains("q_find_num")));
            }
            _ => panic!("Expected UndefinedNextStates error"),
        }
    }

    #[test]
    fn test_unreachable_states() {
        let mut table = standard_table();
        // Redirect the end of the length phase straight to the uppercase rewind.
        table.rules.insert(
            (State::LengthOk, '_'),
            Transition {
                write: '_',
                direction: Direction::Left,
                next_state: State::Rewind(CharClass::Uppercase),
            },
        );

        assert_eq!(
            check_unreachable_states(&table),
            Err(AnalysisError::UnreachableStates(vec![
                State::Rewind(CharClass::Lowercase),
                State::Search(CharClass::Lowercase),
            ]))
        );
    }

    #[test]
    fn test_foreign_tape_symbols() {
        let mut table = standard_table();
        table
            .rules
            .insert((State::START, '€'), transition(State::Length(1)));

        assert_eq!(
            check_tape_symbols(&table),
            Err(AnalysisError::InvalidTapeSymbols(vec!['€']))
        );
    }

    #[test]
    fn test_uncovered_symbols() {
        let mut table = standard_table();
        let state = State::Rewind(CharClass::Special);
        table.rules.remove(&(state, 'ν'));
        table.rules.remove(&(state, 'q'));

        assert_eq!(
            check_symbol_coverage(&table),
            Err(AnalysisError::UncoveredSymbols(state, vec!['q', 'ν']))
        );
    }

    #[test]
    fn test_analysis_error_conversion() {
        let error = AnalysisError::UnreachableStates(vec![State::Search(CharClass::Uppercase)]);
        let tm_error: TuringMachineError = error.into();

        match tm_error {
            TuringMachineError::ValidationError(msg) => {
                assert!(msg.contains("Unreachable states detected"));
                assert!(msg.contains("q_find_upper"));
            }
            _ => panic!("Expected ValidationError"),
        }
    }

    #[test]
    fn test_analyze_reports_first_error() {
        let mut table = standard_table();
        table
            .rules
            .insert((State::Reject, '_'), transition(State::Reject));

        let result = analyze(&table);
        if let Err(TuringMachineError::ValidationError(msg)) = result {
            assert!(msg.contains("Halting state q_reject has outgoing rules"));
        } else {
            panic!("Expected ValidationError");
        }
    }
}
