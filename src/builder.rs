//! This module generates the password machine's transition table from an [`Alphabet`].
//!
//! The table has five phases. The length check consumes `MIN_LENGTH` symbols, runs to
//! the end of the input and steps back onto the last symbol. Then, for every character
//! class in turn, a rewind state walks left to the blank before the input and a search
//! state scans right for the first unmarked member of the class, overwriting it with the
//! class marker. Finding the last class accepts; running into the blank rejects.

use crate::alphabet::Alphabet;
use crate::analyzer::analyze;
use crate::table::TransitionTable;
use crate::types::{CharClass, Direction, State, Transition, TuringMachineError, MIN_LENGTH};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Builds the transition table for `alphabet`.
///
/// The alphabet is validated first, and the finished table is run through the
/// analyzer. Either failure is a construction error: no table is returned that could
/// misbehave at run time.
///
/// # Errors
///
/// * `TuringMachineError::EmptyClass` or `TuringMachineError::OverlappingSymbol` if the
///   alphabet is malformed.
/// * `TuringMachineError::ValidationError` if the generated table fails analysis.
pub fn build(alphabet: &Alphabet) -> Result<TransitionTable, TuringMachineError> {
    alphabet.validate()?;

    let mut builder = TableBuilder::new(alphabet);
    builder.add_length_phase();

    for class in CharClass::ALL {
        let found = class.next().map_or(State::Accept, State::Rewind);
        builder.add_rewind(class);
        builder.add_search(class, found);
    }

    let table = TransitionTable::new(alphabet.clone(), builder.rules);
    analyze(&table)?;

    tracing::debug!(
        profile = %alphabet.name,
        rules = table.len(),
        states = table.states().len(),
        "Built transition table"
    );

    Ok(table)
}

struct TableBuilder<'a> {
    alphabet: &'a Alphabet,
    rules: BTreeMap<(State, char), Transition>,
}

impl<'a> TableBuilder<'a> {
    fn new(alphabet: &'a Alphabet) -> Self {
        Self {
            alphabet,
            rules: BTreeMap::new(),
        }
    }

    /// Adds a rule unless one already exists for the key. Earlier rules win, which
    /// lets target rules take priority over the skip rules added after them.
    fn add(&mut self, state: State, read: char, write: char, direction: Direction, next: State) {
        if let Entry::Vacant(entry) = self.rules.entry((state, read)) {
            entry.insert(Transition {
                write,
                direction,
                next_state: next,
            });
        }
    }

    /// `q0..q7` count one input symbol each; `q_len_ok` runs to the end of the input.
    fn add_length_phase(&mut self) {
        let blank = self.alphabet.blank;
        let symbols: Vec<char> = self.alphabet.input_symbols().collect();

        for n in 0..MIN_LENGTH {
            let state = State::Length(n as u8);
            let next = if n + 1 < MIN_LENGTH {
                State::Length(n as u8 + 1)
            } else {
                State::LengthOk
            };

            for &symbol in &symbols {
                self.add(state, symbol, symbol, Direction::Right, next);
            }
            self.add(state, blank, blank, Direction::Stay, State::Reject);
        }

        for &symbol in &symbols {
            self.add(State::LengthOk, symbol, symbol, Direction::Right, State::LengthOk);
        }
        self.add(
            State::LengthOk,
            blank,
            blank,
            Direction::Left,
            State::Rewind(CharClass::ALL[0]),
        );
    }

    /// Walks left over everything, markers included, until the blank before the input.
    fn add_rewind(&mut self, class: CharClass) {
        let blank = self.alphabet.blank;
        let state = State::Rewind(class);
        let symbols: Vec<char> = self.alphabet.marked_symbols().collect();

        for symbol in symbols {
            self.add(state, symbol, symbol, Direction::Left, state);
        }
        self.add(state, blank, blank, Direction::Right, State::Search(class));
    }

    /// Marks the first member of `class` and moves on to `found`; skips everything else.
    fn add_search(&mut self, class: CharClass, found: State) {
        let blank = self.alphabet.blank;
        let state = State::Search(class);
        let marker = self.alphabet.marker(class);
        let targets = self.alphabet.class(class).to_vec();
        let symbols: Vec<char> = self.alphabet.marked_symbols().collect();

        for target in targets {
            self.add(state, target, marker, Direction::Right, found);
        }
        for symbol in symbols {
            self.add(state, symbol, symbol, Direction::Right, state);
        }
        self.add(state, blank, blank, Direction::Stay, State::Reject);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_table() -> TransitionTable {
        build(&Alphabet::standard()).unwrap()
    }

    #[test]
    fn test_build_standard_table() {
        let table = standard_table();
        let alphabet = Alphabet::standard();
        let inputs = alphabet.input_symbols().count();
        let marked = alphabet.marked_symbols().count();

        // Eight length states and q_len_ok read inputs plus blank; each of the eight
        // rewind/search states reads every marked symbol plus blank.
        assert_eq!(table.len(), 9 * (inputs + 1) + 8 * (marked + 1));
        assert_eq!(table.states().len(), 17);
        assert!(!table.states().contains(&State::Accept));
        assert!(!table.states().contains(&State::Reject));
    }

    #[test]
    fn test_length_phase_rules() {
        let table = standard_table();

        let t = table.transition(State::Length(0), 'x').unwrap();
        assert_eq!(t.next_state, State::Length(1));
        assert_eq!(t.write, 'x');
        assert_eq!(t.direction, Direction::Right);

        let t = table.transition(State::Length(7), '!').unwrap();
        assert_eq!(t.next_state, State::LengthOk);

        for n in 0..MIN_LENGTH as u8 {
            let t = table.transition(State::Length(n), '_').unwrap();
            assert_eq!(t.next_state, State::Reject);
            assert_eq!(t.direction, Direction::Stay);
        }

        let t = table.transition(State::LengthOk, '_').unwrap();
        assert_eq!(t.next_state, State::Rewind(CharClass::Lowercase));
        assert_eq!(t.direction, Direction::Left);

        // Markers cannot be on the tape yet.
        assert!(table.transition(State::Length(3), 'λ').is_none());
        assert!(table.transition(State::LengthOk, 'υ').is_none());
    }

    #[test]
    fn test_rewind_rules() {
        let table = standard_table();
        let state = State::Rewind(CharClass::Digit);

        for symbol in ['a', 'Z', '5', '%', 'λ', 'υ'] {
            let t = table.transition(state, symbol).unwrap();
            assert_eq!(t.next_state, state);
            assert_eq!(t.write, symbol);
            assert_eq!(t.direction, Direction::Left);
        }

        let t = table.transition(state, '_').unwrap();
        assert_eq!(t.next_state, State::Search(CharClass::Digit));
        assert_eq!(t.direction, Direction::Right);
    }

    #[test]
    fn test_search_rules() {
        let table = standard_table();
        let state = State::Search(CharClass::Uppercase);

        let t = table.transition(state, 'K').unwrap();
        assert_eq!(t.write, 'υ');
        assert_eq!(t.next_state, State::Rewind(CharClass::Digit));

        for symbol in ['k', '4', '#', 'λ', 'υ'] {
            let t = table.transition(state, symbol).unwrap();
            assert_eq!(t.next_state, state);
            assert_eq!(t.write, symbol);
            assert_eq!(t.direction, Direction::Right);
        }

        let t = table.transition(state, '_').unwrap();
        assert_eq!(t.next_state, State::Reject);
        assert_eq!(t.direction, Direction::Stay);
    }

    #[test]
    fn test_last_class_accepts() {
        let table = standard_table();
        let t = table
            .transition(State::Search(CharClass::Special), '?')
            .unwrap();
        assert_eq!(t.next_state, State::Accept);
        assert_eq!(t.write, 'σ');
    }

    #[test]
    fn test_build_is_idempotent() {
        assert_eq!(standard_table(), standard_table());
    }

    #[test]
    fn test_overlapping_alphabet_fails_to_build() {
        let mut alphabet = Alphabet::standard();
        alphabet.uppercase.push('7');
        assert!(matches!(
            build(&alphabet),
            Err(TuringMachineError::OverlappingSymbol { symbol: '7', .. })
        ));
    }

    #[test]
    fn test_legacy_b_blank_alphabet_fails_to_build() {
        let alphabet = Alphabet {
            name: "Legacy".to_string(),
            blank: 'B',
            lowercase: ('a'..='z').collect(),
            uppercase: ('A'..='Z').collect(),
            digits: ('0'..='9').collect(),
            specials: "!@#$%^&*()_+-=[]{}|;:,.<>?/`~".chars().collect(),
            markers: crate::alphabet::Markers::from_array(['l', 'u', 'n', 's']),
        };

        assert!(matches!(
            build(&alphabet),
            Err(TuringMachineError::OverlappingSymbol { symbol: 'B', .. })
        ));
    }

    #[test]
    fn test_no_rules_for_foreign_symbols() {
        let table = standard_table();
        for state in table.states() {
            assert!(table.transition(state, '€').is_none());
            assert!(table.transition(state, ' ').is_none());
        }
    }
}
