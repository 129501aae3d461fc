//! This module defines the core data structures and types used throughout the password
//! machine, including the state vocabulary, transition rules, halting outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The minimum password length enforced by the length-check phase.
pub const MIN_LENGTH: usize = 8;
/// The maximum number of steps to execute before a run is forcibly rejected.
pub const MAX_EXECUTION_STEPS: usize = 1000;

/// One of the four character classes a password must contain.
///
/// The declaration order is also the order in which the search phases run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl CharClass {
    /// All classes in search order.
    pub const ALL: [CharClass; 4] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digit,
        CharClass::Special,
    ];

    /// Returns the class searched after this one, or `None` for the last class.
    pub fn next(self) -> Option<CharClass> {
        match self {
            CharClass::Lowercase => Some(CharClass::Uppercase),
            CharClass::Uppercase => Some(CharClass::Digit),
            CharClass::Digit => Some(CharClass::Special),
            CharClass::Special => None,
        }
    }

    /// Short label used in state names (`q_find_lower`, `q_rewind_num`, ...).
    pub fn label(self) -> &'static str {
        match self {
            CharClass::Lowercase => "lower",
            CharClass::Uppercase => "upper",
            CharClass::Digit => "num",
            CharClass::Special => "spec",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharClass::Lowercase => "lowercase",
            CharClass::Uppercase => "uppercase",
            CharClass::Digit => "digit",
            CharClass::Special => "special",
        };
        f.write_str(name)
    }
}

/// A control state of the password machine.
///
/// `Length(n)` counts the symbols consumed so far (`0..MIN_LENGTH`). Each character
/// class owns a rewind state and a search state. `Accept` and `Reject` halt the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum State {
    Length(u8),
    LengthOk,
    Rewind(CharClass),
    Search(CharClass),
    Accept,
    Reject,
}

impl State {
    /// The single start state.
    pub const START: State = State::Length(0);

    /// Checks if the state is one of the two halting states.
    pub fn is_halting(self) -> bool {
        matches!(self, State::Accept | State::Reject)
    }

    /// Returns the validation phase the state belongs to. Halting states have none.
    pub fn phase(self) -> Option<Phase> {
        match self {
            State::Length(_) | State::LengthOk => Some(Phase::Length),
            State::Rewind(class) | State::Search(class) => Some(Phase::Class(class)),
            State::Accept | State::Reject => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Length(n) => write!(f, "q{n}"),
            State::LengthOk => f.write_str("q_len_ok"),
            State::Rewind(class) => write!(f, "q_rewind_{}", class.label()),
            State::Search(class) => write!(f, "q_find_{}", class.label()),
            State::Accept => f.write_str("q_accept"),
            State::Reject => f.write_str("q_reject"),
        }
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        state.to_string()
    }
}

/// One of the five validation phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Minimum length check (`q0..q7` and `q_len_ok`).
    Length,
    /// Rewind and search for one character class.
    Class(CharClass),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Length => f.write_str("length check"),
            Phase::Class(class) => write!(f, "{class} search"),
        }
    }
}

/// Represents the possible directions the tape head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Stay => "S",
        })
    }
}

/// The right-hand side of a transition rule: what to write, where to move, and
/// which state to enter. The left-hand side `(State, char)` is the table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub write: char,
    pub direction: Direction,
    pub next_state: State,
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The machine applied a rule and continues execution.
    Continue,
    /// The machine has reached a halting state.
    Halt(Halt),
}

/// The verdict of a halted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Halt {
    Accept,
    Reject(Rejection),
}

/// Why a run ended in the reject state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum Rejection {
    /// An explicit rule fired in `state` and moved the machine into the reject state.
    ByRule { state: State },
    /// No rule exists for the state and the symbol under the head.
    UndefinedTransition { state: State, symbol: char },
    /// The run exceeded the step limit.
    StepLimit { limit: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ByRule { state } => match state.phase() {
                Some(phase) => write!(f, "failed during {phase} ({state})"),
                None => write!(f, "rejected by {state}"),
            },
            Rejection::UndefinedTransition { state, symbol } => {
                write!(f, "no transition defined for ({state}, {symbol:?})")
            }
            Rejection::StepLimit { limit } => write!(f, "exceeded {limit} steps"),
        }
    }
}

/// Represents the errors that can occur while defining or building a password machine.
///
/// Runtime rejections are not errors; see [`Rejection`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A symbol is claimed by two roles (two classes, a class and the blank, a marker...).
    #[error("Symbol {symbol:?} is used as both {first} and {second}")]
    OverlappingSymbol {
        symbol: char,
        first: String,
        second: String,
    },
    /// A character class has no symbols.
    #[error("Character class {0} is empty")]
    EmptyClass(CharClass),
    /// Indicates an error during the parsing of an alphabet profile.
    #[error("Profile parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structural problem with a profile or a generated table.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading profile files.
    #[error("File error: {0}")]
    FileError(String),
    /// No embedded profile has the requested name.
    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}
