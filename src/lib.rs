//! This crate provides a password-strength validator implemented as a deterministic,
//! single-tape Turing machine.
//! It includes modules for defining symbol alphabets, generating and analyzing the rule
//! table, running the machine over a password, and managing a collection of named
//! alphabet profiles.

pub mod alphabet;
pub mod analyzer;
pub mod builder;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod profiles;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the alphabet definition and its defaults.
pub use alphabet::{Alphabet, Markers, DEFAULT_BLANK_SYMBOL, DEFAULT_MARKERS};
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the rule-table builder.
pub use builder::build;
/// Re-exports the table listing function.
pub use encoder::encode;
/// Re-exports the `ProfileLoader` struct from the loader module.
pub use loader::ProfileLoader;
/// Re-exports the machine, its run summary, and the one-shot `validate` helper.
pub use machine::{validate, Execution, TuringMachine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProfileInfo` and `ProfileManager` from the profiles module.
pub use profiles::{ProfileInfo, ProfileManager, DEFAULT_PROFILE};
pub use table::TransitionTable;
pub use tape::{Tape, TapeWindow, Window};
pub use trace::{Action, TraceEntry};
/// Re-exports the state vocabulary, outcomes, and errors from the types module.
pub use types::{
    CharClass, Direction, Halt, Phase, Rejection, State, Step, Transition, TuringMachineError,
    MAX_EXECUTION_STEPS, MIN_LENGTH,
};
