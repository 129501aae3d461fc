//! Structured execution trace records and their text rendering.

use crate::tape::TapeWindow;
use crate::types::{Direction, State};
use serde::Serialize;
use std::fmt;

/// What the machine did in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// A rule was applied.
    Transition {
        read: char,
        write: char,
        direction: Direction,
        next_state: State,
    },
    /// No rule exists for the state and the symbol read; the machine rejected.
    UndefinedTransition { read: char },
    /// The step limit was reached; the machine was forced into the reject state.
    StepLimitExceeded { limit: usize },
}

/// One step of a run: the state before the step, the action taken, and the tape
/// around the head before the action was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub step: usize,
    pub state: State,
    pub action: Action,
    pub tape: TapeWindow,
}

impl TraceEntry {
    /// Renders the action as a single line, e.g. `δ(q0, a) → (q1, a, R)`.
    pub fn describe(&self) -> String {
        match self.action {
            Action::Transition {
                read,
                write,
                direction,
                next_state,
            } => format!(
                "δ({}, {}) → ({}, {}, {})",
                self.state, read, next_state, write, direction
            ),
            Action::UndefinedTransition { read } => format!(
                "no transition defined for ({}, {}), moving to {}",
                self.state,
                read,
                State::Reject
            ),
            Action::StepLimitExceeded { limit } => format!(
                "exceeded {} steps, moving to {}",
                limit,
                State::Reject
            ),
        }
    }

    /// Checks if this step moved the machine into a halting state.
    pub fn is_halting(&self) -> bool {
        match self.action {
            Action::Transition { next_state, .. } => next_state.is_halting(),
            Action::UndefinedTransition { .. } | Action::StepLimitExceeded { .. } => true,
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "#{:<4} State: {:<16} | {}",
            self.step,
            self.state.to_string(),
            self.describe()
        )?;
        write!(f, "      Tape : {}", self.tape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CharClass;

    fn window() -> TapeWindow {
        TapeWindow {
            cells: vec!['_', 'a', 'B'],
            head: 1,
            start: -1,
            truncated_left: false,
            truncated_right: false,
        }
    }

    #[test]
    fn test_describe_transition() {
        let entry = TraceEntry {
            step: 12,
            state: State::Search(CharClass::Lowercase),
            action: Action::Transition {
                read: 'a',
                write: 'λ',
                direction: Direction::Right,
                next_state: State::Rewind(CharClass::Uppercase),
            },
            tape: window(),
        };

        assert_eq!(
            entry.describe(),
            "δ(q_find_lower, a) → (q_rewind_upper, λ, R)"
        );
        assert!(!entry.is_halting());

        let rendered = entry.to_string();
        assert!(rendered.starts_with("#12   State: q_find_lower"));
        assert!(rendered.ends_with("Tape :  _ [a] B "));
    }

    #[test]
    fn test_describe_rejections() {
        let gap = TraceEntry {
            step: 3,
            state: State::Length(3),
            action: Action::UndefinedTransition { read: '€' },
            tape: window(),
        };
        assert_eq!(
            gap.describe(),
            "no transition defined for (q3, €), moving to q_reject"
        );
        assert!(gap.is_halting());

        let limit = TraceEntry {
            step: 1000,
            state: State::LengthOk,
            action: Action::StepLimitExceeded { limit: 1000 },
            tape: window(),
        };
        assert_eq!(limit.describe(), "exceeded 1000 steps, moving to q_reject");
        assert!(limit.is_halting());
    }

    #[test]
    fn test_serialize_entry() {
        let entry = TraceEntry {
            step: 0,
            state: State::START,
            action: Action::Transition {
                read: 'a',
                write: 'a',
                direction: Direction::Right,
                next_state: State::Length(1),
            },
            tape: window(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["state"], "q0");
        assert_eq!(value["action"]["kind"], "transition");
        assert_eq!(value["action"]["next_state"], "q1");
        assert_eq!(value["action"]["direction"], "Right");
        assert_eq!(value["tape"]["head"], 1);
        assert_eq!(value["tape"]["start"], -1);
    }
}
