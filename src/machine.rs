//! This module defines the `TuringMachine` struct, which runs a shared transition table
//! against one input. It owns the per-run configuration: current state, tape, step
//! counter, and trace.

use crate::table::TransitionTable;
use crate::tape::{Tape, Window};
use crate::trace::{Action, TraceEntry};
use crate::types::{Halt, Phase, Rejection, State, Step, MAX_EXECUTION_STEPS};
use serde::Serialize;

/// The configuration of a single run over a borrowed [`TransitionTable`].
///
/// Every validation gets its own machine. The table is only read, so any number of
/// machines can run over the same table at once, while a machine itself is never
/// reused for a second input.
pub struct TuringMachine<'t> {
    table: &'t TransitionTable,
    state: State,
    tape: Tape,
    step_count: usize,
    step_limit: usize,
    window: Window,
    trace: Vec<TraceEntry>,
    outcome: Option<Halt>,
}

impl<'t> TuringMachine<'t> {
    /// Creates a machine in the start state with `input` on the tape and the head on
    /// its first symbol.
    pub fn new(table: &'t TransitionTable, input: &str) -> Self {
        Self {
            table,
            state: table.start_state(),
            tape: Tape::new(input, table.blank()),
            step_count: 0,
            step_limit: MAX_EXECUTION_STEPS,
            window: Window::default(),
            trace: Vec::new(),
            outcome: None,
        }
    }

    /// Overrides the number of rules applied before the run is forcibly rejected.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// Overrides the tape window recorded with each trace entry.
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Executes a single step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a rule was applied. This includes the rule that enters a
    ///   halting state; the following call reports the halt.
    /// * `Step::Halt(_)` if the machine is already halted, has no rule for the symbol
    ///   under the head, or has used up its step limit.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.outcome {
            return Step::Halt(halt);
        }

        if self.step_count >= self.step_limit {
            let limit = self.step_limit;
            tracing::warn!(limit, state = %self.state, "Step limit exceeded, forcing reject");
            self.record(Action::StepLimitExceeded { limit });
            return self.halt(Rejection::StepLimit { limit });
        }

        let read = self.tape.read();
        // A blank inside the input span was typed, not reached.
        let rule = if read == self.tape.blank() && self.tape.in_input() {
            None
        } else {
            self.table.transition(self.state, read)
        };

        let Some(&transition) = rule else {
            tracing::warn!(
                state = %self.state,
                symbol = ?read,
                "No transition defined, rejecting"
            );
            self.record(Action::UndefinedTransition { read });
            return self.halt(Rejection::UndefinedTransition {
                state: self.state,
                symbol: read,
            });
        };

        self.record(Action::Transition {
            read,
            write: transition.write,
            direction: transition.direction,
            next_state: transition.next_state,
        });

        self.tape.write(transition.write);
        self.tape.shift(transition.direction);

        let from = self.state;
        self.state = transition.next_state;
        self.step_count += 1;

        self.outcome = match self.state {
            State::Accept => Some(Halt::Accept),
            State::Reject => Some(Halt::Reject(Rejection::ByRule { state: from })),
            _ => None,
        };

        Step::Continue
    }

    /// Runs the machine until it halts. The step limit guarantees termination.
    pub fn run(&mut self) -> Halt {
        loop {
            if let Step::Halt(halt) = self.step() {
                return halt;
            }
        }
    }

    /// Runs the machine to completion and returns the result of the run.
    pub fn execute(mut self) -> Execution {
        let outcome = self.run();

        tracing::debug!(
            accepted = outcome == Halt::Accept,
            steps = self.step_count,
            state = %self.state,
            "Run finished"
        );

        Execution {
            accepted: outcome == Halt::Accept,
            outcome,
            steps: self.step_count,
            tape: self.tape.to_string(),
            head: self.tape.head(),
            origin: self.tape.origin(),
            trace: self.trace,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the number of rules applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks if the machine has reached a halting state.
    pub fn is_halted(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the verdict once the machine has halted.
    pub fn outcome(&self) -> Option<Halt> {
        self.outcome
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    fn record(&mut self, action: Action) {
        self.trace.push(TraceEntry {
            step: self.step_count,
            state: self.state,
            action,
            tape: self.tape.snapshot(self.window),
        });
    }

    fn halt(&mut self, rejection: Rejection) -> Step {
        let halt = Halt::Reject(rejection);
        self.state = State::Reject;
        self.outcome = Some(halt);
        Step::Halt(halt)
    }
}

/// The result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    /// True iff the run halted in the accept state.
    pub accepted: bool,
    pub outcome: Halt,
    /// Number of rules applied.
    pub steps: usize,
    pub trace: Vec<TraceEntry>,
    /// Final tape contents.
    pub tape: String,
    /// Final head position, counted in characters of `tape` (not bytes; markers are
    /// usually multi-byte).
    pub head: usize,
    /// Logical position of the first character of `tape`; negative once the tape
    /// has grown to the left of the input.
    pub origin: isize,
}

impl Execution {
    /// Returns why the run was rejected, if it was.
    pub fn rejection(&self) -> Option<Rejection> {
        match self.outcome {
            Halt::Accept => None,
            Halt::Reject(rejection) => Some(rejection),
        }
    }

    /// Returns the state in which a rejected run failed.
    pub fn rejected_in(&self) -> Option<State> {
        match self.rejection()? {
            Rejection::ByRule { state } | Rejection::UndefinedTransition { state, .. } => {
                Some(state)
            }
            Rejection::StepLimit { .. } => self.trace.last().map(|entry| entry.state),
        }
    }

    /// Returns the validation phase in which a rejected run failed.
    pub fn failed_phase(&self) -> Option<Phase> {
        self.rejected_in()?.phase()
    }

    /// Returns the final tape as characters. `head` indexes into this.
    pub fn tape_symbols(&self) -> Vec<char> {
        self.tape.chars().collect()
    }

    /// Returns the symbol under the head when the run halted.
    pub fn head_symbol(&self) -> Option<char> {
        self.tape.chars().nth(self.head)
    }
}

/// Runs `input` through `table` with a fresh machine.
pub fn validate(table: &TransitionTable, input: &str) -> Execution {
    TuringMachine::new(table, input).execute()
}
