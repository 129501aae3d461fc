//! A single, unbounded tape with a read/write head.

use crate::types::Direction;
use serde::Serialize;
use std::fmt;

/// How many cells around the head a [`TapeWindow`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub before: usize,
    pub after: usize,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            before: 5,
            after: 20,
        }
    }
}

/// A tape that grows with blanks in both directions as the head moves.
///
/// Cells are stored left to right. `origin` is the logical position of the first cell,
/// so the first input symbol stays at position 0 no matter how often the tape has grown
/// to the left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
    origin: isize,
    blank: char,
    input_len: usize,
}

impl Tape {
    /// Creates a tape holding `input` with the head on its first symbol.
    /// An empty input yields a tape with a single blank cell.
    pub fn new(input: &str, blank: char) -> Self {
        let mut cells: Vec<char> = input.chars().collect();
        let input_len = cells.len();
        if cells.is_empty() {
            cells.push(blank);
        }

        Self {
            cells,
            head: 0,
            origin: 0,
            blank,
            input_len,
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: char) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell, extending the tape with a blank when it walks off an end.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    // Extend tape to the left
                    self.cells.insert(0, self.blank);
                    self.origin -= 1;
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push(self.blank);
                }
            }
            Direction::Stay => {}
        }
    }

    /// Returns the head as an index into [`Tape::cells`].
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the logical head position; the first input symbol is at 0.
    pub fn position(&self) -> isize {
        self.origin + self.head as isize
    }

    /// Returns the logical position of the first cell.
    pub fn origin(&self) -> isize {
        self.origin
    }

    /// Checks if the head is on a cell that held part of the input.
    ///
    /// Rules never write the blank inside the input span, so a blank read there
    /// was part of the input itself.
    pub fn in_input(&self) -> bool {
        usize::try_from(self.position()).is_ok_and(|position| position < self.input_len)
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cells around the head, at most `window.before` to the left and
    /// `window.after` to the right.
    pub fn snapshot(&self, window: Window) -> TapeWindow {
        let start = self.head.saturating_sub(window.before);
        let end = self
            .head
            .saturating_add(window.after)
            .saturating_add(1)
            .min(self.cells.len());

        TapeWindow {
            cells: self.cells[start..end].to_vec(),
            head: self.head - start,
            start: self.origin + start as isize,
            truncated_left: start > 0,
            truncated_right: end < self.cells.len(),
        }
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// A bounded view of the tape around the head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TapeWindow {
    pub cells: Vec<char>,
    /// Offset of the head within `cells`.
    pub head: usize,
    /// Logical position of `cells[0]`.
    pub start: isize,
    pub truncated_left: bool,
    pub truncated_right: bool,
}

impl TapeWindow {
    /// Returns the logical position of the head.
    pub fn position(&self) -> isize {
        self.start + self.head as isize
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> Option<char> {
        self.cells.get(self.head).copied()
    }
}

impl fmt::Display for TapeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.truncated_left {
            write!(f, "... ")?;
        }
        for (i, c) in self.cells.iter().enumerate() {
            if i == self.head {
                write!(f, "[{c}]")?;
            } else {
                write!(f, " {c} ")?;
            }
        }
        if self.truncated_right {
            write!(f, " ...")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape() {
        let tape = Tape::new("abc", '_');
        assert_eq!(tape.cells(), &['a', 'b', 'c']);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), 'a');
        assert_eq!(tape.position(), 0);
    }

    #[test]
    fn test_empty_input_is_single_blank() {
        let tape = Tape::new("", '_');
        assert_eq!(tape.cells(), &['_']);
        assert_eq!(tape.read(), '_');
        assert!(!tape.is_empty());
    }

    #[test]
    fn test_write_and_shift() {
        let mut tape = Tape::new("ab", '_');
        tape.write('x');
        tape.shift(Direction::Right);
        assert_eq!(tape.read(), 'b');
        tape.shift(Direction::Stay);
        assert_eq!(tape.head(), 1);
        assert_eq!(tape.to_string(), "xb");
    }

    #[test]
    fn test_grows_right() {
        let mut tape = Tape::new("a", '_');
        tape.shift(Direction::Right);
        assert_eq!(tape.cells(), &['a', '_']);
        assert_eq!(tape.read(), '_');
        assert_eq!(tape.position(), 1);
    }

    #[test]
    fn test_grows_left() {
        let mut tape = Tape::new("ab", '_');
        tape.shift(Direction::Left);
        assert_eq!(tape.cells(), &['_', 'a', 'b']);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), '_');
        assert_eq!(tape.position(), -1);
        assert_eq!(tape.origin(), -1);

        tape.shift(Direction::Right);
        assert_eq!(tape.read(), 'a');
        assert_eq!(tape.position(), 0);
    }

    #[test]
    fn test_in_input() {
        let mut tape = Tape::new("ab", '_');
        assert!(tape.in_input());
        tape.shift(Direction::Right);
        assert!(tape.in_input());
        tape.shift(Direction::Right);
        assert!(!tape.in_input());

        tape.shift(Direction::Left);
        tape.shift(Direction::Left);
        tape.shift(Direction::Left);
        assert_eq!(tape.position(), -1);
        assert!(!tape.in_input());

        let tape = Tape::new("", '_');
        assert!(!tape.in_input());
    }

    #[test]
    fn test_tape_never_shrinks() {
        let mut tape = Tape::new("a", '_');
        tape.shift(Direction::Left);
        tape.shift(Direction::Right);
        tape.shift(Direction::Right);
        tape.shift(Direction::Left);
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_snapshot_window() {
        let mut tape = Tape::new("abcdefghij", '_');
        for _ in 0..6 {
            tape.shift(Direction::Right);
        }

        let window = tape.snapshot(Window {
            before: 2,
            after: 1,
        });
        assert_eq!(window.cells, vec!['e', 'f', 'g', 'h']);
        assert_eq!(window.head, 2);
        assert_eq!(window.start, 4);
        assert_eq!(window.position(), 6);
        assert_eq!(window.symbol(), Some('g'));
        assert!(window.truncated_left);
        assert!(window.truncated_right);
        assert_eq!(window.to_string(), "...  e  f [g] h  ...");
    }

    #[test]
    fn test_snapshot_at_edges() {
        let mut tape = Tape::new("ab", '_');
        tape.shift(Direction::Left);

        let window = tape.snapshot(Window::default());
        assert_eq!(window.cells, vec!['_', 'a', 'b']);
        assert_eq!(window.head, 0);
        assert_eq!(window.start, -1);
        assert!(!window.truncated_left);
        assert!(!window.truncated_right);
        assert_eq!(window.to_string(), "[_] a  b ");
    }
}
