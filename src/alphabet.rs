//! Symbol vocabulary of the password machine: the blank, the four input character
//! classes, and the markers written when a class is found.

use crate::types::{CharClass, TuringMachineError};
use serde::Serialize;
use std::collections::HashMap;

/// The blank symbol of the standard alphabet.
pub const DEFAULT_BLANK_SYMBOL: char = '_';
/// Markers used when a profile does not declare its own, in class order.
pub const DEFAULT_MARKERS: [char; 4] = ['λ', 'υ', 'ν', 'σ'];

/// Marker symbols, one per character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Markers {
    pub lowercase: char,
    pub uppercase: char,
    pub digit: char,
    pub special: char,
}

impl Markers {
    /// Builds markers from an array in class order.
    pub fn from_array([lowercase, uppercase, digit, special]: [char; 4]) -> Self {
        Self {
            lowercase,
            uppercase,
            digit,
            special,
        }
    }

    /// Returns the marker written when `class` is found.
    pub fn get(&self, class: CharClass) -> char {
        match class {
            CharClass::Lowercase => self.lowercase,
            CharClass::Uppercase => self.uppercase,
            CharClass::Digit => self.digit,
            CharClass::Special => self.special,
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self::from_array(DEFAULT_MARKERS)
    }
}

/// A complete symbol definition the rule-table builder works from.
///
/// The input alphabet is the union of the four classes. The tape alphabet adds the
/// blank and the markers. All of these must be pairwise disjoint, which
/// [`Alphabet::validate`] checks before any table is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alphabet {
    pub name: String,
    pub blank: char,
    pub lowercase: Vec<char>,
    pub uppercase: Vec<char>,
    pub digits: Vec<char>,
    pub specials: Vec<char>,
    pub markers: Markers,
}

impl Alphabet {
    /// ASCII letters and digits, a compact set of specials, `_` as blank.
    pub fn standard() -> Self {
        Self {
            name: "Standard".to_string(),
            blank: DEFAULT_BLANK_SYMBOL,
            lowercase: ('a'..='z').collect(),
            uppercase: ('A'..='Z').collect(),
            digits: ('0'..='9').collect(),
            specials: "!@#$%^&*()-+=?.".chars().collect(),
            markers: Markers::default(),
        }
    }

    /// Returns the symbols of one class.
    pub fn class(&self, class: CharClass) -> &[char] {
        match class {
            CharClass::Lowercase => &self.lowercase,
            CharClass::Uppercase => &self.uppercase,
            CharClass::Digit => &self.digits,
            CharClass::Special => &self.specials,
        }
    }

    /// Returns the marker written when `class` is found.
    pub fn marker(&self, class: CharClass) -> char {
        self.markers.get(class)
    }

    /// Returns the class a symbol belongs to, if it is part of the input alphabet.
    pub fn class_of(&self, symbol: char) -> Option<CharClass> {
        CharClass::ALL
            .into_iter()
            .find(|&class| self.class(class).contains(&symbol))
    }

    /// Checks if `symbol` is one of the four markers.
    pub fn is_marker(&self, symbol: char) -> bool {
        CharClass::ALL
            .into_iter()
            .any(|class| self.marker(class) == symbol)
    }

    /// All input symbols in class order.
    pub fn input_symbols(&self) -> impl Iterator<Item = char> + '_ {
        CharClass::ALL
            .into_iter()
            .flat_map(move |class| self.class(class).iter().copied())
    }

    /// All non-blank tape symbols: the input alphabet followed by the markers.
    pub fn marked_symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.input_symbols()
            .chain(CharClass::ALL.into_iter().map(move |class| self.marker(class)))
    }

    /// Verifies the partition invariant.
    ///
    /// Every class must be non-empty, and no symbol may serve two roles: the blank, a
    /// member of a class, and each marker are mutually exclusive. Repeating a symbol
    /// inside the same class is harmless and accepted.
    pub fn validate(&self) -> Result<(), TuringMachineError> {
        let mut roles: HashMap<char, String> = HashMap::new();
        roles.insert(self.blank, "blank".to_string());

        for class in CharClass::ALL {
            let symbols = self.class(class);
            if symbols.is_empty() {
                return Err(TuringMachineError::EmptyClass(class));
            }

            let role = class.to_string();
            for &symbol in symbols {
                claim(&mut roles, symbol, &role)?;
            }
        }

        for class in CharClass::ALL {
            claim(&mut roles, self.marker(class), &format!("{class} marker"))?;
        }

        Ok(())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Records `role` for `symbol`, failing if a different role already owns it.
fn claim(
    roles: &mut HashMap<char, String>,
    symbol: char,
    role: &str,
) -> Result<(), TuringMachineError> {
    match roles.get(&symbol) {
        Some(first) if first == role => Ok(()),
        Some(first) => Err(TuringMachineError::OverlappingSymbol {
            symbol,
            first: first.clone(),
            second: role.to_string(),
        }),
        None => {
            roles.insert(symbol, role.to_string());
            Ok(())
        }
    }
}
