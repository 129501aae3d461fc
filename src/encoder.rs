//! This module renders a generated rule table as a human-readable listing, in the same
//! `state:` / `read -> write, direction, next` layout used throughout the crate's
//! documentation.

use crate::table::TransitionTable;
use std::fmt::Write;

/// Encodes a rule table into a text listing.
///
/// Format:
/// - `name:` and `blank:` header lines taken from the table's alphabet.
/// - A `rules:` section with one `  <state>:` block per state, in table order.
/// - One `    <read> -> <write>, <L|R|S>, <next>` line per rule.
///
/// Halting states are listed with an empty block. Symbols that would be ambiguous in
/// the listing (whitespace, `,`, `#` and `'`) are quoted.
pub fn encode(table: &TransitionTable) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "name: {}", table.alphabet().name);
    let _ = writeln!(output, "blank: {}", quote(table.blank()));
    let _ = writeln!(output, "rules:");

    let mut states = table.states();
    states.insert(table.accept_state());
    states.insert(table.reject_state());

    for state in states {
        let _ = writeln!(output, "  {state}:");

        for (read, transition) in table.rules_for(state) {
            let _ = writeln!(
                output,
                "    {} -> {}, {}, {}",
                quote(read),
                quote(transition.write),
                transition.direction,
                transition.next_state
            );
        }
    }

    output
}

/// Quotes a symbol if it would otherwise be mistaken for listing syntax.
fn quote(symbol: char) -> String {
    if symbol.is_whitespace() || matches!(symbol, ',' | '#' | '\'') {
        format!("'{symbol}'")
    } else {
        symbol.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::builder::build;

    #[test]
    fn test_encode_header() {
        let table = build(&Alphabet::standard()).unwrap();
        let encoded = encode(&table);

        assert!(encoded.starts_with("name: Standard\nblank: _\nrules:\n  q0:\n"));
    }

    #[test]
    fn test_encode_rules() {
        let table = build(&Alphabet::standard()).unwrap();
        let encoded = encode(&table);

        assert!(encoded.contains("  q0:\n    ! -> !, R, q1\n"));
        assert!(encoded.contains("    _ -> _, S, q_reject\n"));
        assert!(encoded.contains("    _ -> _, L, q_rewind_lower\n"));
        assert!(encoded.contains("    a -> λ, R, q_rewind_upper\n"));
        assert!(encoded.contains("    '#' -> σ, R, q_accept\n"));
        assert!(encoded.contains("  q_accept:\n"));
        assert!(encoded.ends_with("  q_reject:\n"));

        let rule_lines = encoded.lines().filter(|line| line.contains(" -> ")).count();
        assert_eq!(rule_lines, table.len());
    }

    #[test]
    fn test_encode_is_stable() {
        let table = build(&Alphabet::standard()).unwrap();
        assert_eq!(encode(&table), encode(&table.clone()));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote('a'), "a");
        assert_eq!(quote(','), "','");
        assert_eq!(quote(' '), "' '");
        assert_eq!(quote('\''), "'''");
        assert_eq!(quote('□'), "□");
    }
}
