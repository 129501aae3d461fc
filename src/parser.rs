//! This module provides the parser for alphabet profiles, utilizing the `pest` crate.
//! It defines the grammar for `.profile` files and functions to parse the input into an
//! [`Alphabet`].

use crate::{
    alphabet::{Alphabet, Markers, DEFAULT_BLANK_SYMBOL},
    types::{CharClass, TuringMachineError},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the profile grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct ProfileParser;

/// Parses the given input string into an `Alphabet`.
///
/// This is the main entry point for reading profile definitions. The parsed alphabet
/// is validated before being returned, so overlapping classes or markers are rejected
/// here rather than when a table is built.
///
/// # Arguments
///
/// * `input` - A string slice containing the profile definition.
///
/// # Returns
///
/// * `Ok(Alphabet)` if the input is successfully parsed and validated.
/// * `Err(TuringMachineError::ParseError)` if there are any syntax errors.
/// * `Err(TuringMachineError::ValidationError)` if a required section is missing.
/// * `Err(TuringMachineError::OverlappingSymbol)` or `Err(TuringMachineError::EmptyClass)`
///   if the alphabet is malformed.
pub fn parse(input: &str) -> Result<Alphabet, TuringMachineError> {
    let root = ProfileParser::parse(Rule::profile, input.trim())
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty profile".to_string()))?;

    let alphabet = parse_profile(root)?;
    alphabet.validate()?;

    Ok(alphabet)
}

/// Parses the top-level structure of a profile from a `Pair<Rule::profile>`.
fn parse_profile(pair: Pair<Rule>) -> Result<Alphabet, TuringMachineError> {
    let mut name: Option<String> = None;
    let mut blank: Option<char> = None;
    let mut markers: Option<Markers> = None;
    let mut classes: [Option<Vec<char>>; 4] = Default::default();
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();

        match p.as_rule() {
            Rule::name => {
                check_unique_section("name", span, &mut seen)?;
                name = Some(parse_inner_string(p, span)?.trim().to_string());
            }
            Rule::blank => {
                check_unique_section("blank", span, &mut seen)?;
                let mut pairs = p.into_inner();
                blank = Some(parse_symbol(next_pair(&mut pairs, span)?.as_str()));
            }
            Rule::markers => {
                check_unique_section("markers", span, &mut seen)?;
                markers = Some(parse_markers(p)?);
            }
            Rule::class => {
                let mut pairs = p.into_inner();
                let keyword = next_pair(&mut pairs, span)?.as_str();
                check_unique_section(keyword, span, &mut seen)?;

                let class = parse_class_name(keyword, span)?;
                let symbols = parse_symbols(next_pair(&mut pairs, span)?)?;
                classes[class_index(class)] = Some(symbols);
            }
            _ => {} // Skip EOI
        }
    }

    let [lowercase, uppercase, digits, specials] = classes;

    Ok(Alphabet {
        name: check_required_section(name, "name")?,
        blank: check_required_section(blank, "blank")?,
        lowercase: check_required_section(lowercase, "lowercase")?,
        uppercase: check_required_section(uppercase, "uppercase")?,
        digits: check_required_section(digits, "digits")?,
        specials: check_required_section(specials, "specials")?,
        markers: markers.unwrap_or_default(),
    })
}

/// Parses the four marker symbols, given in class order.
fn parse_markers(pair: Pair<Rule>) -> Result<Markers, TuringMachineError> {
    let span = pair.as_span();
    let symbols: Vec<char> = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| parse_symbol(p.as_str()))
        .collect();

    let symbols: [char; 4] = symbols
        .try_into()
        .map_err(|_| parse_error("Expected exactly four markers", span))?;

    Ok(Markers::from_array(symbols))
}

/// Parses a comma-separated list of symbols and inclusive ranges.
fn parse_symbols(pair: Pair<Rule>) -> Result<Vec<char>, TuringMachineError> {
    let mut symbols = Vec::new();

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::symbol => symbols.push(parse_symbol(item.as_str())),
            Rule::range => {
                let span = item.as_span();
                let mut pairs = item.into_inner();
                let start = parse_symbol(next_pair(&mut pairs, span)?.as_str());
                let end = parse_symbol(next_pair(&mut pairs, span)?.as_str());

                if start > end {
                    return Err(parse_error(
                        &format!("Invalid range: {start:?}..{end:?}"),
                        span,
                    ));
                }

                symbols.extend(start..=end);
            }
            _ => {}
        }
    }

    Ok(symbols)
}

/// Maps a class section keyword to its character class.
fn parse_class_name(keyword: &str, span: Span) -> Result<CharClass, TuringMachineError> {
    match keyword {
        "lowercase" => Ok(CharClass::Lowercase),
        "uppercase" => Ok(CharClass::Uppercase),
        "digits" => Ok(CharClass::Digit),
        "specials" => Ok(CharClass::Special),
        _ => Err(parse_error(
            &format!("Unsupported character class: {keyword}"),
            span,
        )),
    }
}

fn class_index(class: CharClass) -> usize {
    match class {
        CharClass::Lowercase => 0,
        CharClass::Uppercase => 1,
        CharClass::Digit => 2,
        CharClass::Special => 3,
    }
}

/// Parses a single character symbol, handling quoted and unquoted forms.
fn parse_symbol(input: &str) -> char {
    let mut chars = input.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('\''), Some(c), Some('\'')) => c,
        (Some(c), _, _) => c,
        (None, _, _) => DEFAULT_BLANK_SYMBOL,
    }
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Returns the next pair of a section, failing with a parse error if the grammar
/// produced fewer pairs than expected.
fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: Span<'i>,
) -> Result<Pair<'i, Rule>, TuringMachineError> {
    pairs
        .next()
        .ok_or_else(|| parse_error("Incomplete section", span))
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>, span: Span) -> Result<String, TuringMachineError> {
    let mut pairs = pair.into_inner();
    Ok(next_pair(&mut pairs, span)?.as_str().to_string())
}

/// Checks if a section has already been declared.
fn check_unique_section(
    keyword: &str,
    span: Span,
    seen: &mut HashSet<String>,
) -> Result<(), TuringMachineError> {
    if !seen.insert(keyword.to_string()) {
        return Err(parse_error(
            &format!("Duplicate \"{keyword}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_section<T>(value: Option<T>, name: &str) -> Result<T, TuringMachineError> {
    value.ok_or_else(|| TuringMachineError::ValidationError(format!("Missing '{name}' section")))
}
