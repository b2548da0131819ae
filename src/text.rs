use std::fmt::Display;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::prelude::*;

mod description;
pub use description::{
    AutomatonDescription, ConversionRequest, ConversionResponse, DescriptionError,
};

lazy_static! {
    /// `state,symbol -> target` where `->` may also be written `→`. States consist of word
    /// characters only, the symbol is whatever sits between the first comma and the arrow.
    static ref TRANSITION_LINE: Regex =
        Regex::new(r"^\s*([A-Za-z0-9_]+)\s*,\s*(.+?)\s*(?:->|→)\s*([A-Za-z0-9_]+)\s*$")
            .expect("transition line pattern is valid");
}

/// A line of a transition table that could not be understood and was therefore ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseWarning {
    /// The 1-based number of the offending line.
    pub line: usize,
    /// The line as it was given.
    pub text: String,
    /// What is wrong with the line.
    pub reason: String,
}

impl ParseWarning {
    fn new(line: usize, text: &str) -> Self {
        let reason = if !text.contains("->") && !text.contains('→') {
            "missing arrow"
        } else if !text.contains(',') {
            "missing comma between state and symbol"
        } else {
            "expected state,symbol -> target with letters, digits and underscores in state names"
        };
        Self {
            line,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ignoring line {} \"{}\": {}",
            self.line,
            self.text.trim(),
            self.reason
        )
    }
}

/// The result of [`parse_transitions`]: the table built from all well-formed lines and a warning
/// for every line that was ignored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedTransitions {
    /// The transitions.
    pub table: TransitionTable,
    /// One warning per ignored line, in line order.
    pub warnings: Vec<ParseWarning>,
}

/// Splits a comma separated list, trimming every element and dropping the empty ones. Commas
/// that are nested inside braces or parentheses do not split, so `qfrozenset({0, 1}), q2` has
/// two elements.
pub fn parse_list(text: &str) -> Vec<String> {
    let mut out = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (pos, c) in text.char_indices() {
        match c {
            '{' | '(' => depth += 1,
            '}' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(&text[start..pos]);
                start = pos + c.len_utf8();
            }
            _ => {}
        }
    }
    out.push(&text[start..]);
    out.into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses one transition per line. Every line of the form `state,symbol -> target` (or with `→`)
/// adds `target` to the destinations of `(state, symbol)`, so repeating a pair accumulates
/// destinations. Blank lines are skipped and every other line is ignored with a [`ParseWarning`].
pub fn parse_transitions(text: &str) -> ParsedTransitions {
    let mut parsed = ParsedTransitions::default();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match TRANSITION_LINE.captures(line) {
            Some(caps) => {
                parsed.table.accumulate(&caps[1], &caps[2], &caps[3]);
            }
            None => {
                trace!("ignoring malformed transition line {}: {line}", number + 1);
                parsed.warnings.push(ParseWarning::new(number + 1, line));
            }
        }
    }
    parsed
}

/// Formats `table` with one `state,symbol → target` line per destination, in table order. Parsing
/// the output with [`parse_transitions`] gives back an equivalent table.
pub fn format_transitions(table: &TransitionTable) -> String {
    table
        .triples()
        .map(|(from, symbol, to)| format!("{from},{symbol} → {to}"))
        .join("\n")
}
