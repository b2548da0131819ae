use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, warn};

use crate::prelude::*;

/// Errors that prevent an [`AutomatonDescription`] from being turned into an [`Automaton`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DescriptionError {
    /// Braces or parentheses in the named field do not match up.
    #[error("unbalanced braces in field {field}")]
    UnbalancedBraces {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The initial state field is empty.
    #[error("no initial state given")]
    MissingInitialState,
    /// The initial state field lists more than one state.
    #[error("expected a single initial state but found {}", .0.join(", "))]
    AmbiguousInitialState(Vec<String>),
}

/// The textual form of an automaton as it is produced by the regex conversion service. All fields
/// are plain text: lists are comma separated and transitions use one `state,symbol → target` line
/// each.
///
/// States that were synthesized by a subset construction are written as `qfrozenset({0, 1})`,
/// nondeterministic destinations as set literals like `q{1, 2}`. Both are decoded by
/// [`Self::to_automaton`].
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutomatonDescription {
    /// Comma separated states.
    #[cfg_attr(feature = "serde", serde(rename = "States"))]
    pub states: String,
    /// Comma separated symbols.
    #[cfg_attr(feature = "serde", serde(rename = "Alphabet"))]
    pub alphabet: String,
    /// The initial state.
    #[cfg_attr(feature = "serde", serde(rename = "Initial_State"))]
    pub initial_state: String,
    /// Comma separated accepting states.
    #[cfg_attr(feature = "serde", serde(rename = "Accepting_States"))]
    pub accepting_states: String,
    /// One transition per line.
    #[cfg_attr(feature = "serde", serde(rename = "Transitions"))]
    pub transitions: String,
}

impl AutomatonDescription {
    /// Decodes `self` into an automaton of the given `kind`.
    ///
    /// Subset states `qfrozenset({a, b})` become `q_a_b` (and `qfrozenset()` becomes `q_empty`)
    /// wherever they occur as declared states. A destination set `q{a, b}` adds the destinations
    /// `qa` and `qb`, and so does a `qfrozenset({a, b})` destination that is not a declared state.
    /// Transitions on the empty symbol cannot be simulated and are dropped with a warning, as are
    /// lines that do not parse.
    pub fn to_automaton(&self, kind: AutomatonKind) -> Result<Automaton, DescriptionError> {
        for (field, text) in [
            ("States", &self.states),
            ("Alphabet", &self.alphabet),
            ("Initial_State", &self.initial_state),
            ("Accepting_States", &self.accepting_states),
            ("Transitions", &self.transitions),
        ] {
            if !balanced(text) {
                return Err(DescriptionError::UnbalancedBraces { field });
            }
        }

        let initial = match parse_list(&self.initial_state).as_slice() {
            [] => return Err(DescriptionError::MissingInitialState),
            [single] => state_name(single),
            many => return Err(DescriptionError::AmbiguousInitialState(many.to_vec())),
        };

        let states: OrderedSet<StateName> = parse_list(&self.states)
            .iter()
            .map(|q| state_name(q))
            .collect();
        let lines = self
            .transitions
            .lines()
            .filter_map(|line| canonical_line(&line.replace("â†’", "→"), &states))
            .join("\n");
        let parsed = parse_transitions(&lines);
        for warning in &parsed.warnings {
            warn!("{warning}");
        }

        let automaton = Automaton::new(
            kind,
            states,
            parse_list(&self.alphabet).into_iter().map(unquote),
            parsed.table,
            initial,
            parse_list(&self.accepting_states)
                .iter()
                .map(|q| state_name(q)),
        );
        debug!("decoded {}", automaton.show());
        Ok(automaton)
    }
}

/// The answer of the conversion service: the same language as a DFA and as an NFA.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionResponse {
    /// The deterministic automaton.
    pub dfa: AutomatonDescription,
    /// The nondeterministic automaton.
    pub nfa: AutomatonDescription,
}

impl ConversionResponse {
    /// Decodes both descriptions, the first element is the DFA and the second the NFA.
    pub fn automata(&self) -> Result<(Automaton, Automaton), DescriptionError> {
        Ok((
            self.dfa.to_automaton(AutomatonKind::Dfa)?,
            self.nfa.to_automaton(AutomatonKind::Nfa)?,
        ))
    }
}

/// What is sent to the conversion service, either a regular expression or a description in
/// natural language.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ConversionRequest {
    /// Convert a regular expression.
    Regex {
        /// The expression.
        regex: String,
    },
    /// Convert a description in natural language.
    Description {
        /// The description.
        description: String,
    },
}

impl ConversionRequest {
    /// A request to convert the regular expression `regex`.
    pub fn regex(regex: impl Into<String>) -> Self {
        Self::Regex {
            regex: regex.into(),
        }
    }

    /// A request to convert the natural language `description`.
    pub fn description(description: impl Into<String>) -> Self {
        Self::Description {
            description: description.into(),
        }
    }
}

fn balanced(text: &str) -> bool {
    let mut open = vec![];
    for c in text.chars() {
        match c {
            '{' | '(' => open.push(c),
            '}' if open.pop() != Some('{') => return false,
            ')' if open.pop() != Some('(') => return false,
            _ => {}
        }
    }
    open.is_empty()
}

fn unquote(token: String) -> String {
    token.trim_matches(|c| c == '\'' || c == '"').to_string()
}

/// The elements of `{a, b}` or `set()`-like literals, `None` if `text` is neither.
fn set_elements(text: &str) -> Option<Vec<String>> {
    let inner = if let Some(inner) = text.strip_prefix('{') {
        inner.strip_suffix('}')?
    } else {
        let (name, rest) = text.split_once('(')?;
        if !matches!(name, "set" | "frozenset") {
            return None;
        }
        let rest = rest.strip_suffix(')')?;
        rest.strip_prefix('{')
            .and_then(|r| r.strip_suffix('}'))
            .unwrap_or(rest)
    };
    Some(parse_list(inner).into_iter().map(unquote).collect())
}

/// Normalizes a single state token.
fn state_name(token: &str) -> StateName {
    let token = token.trim();
    match token
        .strip_prefix("qfrozenset")
        .and_then(|_| set_elements(&token[1..]))
    {
        Some(elements) if elements.is_empty() => "q_empty".to_string(),
        Some(elements) => format!("q_{}", elements.join("_")),
        None => token.to_string(),
    }
}

/// Destinations of a transition, set literals are expanded. A `qfrozenset({..})` token names a
/// single state if that state is declared, otherwise it is a set of destinations as well.
fn destination_names(token: &str, states: &OrderedSet<StateName>) -> Vec<StateName> {
    let token = token.trim();
    if token.starts_with("qfrozenset") {
        let name = state_name(token);
        if states.contains(&name) {
            return vec![name];
        }
    }
    match token.strip_prefix('q').and_then(set_elements) {
        Some(elements) => elements.into_iter().map(|e| format!("q{e}")).collect(),
        None => vec![state_name(token)],
    }
}

fn split_top_level_comma(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (pos, c) in text.char_indices() {
        match c {
            '{' | '(' => depth += 1,
            '}' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some((&text[..pos], &text[pos + 1..])),
            _ => {}
        }
    }
    None
}

/// Rewrites one transition line into the plain `state,symbol → target` form, with one line per
/// destination. Lines that cannot be split are passed on untouched so that
/// [`parse_transitions`] reports them, epsilon lines are dropped.
fn canonical_line(line: &str, states: &OrderedSet<StateName>) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    let Some((lhs, rhs)) = line.split_once('→').or_else(|| line.split_once("->")) else {
        return Some(line.to_string());
    };
    let Some((from, symbol)) = split_top_level_comma(lhs) else {
        return Some(line.to_string());
    };
    let symbol = symbol.trim();
    if symbol.is_empty() {
        warn!("dropping transition on the empty symbol: {}", line.trim());
        return None;
    }
    let from = state_name(from);
    Some(
        destination_names(rhs, states)
            .into_iter()
            .map(|to| format!("{from},{symbol} → {to}"))
            .join("\n"),
    )
}
