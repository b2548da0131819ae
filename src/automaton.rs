use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

use crate::{math::OrderedSet, prelude::*};

mod transitions;
pub use transitions::{Destinations, TransitionEntry, TransitionKey, TransitionTable};

mod builder;
pub use builder::AutomatonBuilder;

/// Structural validation of automata. Validation never rejects anything, it only produces
/// [`Diagnostic`]s that can be shown to the user.
pub mod validation;
pub use validation::{validate, Diagnostic, Severity};

/// States are identified by their name.
pub type StateName = String;
/// Input symbols are arbitrary strings. The simulation reads its input one `char` at a time, so
/// only single-character symbols can ever be matched while stepping.
pub type Symbol = String;

/// Distinguishes deterministic from nondeterministic automata. The distinction only matters for
/// validation (a DFA is checked for determinism and completeness) and for whether a simulation
/// keeps track of explicit [`ComputationPath`]s.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutomatonKind {
    /// Deterministic finite automaton, at most one destination per state and symbol.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "DFA"))]
    Dfa,
    /// Nondeterministic finite automaton, any number of destinations per state and symbol.
    #[cfg_attr(feature = "serde", serde(rename = "NFA"))]
    Nfa,
}

impl Display for AutomatonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonKind::Dfa => write!(f, "DFA"),
            AutomatonKind::Nfa => write!(f, "NFA"),
        }
    }
}

/// Returned when a string names neither a DFA nor an NFA.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown automaton kind \"{0}\", expected DFA or NFA")]
pub struct ParseKindError(pub String);

impl FromStr for AutomatonKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfa" => Ok(AutomatonKind::Dfa),
            "nfa" => Ok(AutomatonKind::Nfa),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// A finite automaton over string-named states. Values of this type are never mutated in place by
/// the simulation, an editor replaces the whole automaton whenever something changes.
///
/// None of the consistency requirements (initial state is a state, transitions only mention known
/// states and symbols, determinism of a DFA, ...) are enforced on construction. They are checked
/// by [`validate`] and violations are reported, not rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Automaton {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    kind: AutomatonKind,
    states: OrderedSet<StateName>,
    alphabet: OrderedSet<Symbol>,
    transitions: TransitionTable,
    #[cfg_attr(feature = "serde", serde(rename = "initialState"))]
    initial: StateName,
    #[cfg_attr(feature = "serde", serde(rename = "acceptingStates"))]
    accepting: OrderedSet<StateName>,
}

impl Automaton {
    /// Creates a new automaton from its parts.
    pub fn new<S, A, F>(
        kind: AutomatonKind,
        states: S,
        alphabet: A,
        transitions: TransitionTable,
        initial: impl Into<StateName>,
        accepting: F,
    ) -> Self
    where
        S: IntoIterator,
        S::Item: Into<StateName>,
        A: IntoIterator,
        A::Item: Into<Symbol>,
        F: IntoIterator,
        F::Item: Into<StateName>,
    {
        Self {
            kind,
            states: states.into_iter().map(Into::into).collect(),
            alphabet: alphabet.into_iter().map(Into::into).collect(),
            transitions,
            initial: initial.into(),
            accepting: accepting.into_iter().map(Into::into).collect(),
        }
    }

    /// Instantiates a new [`AutomatonBuilder`] for an automaton of the given `kind`.
    pub fn builder(kind: AutomatonKind) -> AutomatonBuilder {
        AutomatonBuilder::new(kind)
    }

    /// Returns whether this is a DFA or an NFA.
    pub fn kind(&self) -> AutomatonKind {
        self.kind
    }

    /// Returns the same automaton with its kind replaced, the way an editor switches between
    /// DFA and NFA mode without touching the definition.
    pub fn with_kind(self, kind: AutomatonKind) -> Self {
        Self { kind, ..self }
    }

    /// The states of the automaton, in the order in which they were defined.
    pub fn states(&self) -> &OrderedSet<StateName> {
        &self.states
    }

    /// The alphabet, in the order in which the symbols were defined.
    pub fn alphabet(&self) -> &OrderedSet<Symbol> {
        &self.alphabet
    }

    /// The transition table.
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// The designated initial state. This need not be one of [`Self::states`].
    pub fn initial_state(&self) -> &StateName {
        &self.initial
    }

    /// The accepting states.
    pub fn accepting_states(&self) -> &OrderedSet<StateName> {
        &self.accepting
    }

    /// Returns true if `state` is one of the accepting states.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Iterates over the destinations that can be reached from `state` on `symbol`. Unknown
    /// states or symbols simply have no destinations.
    pub fn destinations<'a>(&'a self, state: &str, symbol: &str) -> Destinations<'a> {
        self.transitions.destinations(state, symbol)
    }

    /// Runs [`validate`] on `self`.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate(self)
    }

    /// Runs [`validate`] on `self` and returns only the messages.
    pub fn diagnostics(&self) -> Vec<String> {
        self.validate().iter().map(|d| d.to_string()).collect()
    }

    /// Returns a string representation of the transition table with one row per state and one
    /// column per alphabet symbol. The initial state is marked with `→`, accepting states
    /// with `*`.
    pub fn transition_table(&self) -> String {
        self.transitions
            .build_table(self, |state| self.decorate_state(state))
    }

    /// Like [`Self::transition_table`], but accepting states are highlighted using ANSI colors.
    pub fn colored_transition_table(&self) -> String {
        use owo_colors::OwoColorize;
        self.transitions.build_table(self, |state| {
            let decorated = self.decorate_state(state);
            if self.is_accepting(state) {
                decorated.green().bold().to_string()
            } else {
                decorated
            }
        })
    }

    fn decorate_state(&self, state: &str) -> String {
        let mut out = String::new();
        if state == self.initial {
            out.push('→');
        }
        if self.is_accepting(state) {
            out.push('*');
        }
        out.push_str(state);
        out
    }
}

impl Show for Automaton {
    fn show(&self) -> String {
        format!(
            "{}({}, {}, {}, {})",
            self.kind,
            self.states.show(),
            self.alphabet.show(),
            self.initial,
            self.accepting.show()
        )
    }
}

impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} with {} states", self.kind, self.size())?;
        writeln!(f, "alphabet: {}", self.alphabet.iter().join(", "))?;
        write!(f, "{}", self.transition_table())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn kind_from_str() {
        assert_eq!("DFA".parse::<AutomatonKind>(), Ok(AutomatonKind::Dfa));
        assert_eq!(" nfa ".parse::<AutomatonKind>(), Ok(AutomatonKind::Nfa));
        let err = "pda".parse::<AutomatonKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown automaton kind \"pda\", expected DFA or NFA"
        );
        assert_eq!(AutomatonKind::Nfa.to_string(), "NFA");
    }

    #[test]
    fn destinations_of_unknown_pairs_are_empty() {
        let dfa = catalog::even_number_of_zeros();
        assert_eq!(dfa.destinations("even", "2").count(), 0);
        assert_eq!(dfa.destinations("nowhere", "0").count(), 0);
        assert_eq!(
            dfa.destinations("even", "0").collect::<Vec<_>>(),
            vec!["odd"]
        );
    }

    #[test]
    fn switching_kind_keeps_definition() {
        let dfa = catalog::example_nfa().with_kind(AutomatonKind::Dfa);
        assert_eq!(dfa.kind(), AutomatonKind::Dfa);
        assert_eq!(dfa.transitions(), catalog::example_nfa().transitions());
    }

    #[test]
    fn show_automaton() {
        assert_eq!(
            catalog::even_number_of_zeros().show(),
            "DFA({even, odd}, {0, 1}, even, {even})"
        );
    }

    #[test_log::test]
    fn render_transition_table() {
        let table = catalog::example_nfa().transition_table();
        println!("{table}");
        assert!(table.contains("→q0"));
        assert!(table.contains("*q2"));
        assert!(table.contains("{q0, q1}"));
        let colored = catalog::example_nfa().colored_transition_table();
        assert!(colored.contains("q2"));
    }
}
