use std::fmt::Display;

use itertools::Itertools;
use tracing::debug;

use crate::{math::Set, prelude::*};

/// How serious a [`Diagnostic`] is. Neither severity prevents simulation, an automaton with
/// errors is simulated just the same, it merely produces less meaningful results.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Severity {
    /// The definition is inconsistent.
    Error,
    /// The definition is consistent but not what one would usually expect, e.g. a DFA that
    /// lacks some transitions.
    Warning,
}

/// A single structural problem found by [`validate`]. The [`Display`] implementation produces
/// the message that is shown to the user.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Diagnostic {
    /// The initial state is not one of the states.
    UndefinedInitialState(StateName),
    /// An accepting state is not one of the states.
    UndefinedAcceptingState(StateName),
    /// A transition leaves from a state that is not one of the states.
    UndefinedSource(StateName),
    /// A transition is labelled with a symbol that is not part of the alphabet.
    UndefinedSymbol(Symbol),
    /// A transition leads to a state that is not one of the states.
    UndefinedTarget(StateName),
    /// A DFA has more than one entry for the same state and symbol.
    DuplicateKey(TransitionKey),
    /// A DFA entry has more than one destination.
    MultipleTargets(TransitionKey),
    /// A DFA lacks transitions for the listed pairs.
    Incomplete(Vec<TransitionKey>),
}

impl Diagnostic {
    /// Returns the severity of `self`, only incompleteness is a [`Severity::Warning`].
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::Incomplete(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Returns true if the severity is [`Severity::Error`].
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UndefinedInitialState(_) => {
                write!(f, "Initial state must be one of the defined states")
            }
            Diagnostic::UndefinedAcceptingState(q) => {
                write!(f, "Accepting state \"{q}\" is not in the states list")
            }
            Diagnostic::UndefinedSource(q) => write!(f, "Transition from undefined state \"{q}\""),
            Diagnostic::UndefinedSymbol(a) => {
                write!(f, "Transition with undefined symbol \"{a}\"")
            }
            Diagnostic::UndefinedTarget(q) => write!(f, "Transition to undefined state \"{q}\""),
            Diagnostic::DuplicateKey(key) => {
                write!(f, "Multiple transitions for state-symbol pair \"{key}\" in DFA")
            }
            Diagnostic::MultipleTargets(key) => {
                write!(f, "Multiple target states for \"{key}\" in DFA")
            }
            Diagnostic::Incomplete(missing) => write!(
                f,
                "DFA is incomplete. Missing transitions: {}",
                missing.iter().join(", ")
            ),
        }
    }
}

/// Checks `automaton` for structural problems and returns them in a fixed order:
/// 1. membership of the initial state,
/// 2. membership of each accepting state,
/// 3. for each transition entry, membership of its source, its symbol and each destination,
/// 4. for a DFA, repeated entries for the same pair and entries with more than one destination,
/// 5. for a DFA, a single [`Diagnostic::Incomplete`] listing every pair without a transition.
///
/// An empty result means that no problems were found. The automaton is never modified or rejected.
pub fn validate(automaton: &Automaton) -> Vec<Diagnostic> {
    let states = automaton.states();
    let alphabet = automaton.alphabet();
    let mut out = vec![];

    if !states.contains(automaton.initial_state()) {
        out.push(Diagnostic::UndefinedInitialState(
            automaton.initial_state().clone(),
        ));
    }

    out.extend(
        automaton
            .accepting_states()
            .iter()
            .filter(|q| !states.contains(*q))
            .map(|q| Diagnostic::UndefinedAcceptingState(q.clone())),
    );

    for entry in automaton.transitions().entries() {
        let key = entry.key();
        if !states.contains(&key.from) {
            out.push(Diagnostic::UndefinedSource(key.from.clone()));
        }
        if !alphabet.contains(&key.symbol) {
            out.push(Diagnostic::UndefinedSymbol(key.symbol.clone()));
        }
        out.extend(
            entry
                .targets()
                .iter()
                .filter(|q| !states.contains(*q))
                .map(|q| Diagnostic::UndefinedTarget(q.clone())),
        );
    }

    if automaton.kind() == AutomatonKind::Dfa {
        let mut seen = Set::default();
        for entry in automaton.transitions().entries() {
            if !seen.insert(entry.key()) {
                out.push(Diagnostic::DuplicateKey(entry.key().clone()));
            }
            if entry.targets().len() > 1 {
                out.push(Diagnostic::MultipleTargets(entry.key().clone()));
            }
        }

        let missing = states
            .iter()
            .cartesian_product(alphabet.iter())
            .filter(|(q, a)| !automaton.transitions().contains_key(q, a))
            .map(|(q, a)| TransitionKey::new(q.as_str(), a.as_str()))
            .collect_vec();
        if !missing.is_empty() {
            out.push(Diagnostic::Incomplete(missing));
        }
    }

    debug!(
        "validated {} with {} states, found {} problems",
        automaton.kind(),
        automaton.size(),
        out.len()
    );
    out
}
