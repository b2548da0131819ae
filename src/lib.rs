//! Library for defining finite automata over string-named states and stepping through their runs.
//!
//! An [`Automaton`] consists of a set of states, an alphabet of symbols, a transition table mapping
//! `(state, symbol)` pairs to sets of destination states, a designated initial state and a set of
//! accepting states. Whether the automaton is a DFA or an NFA is recorded in its [`AutomatonKind`],
//! but the kind is never enforced structurally. A DFA with two destinations for some pair is still
//! a perfectly valid value; [`automaton::validate`] reports the problem and the simulation simply
//! follows both destinations.
//!
//! Simulation is split into two pure functions. [`simulation::initialize`] produces the first
//! [`Snapshot`] for an input, and [`simulation::step`] turns one snapshot into the next, consuming
//! exactly one input symbol per call. Once all symbols are consumed, one further call resolves
//! acceptance, after which `step` returns `None`. Snapshots are immutable values, so keeping the
//! sequence of all of them (see [`simulation::History`]) is all that is needed to step backwards.
//! For NFAs each snapshot additionally carries the explicit [`ComputationPath`]s that are still
//! alive, which is useful for visualizing nondeterministic branching.
//!
//! The [`text`] module parses the line-based transition format (`q0,a -> q1`) that editors and
//! conversion services produce, and the [`catalog`] contains a couple of well-known example
//! automata.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use fasim::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{
            validate, Automaton, AutomatonBuilder, AutomatonKind, Diagnostic, ParseKindError,
            Severity, StateName, Symbol, TransitionEntry, TransitionKey, TransitionTable,
        },
        catalog,
        math::{self, OrderedMap, OrderedSet},
        simulation::{
            self, initialize, run_batch, run_to_completion, step, BatchResult, ComputationPath,
            FiredTransition, History, Snapshot,
        },
        text::{
            self, format_transitions, parse_list, parse_transitions, AutomatonDescription,
            ConversionRequest, ConversionResponse, DescriptionError, ParseWarning,
            ParsedTransitions,
        },
        Show,
    };
}

/// This module contains type aliases for the collections used throughout the crate and small
/// helpers operating on them.
pub mod math;

/// Defines the automaton model, its construction and its validation.
pub mod automaton;
pub use automaton::{Automaton, AutomatonKind};

/// Initialization and stepping of simulations, plus the batch runner and run history.
pub mod simulation;
pub use simulation::{ComputationPath, Snapshot};

/// Parsing and formatting of the textual automaton representations.
pub mod text;

/// A small collection of example automata.
pub mod catalog;

/// Implements the generation of random automata and input words. This is feature gated behind
/// the `random` feature.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Helper trait which can be used to display states, sets of states, transitions and such.
pub trait Show {
    /// Returns a human readable representation of `self`. For a set of states this should be
    /// something like `{q0, q1}`, for a transition `(q0, a, q1)`. This is mainly used for
    /// logging and for filling tables.
    fn show(&self) -> String;
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for math::OrderedSet<S> {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().map(|x| x.show()).join(", "))
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("[{}]", self.iter().map(|x| x.show()).join(", "))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}
