use crate::{math::OrderedSet, prelude::*};

/// Helper struct for the construction of automata. It collects states, alphabet symbols,
/// transitions, the initial state and the accepting states and turns them into an [`Automaton`].
///
/// Building never fails. Nothing that is added is checked against anything else, so it is entirely
/// possible to build an automaton whose initial state does not exist; [`validate`] reports such
/// problems afterwards. In contrast to how transitions are often collected, the alphabet is not
/// extended by the symbols that appear on transitions, it only contains what is explicitly added.
///
/// # Example
///
/// A DFA over `0` and `1` that accepts words with an even number of zeros.
/// ```
/// use fasim::prelude::*;
///
/// let dfa = Automaton::builder(AutomatonKind::Dfa)
///     .with_states(["even", "odd"])
///     .with_alphabet(["0", "1"])
///     .with_transitions([
///         ("even", "0", "odd"),
///         ("even", "1", "even"),
///         ("odd", "0", "even"),
///         ("odd", "1", "odd"),
///     ])
///     .with_initial("even") // if omitted, the first state is used
///     .with_accepting(["even"])
///     .build();
/// assert!(dfa.validate().is_empty());
/// assert!(dfa.accepts("1001"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AutomatonBuilder {
    kind: AutomatonKind,
    states: OrderedSet<StateName>,
    alphabet: OrderedSet<Symbol>,
    transitions: TransitionTable,
    initial: Option<StateName>,
    accepting: OrderedSet<StateName>,
}

impl AutomatonBuilder {
    /// Creates an empty builder for an automaton of the given `kind`.
    pub fn new(kind: AutomatonKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Adds states, duplicates are ignored.
    pub fn with_states<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateName>,
    {
        self.states.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Adds alphabet symbols, duplicates are ignored.
    pub fn with_alphabet<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Symbol>,
    {
        self.alphabet.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Adds a list of `(from, symbol, to)` transitions. Transitions with the same source and
    /// symbol accumulate their destinations.
    pub fn with_transitions<I, F, S, T>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (F, S, T)>,
        F: Into<StateName>,
        S: Into<Symbol>,
        T: Into<StateName>,
    {
        for (from, symbol, to) in iter {
            self.transitions.accumulate(from, symbol, to);
        }
        self
    }

    /// Appends a raw entry with the given destinations, see [`TransitionTable::push_entry`].
    pub fn with_entry<I>(
        mut self,
        from: impl Into<StateName>,
        symbol: impl Into<Symbol>,
        targets: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateName>,
    {
        self.transitions.push_entry(from, symbol, targets);
        self
    }

    /// Replaces all transitions added so far by `table`.
    pub fn with_transition_table(mut self, table: TransitionTable) -> Self {
        self.transitions = table;
        self
    }

    /// Sets the initial state.
    pub fn with_initial(mut self, state: impl Into<StateName>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Adds accepting states, duplicates are ignored.
    pub fn with_accepting<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateName>,
    {
        self.accepting.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Builds the automaton. If no initial state was set, the first state is used, and if there are
    /// no states either, the initial state is the empty name (which [`validate`] will point out).
    pub fn build(self) -> Automaton {
        let initial = self
            .initial
            .or_else(|| self.states.first().cloned())
            .unwrap_or_default();
        Automaton::new(
            self.kind,
            self.states,
            self.alphabet,
            self.transitions,
            initial,
            self.accepting,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn initial_defaults_to_first_state() {
        let nfa = Automaton::builder(AutomatonKind::Nfa)
            .with_states(["s", "t"])
            .with_alphabet(["a"])
            .build();
        assert_eq!(nfa.initial_state(), "s");
        assert!(nfa.transitions().is_empty());
    }

    #[test]
    fn empty_builder_reports_missing_initial_state() {
        let dfa = AutomatonBuilder::new(AutomatonKind::Dfa).build();
        assert_eq!(dfa.initial_state(), "");
        assert_eq!(
            dfa.diagnostics(),
            vec!["Initial state must be one of the defined states"]
        );
    }

    #[test]
    fn alphabet_is_not_extended_by_transitions() {
        let dfa = Automaton::builder(AutomatonKind::Dfa)
            .with_states(["p"])
            .with_alphabet(["a", "a"])
            .with_transitions([("p", "a", "p"), ("p", "b", "p")])
            .build();
        assert_eq!(dfa.alphabet().len(), 1);
        assert_eq!(
            dfa.diagnostics(),
            vec!["Transition with undefined symbol \"b\""]
        );
    }

    #[test]
    fn raw_entries_and_tables() {
        let table: TransitionTable = [("p", "a", "q")].into_iter().collect();
        let dfa = Automaton::builder(AutomatonKind::Dfa)
            .with_states(["p", "q"])
            .with_alphabet(["a"])
            .with_transitions([("q", "a", "p")])
            .with_transition_table(table)
            .with_entry("q", "a", ["q"])
            .with_accepting(["q"])
            .build();
        assert_eq!(dfa.transitions().len(), 2);
        assert!(dfa.validate().is_empty());
        assert!(dfa.accepts("a"));
        assert!(dfa.accepts("aa"));
        assert!(!dfa.accepts(""));
    }
}
