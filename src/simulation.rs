use std::{fmt::Display, sync::Arc};

use itertools::Itertools;
use tracing::trace;

use crate::{
    math::{self, OrderedSet},
    prelude::*,
};

mod batch;
pub use batch::{results_table, run_batch, run_to_completion, BatchResult};

mod history;
pub use history::History;

/// The transition that was taken most recently. When several transitions fire while consuming one
/// symbol, a [`Snapshot`] only retains the last one, so this is meant for highlighting and never
/// for deciding anything.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiredTransition {
    /// The state the transition left from.
    pub from: StateName,
    /// The symbol that was consumed.
    pub symbol: Symbol,
    /// The state the transition led to.
    pub to: StateName,
}

impl Show for FiredTransition {
    fn show(&self) -> String {
        format!("({}, {}, {})", self.from, self.symbol, self.to)
    }
}

/// One candidate run of an NFA: the sequence of states visited so far, starting in the initial
/// state, together with a flag indicating whether the run ends in an accepting state.
///
/// The flag is only meaningful once the owning [`Snapshot`] is complete, before that it is always
/// `false`.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComputationPath {
    states: Vec<StateName>,
    accepting: bool,
}

impl ComputationPath {
    fn start(initial: StateName) -> Self {
        Self {
            states: vec![initial],
            accepting: false,
        }
    }

    fn extended(&self, to: StateName, accepting: bool) -> Self {
        let mut states = Vec::with_capacity(self.states.len() + 1);
        states.extend(self.states.iter().cloned());
        states.push(to);
        Self { states, accepting }
    }

    /// The visited states, beginning with the initial state.
    pub fn states(&self) -> &[StateName] {
        &self.states
    }

    /// The state in which this path currently is.
    pub fn last_state(&self) -> Option<&StateName> {
        self.states.last()
    }

    /// Whether the path ends in an accepting state after the whole input was consumed.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Number of visited states, which is one more than the number of symbols consumed.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the path visited no state at all.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Show for ComputationPath {
    fn show(&self) -> String {
        let mut out = self.states.iter().join(" → ");
        if self.accepting {
            out.push_str(" ✓");
        }
        out
    }
}

/// An immutable description of how far a simulation has progressed: which prefix of the input has
/// been consumed, which states the automaton may be in, and (once all input is consumed) whether
/// the input is accepted.
///
/// Snapshots are created by [`initialize`] and [`step`], every step produces a new value and leaves
/// the previous one untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    input: Arc<str>,
    length: usize,
    step: usize,
    current: OrderedSet<StateName>,
    complete: bool,
    accepted: bool,
    last_transition: Option<FiredTransition>,
    paths: Option<Vec<ComputationPath>>,
}

impl Snapshot {
    /// The input that is being consumed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The length of the input, counted in symbols (that is `char`s).
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the input is the empty word.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The number of symbols consumed so far.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The states the automaton may be in after consuming [`Self::consumed`], in order of
    /// first appearance.
    pub fn current_states(&self) -> &OrderedSet<StateName> {
        &self.current
    }

    /// Returns true once all input is consumed and acceptance has been determined.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether the input is accepted. Only meaningful if [`Self::is_complete`] holds, before that
    /// it is always `false`.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Returns true if there is no state the automaton could be in anymore. Once a run is dead
    /// it stays dead and the input is rejected.
    pub fn is_dead(&self) -> bool {
        self.current.is_empty()
    }

    /// The transition taken last, if any.
    pub fn last_transition(&self) -> Option<&FiredTransition> {
        self.last_transition.as_ref()
    }

    /// The computation paths that are still alive. Only NFA simulations track paths, for DFAs
    /// this is `None`.
    pub fn computation_paths(&self) -> Option<&[ComputationPath]> {
        self.paths.as_deref()
    }

    /// The part of the input that has been consumed.
    pub fn consumed(&self) -> &str {
        let end = self
            .input
            .char_indices()
            .nth(self.step)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len());
        &self.input[..end]
    }

    /// The part of the input that is still to be consumed.
    pub fn remaining(&self) -> &str {
        &self.input[self.consumed().len()..]
    }

    /// The symbol that the next consuming step reads, `None` if all input is consumed.
    pub fn next_symbol(&self) -> Option<char> {
        self.input.chars().nth(self.step)
    }

    /// A short human readable status: `running`, `accepted` or `rejected`.
    pub fn status(&self) -> &'static str {
        match (self.complete, self.accepted) {
            (false, _) => "running",
            (true, true) => "accepted",
            (true, false) => "rejected",
        }
    }
}

impl Show for Snapshot {
    fn show(&self) -> String {
        format!(
            "{}/{} {} {}",
            self.step,
            self.length,
            self.current.show(),
            self.status()
        )
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}|{}] in {}",
            self.consumed(),
            self.remaining(),
            self.current.show()
        )?;
        if self.complete {
            write!(f, ", {}", self.status())?;
        }
        Ok(())
    }
}

/// Starts a simulation of `automaton` on `input`. Nothing is consumed yet, the automaton is in its
/// initial state and for an NFA a single computation path containing just the initial state is
/// tracked. This never fails, any input and any automaton are fine.
pub fn initialize(automaton: &Automaton, input: &str) -> Snapshot {
    let initial = automaton.initial_state().clone();
    let paths = match automaton.kind() {
        AutomatonKind::Nfa => Some(vec![ComputationPath::start(initial.clone())]),
        AutomatonKind::Dfa => None,
    };
    trace!(
        "initializing {} simulation on \"{input}\" in {initial}",
        automaton.kind()
    );
    Snapshot {
        input: Arc::from(input),
        length: input.chars().count(),
        step: 0,
        current: math::ordered([initial]),
        complete: false,
        accepted: false,
        last_transition: None,
        paths,
    }
}

/// Advances `snapshot` by one step. There are three cases:
/// - if `snapshot` is complete, there is nothing left to do and `None` is returned;
/// - if all input is consumed but acceptance has not been determined, the returned snapshot
///   is identical except that it is complete and acceptance is resolved;
/// - otherwise the next symbol is consumed. The new current states are the union of the
///   destinations of all current states, and for an NFA every computation path is extended by
///   each of its destinations (paths without any are dropped). If this consumes the last
///   symbol, acceptance is resolved right away.
///
/// DFAs and NFAs are stepped alike, a DFA with several destinations for some pair behaves just
/// like an NFA would. Pairs without a transition contribute no destinations, so the set of
/// current states may become empty, after which the run can no longer accept.
///
/// Of the transitions fired while consuming a symbol, the last one in iteration order (current
/// states in order of first appearance, then destinations in table order) is recorded as
/// [`Snapshot::last_transition`]. If none fires, the new snapshot has no last transition.
pub fn step(snapshot: &Snapshot, automaton: &Automaton) -> Option<Snapshot> {
    if snapshot.complete {
        return None;
    }

    let Some(symbol) = snapshot.next_symbol() else {
        let accepted = math::intersects(&snapshot.current, automaton.accepting_states());
        trace!(
            "resolved \"{}\" after {} symbols in {}, accepted: {accepted}",
            snapshot.input,
            snapshot.step,
            snapshot.current.show()
        );
        return Some(Snapshot {
            complete: true,
            accepted,
            ..snapshot.clone()
        });
    };
    let symbol = symbol.to_string();

    let (current, last_transition) = snapshot.current.iter().fold(
        (OrderedSet::default(), None),
        |acc, from| {
            automaton
                .destinations(from, &symbol)
                .fold(acc, |(mut states, _), to| {
                    states.insert(to.clone());
                    let fired = FiredTransition {
                        from: from.clone(),
                        symbol: symbol.clone(),
                        to: to.clone(),
                    };
                    (states, Some(fired))
                })
        },
    );

    let step = snapshot.step + 1;
    let complete = step >= snapshot.length;
    let accepted = complete && math::intersects(&current, automaton.accepting_states());

    let symbol = symbol.as_str();
    let paths = match automaton.kind() {
        AutomatonKind::Nfa => snapshot.paths.as_ref().map(|paths| {
            paths
                .iter()
                .flat_map(move |path| {
                    path.last_state()
                        .into_iter()
                        .flat_map(move |last| automaton.destinations(last, symbol))
                        .map(move |to| {
                            path.extended(to.clone(), complete && automaton.is_accepting(to))
                        })
                })
                .collect_vec()
        }),
        AutomatonKind::Dfa => None,
    };

    trace!(
        "consumed '{symbol}' ({step}/{}): {} -> {}",
        snapshot.length,
        snapshot.current.show(),
        current.show()
    );

    Some(Snapshot {
        input: Arc::clone(&snapshot.input),
        length: snapshot.length,
        step,
        current,
        complete,
        accepted,
        last_transition,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn states(snapshot: &Snapshot) -> Vec<&str> {
        snapshot
            .current_states()
            .iter()
            .map(|q| q.as_str())
            .collect()
    }

    #[test]
    fn initialization() {
        let dfa = catalog::even_number_of_zeros();
        let init = initialize(&dfa, "110");
        assert_eq!(init.step(), 0);
        assert_eq!(init.len(), 3);
        assert_eq!(states(&init), vec!["even"]);
        assert!(!init.is_complete());
        assert!(!init.is_accepted());
        assert!(init.last_transition().is_none());
        assert!(init.computation_paths().is_none());

        let nfa = catalog::example_nfa();
        let init = initialize(&nfa, "");
        let paths = init.computation_paths().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].states(), ["q0".to_string()]);
        assert!(!paths[0].is_accepting());
    }

    #[test_log::test]
    fn dfa_rejects_odd_number_of_zeros() {
        let dfa = catalog::even_number_of_zeros();
        let mut snapshot = initialize(&dfa, "110");
        let mut steps = 0;
        while let Some(next) = step(&snapshot, &dfa) {
            assert_eq!(next.step(), snapshot.step() + 1);
            snapshot = next;
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert!(snapshot.is_complete());
        assert_eq!(states(&snapshot), vec!["odd"]);
        assert!(!snapshot.is_accepted());
        assert_eq!(
            snapshot.last_transition(),
            Some(&FiredTransition {
                from: "even".into(),
                symbol: "0".into(),
                to: "odd".into()
            })
        );
    }

    #[test]
    fn dfa_accepts_without_zeros() {
        let dfa = catalog::even_number_of_zeros();
        let first = step(&initialize(&dfa, "11"), &dfa).unwrap();
        assert!(!first.is_complete());
        assert!(!first.is_accepted());
        let second = step(&first, &dfa).unwrap();
        assert!(second.is_complete());
        assert!(second.is_accepted());
        assert_eq!(states(&second), vec!["even"]);
        assert_eq!(step(&second, &dfa), None);
    }

    #[test]
    fn empty_input_needs_resolution() {
        let dfa = catalog::even_number_of_zeros();
        let init = initialize(&dfa, "");
        let resolved = step(&init, &dfa).unwrap();
        assert_eq!(resolved.step(), 0);
        assert!(resolved.is_complete());
        assert!(resolved.is_accepted());
        assert_eq!(resolved.current_states(), init.current_states());
        assert!(step(&resolved, &dfa).is_none());
    }

    #[test_log::test]
    fn nfa_tracks_states_and_paths() {
        let nfa = catalog::example_nfa();
        let init = initialize(&nfa, "01");

        let first = step(&init, &nfa).unwrap();
        assert_eq!(states(&first), vec!["q0", "q1"]);
        assert!(!first.is_complete());
        assert_eq!(
            first
                .computation_paths()
                .unwrap()
                .iter()
                .map(|p| p.show())
                .collect::<Vec<_>>(),
            vec!["q0 → q0", "q0 → q1"]
        );
        assert_eq!(first.last_transition().unwrap().to, "q1");

        let second = step(&first, &nfa).unwrap();
        assert_eq!(states(&second), vec!["q0", "q2"]);
        assert!(second.is_complete());
        assert!(second.is_accepted());
        let paths = second.computation_paths().unwrap();
        assert_eq!(
            paths.iter().map(|p| p.show()).collect::<Vec<_>>(),
            vec!["q0 → q0 → q0", "q0 → q1 → q2 ✓"]
        );
        assert_eq!(
            second.last_transition(),
            Some(&FiredTransition {
                from: "q1".into(),
                symbol: "1".into(),
                to: "q2".into()
            })
        );
        assert!(step(&second, &nfa).is_none());
    }

    #[test]
    fn dead_paths_are_dropped() {
        let nfa = catalog::example_nfa();
        // after "0" we are in q0 and q1, q1 has no transition on 0
        let after = step(&step(&initialize(&nfa, "00"), &nfa).unwrap(), &nfa).unwrap();
        assert_eq!(states(&after), vec!["q0", "q1"]);
        let paths = after.computation_paths().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.states()[1] == "q0"));
        assert!(after.is_complete());
        assert!(!after.is_accepted());
    }

    #[test]
    fn dead_run_stays_dead() {
        let dfa = catalog::even_number_of_zeros();
        let mut snapshot = initialize(&dfa, "1x01");
        snapshot = step(&snapshot, &dfa).unwrap();
        assert!(!snapshot.is_dead());
        snapshot = step(&snapshot, &dfa).unwrap();
        assert!(snapshot.is_dead());
        assert!(snapshot.last_transition().is_none());
        while let Some(next) = step(&snapshot, &dfa) {
            assert!(next.is_dead());
            snapshot = next;
        }
        assert_eq!(snapshot.step(), 4);
        assert!(snapshot.is_complete());
        assert!(!snapshot.is_accepted());
        assert_eq!(snapshot.status(), "rejected");
    }

    #[test]
    fn malformed_dfa_is_stepped_like_an_nfa() {
        let dfa = catalog::example_nfa().with_kind(AutomatonKind::Dfa);
        assert!(!dfa.validate().is_empty());
        let snapshot = step(&initialize(&dfa, "0"), &dfa).unwrap();
        assert_eq!(states(&snapshot), vec!["q0", "q1"]);
        assert!(snapshot.computation_paths().is_none());
    }

    #[test]
    fn unicode_input_is_consumed_per_char() {
        let nfa = Automaton::builder(AutomatonKind::Nfa)
            .with_states(["s", "t"])
            .with_alphabet(["λ", "μ"])
            .with_transitions([("s", "λ", "t"), ("t", "μ", "s")])
            .with_accepting(["s"])
            .build();
        let init = initialize(&nfa, "λμ");
        assert_eq!(init.len(), 2);
        let first = step(&init, &nfa).unwrap();
        assert_eq!(first.consumed(), "λ");
        assert_eq!(first.remaining(), "μ");
        assert_eq!(first.next_symbol(), Some('μ'));
        assert_eq!(first.to_string(), "[λ|μ] in {t}");
        let second = step(&first, &nfa).unwrap();
        assert!(second.is_accepted());
        assert_eq!(second.show(), "2/2 {s} accepted");
    }

    #[test]
    fn snapshots_are_not_mutated() {
        let nfa = catalog::example_nfa();
        let init = initialize(&nfa, "0");
        let copy = init.clone();
        let _ = step(&init, &nfa);
        assert_eq!(init, copy);
    }
}
