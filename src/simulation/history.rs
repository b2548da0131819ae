use tracing::trace;

use crate::prelude::*;

/// The sequence of snapshots of one simulation run, from the initial snapshot up to the current
/// one. Stepping forward appends the next snapshot, stepping backward drops the newest one again.
/// Since snapshots are immutable, nothing needs to be recomputed when going back.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    /// Starts a new run of `automaton` on `input`, the history then contains just the initial
    /// snapshot.
    pub fn start(automaton: &Automaton, input: &str) -> Self {
        Self {
            snapshots: vec![initialize(automaton, input)],
        }
    }

    /// The newest snapshot.
    pub fn current(&self) -> &Snapshot {
        // the initial snapshot is never removed
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// All snapshots from oldest to newest.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of snapshots, at least one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always `false`, a history contains at least the initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns true if the current snapshot is complete, so [`Self::forward`] has nothing to do.
    pub fn is_finished(&self) -> bool {
        self.current().is_complete()
    }

    /// Steps forward once and returns the new snapshot, or `None` if the run is already complete.
    pub fn forward(&mut self, automaton: &Automaton) -> Option<&Snapshot> {
        let next = step(self.current(), automaton)?;
        self.snapshots.push(next);
        self.snapshots.last()
    }

    /// Steps back once and returns the snapshot that is current afterwards. The initial snapshot
    /// is never removed, so if it is the only one left, `None` is returned.
    pub fn backward(&mut self) -> Option<&Snapshot> {
        if self.snapshots.len() <= 1 {
            return None;
        }
        self.snapshots.pop();
        self.snapshots.last()
    }

    /// Keeps stepping forward until the run is complete and returns the number of steps taken.
    /// This is what a playback timer does, just without the waiting.
    pub fn play(&mut self, automaton: &Automaton) -> usize {
        let mut taken = 0;
        while self.forward(automaton).is_some() {
            taken += 1;
        }
        trace!(
            "played {taken} steps, run is {}",
            self.current().status()
        );
        taken
    }

    /// Drops everything but the initial snapshot.
    pub fn reset(&mut self) {
        self.snapshots.truncate(1);
    }

    /// Renders the history as a table with one row per snapshot.
    pub fn table(&self) -> String {
        use owo_colors::OwoColorize;
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            ["Step", "Consumed", "Remaining", "States", "Transition", "Status"].map(String::from),
        );
        for snapshot in &self.snapshots {
            let status = match (snapshot.is_complete(), snapshot.is_accepted()) {
                (true, true) => snapshot.status().green().bold().to_string(),
                (true, false) => snapshot.status().red().bold().to_string(),
                _ => snapshot.status().dimmed().to_string(),
            };
            builder.push_record([
                snapshot.step().to_string(),
                snapshot.consumed().to_string(),
                snapshot.remaining().to_string(),
                snapshot.current_states().show(),
                snapshot.last_transition().show(),
                status,
            ]);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn forward_and_backward() {
        let dfa = catalog::even_number_of_zeros();
        let mut history = History::start(&dfa, "10");
        assert_eq!(history.len(), 1);
        assert!(history.backward().is_none());

        assert_eq!(history.forward(&dfa).map(|s| s.step()), Some(1));
        assert_eq!(history.forward(&dfa).map(|s| s.step()), Some(2));
        assert!(history.is_finished());
        assert!(history.forward(&dfa).is_none());
        assert_eq!(history.len(), 3);

        let back = history.backward().unwrap();
        assert_eq!(back.step(), 1);
        assert!(!back.is_complete());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn play_and_reset() {
        let nfa = catalog::example_nfa();
        let mut history = History::start(&nfa, "110");
        assert_eq!(history.play(&nfa), 3);
        assert!(history.current().is_complete());
        assert!(!history.current().is_accepted());
        assert_eq!(history.play(&nfa), 0);

        let table = history.table();
        assert!(table.contains("Transition"));
        assert!(table.contains("{q0, q1}"));

        history.reset();
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().step(), 0);
    }

    #[test]
    fn empty_input_resolves_in_one_step() {
        let dfa = catalog::default_dfa();
        let mut history = History::start(&dfa, "");
        assert_eq!(history.play(&dfa), 1);
        let snapshots = history.snapshots();
        assert_eq!(snapshots[0].step(), snapshots[1].step());
        assert!(snapshots[1].is_accepted());
    }
}
