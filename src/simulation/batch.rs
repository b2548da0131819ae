use tracing::debug;

use crate::prelude::*;

/// The outcome of running one input of a batch to completion.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchResult {
    /// The input as it was given.
    pub input: String,
    /// Whether the automaton accepts it.
    pub accepted: bool,
}

/// Drives [`step`] on `input` until it returns `None` and returns the final, complete snapshot.
/// As every consuming step advances by one symbol and the input is finite, this takes at most
/// `n + 1` steps for an input of `n` symbols.
pub fn run_to_completion(automaton: &Automaton, input: &str) -> Snapshot {
    let mut snapshot = initialize(automaton, input);
    while let Some(next) = step(&snapshot, automaton) {
        snapshot = next;
    }
    snapshot
}

/// Runs every one of `inputs` to completion and collects whether it is accepted. Inputs that
/// consist only of whitespace are skipped, all others are used exactly as given.
pub fn run_batch<I>(automaton: &Automaton, inputs: I) -> Vec<BatchResult>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let results: Vec<_> = inputs
        .into_iter()
        .filter(|input| !input.as_ref().trim().is_empty())
        .map(|input| {
            let input = input.as_ref();
            BatchResult {
                input: input.to_string(),
                accepted: run_to_completion(automaton, input).is_accepted(),
            }
        })
        .collect();
    debug!(
        "batch of {} inputs, {} accepted",
        results.len(),
        results.iter().filter(|r| r.accepted).count()
    );
    results
}

/// Renders batch results as a table with one row per input.
pub fn results_table(results: &[BatchResult]) -> String {
    use owo_colors::OwoColorize;
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(["Input".to_string(), "Result".to_string()]);
    for result in results {
        let verdict = if result.accepted {
            "accepted".green().to_string()
        } else {
            "rejected".red().to_string()
        };
        builder.push_record([result.input.clone(), verdict]);
    }
    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}

impl Automaton {
    /// Returns whether `self` accepts `input`, by running a simulation to completion.
    pub fn accepts(&self, input: &str) -> bool {
        run_to_completion(self, input).is_accepted()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test_log::test]
    fn batch_over_even_zeros() {
        let dfa = catalog::even_number_of_zeros();
        let results = run_batch(&dfa, ["110", "101", "111", "  ", "", "00"]);
        assert_eq!(
            results,
            vec![
                BatchResult {
                    input: "110".into(),
                    accepted: false
                },
                BatchResult {
                    input: "101".into(),
                    accepted: false
                },
                BatchResult {
                    input: "111".into(),
                    accepted: true
                },
                BatchResult {
                    input: "00".into(),
                    accepted: true
                },
            ]
        );
        let table = simulation::results_table(&results);
        assert!(table.contains("110"));
        assert!(table.contains("Result"));
    }

    #[test]
    fn divisible_by_three() {
        let dfa = catalog::binary_divisible_by_three();
        for n in 0u32..64 {
            let word = format!("{n:b}");
            assert_eq!(dfa.accepts(&word), n % 3 == 0, "{word}");
        }
    }

    #[test]
    fn run_takes_at_most_length_plus_one_steps() {
        let nfa = catalog::example_nfa();
        for input in ["", "0", "01", "0101", "111000"] {
            let mut snapshot = initialize(&nfa, input);
            let mut calls = 0;
            while let Some(next) = step(&snapshot, &nfa) {
                snapshot = next;
                calls += 1;
            }
            assert!(calls <= input.len() + 1);
            assert!(snapshot.is_complete());
            assert_eq!(snapshot, run_to_completion(&nfa, input));
        }
    }

    #[test]
    fn nfa_accepts_words_ending_in_01() {
        let nfa = catalog::example_nfa();
        assert!(nfa.accepts("01"));
        assert!(nfa.accepts("1101"));
        assert!(!nfa.accepts("010"));
        assert!(!nfa.accepts(""));
    }
}
