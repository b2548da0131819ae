use crate::prelude::*;

/// The DFA an editor starts out with. It starts in `q1`, which is also the only accepting state.
pub fn default_dfa() -> Automaton {
    Automaton::builder(AutomatonKind::Dfa)
        .with_states(["q0", "q1", "q2"])
        .with_alphabet(["0", "1"])
        .with_transitions([
            ("q0", "0", "q2"),
            ("q0", "1", "q0"),
            ("q1", "0", "q1"),
            ("q1", "1", "q2"),
            ("q2", "0", "q0"),
            ("q2", "1", "q1"),
        ])
        .with_initial("q1")
        .with_accepting(["q1"])
        .build()
}

/// An NFA accepting exactly the binary words that end in `01`. It guesses the position of the
/// final `0` by branching into `q1`.
pub fn example_nfa() -> Automaton {
    Automaton::builder(AutomatonKind::Nfa)
        .with_states(["q0", "q1", "q2"])
        .with_alphabet(["0", "1"])
        .with_transitions([
            ("q0", "0", "q0"),
            ("q0", "0", "q1"),
            ("q0", "1", "q0"),
            ("q1", "1", "q2"),
        ])
        .with_initial("q0")
        .with_accepting(["q2"])
        .build()
}

/// A DFA accepting the binary representations of multiples of three. State `ri` means that the
/// prefix read so far has remainder `i`, the empty word counts as `0`.
pub fn binary_divisible_by_three() -> Automaton {
    Automaton::builder(AutomatonKind::Dfa)
        .with_states(["r0", "r1", "r2"])
        .with_alphabet(["0", "1"])
        .with_transitions([
            ("r0", "0", "r0"),
            ("r0", "1", "r1"),
            ("r1", "0", "r2"),
            ("r1", "1", "r0"),
            ("r2", "0", "r1"),
            ("r2", "1", "r2"),
        ])
        .with_initial("r0")
        .with_accepting(["r0"])
        .build()
}

/// A DFA accepting the binary words with an even number of zeros.
pub fn even_number_of_zeros() -> Automaton {
    Automaton::builder(AutomatonKind::Dfa)
        .with_states(["even", "odd"])
        .with_alphabet(["0", "1"])
        .with_transitions([
            ("even", "0", "odd"),
            ("even", "1", "even"),
            ("odd", "0", "even"),
            ("odd", "1", "odd"),
        ])
        .with_initial("even")
        .with_accepting(["even"])
        .build()
}

/// All example automata together with their names.
pub fn all() -> Vec<(&'static str, Automaton)> {
    vec![
        ("default-dfa", default_dfa()),
        ("example-nfa", example_nfa()),
        ("binary-divisible-by-three", binary_divisible_by_three()),
        ("even-number-of-zeros", even_number_of_zeros()),
    ]
}

/// Looks up an example by its name, ignoring case and treating `_` like `-`.
pub fn by_name(name: &str) -> Option<Automaton> {
    let name = name.trim().to_ascii_lowercase().replace('_', "-");
    all()
        .into_iter()
        .find(|(known, _)| *known == name)
        .map(|(_, automaton)| automaton)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(by_name("Example_NFA"), Some(example_nfa()));
        assert_eq!(by_name("even-number-of-zeros"), Some(even_number_of_zeros()));
        assert!(by_name("odd-number-of-ones").is_none());
        assert_eq!(all().len(), 4);
    }

    #[test]
    fn default_dfa_language() {
        let dfa = default_dfa();
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("0"));
        assert!(!dfa.accepts("1"));
        assert!(dfa.accepts("11"));
        assert!(!dfa.accepts("10"));
    }
}
