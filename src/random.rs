use tracing::debug;

use crate::prelude::*;

/// Returns the first `symbols` lowercase letters as alphabet symbols, wrapping around after `z`.
pub fn letters(symbols: usize) -> Vec<Symbol> {
    (0..symbols)
        .map(|i| char::from(b'a' + (i % 26) as u8).to_string())
        .collect()
}

/// Uses a sprout-like algorithm to generate a random complete DFA over `symbols` letters.
/// `probability` determines how likely a back edge to an existing state is. The algorithm is as
/// follows:
/// 1. Start with a single state `q0`.
/// 2. For each symbol, go through the existing states in order and with probability
///    `probability` add an edge to that state.
/// 3. If no existing state was picked, add an edge to a new state.
/// 4. Repeat until all states and symbols have been treated.
///
/// Every state is accepting with probability one half. The result is always valid.
///
/// Panics if `probability` is not positive, new states would keep being added forever.
pub fn generate_random_dfa(symbols: usize, probability: f64) -> Automaton {
    assert!(
        probability > 0.0,
        "back edge probability must be positive, got {probability}"
    );
    let alphabet = letters(symbols);
    let mut builder = Automaton::builder(AutomatonKind::Dfa)
        .with_alphabet(alphabet.iter().cloned())
        .with_states(["q0"]);
    let mut size = 1;
    let mut current = 0;

    while current < size {
        for symbol in &alphabet {
            let target = (0..=current)
                .find(|_| fastrand::f64() < probability)
                .unwrap_or_else(|| {
                    size += 1;
                    size - 1
                });
            builder = builder
                .with_states([format!("q{target}")])
                .with_transitions([(
                    format!("q{current}"),
                    symbol.clone(),
                    format!("q{target}"),
                )]);
        }
        current += 1;
    }

    let accepting = (0..size)
        .filter(|_| fastrand::bool())
        .map(|q| format!("q{q}"))
        .collect::<Vec<_>>();
    let dfa = builder.with_initial("q0").with_accepting(accepting).build();
    debug!("generated random DFA with {} states", dfa.size());
    dfa
}

/// Generates a random NFA with `size` states over `symbols` letters. For every state, symbol and
/// potential destination, the transition is present with probability `density`, so some pairs
/// may have no destinations at all while others have several. Every state is accepting with
/// probability one half and the initial state is `q0`.
pub fn generate_random_nfa(symbols: usize, size: usize, density: f64) -> Automaton {
    let states = (0..size.max(1)).map(|q| format!("q{q}")).collect::<Vec<_>>();
    let alphabet = letters(symbols);
    let mut transitions = TransitionTable::new();
    for from in &states {
        for symbol in &alphabet {
            for to in &states {
                if fastrand::f64() < density {
                    transitions.accumulate(from.as_str(), symbol.as_str(), to.as_str());
                }
            }
        }
    }
    let accepting = states
        .iter()
        .filter(|_| fastrand::bool())
        .cloned()
        .collect::<Vec<_>>();
    Automaton::new(
        AutomatonKind::Nfa,
        states,
        alphabet,
        transitions,
        "q0",
        accepting,
    )
}

/// Generate a random `String` over the single-character symbols of `alphabet`. The length is
/// drawn uniformly from `min_len..=max_len`. Returns the empty string if `alphabet` has no
/// single-character symbols.
pub fn generate_random_word(
    alphabet: &OrderedSet<Symbol>,
    min_len: usize,
    max_len: usize,
) -> String {
    let charset: Vec<char> = alphabet
        .iter()
        .filter_map(|symbol| {
            let mut chars = symbol.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        })
        .collect();
    if charset.is_empty() {
        return String::new();
    }

    let length = fastrand::usize(min_len..=max_len.max(min_len));
    (0..length)
        .map(|_| charset[fastrand::usize(..charset.len())])
        .collect()
}

/// Generate `number` random words as by [`generate_random_word`], possibly with repetitions.
pub fn generate_random_words(
    alphabet: &OrderedSet<Symbol>,
    min_len: usize,
    max_len: usize,
    number: usize,
) -> Vec<String> {
    (0..number)
        .map(|_| generate_random_word(alphabet, min_len, max_len))
        .collect()
}
