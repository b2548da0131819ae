use fasim::prelude::*;
use lazy_static::lazy_static;

lazy_static! {
    static ref EVEN_ZEROS: Automaton = catalog::even_number_of_zeros();
    static ref EXAMPLE_NFA: Automaton = catalog::example_nfa();
    static ref EDITOR_DFA: Automaton = {
        let parsed = parse_transitions(
            "q0,0 -> q1\n\
             q0,1 → q0\n\
             this line is garbage\n\
             \n\
             q1,1 -> q0",
        );
        assert_eq!(parsed.warnings.len(), 1);
        Automaton::new(
            AutomatonKind::Dfa,
            parse_list("q0, q1"),
            parse_list("0, 1"),
            parsed.table,
            "q0",
            parse_list("q1"),
        )
    };
}

fn final_states(snapshot: &Snapshot) -> Vec<&str> {
    snapshot.current_states().iter().map(String::as_str).collect()
}

#[test_log::test]
fn one_zero_is_rejected() {
    let last = run_to_completion(&EVEN_ZEROS, "110");
    assert_eq!(final_states(&last), vec!["odd"]);
    assert!(last.is_complete());
    assert!(!last.is_accepted());
}

#[test_log::test]
fn no_zero_is_accepted() {
    let last = run_to_completion(&EVEN_ZEROS, "11");
    assert_eq!(final_states(&last), vec!["even"]);
    assert!(last.is_accepted());
}

#[test_log::test]
fn nfa_branches_and_accepts() {
    let start = initialize(&EXAMPLE_NFA, "01");
    let first = step(&start, &EXAMPLE_NFA).unwrap();
    assert_eq!(final_states(&first), vec!["q0", "q1"]);
    assert!(!first.is_complete());

    let second = step(&first, &EXAMPLE_NFA).unwrap();
    assert_eq!(final_states(&second), vec!["q0", "q2"]);
    assert!(second.is_complete());
    assert!(second.is_accepted());
    assert!(step(&second, &EXAMPLE_NFA).is_none());

    let accepting = second
        .computation_paths()
        .unwrap()
        .iter()
        .filter(|path| path.is_accepting())
        .map(|path| path.show())
        .collect::<Vec<_>>();
    assert_eq!(accepting, vec!["q0 → q1 → q2 ✓"]);
}

#[test_log::test]
fn missing_transition_is_reported_once() {
    let diagnostics = EDITOR_DFA.validate();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity(), Severity::Warning);
    assert_eq!(
        diagnostics[0].to_string(),
        "DFA is incomplete. Missing transitions: q1,0"
    );
    // the missing transition simply kills the run
    let last = run_to_completion(&EDITOR_DFA, "00");
    assert!(last.is_dead());
    assert!(!last.is_accepted());
}

#[test]
fn batch_and_history_agree() {
    let inputs = ["0", "01", "0110", "", "1101"];
    for result in run_batch(&*EXAMPLE_NFA, inputs) {
        let mut history = History::start(&EXAMPLE_NFA, &result.input);
        history.play(&EXAMPLE_NFA);
        assert_eq!(history.current().is_accepted(), result.accepted);
        assert_eq!(result.accepted, result.input.ends_with("01"));
    }
}

#[test]
fn editor_round_trip() {
    let text = format_transitions(EDITOR_DFA.transitions());
    let reparsed = parse_transitions(&text);
    assert!(reparsed.warnings.is_empty());
    assert_eq!(&reparsed.table, EDITOR_DFA.transitions());
}
