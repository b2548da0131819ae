use std::io::Read;

use fasim::prelude::*;

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{parser::ValueSource, Arg, ArgAction, ArgMatches, Command};

#[derive(Debug, Error)]
enum CliError {
    #[error("there is no example called \"{0}\", try `fasim examples`")]
    UnknownExample(String),
    #[error("either --example or --states together with --transitions has to be given")]
    MissingAutomaton,
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Kind(#[from] ParseKindError),
    #[error(transparent)]
    Description(#[from] DescriptionError),
}

fn automaton_args() -> Vec<Arg> {
    vec![
        Arg::new("example")
            .short('e')
            .long("example")
            .help("use one of the built-in examples")
            .conflicts_with_all(["states", "transitions"]),
        Arg::new("kind")
            .short('k')
            .long("kind")
            .default_value("dfa")
            .help("DFA or NFA"),
        Arg::new("states")
            .short('s')
            .long("states")
            .help("comma separated states"),
        Arg::new("alphabet")
            .short('a')
            .long("alphabet")
            .default_value("0, 1")
            .help("comma separated symbols"),
        Arg::new("initial")
            .short('i')
            .long("initial")
            .help("the initial state, defaults to the first state"),
        Arg::new("accepting")
            .short('f')
            .long("accepting")
            .default_value("")
            .help("comma separated accepting states"),
        Arg::new("transitions")
            .short('t')
            .long("transitions")
            .help("file with one `state,symbol -> target` line per transition, - for stdin"),
    ]
}

fn cli() -> clap::Command {
    Command::new("fasim")
        .about("Finite automata simulation")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .subcommand(Command::new("examples").about("lists the built-in example automata"))
        .subcommand(
            Command::new("table")
                .about("prints the transition table of an automaton")
                .args(automaton_args()),
        )
        .subcommand(
            Command::new("validate")
                .about("checks an automaton for structural problems")
                .args(automaton_args()),
        )
        .subcommand(
            Command::new("run")
                .about("steps through the run on a single input")
                .args(automaton_args())
                .arg(Arg::new("input").required(true).help("the input word"))
                .arg(
                    Arg::new("paths")
                        .short('p')
                        .long("paths")
                        .action(ArgAction::SetTrue)
                        .help("print the computation paths of an NFA"),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("reads one input per line from stdin and reports which are accepted")
                .args(automaton_args()),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_source(path: &str) -> Result<String, CliError> {
    let result = if path == "-" {
        let mut out = String::new();
        std::io::stdin().read_to_string(&mut out).map(|_| out)
    } else {
        std::fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })
}

fn load_automaton(matches: &ArgMatches) -> Result<Automaton, CliError> {
    let kind: AutomatonKind = matches
        .get_one::<String>("kind")
        .map(|k| k.parse::<AutomatonKind>())
        .transpose()?
        .unwrap_or_default();

    if let Some(name) = matches.get_one::<String>("example") {
        let example =
            catalog::by_name(name).ok_or_else(|| CliError::UnknownExample(name.clone()))?;
        debug!("using example {name}");
        let kind_given = matches.value_source("kind") == Some(ValueSource::CommandLine);
        return Ok(if kind_given {
            example.with_kind(kind)
        } else {
            example
        });
    }

    let (Some(states), Some(path)) = (
        matches.get_one::<String>("states"),
        matches.get_one::<String>("transitions"),
    ) else {
        return Err(CliError::MissingAutomaton);
    };
    let get = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();

    let description = AutomatonDescription {
        states: states.clone(),
        alphabet: get("alphabet"),
        initial_state: matches
            .get_one::<String>("initial")
            .cloned()
            .or_else(|| parse_list(states).into_iter().next())
            .unwrap_or_default(),
        accepting_states: get("accepting"),
        transitions: read_source(path)?,
    };
    Ok(description.to_automaton(kind)?)
}

fn print_diagnostics(automaton: &Automaton) -> usize {
    let diagnostics = automaton.validate();
    for diagnostic in &diagnostics {
        match diagnostic.severity() {
            Severity::Error => eprintln!("{} {diagnostic}", "error:".red().bold()),
            Severity::Warning => eprintln!("{} {diagnostic}", "warning:".yellow().bold()),
        }
    }
    diagnostics.iter().filter(|d| d.is_error()).count()
}

fn run(matches: &ArgMatches) -> Result<bool, CliError> {
    match matches.subcommand() {
        Some(("examples", _)) => {
            for (name, automaton) in catalog::all() {
                println!("{} {}", name.bold(), automaton.show().dimmed());
            }
        }
        Some(("table", sub_matches)) => {
            let automaton = load_automaton(sub_matches)?;
            println!("{}", automaton.colored_transition_table());
        }
        Some(("validate", sub_matches)) => {
            let automaton = load_automaton(sub_matches)?;
            let errors = print_diagnostics(&automaton);
            if errors > 0 {
                return Ok(false);
            }
            info!("no errors in {}", automaton.show());
            println!("{}", "valid".green().bold());
        }
        Some(("run", sub_matches)) => {
            let automaton = load_automaton(sub_matches)?;
            print_diagnostics(&automaton);
            let input = sub_matches
                .get_one::<String>("input")
                .map(String::as_str)
                .unwrap_or_default();

            let start = std::time::Instant::now();
            let mut history = History::start(&automaton, input);
            let steps = history.play(&automaton);
            info!(
                "simulation took {steps} steps and {}µs",
                start.elapsed().as_micros()
            );

            println!("{}", history.table());
            if sub_matches.get_flag("paths") {
                for path in history.current().computation_paths().unwrap_or_default() {
                    println!("{}", path.show());
                }
            }
            let verdict = history.current();
            if verdict.is_accepted() {
                println!("{}", verdict.status().green().bold());
            } else {
                println!("{}", verdict.status().red().bold());
            }
            return Ok(verdict.is_accepted());
        }
        Some(("batch", sub_matches)) => {
            let automaton = load_automaton(sub_matches)?;
            debug!("reading batch inputs from stdin");
            let inputs = read_source("-")?;
            let results = run_batch(&automaton, inputs.lines());
            println!("{}", simulation::results_table(&results));
        }
        _ => unreachable!(),
    }
    Ok(true)
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            std::process::exit(2);
        }
    }
}
