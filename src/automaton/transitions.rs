use std::fmt::Display;

use itertools::Itertools;

use crate::{
    math::{Map, OrderedSet},
    prelude::*,
};

/// The `(state, symbol)` pair that a transition table entry is keyed on.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionKey {
    /// The state the transition leaves from.
    pub from: StateName,
    /// The symbol that labels the transition.
    pub symbol: Symbol,
}

impl TransitionKey {
    /// Creates a new key.
    pub fn new(from: impl Into<StateName>, symbol: impl Into<Symbol>) -> Self {
        Self {
            from: from.into(),
            symbol: symbol.into(),
        }
    }
}

impl Display for TransitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.from, self.symbol)
    }
}

impl Show for TransitionKey {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// A single row of a [`TransitionTable`]: a key together with the ordered set of its destinations.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionEntry {
    key: TransitionKey,
    targets: OrderedSet<StateName>,
}

impl TransitionEntry {
    /// The key of this entry.
    pub fn key(&self) -> &TransitionKey {
        &self.key
    }

    /// The destinations of this entry, in the order in which they were added.
    pub fn targets(&self) -> &OrderedSet<StateName> {
        &self.targets
    }
}

/// Maps `(state, symbol)` pairs to sets of destination states.
///
/// The table is a list of entries plus an index from state and symbol to the positions of the
/// entries with that key. Usually every key has exactly one entry, to which [`Self::accumulate`]
/// keeps adding destinations. [`Self::push_entry`] on the other hand always appends a new entry,
/// even if the key is already present; this is how a definition that names the same pair twice is
/// represented so that validation can point it out. Looking up a pair yields the destinations of
/// all its entries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<TransitionEntry>", into = "Vec<TransitionEntry>")
)]
pub struct TransitionTable {
    entries: Vec<TransitionEntry>,
    index: Map<StateName, Map<Symbol, Vec<usize>>>,
}

impl TransitionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `to` as a destination of the pair `(from, symbol)`. If the pair has no entry yet, a
    /// new one is created, otherwise the destination is added to the first entry of that pair.
    /// Returns `false` if `to` already was a destination of that entry.
    pub fn accumulate(
        &mut self,
        from: impl Into<StateName>,
        symbol: impl Into<Symbol>,
        to: impl Into<StateName>,
    ) -> bool {
        let key = TransitionKey::new(from, symbol);
        let to: StateName = to.into();
        match self.positions(&key.from, &key.symbol).first().copied() {
            Some(pos) => self.entries[pos].targets.insert(to),
            None => {
                self.push_entry(key.from, key.symbol, [to]);
                true
            }
        }
    }

    /// Appends a new entry for `(from, symbol)` with the given destinations, regardless of whether
    /// the pair already has an entry.
    pub fn push_entry<I>(
        &mut self,
        from: impl Into<StateName>,
        symbol: impl Into<Symbol>,
        targets: I,
    ) where
        I: IntoIterator,
        I::Item: Into<StateName>,
    {
        let key = TransitionKey::new(from, symbol);
        let pos = self.entries.len();
        self.index
            .entry(key.from.clone())
            .or_default()
            .entry(key.symbol.clone())
            .or_default()
            .push(pos);
        self.entries.push(TransitionEntry {
            key,
            targets: targets.into_iter().map(Into::into).collect(),
        });
    }

    /// Returns the entries of the table in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &TransitionEntry> + '_ {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if there is at least one entry for the pair `(from, symbol)`, even if that
    /// entry has no destinations.
    pub fn contains_key(&self, from: &str, symbol: &str) -> bool {
        !self.positions(from, symbol).is_empty()
    }

    /// Iterates over the destinations of `(from, symbol)`, in order of first appearance and
    /// without duplicates.
    pub fn destinations<'a>(&'a self, from: &str, symbol: &str) -> Destinations<'a> {
        let positions = self.positions(from, symbol);
        Destinations {
            entries: &self.entries,
            positions: positions.iter(),
            current: None,
            seen: OrderedSet::default(),
            multiple: positions.len() > 1,
        }
    }

    /// Iterates over all `(from, symbol, to)` triples in table order.
    pub fn triples(&self) -> impl Iterator<Item = (&StateName, &Symbol, &StateName)> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry
                .targets
                .iter()
                .map(move |to| (&entry.key.from, &entry.key.symbol, to))
        })
    }

    fn positions(&self, from: &str, symbol: &str) -> &[usize] {
        self.index
            .get(from)
            .and_then(|symbols| symbols.get(symbol))
            .map(|positions| positions.as_slice())
            .unwrap_or_default()
    }

    /// Returns a string representation of the table as seen from `automaton`, one row per state
    /// of the automaton and one column per alphabet symbol.
    pub(super) fn build_table<SD>(&self, automaton: &Automaton, state_decorator: SD) -> String
    where
        SD: Fn(&str) -> String,
    {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(automaton.alphabet().iter().cloned()),
        );
        for state in automaton.states() {
            let mut row = vec![state_decorator(state)];
            for symbol in automaton.alphabet() {
                let targets: OrderedSet<&StateName> = self.destinations(state, symbol).collect();
                row.push(match targets.len() {
                    0 => "-".to_string(),
                    1 => targets.iter().join(""),
                    _ => format!("{{{}}}", targets.iter().join(", ")),
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl From<Vec<TransitionEntry>> for TransitionTable {
    fn from(entries: Vec<TransitionEntry>) -> Self {
        let mut table = TransitionTable::new();
        for entry in entries {
            table.push_entry(entry.key.from, entry.key.symbol, entry.targets);
        }
        table
    }
}

impl From<TransitionTable> for Vec<TransitionEntry> {
    fn from(table: TransitionTable) -> Self {
        table.entries
    }
}

impl<F, S, T> FromIterator<(F, S, T)> for TransitionTable
where
    F: Into<StateName>,
    S: Into<Symbol>,
    T: Into<StateName>,
{
    fn from_iter<I: IntoIterator<Item = (F, S, T)>>(iter: I) -> Self {
        let mut table = TransitionTable::new();
        for (from, symbol, to) in iter {
            table.accumulate(from, symbol, to);
        }
        table
    }
}

/// Iterator over the destinations of a `(state, symbol)` pair in a [`TransitionTable`], see
/// [`TransitionTable::destinations`].
pub struct Destinations<'a> {
    entries: &'a [TransitionEntry],
    positions: std::slice::Iter<'a, usize>,
    current: Option<indexmap::set::Iter<'a, StateName>>,
    seen: OrderedSet<&'a StateName>,
    multiple: bool,
}

impl<'a> Iterator for Destinations<'a> {
    type Item = &'a StateName;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(it) = self.current.as_mut() {
                for target in it.by_ref() {
                    // a single entry is duplicate free already
                    if !self.multiple || self.seen.insert(target) {
                        return Some(target);
                    }
                }
            }
            let pos = *self.positions.next()?;
            self.current = Some(self.entries[pos].targets.iter());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn accumulate_appends_to_existing_entry() {
        let mut table = TransitionTable::new();
        assert!(table.accumulate("q0", "a", "q1"));
        assert!(table.accumulate("q0", "a", "q2"));
        assert!(!table.accumulate("q0", "a", "q1"));
        assert!(table.accumulate("q1", "a", "q0"));

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.destinations("q0", "a").collect::<Vec<_>>(),
            vec!["q1", "q2"]
        );
        assert!(table.contains_key("q1", "a"));
        assert!(!table.contains_key("q1", "b"));
    }

    #[test]
    fn duplicate_entries_are_unioned() {
        let mut table = TransitionTable::new();
        table.push_entry("q0", "a", ["q1", "q2"]);
        table.push_entry("q0", "a", ["q2", "q0"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.destinations("q0", "a").collect::<Vec<_>>(),
            vec!["q1", "q2", "q0"]
        );
    }

    #[test]
    fn empty_entry_has_key_but_no_destinations() {
        let mut table = TransitionTable::new();
        table.push_entry("q0", "a", Vec::<String>::new());
        assert!(table.contains_key("q0", "a"));
        assert_eq!(table.destinations("q0", "a").count(), 0);
    }

    #[test]
    fn triples_in_table_order() {
        let table: TransitionTable = [("q0", "0", "q0"), ("q0", "0", "q1"), ("q1", "1", "q2")]
            .into_iter()
            .collect();
        assert_eq!(
            table
                .triples()
                .map(|(p, a, q)| format!("{p}{a}{q}"))
                .collect::<Vec<_>>(),
            vec!["q00q0", "q00q1", "q11q2"]
        );
        assert_eq!(TransitionKey::new("q0", "0").to_string(), "q0,0");
    }
}
