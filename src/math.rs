/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A set that remembers the order in which elements were first inserted. Inserting an element
/// that is already present neither duplicates it nor moves it. Iteration, and therefore every
/// message and table derived from it, is deterministic.
pub type OrderedSet<S> = indexmap::IndexSet<S, fxhash::FxBuildHasher>;
/// Map counterpart of [`OrderedSet`], keys are iterated in order of first insertion.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

/// Collects the given iterator into an [`OrderedSet`], suppressing duplicates while keeping
/// the position of the first occurrence.
pub fn ordered<S, I>(iter: I) -> OrderedSet<S>
where
    S: std::hash::Hash + Eq,
    I: IntoIterator<Item = S>,
{
    iter.into_iter().collect()
}

/// Returns `true` if and only if `left` and `right` share at least one element.
pub fn intersects<S: std::hash::Hash + Eq>(left: &OrderedSet<S>, right: &OrderedSet<S>) -> bool {
    if left.len() <= right.len() {
        left.iter().any(|x| right.contains(x))
    } else {
        right.iter().any(|x| left.contains(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_keeps_first_occurrence() {
        let set = ordered(["b", "a", "b", "c", "a"]);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn intersection_check() {
        let left = ordered(["q0", "q1"]);
        let right = ordered(["q2", "q1", "q3"]);
        assert!(intersects(&left, &right));
        assert!(!intersects(&left, &ordered(["q2"])));
        assert!(!intersects(&OrderedSet::<&str>::default(), &right));
    }
}
