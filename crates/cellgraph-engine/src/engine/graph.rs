//! Bidirectional dependency graph over cell names.
//!
//! The graph stores ordered pairs `(s, t)` meaning "`t` depends on `s`":
//! `s` must be evaluated before `t`. It knows nothing about cells or
//! formulas, only names.
//!
//! ```text
//! {("a", "b"), ("a", "c"), ("b", "d"), ("d", "d")}
//!
//! dependents("a") = {"b", "c"}     dependees("a") = {}
//! dependents("b") = {"d"}          dependees("b") = {"a"}
//! dependents("c") = {}             dependees("c") = {"a"}
//! dependents("d") = {"d"}          dependees("d") = {"b", "d"}
//! ```

use std::collections::{BTreeMap, BTreeSet};

static NO_NAMES: BTreeSet<String> = BTreeSet::new();

/// Dependency graph with adjacency kept in both directions.
///
/// # Invariants
///
/// 1. **Bidirectional consistency:** `t ∈ dependents[s]` iff `s ∈ dependees[t]`.
/// 2. **No dangling entries:** empty sets are removed, not stored.
/// 3. **No duplicate pairs:** set semantics.
/// 4. `size` always equals the number of stored pairs.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    /// s -> {t : t depends on s}
    dependents: BTreeMap<String, BTreeSet<String>>,
    /// t -> {s : t depends on s}
    dependees: BTreeMap<String, BTreeSet<String>>,
    size: usize,
}

impl DependencyGraph {
    /// Create an empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `(s, t)` pairs in the graph.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of names `s` depends on, i.e. the size of `dependees(s)`.
    ///
    /// Cheap probe for "does `s` have prerequisites".
    pub fn dependee_count(&self, s: &str) -> usize {
        self.dependees.get(s).map_or(0, BTreeSet::len)
    }

    pub fn has_dependents(&self, s: &str) -> bool {
        self.dependents.contains_key(s)
    }

    pub fn has_dependees(&self, s: &str) -> bool {
        self.dependees.contains_key(s)
    }

    /// Names that depend on `s`. Read-only view; empty if there are none.
    pub fn dependents(&self, s: &str) -> &BTreeSet<String> {
        self.dependents.get(s).unwrap_or(&NO_NAMES)
    }

    /// Names that `s` depends on. Read-only view; empty if there are none.
    pub fn dependees(&self, s: &str) -> &BTreeSet<String> {
        self.dependees.get(s).unwrap_or(&NO_NAMES)
    }

    /// Iterate every `(s, t)` pair, ordered by `s` then `t`.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.dependents
            .iter()
            .flat_map(|(s, ts)| ts.iter().map(move |t| (s.as_str(), t.as_str())))
    }

    /// Add `(s, t)`. No-op if the pair is already present.
    pub fn add_dependency(&mut self, s: &str, t: &str) {
        let inserted = self
            .dependents
            .entry(s.to_owned())
            .or_default()
            .insert(t.to_owned());
        if inserted {
            self.dependees
                .entry(t.to_owned())
                .or_default()
                .insert(s.to_owned());
            self.size += 1;
        }
    }

    /// Remove `(s, t)`. No-op if the pair is absent.
    pub fn remove_dependency(&mut self, s: &str, t: &str) {
        if remove_member(&mut self.dependents, s, t) {
            remove_member(&mut self.dependees, t, s);
            self.size -= 1;
        }
    }

    /// Remove every `(s, *)` pair, then add `(s, t)` for each `t` in `new_dependents`.
    pub fn replace_dependents<I>(&mut self, s: &str, new_dependents: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let old: Vec<String> = self.dependents(s).iter().cloned().collect();
        for t in &old {
            self.remove_dependency(s, t);
        }
        for t in new_dependents {
            self.add_dependency(s, t.as_ref());
        }
    }

    /// Remove every `(*, s)` pair, then add `(t, s)` for each `t` in `new_dependees`.
    pub fn replace_dependees<I>(&mut self, s: &str, new_dependees: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let old: Vec<String> = self.dependees(s).iter().cloned().collect();
        for t in &old {
            self.remove_dependency(t, s);
        }
        for t in new_dependees {
            self.add_dependency(t.as_ref(), s);
        }
    }
}

/// Remove `member` from `map[key]`, dropping the entry once it is empty.
fn remove_member(map: &mut BTreeMap<String, BTreeSet<String>>, key: &str, member: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(member);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}
