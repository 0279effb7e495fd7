use crate::snapshot::{Snapshot, Variable};
use std::collections::{HashMap, HashSet};

/// Variable changes between two consecutive snapshots. `added` keeps the
/// current snapshot's variable order; `updated` is an unordered name set.
/// There is no "removed" category: names absent from the current snapshot
/// are simply not reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarDiff {
    pub added: Vec<String>,
    pub updated: HashSet<String>,
}

/// Classifies each variable of `current` against `previous` (`None` on the
/// first step): absent before means added, a differing `value` or `offset`
/// means updated, identical means unclassified.
pub fn diff(current: &Snapshot, previous: Option<&Snapshot>) -> VarDiff {
    let prev_by_name: HashMap<&str, &Variable> = previous
        .map(|p| p.vars.iter().map(|v| (v.name.as_str(), v)).collect())
        .unwrap_or_default();

    let mut result = VarDiff::default();
    for var in &current.vars {
        match prev_by_name.get(var.name.as_str()) {
            None => result.added.push(var.name.clone()),
            Some(prev) if prev.value != var.value || prev.offset != var.offset => {
                result.updated.insert(var.name.clone());
            }
            Some(_) => {}
        }
    }
    result
}
