use serde::{Deserialize, Serialize};

/// One stack variable as captured at a pause point. `name` is unique within
/// a single snapshot; the remaining fields are whatever the compiler could
/// recover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub ty: Option<String>,
    /// Opaque formatted text; compared verbatim by the diff calculator.
    pub value: Option<String>,
    /// Frame-relative address.
    pub offset: Option<i64>,
}

/// One captured execution-pause state of the traced program.
///
/// `line` is `Some(-1)` for prologue captures and `None` when the compiler
/// attached no line at all. Position in the run's sequence is the snapshot's
/// identity; the same source line may appear at many positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub label: String,
    pub func: String,
    pub line: Option<i32>,
    pub vars: Vec<Variable>,
    pub stack_pointer: Option<i64>,
}

/// Immutable 0-indexed snapshot sequence for one run.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub fn as_slice(&self) -> &[Snapshot] {
        &self.snapshots
    }
}
