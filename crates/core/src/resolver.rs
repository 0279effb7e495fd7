use crate::blocks::{AssemblyBlock, BlockTimeline, PROLOGUE_LINE};
use crate::snapshot::Snapshot;

/// The resolved highlight target for one step. Highlighting is keyed by
/// block, never by snapshot, so repeated visits to the same line reuse the
/// same block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveBlock<'a> {
    pub line: Option<i32>,
    pub block: Option<&'a AssemblyBlock>,
}

/// Maps the current snapshot to the block that should be highlighted.
///
/// A defined non-positive line points at the first prologue-region block
/// (or the sentinel when the region is empty); an undefined line with a
/// non-empty timeline points at the last block; anything else passes the
/// snapshot line through. A line with no matching block yields no highlight.
pub fn resolve<'a>(snapshot: Option<&Snapshot>, timeline: &'a BlockTimeline) -> ActiveBlock<'a> {
    let target = snapshot.and_then(|s| s.line);
    let line = match target {
        Some(l) if l <= 0 => Some(timeline.first_prologue_line().unwrap_or(PROLOGUE_LINE)),
        None if !timeline.is_empty() => timeline.last_line(),
        other => other,
    };
    let block = line.and_then(|l| timeline.find(l));
    ActiveBlock { line, block }
}
