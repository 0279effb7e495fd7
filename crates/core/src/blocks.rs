// Tracewalk - Step-Trace Correlation Engine
// Copyright (C) 2026 Tracewalk Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::listing::MarkerIndex;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracewalk_config::DialectProfile;
use tracing::debug;

/// Sentinel source line for the synthesized prologue block.
pub const PROLOGUE_LINE: i32 = -1;

/// A contiguous group of assembly instructions attributed to one source
/// line, or to the prologue sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyBlock {
    pub source_line: i32,
    pub instructions: Vec<String>,
    pub label: Option<String>,
}

/// The displayed block sequence for one run: prologue-region blocks first,
/// then main blocks, both sorted ascending by source line. Exactly one block
/// exists per distinct source line; the prologue sentinel counts once.
#[derive(Debug, Clone, Default)]
pub struct BlockTimeline {
    prologue: Vec<AssemblyBlock>,
    main: Vec<AssemblyBlock>,
}

impl BlockTimeline {
    pub fn prologue_blocks(&self) -> &[AssemblyBlock] {
        &self.prologue
    }

    pub fn main_blocks(&self) -> &[AssemblyBlock] {
        &self.main
    }

    /// Prologue-region blocks followed by main blocks.
    pub fn iter(&self) -> impl Iterator<Item = &AssemblyBlock> {
        self.prologue.iter().chain(self.main.iter())
    }

    pub fn len(&self) -> usize {
        self.prologue.len() + self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prologue.is_empty() && self.main.is_empty()
    }

    pub fn first_prologue_line(&self) -> Option<i32> {
        self.prologue.first().map(|b| b.source_line)
    }

    pub fn last_line(&self) -> Option<i32> {
        self.iter().last().map(|b| b.source_line)
    }

    pub fn find(&self, line: i32) -> Option<&AssemblyBlock> {
        self.iter().find(|b| b.source_line == line)
    }
}

/// Groups the per-line assembly map into labeled blocks and partitions them
/// around the prologue/main boundary.
///
/// The boundary is the minimum positive snapshot line inside the profile's
/// entry function, falling back to the minimum positive line among the built
/// blocks. Blocks below it form the prologue region; when the region holds
/// more than one block, the first is dropped as a duplicate of the block
/// synthesized from the raw listing scan.
pub fn build_timeline(
    line_map: &BTreeMap<i32, Vec<String>>,
    listing: &MarkerIndex,
    snapshots: &[Snapshot],
    profile: &DialectProfile,
) -> BlockTimeline {
    let mut blocks: Vec<AssemblyBlock> = Vec::with_capacity(line_map.len() + 1);

    let prologue_instructions = listing.prologue_instructions();
    if !prologue_instructions.is_empty() {
        blocks.push(AssemblyBlock {
            source_line: PROLOGUE_LINE,
            instructions: prologue_instructions,
            label: None,
        });
    }

    for (line, instructions) in line_map {
        if *line == PROLOGUE_LINE {
            // The sentinel block already exists once the listing scan found
            // prologue text; fold mapped instructions into it.
            if let Some(sentinel) = blocks
                .iter_mut()
                .find(|b| b.source_line == PROLOGUE_LINE)
            {
                sentinel.instructions.extend(instructions.iter().cloned());
                continue;
            }
        }
        blocks.push(AssemblyBlock {
            source_line: *line,
            instructions: instructions.clone(),
            label: None,
        });
    }

    for block in &mut blocks {
        let label = classify(&*block, snapshots, profile);
        block.label = label;
    }

    blocks.sort_by_key(|b| b.source_line);

    let boundary = snapshots
        .iter()
        .filter(|s| s.func == profile.entry_function)
        .filter_map(|s| s.line)
        .filter(|line| *line > 0)
        .min()
        .or_else(|| {
            blocks
                .iter()
                .map(|b| b.source_line)
                .filter(|line| *line > 0)
                .min()
        });
    debug!(?boundary, blocks = blocks.len(), "partitioning block timeline");

    let (mut prologue, main): (Vec<_>, Vec<_>) = match boundary {
        Some(bound) => blocks.into_iter().partition(|b| b.source_line < bound),
        // No positive line anywhere: there is no main region.
        None => (blocks, Vec::new()),
    };
    if prologue.len() > 1 {
        prologue.remove(0);
    }

    BlockTimeline { prologue, main }
}

/// Heuristic label classifier over opaque instruction text. First matching
/// rule wins: snapshot label (unless it contains "start"), print intrinsic
/// call, any call, frame-pointer prologue pair, global-symbol declaration.
fn classify(
    block: &AssemblyBlock,
    snapshots: &[Snapshot],
    profile: &DialectProfile,
) -> Option<String> {
    if let Some(snap) = snapshots.iter().find(|s| {
        s.line == Some(block.source_line) && !s.label.is_empty() && !s.label.contains("start")
    }) {
        return Some(snap.label.clone());
    }

    let calls: Vec<&String> = block
        .instructions
        .iter()
        .filter(|i| i.contains(&profile.call_mnemonic))
        .collect();
    if calls.iter().any(|i| {
        profile
            .print_intrinsics
            .iter()
            .any(|p| !p.is_empty() && i.contains(p))
    }) {
        return Some("print".to_string());
    }
    if !calls.is_empty() {
        return Some("call".to_string());
    }

    let has_push = block.instructions.iter().any(|i| i.contains(&profile.frame_push));
    let has_setup = block
        .instructions
        .iter()
        .any(|i| i.contains(&profile.frame_setup));
    if has_push && has_setup {
        return Some("prolog".to_string());
    }

    if block
        .instructions
        .iter()
        .any(|i| i.contains(&profile.global_directive))
    {
        return Some("func".to_string());
    }

    None
}
