/// Index over the raw assembly listing. Step-boundary marker lines are
/// located by position: the n-th marker corresponds ordinally to the n-th
/// snapshot of the run.
#[derive(Debug, Clone, Default)]
pub struct MarkerIndex {
    lines: Vec<String>,
    markers: Vec<usize>,
}

/// Accumulated listing span for one step: lines `[0, end)` are visible,
/// `highlight` is the marker row for the step, when one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSpan {
    pub end: usize,
    pub highlight: Option<usize>,
}

impl MarkerIndex {
    /// Splits the listing into lines and records every line whose trimmed
    /// text starts with the marker token.
    pub fn parse(asm: &str, marker: &str) -> Self {
        let lines: Vec<String> = asm.lines().map(str::to_string).collect();
        let markers = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim().starts_with(marker))
            .map(|(idx, _)| idx)
            .collect();
        Self { lines, markers }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Non-blank lines preceding the first marker: the compiler/runtime
    /// startup text the user did not write.
    pub fn prologue_instructions(&self) -> Vec<String> {
        let end = self.markers.first().copied().unwrap_or(self.lines.len());
        self.lines[..end]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Visible span for `step`, reproducing the accumulated view: everything
    /// up to and including the marker ordinally matched to the step, with
    /// that marker row highlighted. Without markers the whole listing shows
    /// and nothing is highlighted.
    pub fn span_for_step(&self, step: usize) -> ListingSpan {
        if self.markers.is_empty() {
            return ListingSpan {
                end: self.lines.len(),
                highlight: None,
            };
        }
        let ordinal = if step + 1 < self.markers.len() {
            step + 1
        } else {
            self.markers.len() - 1
        };
        let row = self.markers[ordinal];
        ListingSpan {
            end: row + 1,
            highlight: Some(row),
        }
    }
}
