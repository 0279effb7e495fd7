use crate::blocks::{self, BlockTimeline};
use crate::diff;
use crate::listing::{ListingSpan, MarkerIndex};
use crate::navigator::{NavAction, NavState};
use crate::resolver;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::view::{FallbackView, StepView, VariableView};
use crate::{EngineError, EngineResult, SyncObserver};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use tracewalk_config::DialectProfile;

/// One run's worth of correlated inputs, already normalized from the wire
/// payload. A new run replaces the previous session wholesale; nothing is
/// mutated incrementally or persisted across runs.
#[derive(Debug, Clone, Default)]
pub struct RunData {
    pub success: bool,
    pub output: String,
    pub logs: String,
    pub image_b64: Option<String>,
    pub snapshots: Vec<Snapshot>,
    /// Raw newline-delimited instruction stream, marker lines included.
    pub asm: String,
    /// Source line to generated instructions.
    pub line_map: BTreeMap<i32, Vec<String>>,
}

/// The engine's composition root for one run: snapshot store, block
/// timeline, marker index, and navigation state. Every navigation event
/// recomputes the step view from scratch.
#[derive(Debug)]
pub struct TraceSession {
    store: SnapshotStore,
    timeline: BlockTimeline,
    listing: MarkerIndex,
    nav: NavState,
    fallback: FallbackView,
    observers: Vec<Arc<dyn SyncObserver>>,
}

impl TraceSession {
    /// Correlates one run. Fails when the service reported a compile error,
    /// or when the listing's marker count diverges from the snapshot count
    /// (the ordinal correlation between the two is a precondition, not
    /// something to coerce).
    pub fn from_run(run: RunData, profile: &DialectProfile) -> EngineResult<Self> {
        if !run.success {
            let message = if run.logs.trim().is_empty() {
                run.output.clone()
            } else {
                run.logs.clone()
            };
            return Err(EngineError::CompileFailed(message));
        }

        let listing = MarkerIndex::parse(&run.asm, &profile.step_marker);
        if !run.snapshots.is_empty() && listing.marker_count() != run.snapshots.len() {
            return Err(EngineError::MarkerMismatch {
                markers: listing.marker_count(),
                snapshots: run.snapshots.len(),
            });
        }

        let timeline = blocks::build_timeline(&run.line_map, &listing, &run.snapshots, profile);
        info!(
            snapshots = run.snapshots.len(),
            blocks = timeline.len(),
            "correlated run"
        );

        Ok(Self {
            store: SnapshotStore::new(run.snapshots),
            timeline,
            listing,
            nav: NavState::default(),
            fallback: FallbackView {
                output: run.output,
                logs: run.logs,
                image_b64: run.image_b64,
            },
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Arc<dyn SyncObserver>) {
        observer.on_run_loaded(self.store.len(), self.timeline.len());
        self.observers.push(observer);
    }

    /// False when the run produced no snapshots; only the fallback view is
    /// meaningful then.
    pub fn is_interactive(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn step_count(&self) -> usize {
        self.store.len()
    }

    pub fn nav(&self) -> NavState {
        self.nav
    }

    pub fn fallback(&self) -> &FallbackView {
        &self.fallback
    }

    pub fn timeline(&self) -> &BlockTimeline {
        &self.timeline
    }

    pub fn listing_lines(&self) -> &[String] {
        self.listing.lines()
    }

    /// Accumulated listing span for the current step.
    pub fn listing_span(&self) -> ListingSpan {
        self.listing.span_for_step(self.nav.index)
    }

    /// Applies one navigation action and recomputes the view. Returns
    /// `None` in fallback mode.
    pub fn navigate(&mut self, action: NavAction) -> Option<StepView> {
        self.nav = self.nav.apply(action, self.store.len());
        debug!(?action, index = self.nav.index, "navigated");
        let view = self.current_view()?;
        for observer in &self.observers {
            observer.on_step(&view);
        }
        Some(view)
    }

    pub fn current_view(&self) -> Option<StepView> {
        self.view_at(self.nav.clamp(self.store.len()).index)
    }

    /// Pure per-index view computation; does not touch navigation state.
    pub fn view_at(&self, index: usize) -> Option<StepView> {
        let snapshot = self.store.get(index)?;
        let previous = index.checked_sub(1).and_then(|i| self.store.get(i));
        let changes = diff::diff(snapshot, previous);
        let active = resolver::resolve(Some(snapshot), &self.timeline);

        Some(StepView {
            step: index,
            total: self.store.len(),
            label: snapshot.label.clone(),
            func: snapshot.func.clone(),
            line: snapshot.line,
            vars: snapshot.vars.iter().map(VariableView::from).collect(),
            added: changes.added,
            updated: changes.updated,
            active_line: active.line,
            active_block: active.block.cloned(),
            editor_line: active.line.filter(|l| *l > 0),
            full_view: self.nav.full_view,
        })
    }

    /// Views for every step in order, without disturbing navigation.
    pub fn export_views(&self) -> Vec<StepView> {
        (0..self.store.len())
            .filter_map(|index| self.view_at(index))
            .collect()
    }
}
