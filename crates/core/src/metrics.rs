use crate::view::StepView;
use crate::SyncObserver;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts navigation activity for one session: total navigation events and
/// how many landed in startup code rather than user code.
#[derive(Debug, Default)]
pub struct NavigationMetrics {
    nav_events: AtomicU64,
    prologue_hits: AtomicU64,
    runs_loaded: AtomicU64,
}

impl NavigationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        self.nav_events.store(0, Ordering::SeqCst);
        self.prologue_hits.store(0, Ordering::SeqCst);
    }

    pub fn get_nav_events(&self) -> u64 {
        self.nav_events.load(Ordering::SeqCst)
    }

    pub fn get_prologue_hits(&self) -> u64 {
        self.prologue_hits.load(Ordering::SeqCst)
    }

    pub fn get_runs_loaded(&self) -> u64 {
        self.runs_loaded.load(Ordering::SeqCst)
    }
}

impl SyncObserver for NavigationMetrics {
    fn on_run_loaded(&self, _steps: usize, _blocks: usize) {
        self.runs_loaded.fetch_add(1, Ordering::SeqCst);
    }

    fn on_step(&self, view: &StepView) {
        self.nav_events.fetch_add(1, Ordering::SeqCst);
        if view.active_line.map_or(false, |l| l <= 0) {
            self.prologue_hits.fetch_add(1, Ordering::SeqCst);
        }
    }
}
