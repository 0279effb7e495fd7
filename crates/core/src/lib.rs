pub mod blocks;
pub mod diff;
pub mod listing;
pub mod metrics;
pub mod navigator;
pub mod resolver;
pub mod session;
pub mod snapshot;
pub mod view;


#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Compilation failed: {0}")]
    CompileFailed(String),
    #[error("Step marker count ({markers}) does not match snapshot count ({snapshots})")]
    MarkerMismatch { markers: usize, snapshots: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Trait for driving external views (editor decoration, scroll-into-view)
/// from navigation events in a modular way.
pub trait SyncObserver: std::fmt::Debug {
    fn on_run_loaded(&self, _steps: usize, _blocks: usize) {}
    fn on_step(&self, _view: &view::StepView) {}
}

pub use blocks::{AssemblyBlock, BlockTimeline, PROLOGUE_LINE};
pub use diff::{diff, VarDiff};
pub use listing::{ListingSpan, MarkerIndex};
pub use navigator::{NavAction, NavState};
pub use session::{RunData, TraceSession};
pub use snapshot::{Snapshot, SnapshotStore, Variable};
pub use view::{FallbackView, StepView, VariableView};
