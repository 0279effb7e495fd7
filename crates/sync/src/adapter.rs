use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracewalk_config::DialectProfile;
use tracewalk_core::{FallbackView, NavAction, StepView, TraceSession};

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("No run loaded")]
    NotLoaded,
}

/// Summary returned after a payload is correlated.
#[derive(Debug, Clone, Serialize)]
pub struct LoadInfo {
    pub steps: usize,
    pub blocks: usize,
    pub interactive: bool,
}

/// Listing slice for the current step: the accumulated lines and the
/// highlighted marker row, if any.
#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    pub lines: Vec<String>,
    pub highlight: Option<usize>,
}

/// Owns the session driven over the wire. Loading a new payload replaces
/// the previous session wholesale, so a stale run can never leak into a
/// newer one.
pub struct SyncAdapter {
    session: Option<TraceSession>,
    profile: DialectProfile,
}

impl Default for SyncAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncAdapter {
    pub fn new() -> Self {
        Self {
            session: None,
            profile: DialectProfile::default(),
        }
    }

    pub fn load(&mut self, payload: PathBuf, profile: Option<PathBuf>) -> Result<LoadInfo> {
        if let Some(path) = profile {
            self.profile = DialectProfile::from_file(&path)?;
        }

        let response = tracewalk_payload::load_payload(&payload)?;
        let session = TraceSession::from_run(response.into_run(), &self.profile)?;

        let info = LoadInfo {
            steps: session.step_count(),
            blocks: session.timeline().len(),
            interactive: session.is_interactive(),
        };
        self.session = Some(session);
        Ok(info)
    }

    fn session(&self) -> Result<&TraceSession> {
        Ok(self.session.as_ref().ok_or(AdapterError::NotLoaded)?)
    }

    fn session_mut(&mut self) -> Result<&mut TraceSession> {
        Ok(self.session.as_mut().ok_or(AdapterError::NotLoaded)?)
    }

    /// `None` means the session is in fallback mode.
    pub fn navigate(&mut self, action: NavAction) -> Result<Option<StepView>> {
        Ok(self.session_mut()?.navigate(action))
    }

    pub fn view(&self) -> Result<Option<StepView>> {
        Ok(self.session()?.current_view())
    }

    pub fn fallback(&self) -> Result<FallbackView> {
        Ok(self.session()?.fallback().clone())
    }

    pub fn listing(&self) -> Result<ListingView> {
        let session = self.session()?;
        let span = session.listing_span();
        Ok(ListingView {
            lines: session.listing_lines()[..span.end].to_vec(),
            highlight: span.highlight,
        })
    }
}
