/// Navigation state for one run: the current step index and the full-view
/// toggle. The state is an immutable value; transitions go through
/// [`NavState::apply`] and always land inside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    pub index: usize,
    /// While set, per-step highlighting is suspended and every block shows.
    pub full_view: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Prev,
    Next,
    Jump(usize),
    FullView(bool),
}

impl NavState {
    /// Indices at or past `len` reset to 0: a shorter run may have replaced
    /// the data since this state was produced.
    pub fn clamp(self, len: usize) -> Self {
        if self.index >= len {
            Self { index: 0, ..self }
        } else {
            self
        }
    }

    pub fn apply(self, action: NavAction, len: usize) -> Self {
        let state = self.clamp(len);
        match action {
            NavAction::Prev => Self {
                index: state.index.saturating_sub(1),
                ..state
            },
            NavAction::Next => Self {
                index: if state.index + 1 < len {
                    state.index + 1
                } else {
                    state.index
                },
                ..state
            },
            NavAction::Jump(target) => Self {
                index: if target >= len { 0 } else { target },
                ..state
            },
            NavAction::FullView(true) => Self {
                full_view: true,
                ..state
            },
            // Leaving full view lands on the final step.
            NavAction::FullView(false) => Self {
                full_view: false,
                index: len.saturating_sub(1),
            },
        }
    }
}
