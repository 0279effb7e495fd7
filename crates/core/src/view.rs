use crate::blocks::AssemblyBlock;
use crate::snapshot::Variable;
use serde::Serialize;
use std::collections::HashSet;

/// A variable as presented to renderers. Missing optional fields become
/// explicit placeholders here; the engine keeps `None` internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableView {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub value: String,
    pub offset: Option<i64>,
}

impl From<&Variable> for VariableView {
    fn from(var: &Variable) -> Self {
        Self {
            name: var.name.clone(),
            ty: var.ty.clone().unwrap_or_else(|| "unknown".to_string()),
            value: var.value.clone().unwrap_or_else(|| "?".to_string()),
            offset: var.offset,
        }
    }
}

/// The per-step view model, recomputed on every navigation event and
/// consumed by the rendering layer and the editor-highlighting adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub step: usize,
    pub total: usize,
    pub label: String,
    pub func: String,
    pub line: Option<i32>,
    pub vars: Vec<VariableView>,
    /// Names new since the previous step, in this snapshot's order.
    pub added: Vec<String>,
    /// Names whose value or offset changed since the previous step.
    pub updated: HashSet<String>,
    pub active_line: Option<i32>,
    pub active_block: Option<AssemblyBlock>,
    /// 1-based source line for editor decoration; set only when the active
    /// line is positive.
    pub editor_line: Option<i32>,
    pub full_view: bool,
}

/// Non-interactive degradation when a run produced no snapshots: the raw
/// program output, compiler logs, and the optional rendered memory image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FallbackView {
    pub output: String,
    pub logs: String,
    pub image_b64: Option<String>,
}
