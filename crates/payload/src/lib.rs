use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracewalk_core::{RunData, Snapshot, Variable};
use tracing::{debug, info};

/// Wire model of one compiler-service response. Unknown fields are ignored;
/// everything past `success` is optional so a bare failure response still
/// parses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResponse {
    pub success: bool,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub logs: String,
    #[serde(default)]
    pub image_b64: Option<String>,
    #[serde(default)]
    pub stack: Option<Vec<RawSnapshot>>,
    /// Newline-delimited instruction stream, step markers included.
    #[serde(default)]
    pub asm: Option<String>,
    /// Source line to generated instructions; keys arrive as JSON-object
    /// strings.
    #[serde(default)]
    pub asm_by_line: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub label: String,
    #[serde(default)]
    pub func: String,
    #[serde(default)]
    pub line: Option<i32>,
    #[serde(default)]
    pub vars: Vec<RawVariable>,
    #[serde(default)]
    pub sp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVariable {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl CompileResponse {
    /// Integer-keyed line map. Keys that do not parse as line numbers are
    /// dropped without error.
    pub fn line_map(&self) -> BTreeMap<i32, Vec<String>> {
        let mut map = BTreeMap::new();
        if let Some(raw) = &self.asm_by_line {
            for (key, instructions) in raw {
                match key.trim().parse::<i32>() {
                    Ok(line) => {
                        map.insert(line, instructions.clone());
                    }
                    Err(_) => debug!(key = %key, "dropping malformed line key"),
                }
            }
        }
        map
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.stack
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|raw| Snapshot {
                label: raw.label.clone(),
                func: raw.func.clone(),
                line: raw.line,
                vars: raw
                    .vars
                    .iter()
                    .map(|v| Variable {
                        name: v.name.clone(),
                        ty: v.ty.clone(),
                        value: v.value.clone(),
                        offset: v.offset,
                    })
                    .collect(),
                stack_pointer: raw.sp,
            })
            .collect()
    }

    /// Normalizes the response into the engine's run inputs.
    pub fn into_run(self) -> RunData {
        let line_map = self.line_map();
        let snapshots = self.snapshots();
        RunData {
            success: self.success,
            output: self.output,
            logs: self.logs,
            image_b64: self.image_b64,
            snapshots,
            asm: self.asm.unwrap_or_default(),
            line_map,
        }
    }
}

/// Reads and parses one captured service response.
pub fn load_payload(path: &Path) -> Result<CompileResponse> {
    let buffer = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file: {:?}", path))?;

    let response: CompileResponse =
        serde_json::from_str(&buffer).context("Failed to parse compiler-service payload")?;

    info!(
        success = response.success,
        snapshots = response.stack.as_ref().map_or(0, |s| s.len()),
        "Payload loaded"
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "success": true,
        "output": "20 \n",
        "logs": "",
        "stack": [
            {"label": "decl x", "func": "main", "line": 4,
             "vars": [{"name": "x", "value": "1", "offset": -8, "type": "int"}]}
        ],
        "asm": ".globl main\n# SNAPIDX 0 decl x line 4\n movq $1, %rax\n",
        "asm_by_line": {"4": [" movq $1, %rax"]}
    }"#;

    #[test]
    fn test_parse_full_response() {
        let response: CompileResponse = serde_json::from_str(SAMPLE).unwrap();
        assert!(response.success);
        let stack = response.stack.as_ref().unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].vars[0].ty.as_deref(), Some("int"));
        assert_eq!(stack[0].vars[0].offset, Some(-8));
    }

    #[test]
    fn test_bare_failure_response_parses() {
        let response: CompileResponse =
            serde_json::from_str(r#"{"success": false, "logs": "error: oh no"}"#).unwrap();
        assert!(!response.success);
        assert!(response.stack.is_none());
        assert!(response.asm.is_none());
        assert_eq!(response.output, "");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let response: CompileResponse =
            serde_json::from_str(r#"{"success": true, "image_b64": "aGk=", "extra": 1}"#).unwrap();
        assert_eq!(response.image_b64.as_deref(), Some("aGk="));
    }

    #[test]
    fn test_line_map_drops_malformed_keys() {
        let response: CompileResponse = serde_json::from_str(
            r#"{"success": true,
                "asm_by_line": {"4": ["a"], "oops": ["b"], "": ["c"], "-1": ["d"], " 7 ": ["e"]}}"#,
        )
        .unwrap();
        let map = response.line_map();
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![-1, 4, 7]);
    }

    #[test]
    fn test_snapshot_idx_field_is_ignored() {
        // The service numbers snapshots; position in the sequence is the
        // identity, so the field is simply dropped.
        let response: CompileResponse = serde_json::from_str(
            r#"{"success": true,
                "stack": [{"label": "globals", "line": 0, "idx": 0, "vars": []}]}"#,
        )
        .unwrap();
        let snapshots = response.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].func, "");
        assert_eq!(snapshots[0].line, Some(0));
    }

    #[test]
    fn test_into_run_carries_everything() {
        let response: CompileResponse = serde_json::from_str(SAMPLE).unwrap();
        let run = response.into_run();
        assert!(run.success);
        assert_eq!(run.snapshots.len(), 1);
        assert_eq!(run.line_map.len(), 1);
        assert!(run.asm.contains("# SNAPIDX 0"));
        assert_eq!(run.output, "20 \n");
    }
}
