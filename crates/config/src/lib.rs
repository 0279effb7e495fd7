use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile field '{0}' cannot be empty")]
    EmptyField(&'static str),
    #[error("Profile '{0}' declares no print intrinsics")]
    NoPrintIntrinsics(String),
}

/// Assembly-dialect profile: the literal instruction text the block
/// classifier and the listing scanner match on. The rules themselves are
/// fixed in the engine; only the matched text varies per toolchain.
///
/// The defaults reproduce the upstream x86-64 AT&T compiler service.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DialectProfile {
    pub name: String,
    /// Token opening each step-boundary comment line in the raw listing.
    pub step_marker: String,
    /// Function whose snapshots anchor the prologue/main boundary.
    pub entry_function: String,
    /// Callee names treated as print intrinsics.
    pub print_intrinsics: Vec<String>,
    /// Call mnemonic substring.
    pub call_mnemonic: String,
    /// Frame-pointer push instruction.
    pub frame_push: String,
    /// Frame-pointer setup instruction.
    pub frame_setup: String,
    /// Global-symbol declaration directive.
    pub global_directive: String,
}

impl Default for DialectProfile {
    fn default() -> Self {
        Self {
            name: "x86_64-att".to_string(),
            step_marker: "# SNAPIDX".to_string(),
            entry_function: "main".to_string(),
            print_intrinsics: vec!["printf".to_string()],
            call_mnemonic: "call".to_string(),
            frame_push: "pushq %rbp".to_string(),
            frame_setup: "movq %rsp, %rbp".to_string(),
            global_directive: ".globl".to_string(),
        }
    }
}

impl DialectProfile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open dialect profile at {:?}", path.as_ref()))?;
        let profile: Self =
            serde_yaml::from_reader(f).context("Failed to parse dialect profile YAML")?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyField("name"));
        }
        if self.step_marker.trim().is_empty() {
            return Err(ProfileError::EmptyField("step_marker"));
        }
        if self.entry_function.trim().is_empty() {
            return Err(ProfileError::EmptyField("entry_function"));
        }
        if self.call_mnemonic.trim().is_empty() {
            return Err(ProfileError::EmptyField("call_mnemonic"));
        }
        if self.frame_push.trim().is_empty() {
            return Err(ProfileError::EmptyField("frame_push"));
        }
        if self.frame_setup.trim().is_empty() {
            return Err(ProfileError::EmptyField("frame_setup"));
        }
        if self.global_directive.trim().is_empty() {
            return Err(ProfileError::EmptyField("global_directive"));
        }
        if self.print_intrinsics.iter().all(|p| p.trim().is_empty()) {
            return Err(ProfileError::NoPrintIntrinsics(self.name.clone()));
        }
        Ok(())
    }
}
