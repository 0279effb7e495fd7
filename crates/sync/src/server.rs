// Tracewalk - Step-Trace Correlation Engine
// Copyright (C) 2026 Tracewalk Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::adapter::SyncAdapter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use tracewalk_core::NavAction;

/// Content-Length framed JSON server driving a trace session for external
/// renderers (editor decoration, assembly/memory panels).
pub struct SyncServer {
    adapter: SyncAdapter,
    seq: AtomicI64,
}

#[derive(Debug, Deserialize)]
struct SyncRequest {
    seq: i64,
    #[serde(flatten)]
    command: Command,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "command", content = "arguments", rename_all = "camelCase")]
enum Command {
    Initialize,
    Load {
        payload: PathBuf,
        #[serde(default)]
        profile: Option<PathBuf>,
    },
    Next,
    Prev,
    Jump {
        index: usize,
    },
    FullView {
        enabled: bool,
    },
    View,
    Listing,
    Disconnect,
}

#[derive(Serialize)]
struct SyncResponse {
    seq: i64,
    #[serde(rename = "type")]
    type_: String,
    request_seq: i64,
    success: bool,
    command: String,
    message: Option<String>,
    body: Option<Value>,
}

fn command_name(cmd: &Command) -> &'static str {
    match cmd {
        Command::Initialize => "initialize",
        Command::Load { .. } => "load",
        Command::Next => "next",
        Command::Prev => "prev",
        Command::Jump { .. } => "jump",
        Command::FullView { .. } => "fullView",
        Command::View => "view",
        Command::Listing => "listing",
        Command::Disconnect => "disconnect",
    }
}

impl Default for SyncServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncServer {
    pub fn new() -> Self {
        Self {
            adapter: SyncAdapter::new(),
            seq: AtomicI64::new(1),
        }
    }

    /// A navigation answer: the step view when the run is interactive, the
    /// fallback body otherwise.
    fn step_body(&self, view: Option<tracewalk_core::StepView>) -> Result<Value> {
        match view {
            Some(view) => Ok(serde_json::to_value(view)?),
            None => Ok(json!({ "fallback": self.adapter.fallback()? })),
        }
    }

    fn handle(&mut self, command: &Command) -> Result<Option<Value>> {
        match command {
            Command::Initialize => Ok(Some(json!({
                "name": "tracewalk-sync",
                "version": env!("CARGO_PKG_VERSION"),
                "supports_full_view": true,
                "supports_listing": true,
            }))),
            Command::Load { payload, profile } => {
                let info = self.adapter.load(payload.clone(), profile.clone())?;
                Ok(Some(serde_json::to_value(info)?))
            }
            Command::Next => {
                let view = self.adapter.navigate(NavAction::Next)?;
                Ok(Some(self.step_body(view)?))
            }
            Command::Prev => {
                let view = self.adapter.navigate(NavAction::Prev)?;
                Ok(Some(self.step_body(view)?))
            }
            Command::Jump { index } => {
                let view = self.adapter.navigate(NavAction::Jump(*index))?;
                Ok(Some(self.step_body(view)?))
            }
            Command::FullView { enabled } => {
                let view = self.adapter.navigate(NavAction::FullView(*enabled))?;
                Ok(Some(self.step_body(view)?))
            }
            Command::View => {
                let view = self.adapter.view()?;
                Ok(Some(self.step_body(view)?))
            }
            Command::Listing => Ok(Some(serde_json::to_value(self.adapter.listing()?)?)),
            Command::Disconnect => Ok(None),
        }
    }

    pub fn run<R: Read, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        let mut reader = BufReader::new(input);

        loop {
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    return Ok(()); // EOF
                }
                let line = line.trim();
                if line.is_empty() {
                    break; // End of headers
                }
                if let Some(rest) = line.strip_prefix("Content-Length: ") {
                    if let Ok(len) = rest.parse() {
                        content_length = len;
                    }
                }
            }

            if content_length == 0 {
                continue;
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body)?;

            let request: SyncRequest = match serde_json::from_slice(&body) {
                Ok(req) => req,
                Err(e) => {
                    tracing::error!("Failed to parse request: {}", e);
                    continue;
                }
            };

            if matches!(request.command, Command::Disconnect) {
                return Ok(());
            }

            let (success, message, body) = match self.handle(&request.command) {
                Ok(body) => (true, None, body),
                Err(e) => {
                    tracing::error!(command = command_name(&request.command), "{}", e);
                    (false, Some(format!("{:#}", e)), None)
                }
            };

            let response = SyncResponse {
                seq: self.seq.fetch_add(1, Ordering::SeqCst),
                type_: "response".to_string(),
                request_seq: request.seq,
                success,
                command: command_name(&request.command).to_string(),
                message,
                body,
            };

            let resp_json = serde_json::to_string(&response)?;
            write!(
                output,
                "Content-Length: {}\r\n\r\n{}",
                resp_json.len(),
                resp_json
            )?;
            output.flush()?;
        }
    }
}
