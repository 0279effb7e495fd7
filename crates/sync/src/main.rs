// Tracewalk - Step-Trace Correlation Engine
// Copyright (C) 2026 Tracewalk Team
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::io;
use tracewalk_sync::server::SyncServer;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut server = SyncServer::new();
    server.run(stdin.lock(), stdout.lock())?;

    Ok(())
}
