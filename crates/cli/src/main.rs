use anyhow::{Context, Result};
use base64::Engine;
use clap::Parser;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracewalk_config::DialectProfile;
use tracewalk_core::metrics::NavigationMetrics;
use tracewalk_core::{NavAction, TraceSession};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tracewalk Replayer", long_about = None)]
struct Args {
    /// Path to a captured compiler-service payload (JSON)
    #[arg(short, long)]
    payload: PathBuf,

    /// Path to a dialect profile (YAML); default is the built-in x86-64 profile
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Enable navigation-level execution tracing
    #[arg(short, long)]
    trace: bool,

    /// Directory for report.json and the decoded memory image
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Write the serialized step views to this file
    #[arg(long)]
    dump_views: Option<PathBuf>,
}

fn payload_hash(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read payload for hashing: {:?}", path))?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
}

fn write_report(
    dir: &Path,
    args: &Args,
    profile: &DialectProfile,
    session: &TraceSession,
) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {:?}", dir))?;

    let report = json!({
        "status": "pass",
        "payload": &args.payload,
        "payload_hash": payload_hash(&args.payload)?,
        "profile": &profile.name,
        "steps": session.step_count(),
        "blocks": session.timeline().len(),
        "interactive": session.is_interactive(),
        "views": session.export_views(),
    });

    let report_path = dir.join("report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed to write report: {:?}", report_path))?;
    info!("Report written to {:?}", report_path);

    if let Some(b64) = &session.fallback().image_b64 {
        match base64::engine::general_purpose::STANDARD.decode(b64) {
            Ok(bytes) => {
                let image_path = dir.join("memory.png");
                std::fs::write(&image_path, bytes)
                    .with_context(|| format!("Failed to write image: {:?}", image_path))?;
                info!("Memory image written to {:?}", image_path);
            }
            Err(e) => warn!("Could not decode memory image: {}", e),
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    info!("Starting Tracewalk Replayer");

    let profile = if let Some(profile_path) = &args.profile {
        info!("Loading dialect profile: {:?}", profile_path);
        DialectProfile::from_file(profile_path)?
    } else {
        info!("Using built-in dialect profile");
        DialectProfile::default()
    };

    info!("Loading payload: {:?}", args.payload);
    let response = tracewalk_payload::load_payload(&args.payload)?;

    let mut session = TraceSession::from_run(response.into_run(), &profile)?;
    let metrics = Arc::new(NavigationMetrics::new());
    session.add_observer(metrics.clone());

    if session.is_interactive() {
        info!(
            "Replaying {} steps over {} blocks...",
            session.step_count(),
            session.timeline().len()
        );

        session.navigate(NavAction::Jump(0));
        for _ in 1..session.step_count() {
            if let Some(view) = session.navigate(NavAction::Next) {
                info!(
                    step = view.step,
                    label = %view.label,
                    line = ?view.line,
                    active_line = ?view.active_line,
                    added = ?view.added,
                    updated = ?view.updated,
                    "step"
                );
            }
        }

        info!(
            "Replay finished: {} navigation events, {} in startup code",
            metrics.get_nav_events(),
            metrics.get_prologue_hits()
        );
    } else {
        // No snapshots: non-interactive fallback, show the run's output.
        info!("Run produced no snapshots; fallback view only");
        let fallback = session.fallback();
        if !fallback.output.is_empty() {
            info!("Program output:\n{}", fallback.output);
        }
        if !fallback.logs.is_empty() {
            info!("Compiler logs:\n{}", fallback.logs);
        }
    }

    if let Some(dir) = &args.report_dir {
        write_report(dir, &args, &profile, &session)?;
    }

    if let Some(path) = &args.dump_views {
        let views = session.export_views();
        std::fs::write(path, serde_json::to_string_pretty(&views)?)
            .with_context(|| format!("Failed to write step views: {:?}", path))?;
        info!("Step views written to {:?}", path);
    }

    Ok(())
}
