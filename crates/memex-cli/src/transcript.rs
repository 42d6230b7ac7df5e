//! Thin wrapper around `memex_transcript::scan`, binding it to this
//! engine's configured transcript directory and cursor path.

use memex_core::errors::MemexResult;
use memex_transcript::ScanReport;

use crate::engine::MemexEngine;

/// No-op (with a debug log) if no transcript directory is configured —
/// scanning is best-effort and must never block a hook.
pub fn run_scan(engine: &MemexEngine) -> MemexResult<ScanReport> {
    let transcript_dir = match engine.transcript_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::debug!(error = %e, "transcript scan skipped: no directory configured");
            return Ok(ScanReport::default());
        }
    };

    memex_transcript::scan(
        &engine.store,
        &engine.embed,
        &transcript_dir,
        &engine.layout.transcript_cursor_path(),
        &engine.config.transcript,
        &engine.clock,
    )
}
