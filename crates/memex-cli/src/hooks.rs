//! Lifecycle contracts consumed from the supervisor (§6.7): SessionStart,
//! Stop, PreCompact. Each reads one JSON line from stdin and always exits
//! 0 — a hook that blocks the supervisor is worse than one that misses an
//! update, per §7's "External collaborator" failure-mode table.

use std::path::Path;

use chrono::Utc;
use serde::Deserialize;

use memex_core::constants::{HANDOFF_MIN_INTERVAL_SECONDS, SESSION_START_BUDGET_CHARS};
use memex_core::errors::MemexResult;
use memex_core::{Entry, EntryType, Tier};
use memex_storage::{LexicalFilter, ListFilter};

use crate::engine::MemexEngine;
use crate::git;
use crate::save;
use crate::transcript as transcript_runner;

#[derive(Debug, Deserialize)]
pub struct SessionStartInput {
    #[allow(dead_code)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StopInput {
    #[serde(default)]
    pub stop_hook_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct PreCompactInput {
    #[allow(dead_code)]
    pub trigger: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

/// Best-effort "what project am I in" signal. No field in any of the three
/// stdin contracts carries this, so it is read from the environment or the
/// process's working-directory name — documented as an Open Question
/// resolution in the design ledger.
fn current_project() -> Option<String> {
    std::env::var("MEMEX_PROJECT").ok().or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|d| d.file_name().map(|n| n.to_string_lossy().to_string()))
    })
}

pub fn session_start(engine: &MemexEngine, _input: SessionStartInput) -> String {
    let today = engine.today();
    let project = current_project();
    let mut packet = String::new();
    let mut total_entries: usize = 0;

    // Rules: never truncated.
    if let Ok(rules) = engine.store.list_rules() {
        total_entries += rules.len();
        if !rules.is_empty() {
            packet.push_str("## Rules\n");
            for r in &rules {
                packet.push_str(&format!("- [{}] {}\n", r.label.as_deref().unwrap_or(""), r.content));
            }
        }
    }

    // Pending-rule proposals.
    if let Ok(pending) = engine.store.find_by_tag("pending_rule") {
        total_entries += pending.len();
        push_budgeted_section(&mut packet, "Pending rule proposals", &pending);
    }

    // Recent non-ephemeral entries, last 3 days, current-project-first.
    if let Ok(mut recent) = engine.store.list(ListFilter {
        entry_type: None,
        days: Some(3),
        include_archived: false,
        today,
    }) {
        recent.retain(|e| e.tier != Tier::Ephemeral);
        total_entries += recent.len();
        if let Some(p) = &project {
            recent.sort_by_key(|e| if e.project.as_deref() == Some(p.as_str()) { 0 } else { 1 });
        }
        push_budgeted_section(&mut packet, "Recent entries", &recent);
    }

    // One latest handoff.
    if let Ok(handoffs) = engine.store.list(ListFilter {
        entry_type: Some(EntryType::Handoff),
        days: None,
        include_archived: false,
        today,
    }) {
        total_entries += handoffs.len();
        if let Some(latest) = handoffs.first() {
            push_budgeted_section(&mut packet, "Latest handoff", std::slice::from_ref(latest));
        }
    }

    // Recurring patterns.
    if let Ok(patterns) = engine.store.get_active_patterns() {
        if !patterns.is_empty() && remaining_budget(&packet) > 0 {
            packet.push_str("## Recurring patterns\n");
            for p in &patterns {
                let line = format!("- {} (seen {} times)\n", p.label, p.occurrence_count);
                if !fits(&packet, &line) {
                    break;
                }
                packet.push_str(&line);
            }
        }
    }

    // Related context for recently changed files.
    let repo_dir = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let changed_files = git::recently_changed_files(&repo_dir);
    if !changed_files.is_empty() {
        let mut related = Vec::new();
        for file in &changed_files {
            if let Ok(hits) = engine.store.search_lexical(
                file,
                3,
                LexicalFilter {
                    entry_type: None,
                    days: None,
                    include_archived: false,
                    today,
                },
            ) {
                related.extend(hits.into_iter().map(|(_, e)| e));
            }
        }
        push_budgeted_section(&mut packet, "Related to recently changed files", &related);

        // Co-change suggestions.
        if let Some(p) = &project {
            let mut lines = Vec::new();
            for file in &changed_files {
                if let Ok(pairs) = engine.store.get_cochanges(p, file, 3) {
                    for pair in pairs {
                        let other = if pair.file_a == *file { &pair.file_b } else { &pair.file_a };
                        lines.push(format!("- {} often changes with {}\n", file, other));
                    }
                }
            }
            if !lines.is_empty() && remaining_budget(&packet) > 0 {
                packet.push_str("## Co-change suggestions\n");
                for line in lines {
                    if !fits(&packet, &line) {
                        break;
                    }
                    packet.push_str(&line);
                }
            }
        }
    }

    // Cross-project recent insights.
    if let Ok(mut insights) = engine.store.list(ListFilter {
        entry_type: Some(EntryType::Insight),
        days: Some(7),
        include_archived: false,
        today,
    }) {
        if let Some(p) = &project {
            insights.retain(|e| e.project.as_deref() != Some(p.as_str()));
        }
        total_entries += insights.len();
        push_budgeted_section(&mut packet, "Cross-project insights", &insights);
    }

    // Maintenance summary, if any counter non-zero.
    if let Some(report) = read_last_maintenance(&engine.layout.last_maintenance_path()) {
        if report.any_nonzero() && remaining_budget(&packet) > 0 {
            let line = format!(
                "## Maintenance\ndecayed {}, demoted {}, promoted (stable) {}, promoted (frequent) {}, consolidated {}\n",
                report.decayed, report.demoted, report.promoted_stable, report.promoted_frequent, report.consolidated,
            );
            if fits(&packet, &line) {
                packet.push_str(&line);
            }
        }
    }

    packet.push_str(&format!("\n{total_entries} total entries in store.\n"));
    truncate_to_budget(packet)
}

fn push_budgeted_section(packet: &mut String, title: &str, entries: &[Entry]) {
    if entries.is_empty() || remaining_budget(packet) <= 0 {
        return;
    }
    let mut body = format!("## {title}\n");
    for e in entries {
        let line = format!("- [{}] {}\n", e.entry_type.as_str(), summarize(&e.content));
        body.push_str(&line);
    }
    if fits(packet, &body) {
        packet.push_str(&body);
    } else {
        // Degrade gracefully: keep adding lines until the budget runs out.
        let mut partial = format!("## {title}\n");
        for e in entries {
            let line = format!("- [{}] {}\n", e.entry_type.as_str(), summarize(&e.content));
            if !fits(packet, &(partial.clone() + &line)) {
                break;
            }
            partial.push_str(&line);
        }
        packet.push_str(&partial);
    }
}

fn summarize(content: &str) -> String {
    content.chars().take(200).collect()
}

fn remaining_budget(packet: &str) -> i64 {
    SESSION_START_BUDGET_CHARS as i64 - packet.chars().count() as i64
}

fn fits(packet: &str, addition: &str) -> bool {
    packet.chars().count() + addition.chars().count() <= SESSION_START_BUDGET_CHARS
}

fn truncate_to_budget(mut packet: String) -> String {
    if packet.chars().count() > SESSION_START_BUDGET_CHARS {
        packet = packet.chars().take(SESSION_START_BUDGET_CHARS).collect();
    }
    packet
}

fn read_last_maintenance(path: &Path) -> Option<memex_maintain::MaintenanceReport> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

pub fn stop(engine: &MemexEngine, input: StopInput) -> MemexResult<()> {
    if input.stop_hook_active {
        return Ok(());
    }

    let _ = transcript_runner::run_scan(engine);

    if seconds_since_last_handoff(&engine.layout.last_handoff_path()) >= HANDOFF_MIN_INTERVAL_SECONDS {
        let result = save::save(
            engine,
            EntryType::Handoff,
            "Session handoff: end of turn.".to_string(),
            vec!["handoff".to_string()],
            None,
            None,
            None,
            None,
            current_project(),
        )?;
        std::fs::write(
            engine.layout.last_handoff_path(),
            Utc::now().timestamp_millis().to_string(),
        )
        .ok();
        engine.store.bump_access(&[result.id], engine.today())?;
    }

    Ok(())
}

fn seconds_since_last_handoff(path: &Path) -> i64 {
    let Ok(text) = std::fs::read_to_string(path) else {
        return i64::MAX;
    };
    let Ok(last_ms) = text.trim().parse::<i64>() else {
        return i64::MAX;
    };
    let now_ms = Utc::now().timestamp_millis();
    (now_ms - last_ms) / 1000
}

pub fn pre_compact(engine: &MemexEngine, _input: PreCompactInput) -> MemexResult<()> {
    let _ = transcript_runner::run_scan(engine);

    save::save(
        engine,
        EntryType::Progress,
        "Pre-compaction snapshot.".to_string(),
        vec!["compaction-snapshot".to_string()],
        None,
        None,
        None,
        None,
        current_project(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_start_always_ends_with_a_total_count_line() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();
        let packet = session_start(&engine, SessionStartInput { source: None });
        assert!(packet.contains("total entries in store"));
        assert!(packet.chars().count() <= SESSION_START_BUDGET_CHARS);
    }

    #[test]
    fn stop_is_a_noop_when_stop_hook_already_active() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();
        stop(&engine, StopInput { stop_hook_active: true }).unwrap();
        let status = engine.store.status().unwrap();
        assert_eq!(status.total, 0);
    }

    #[test]
    fn pre_compact_always_inserts_a_progress_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();
        pre_compact(
            &engine,
            PreCompactInput {
                trigger: "auto".to_string(),
                custom_instructions: None,
            },
        )
        .unwrap();
        let status = engine.store.status().unwrap();
        assert_eq!(status.total, 1);
    }
}
