//! Best-effort git subprocess calls backing "recently changed files" in
//! the SessionStart packet (§6.7, §5 "git subprocess calls a 3-5-second
//! timeout"). Always non-fatal: a missing repo, missing `git` binary, or a
//! slow subprocess all degrade to an empty file list rather than failing
//! the hook.

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

const GIT_TIMEOUT: Duration = Duration::from_secs(4);

/// Files touched by the last few commits, newest first, deduplicated.
/// Returns an empty vec on any failure (no repo, no git, timeout).
pub fn recently_changed_files(repo_dir: &Path) -> Vec<String> {
    run_git(
        repo_dir,
        &["diff", "--name-only", "HEAD~5..HEAD"],
    )
    .map(|out| {
        let mut seen = std::collections::BTreeSet::new();
        out.lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .filter(|l| seen.insert(l.clone()))
            .collect()
    })
    .unwrap_or_default()
}

fn run_git(repo_dir: &Path, args: &[&str]) -> Option<String> {
    let (tx, rx) = mpsc::channel();
    let repo_dir = repo_dir.to_path_buf();
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();

    std::thread::spawn(move || {
        let output = Command::new("git")
            .args(&args)
            .current_dir(&repo_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output();
        let _ = tx.send(output);
    });

    match rx.recv_timeout(GIT_TIMEOUT) {
        Ok(Ok(output)) if output.status.success() => {
            String::from_utf8(output.stdout).ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_repo_returns_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(recently_changed_files(dir.path()).is_empty());
    }
}
