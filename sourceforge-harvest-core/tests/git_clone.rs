// Runs GitCloneExecutor and the replicator against a real local git repository.
// Skipped when no `git` binary is available on the test machine.

use sourceforge_harvest_core::contract::{CloneExecutor, ProjectDescriptor, ReplicationOutcome};
use sourceforge_harvest_core::events::MemorySink;
use sourceforge_harvest_core::replicate::{GitCloneExecutor, Replicator};
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tempfile::tempdir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .expect("git should run");
    assert!(status.success(), "git {args:?} failed");
}

/// Creates `<root>/upstream/tool-a` with one commit and returns its path.
fn make_upstream(root: &Path) -> std::path::PathBuf {
    let repo = root.join("upstream").join("tool-a");
    std::fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "-q"]);
    std::fs::write(repo.join("README"), "hello\n").unwrap();
    git(&repo, &["add", "README"]);
    git(&repo, &["commit", "-q", "-m", "initial"]);
    repo
}

#[tokio::test]
async fn clones_local_repository_into_workdir() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let root = tempdir().unwrap();
    let upstream = make_upstream(root.path());
    let dest = root.path().join("mirror");
    std::fs::create_dir(&dest).unwrap();

    let executor = GitCloneExecutor::new().with_timeout(Some(Duration::from_secs(60)));
    let report = executor
        .clone_repository(upstream.to_str().unwrap(), &dest)
        .await
        .unwrap();

    assert!(report.success, "clone failed: {}", report.stderr);
    assert_eq!(report.status_code, Some(0));
    assert!(dest.join("tool-a").join("README").is_file());
}

#[tokio::test]
async fn second_clone_into_same_root_fails_without_panicking() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let root = tempdir().unwrap();
    let upstream = make_upstream(root.path());
    let dest = root.path().join("mirror");
    std::fs::create_dir(&dest).unwrap();

    let project = ProjectDescriptor::new("tool-a", Some(upstream.to_string_lossy().into_owned()));
    let replicator = Replicator::new(GitCloneExecutor::new());
    let sink = MemorySink::new();

    assert_eq!(
        replicator.replicate(&project, &dest, &sink).await,
        ReplicationOutcome::Cloned
    );
    match replicator.replicate(&project, &dest, &sink).await {
        ReplicationOutcome::Failed(reason) => assert!(reason.contains("already exists"), "{reason}"),
        other => panic!("expected Failed on re-clone, got {other:?}"),
    }
}

#[tokio::test]
async fn bad_url_is_failed_with_stderr() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let root = tempdir().unwrap();
    let missing = root.path().join("does-not-exist");
    let project = ProjectDescriptor::new("ghost", Some(missing.to_string_lossy().into_owned()));

    let outcome = Replicator::new(GitCloneExecutor::new())
        .replicate(&project, root.path(), &MemorySink::new())
        .await;

    match outcome {
        ReplicationOutcome::Failed(reason) => {
            assert!(!reason.is_empty());
            assert_eq!(reason, reason.trim());
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}
