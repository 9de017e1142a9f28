//! Replication of a single project into the destination root.
//!
//! [`Replicator`] holds the decision logic (skip, clone, classify) and never
//! fails; [`GitCloneExecutor`] is the real `git clone` behind the
//! [`CloneExecutor`] seam.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::{SourceForgeSettings, DEFAULT_GIT_PROGRAM};
use crate::contract::{CloneExecutor, CloneReport, ProgressSink, ProjectDescriptor, ReplicationOutcome};
use crate::events::FetchEvent;

pub const NO_CLONE_URL: &str = "no clone URL";

/// Runs `<program> clone <url>` with the destination root as working directory.
#[derive(Debug, Clone)]
pub struct GitCloneExecutor {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Default for GitCloneExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCloneExecutor {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_GIT_PROGRAM),
            timeout: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Kills the clone process once `timeout` elapses.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_settings(settings: &SourceForgeSettings) -> Self {
        Self::new()
            .with_program(&settings.git_program)
            .with_timeout(settings.clone_timeout())
    }
}

#[async_trait]
impl CloneExecutor for GitCloneExecutor {
    async fn clone_repository(&self, url: &str, workdir: &Path) -> io::Result<CloneReport> {
        let child = Command::new(&self.program)
            .arg("clone")
            .arg(url)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("clone timed out after {limit:?}"),
                    ))
                }
            },
            None => child.wait_with_output().await?,
        };

        Ok(CloneReport {
            success: output.status.success(),
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Replicates one project at a time through a [`CloneExecutor`].
#[derive(Debug, Clone)]
pub struct Replicator<C> {
    executor: C,
}

impl<C: CloneExecutor> Replicator<C> {
    pub fn new(executor: C) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &C {
        &self.executor
    }

    /// Clones `project` into `destination_root` and classifies the result.
    ///
    /// `destination_root` must already exist. A project without a clone URL
    /// is skipped without touching the executor.
    pub async fn replicate(
        &self,
        project: &ProjectDescriptor,
        destination_root: &Path,
        sink: &dyn ProgressSink,
    ) -> ReplicationOutcome {
        let Some(clone_url) = project.clone_url.as_deref() else {
            tracing::debug!(repo_name = %project.name, "Project has no clone URL");
            return ReplicationOutcome::Skipped(NO_CLONE_URL.to_string());
        };

        sink.record(FetchEvent::CloneStarted {
            name: project.name.clone(),
            clone_url: clone_url.to_string(),
        });

        match self
            .executor
            .clone_repository(clone_url, destination_root)
            .await
        {
            Ok(report) if report.success => {
                tracing::debug!(
                    repo_name = %project.name,
                    path = %destination_root.display(),
                    "Clone exited successfully"
                );
                ReplicationOutcome::Cloned
            }
            Ok(report) => {
                let stderr = report.stderr.trim();
                let reason = if stderr.is_empty() {
                    match report.status_code {
                        Some(code) => format!("clone exited with status {code}"),
                        None => "clone terminated by signal".to_string(),
                    }
                } else {
                    stderr.to_string()
                };
                ReplicationOutcome::Failed(reason)
            }
            Err(e) => ReplicationOutcome::Failed(format!("Unexpected error running clone: {e}")),
        }
    }
}
