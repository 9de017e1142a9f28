//! Progress events emitted during a fetch run, and the sinks that receive them.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::contract::{ProgressSink, ReplicationOutcome};

/// One step of the run narration. `Display` renders the operator-facing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    FetchStarted {
        username: String,
        target_directory: PathBuf,
    },
    DirectoryCreated {
        path: PathBuf,
    },
    DirectoryCreationFailed {
        path: PathBuf,
        error: String,
    },
    ListingStarted {
        username: String,
    },
    ListingFailed {
        username: String,
        error: String,
    },
    NoProjects {
        username: String,
    },
    ProjectsFound {
        count: usize,
    },
    CloneStarted {
        name: String,
        clone_url: String,
    },
    ProjectReplicated {
        name: String,
        outcome: ReplicationOutcome,
    },
    FetchFinished {
        username: String,
        cloned: usize,
        skipped: usize,
        failed: usize,
    },
}

impl FetchEvent {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            FetchEvent::DirectoryCreationFailed { .. }
                | FetchEvent::ListingFailed { .. }
                | FetchEvent::ProjectReplicated {
                    outcome: ReplicationOutcome::Failed(_),
                    ..
                }
        )
    }
}

impl fmt::Display for FetchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchEvent::FetchStarted {
                username,
                target_directory,
            } => write!(
                f,
                "Starting fetch process for SourceForge user '{}' into directory '{}'.",
                username,
                target_directory.display()
            ),
            FetchEvent::DirectoryCreated { path } => {
                write!(f, "Created directory: {}", path.display())
            }
            FetchEvent::DirectoryCreationFailed { path, error } => write!(
                f,
                "Failed to create directory '{}': {}",
                path.display(),
                error
            ),
            FetchEvent::ListingStarted { username } => write!(
                f,
                "Fetching list of repositories for SourceForge user '{username}'."
            ),
            FetchEvent::ListingFailed { username, error } => write!(
                f,
                "Error fetching repositories from SourceForge for user '{username}': {error}"
            ),
            FetchEvent::NoProjects { username } => {
                write!(f, "No repositories found for user '{username}'.")
            }
            FetchEvent::ProjectsFound { count } => write!(
                f,
                "Found {count} repositories. Starting cloning process."
            ),
            FetchEvent::CloneStarted { name, clone_url } => {
                write!(f, "Cloning repository '{name}' from {clone_url}...")
            }
            FetchEvent::ProjectReplicated { name, outcome } => match outcome {
                ReplicationOutcome::Cloned => write!(f, "Successfully cloned '{name}'."),
                ReplicationOutcome::Skipped(_) => write!(
                    f,
                    "No clone URL found for repository '{name}'. Skipping."
                ),
                ReplicationOutcome::Failed(reason) => {
                    write!(f, "Error cloning repository '{name}': {reason}")
                }
            },
            FetchEvent::FetchFinished {
                username,
                cloned,
                skipped,
                failed,
            } => write!(
                f,
                "Finished fetch for SourceForge user '{username}': {cloned} cloned, {skipped} skipped, {failed} failed."
            ),
        }
    }
}

/// Forwards events to `tracing`, keeping the rendered line as the message.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn record(&self, event: FetchEvent) {
        match &event {
            FetchEvent::DirectoryCreationFailed { path, error } => {
                tracing::error!(path = %path.display(), error = %error, "{}", event);
            }
            FetchEvent::ListingFailed { username, error } => {
                tracing::error!(username = %username, error = %error, "{}", event);
            }
            FetchEvent::ProjectReplicated {
                name,
                outcome: ReplicationOutcome::Failed(reason),
            } => {
                tracing::error!(repo_name = %name, reason = %reason, "{}", event);
            }
            FetchEvent::ProjectReplicated {
                name,
                outcome: ReplicationOutcome::Skipped(reason),
            } => {
                tracing::warn!(repo_name = %name, reason = %reason, "{}", event);
            }
            FetchEvent::CloneStarted { name, clone_url } => {
                tracing::info!(repo_name = %name, clone_url = %clone_url, "{}", event);
            }
            _ => tracing::info!("{}", event),
        }
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<FetchEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FetchEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }
}

impl ProgressSink for MemorySink {
    fn record(&self, event: FetchEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
