//! High-level pipeline: ensure the target directory, list projects, replicate each one.
//!
//! # Responsibilities
//! - Single pass, strictly sequential: one listing call, then at most one
//!   clone attempt per listed project, in listing order.
//! - Only a target directory that cannot be created (or is not a writable
//!   directory) aborts the run with an error.
//! - Listing failures end the run early and per-project failures are
//!   recorded; both leave the run successful from the caller's side.
//!
//! # Navigation
//! - Main entrypoint: [`fetch`]
//! - Host-facing wrapper: [`SourceForgeDataSource`]
//! - Result type: [`FetchReport`]

use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{FetchParams, SourceForgeSettings};
use crate::connection::{self, ConnectionData};
use crate::contract::{
    CloneExecutor, DataSource, ProgressSink, ProjectDescriptor, ProjectLister, ReplicationOutcome,
};
use crate::error::{FetchError, ListingError};
use crate::events::{FetchEvent, TracingSink};
use crate::listing::SourceForgeLister;
use crate::replicate::{GitCloneExecutor, Replicator};

/// What happened to one listed project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    pub project: ProjectDescriptor,
    pub outcome: ReplicationOutcome,
}

/// Summary of one fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub username: String,
    pub target_directory: PathBuf,
    /// Set when the listing step failed; no project was attempted in that case.
    pub listing_error: Option<String>,
    pub projects: Vec<ProjectReport>,
}

impl FetchReport {
    fn new(params: &FetchParams) -> Self {
        Self {
            username: params.username.clone(),
            target_directory: params.target_directory.clone(),
            listing_error: None,
            projects: Vec::new(),
        }
    }

    pub fn cloned(&self) -> usize {
        self.projects.iter().filter(|p| p.outcome.is_cloned()).count()
    }

    pub fn skipped(&self) -> usize {
        self.projects.iter().filter(|p| p.outcome.is_skipped()).count()
    }

    pub fn failed(&self) -> usize {
        self.projects.iter().filter(|p| p.outcome.is_failed()).count()
    }
}

/// Creates `path` if absent; errors when it cannot exist as a writable directory.
///
/// Returns whether the directory had to be created.
pub fn ensure_target_directory(path: &Path) -> Result<bool, FetchError> {
    let directory_error = |source: io::Error| FetchError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    };

    let created = if path.exists() {
        false
    } else {
        fs::create_dir_all(path).map_err(directory_error)?;
        true
    };

    let metadata = fs::metadata(path).map_err(directory_error)?;
    if !metadata.is_dir() {
        return Err(directory_error(io::Error::other("path exists and is not a directory")));
    }
    // Mode bits alone miss ownership; only an actual write settles it.
    tempfile::NamedTempFile::new_in(path).map_err(directory_error)?;

    Ok(created)
}

/// Runs one fetch: target directory, listing, then sequential replication.
pub async fn fetch<L, C>(
    params: &FetchParams,
    lister: &L,
    replicator: &Replicator<C>,
    sink: &dyn ProgressSink,
) -> Result<FetchReport, FetchError>
where
    L: ProjectLister + ?Sized,
    C: CloneExecutor,
{
    let username = params.username.as_str();
    let target = params.target_directory.as_path();

    sink.record(FetchEvent::FetchStarted {
        username: username.to_string(),
        target_directory: target.to_path_buf(),
    });

    match ensure_target_directory(target) {
        Ok(true) => sink.record(FetchEvent::DirectoryCreated {
            path: target.to_path_buf(),
        }),
        Ok(false) => debug!(path = %target.display(), "Target directory already exists"),
        Err(e) => {
            let error = match &e {
                FetchError::DirectoryCreation { source, .. } => source.to_string(),
            };
            sink.record(FetchEvent::DirectoryCreationFailed {
                path: target.to_path_buf(),
                error,
            });
            return Err(e);
        }
    }

    let mut report = FetchReport::new(params);

    sink.record(FetchEvent::ListingStarted {
        username: username.to_string(),
    });
    let projects = match lister.list_projects(username).await {
        Ok(projects) => projects,
        Err(e) => {
            let error = listing_error_message(&e);
            sink.record(FetchEvent::ListingFailed {
                username: username.to_string(),
                error: error.clone(),
            });
            report.listing_error = Some(error);
            return Ok(report);
        }
    };

    if projects.is_empty() {
        sink.record(FetchEvent::NoProjects {
            username: username.to_string(),
        });
        return Ok(report);
    }

    sink.record(FetchEvent::ProjectsFound {
        count: projects.len(),
    });

    for project in projects {
        let outcome = replicator.replicate(&project, target, sink).await;
        sink.record(FetchEvent::ProjectReplicated {
            name: project.name.clone(),
            outcome: outcome.clone(),
        });
        report.projects.push(ProjectReport { project, outcome });
    }

    sink.record(FetchEvent::FetchFinished {
        username: username.to_string(),
        cloned: report.cloned(),
        skipped: report.skipped(),
        failed: report.failed(),
    });
    info!(
        username = %username,
        cloned = report.cloned(),
        skipped = report.skipped(),
        failed = report.failed(),
        "Fetch run complete"
    );

    Ok(report)
}

fn listing_error_message(e: &ListingError) -> String {
    match e {
        ListingError::Transport(inner) if inner.is_timeout() => {
            format!("request timed out: {inner}")
        }
        other => other.to_string(),
    }
}

/// The SourceForge data source: params plus its three collaborators.
pub struct SourceForgeDataSource<L = SourceForgeLister, C = GitCloneExecutor> {
    name: String,
    params: FetchParams,
    lister: L,
    replicator: Replicator<C>,
    sink: Arc<dyn ProgressSink>,
    plugin_dir: Option<PathBuf>,
}

impl SourceForgeDataSource {
    /// Wires the public REST lister and the `git` executor, logging through `tracing`.
    pub fn new(params: FetchParams, settings: &SourceForgeSettings) -> Result<Self, ListingError> {
        settings.trace_loaded();
        let lister = SourceForgeLister::from_settings(settings)?;
        let executor = GitCloneExecutor::from_settings(settings);
        Ok(Self::with_components(
            params,
            lister,
            executor,
            Arc::new(TracingSink),
        ))
    }
}

impl<L, C> SourceForgeDataSource<L, C>
where
    L: ProjectLister,
    C: CloneExecutor,
{
    pub fn with_components(
        params: FetchParams,
        lister: L,
        executor: C,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            name: format!("sourceforge:{}", params.username),
            params,
            lister,
            replicator: Replicator::new(executor),
            sink,
            plugin_dir: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Directory searched for `icon.svg`.
    pub fn with_plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_dir = Some(dir.into());
        self
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }
}

#[async_trait]
impl<L, C> DataSource for SourceForgeDataSource<L, C>
where
    L: ProjectLister,
    C: CloneExecutor,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn connection_data(&self) -> ConnectionData {
        connection::connection_data()
    }

    fn icon(&self) -> String {
        connection::icon_svg(self.plugin_dir.as_deref())
    }

    async fn fetch(&self) -> Result<FetchReport, FetchError> {
        fetch(&self.params, &self.lister, &self.replicator, self.sink.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_target_directory_creates_nested_path_once() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("a").join("b");

        assert!(ensure_target_directory(&target).unwrap());
        assert!(target.is_dir());
        assert!(!ensure_target_directory(&target).unwrap());
    }

    #[test]
    fn ensure_target_directory_rejects_plain_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("occupied");
        fs::write(&file, b"not a directory").unwrap();

        let err = ensure_target_directory(&file).unwrap_err();
        let FetchError::DirectoryCreation { path, .. } = err;
        assert_eq!(path, file);
    }

    #[test]
    fn ensure_target_directory_leaves_no_write_check_behind() {
        let root = tempfile::tempdir().unwrap();

        assert!(!ensure_target_directory(root.path()).unwrap());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn ensure_target_directory_rejects_unwritable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("locked");
        fs::create_dir(&target).unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users write through the mode bits; nothing to reject then.
        let writable = fs::write(target.join("canary"), b"").is_ok();
        let result = ensure_target_directory(&target);
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

        if writable {
            assert!(result.is_ok());
        } else {
            let FetchError::DirectoryCreation { path, source } = result.unwrap_err();
            assert_eq!(path, target);
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
    }

    #[test]
    fn report_counts_outcomes() {
        let params = FetchParams::new("alice", "/tmp/sf").unwrap();
        let mut report = FetchReport::new(&params);
        for outcome in [
            ReplicationOutcome::Cloned,
            ReplicationOutcome::Cloned,
            ReplicationOutcome::Skipped("no clone URL".into()),
            ReplicationOutcome::Failed("boom".into()),
        ] {
            report.projects.push(ProjectReport {
                project: ProjectDescriptor::new("p", None),
                outcome,
            });
        }
        assert_eq!((report.cloned(), report.skipped(), report.failed()), (2, 1, 1));
    }
}
