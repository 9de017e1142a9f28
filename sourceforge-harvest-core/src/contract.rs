//! # contract: collaborator interfaces of the harvesting pipeline
//!
//! The pipeline talks to three collaborators, each behind a trait so that
//! tests (and alternative hosts) can swap them out:
//!
//! - [`ProjectLister`]: turns an account name into [`ProjectDescriptor`]s.
//! - [`CloneExecutor`]: runs one external clone and reports its exit status
//!   and captured output.
//! - [`ProgressSink`]: receives the chronological narration of a run.
//!
//! [`DataSource`] is the seam towards a host framework that composes many
//! data sources: it only needs a `fetch` entry point plus descriptive metadata.
//!
//! ## Mocking & Testing
//! - The async traits are annotated for `mockall`; `MockProjectLister` and
//!   `MockCloneExecutor` are exported with the `test-export-mocks` feature.

use async_trait::async_trait;
use std::path::Path;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::connection::ConnectionData;
use crate::error::{FetchError, ListingError};
use crate::events::FetchEvent;
use crate::fetch::FetchReport;

/// Display name used when the upstream listing omits `name`.
pub const UNNAMED_REPOSITORY: &str = "Unnamed Repository";

/// One remote project as reported by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,
    /// A project without a clone URL cannot be replicated.
    pub clone_url: Option<String>,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>, clone_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            clone_url,
        }
    }
}

/// Per-project result of a replication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplicationOutcome {
    Cloned,
    Skipped(String),
    Failed(String),
}

impl ReplicationOutcome {
    pub fn is_cloned(&self) -> bool {
        matches!(self, ReplicationOutcome::Cloned)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ReplicationOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ReplicationOutcome::Failed(_))
    }
}

/// What an external clone process reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for discovering the projects of an account.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ProjectLister: Send + Sync {
    /// Returns the account's projects in upstream order.
    async fn list_projects(&self, username: &str) -> Result<Vec<ProjectDescriptor>, ListingError>;
}

/// Trait for running a single `clone <url>` inside a working directory.
///
/// A non-zero exit is reported through [`CloneReport::success`], not as an
/// `Err`; `Err` is reserved for failing to run the process at all.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CloneExecutor: Send + Sync {
    async fn clone_repository(&self, url: &str, workdir: &Path) -> std::io::Result<CloneReport>;
}

/// Receives progress and error events of a run.
pub trait ProgressSink: Send + Sync {
    fn record(&self, event: FetchEvent);
}

/// A pluggable data source as seen by a host framework.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Instance name, used in host logs and listings.
    fn name(&self) -> &str;

    /// Declared connection form for the host UI.
    fn connection_data(&self) -> ConnectionData;

    /// SVG icon markup.
    fn icon(&self) -> String;

    /// Runs one harvest. Only fatal conditions are returned as `Err`.
    async fn fetch(&self) -> Result<FetchReport, FetchError>;
}
