//! SourceForge REST project listing.
//!
//! `GET {base}/rest/u/{username}/projects/` returns a JSON array of project
//! objects. Only two fields matter here: `name` (not guaranteed by the
//! upstream schema) and `git_url`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{SourceForgeSettings, DEFAULT_API_BASE_URL};
use crate::contract::{ProjectDescriptor, ProjectLister, UNNAMED_REPOSITORY};
use crate::error::ListingError;

#[derive(Debug, Deserialize)]
struct ListedProject {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    git_url: Option<String>,
}

impl From<ListedProject> for ProjectDescriptor {
    fn from(p: ListedProject) -> Self {
        ProjectDescriptor {
            name: p.name.unwrap_or_else(|| UNNAMED_REPOSITORY.to_string()),
            clone_url: p.git_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Decodes a listing body, keeping upstream order.
pub fn parse_listing(body: &[u8]) -> Result<Vec<ProjectDescriptor>, ListingError> {
    let projects: Vec<ListedProject> = serde_json::from_slice(body)?;
    Ok(projects.into_iter().map(ProjectDescriptor::from).collect())
}

/// Lists projects through the public SourceForge REST API.
#[derive(Debug, Clone)]
pub struct SourceForgeLister {
    client: Client,
    base_url: String,
}

impl SourceForgeLister {
    pub fn new() -> Result<Self, ListingError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, None)
    }

    /// Points the lister at another host (a mirror, or a local test server).
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ListingError> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_settings(settings: &SourceForgeSettings) -> Result<Self, ListingError> {
        Self::with_base_url(settings.api_base_url.clone(), settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn projects_url(&self, username: &str) -> String {
        format!(
            "{}/rest/u/{}/projects/",
            self.base_url,
            urlencoding::encode(username)
        )
    }
}

#[async_trait]
impl ProjectLister for SourceForgeLister {
    async fn list_projects(&self, username: &str) -> Result<Vec<ProjectDescriptor>, ListingError> {
        let url = self.projects_url(username);
        info!(url = %url, username = %username, "Fetching SourceForge project listing");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to reach SourceForge listing endpoint");
            ListingError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "SourceForge listing returned error status");
            return Err(ListingError::RemoteListing {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let projects = parse_listing(&body).map_err(|e| {
            error!(error = ?e, url = %url, "Failed to parse SourceForge listing JSON");
            e
        })?;

        debug!(count = projects.len(), username = %username, "Parsed project listing");
        Ok(projects)
    }
}
