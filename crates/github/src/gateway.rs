//! [`ProviderGateway`] backed by a saved search snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use triage::{ProviderGateway, ProviderId, SearchedIssue, SearchedPullRequest, TriageError};

use crate::convert::{searched_issues, searched_pull_requests};
use crate::errors::GithubError;
use crate::models::{ProviderSnapshot, SearchSnapshot};

/// Replays GitHub search results saved as a JSON [`SearchSnapshot`].
///
/// The file is re-read on every call, so replacing it between refreshes is
/// picked up by the next forced fetch. A missing file reads as an empty
/// snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotGateway {
    path: PathBuf,
}

impl SnapshotGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SearchSnapshot, GithubError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No search snapshot; nothing to replay");
                return Ok(SearchSnapshot::default());
            }
            Err(source) => {
                return Err(GithubError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&contents).map_err(|source| GithubError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Loads the snapshot and keeps only the entries for `providers`.
    async fn providers(
        &self,
        providers: &[ProviderId],
    ) -> Result<impl Iterator<Item = ProviderSnapshot>, GithubError> {
        let snapshot = self.load().await?;
        let wanted = providers.to_vec();
        Ok(snapshot
            .providers
            .into_iter()
            .filter(move |entry| wanted.contains(&entry.provider)))
    }
}

#[async_trait]
impl ProviderGateway for SnapshotGateway {
    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn my_pull_requests(
        &self,
        providers: &[ProviderId],
        _cancellation: &CancellationToken,
    ) -> Result<Vec<SearchedPullRequest>, TriageError> {
        let mut pull_requests = Vec::new();
        for entry in self.providers(providers).await? {
            pull_requests.extend(searched_pull_requests(entry.provider, entry.pull_requests));
        }
        tracing::debug!(count = pull_requests.len(), "Replayed pull request searches");
        Ok(pull_requests)
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn my_issues(
        &self,
        providers: &[ProviderId],
        _cancellation: &CancellationToken,
    ) -> Result<Vec<SearchedIssue>, TriageError> {
        let mut issues = Vec::new();
        for entry in self.providers(providers).await? {
            issues.extend(searched_issues(entry.provider, entry.issues));
        }
        tracing::debug!(count = issues.len(), "Replayed issue searches");
        Ok(issues)
    }
}
