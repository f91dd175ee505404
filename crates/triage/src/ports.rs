//! Port traits for the collaborators the triage engine calls but does not own.
//!
//! Infrastructure crates implement these; the engine depends only on the
//! traits. All async methods are `dyn`-compatible through `async_trait` so
//! the engine can hold `Arc<dyn …>` handles supplied by the composition root.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
    Annotation, AnnotationFilter, AnnotationId, BranchName, CommitSha, EnrichableItem, ProviderId,
    RemoteName, SearchedIssue, SearchedPullRequest, Timestamp, TriageError,
};

// ---------------------------------------------------------------------------
// Provider gateway
// ---------------------------------------------------------------------------

/// Searches the registered hosting providers on the viewer's behalf.
///
/// Retry and rate-limit policy, if any, live in the implementation.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Open pull requests the viewer authored or was asked to review.
    async fn my_pull_requests(
        &self,
        providers: &[ProviderId],
        cancellation: &CancellationToken,
    ) -> Result<Vec<SearchedPullRequest>, TriageError>;

    /// Open issues assigned to, authored by, or mentioning the viewer.
    async fn my_issues(
        &self,
        providers: &[ProviderId],
        cancellation: &CancellationToken,
    ) -> Result<Vec<SearchedIssue>, TriageError>;
}

// ---------------------------------------------------------------------------
// Enrichment store
// ---------------------------------------------------------------------------

/// Out-of-process persistence for pin and snooze annotations.
///
/// Holds at most one annotation per entity; pinning a snoozed entity replaces
/// the snooze and vice versa.
#[async_trait]
pub trait EnrichmentStore: Send + Sync {
    /// Returns every stored annotation matching `filter` (all when `None`).
    async fn get(
        &self,
        filter: Option<&AnnotationFilter>,
        cancellation: &CancellationToken,
    ) -> Result<Vec<Annotation>, TriageError>;

    async fn pin_item(&self, item: &EnrichableItem) -> Result<Annotation, TriageError>;

    async fn unpin_item(&self, id: &AnnotationId) -> Result<(), TriageError>;

    async fn snooze_item(&self, item: &EnrichableItem) -> Result<Annotation, TriageError>;

    async fn unsnooze_item(&self, id: &AnnotationId) -> Result<(), TriageError>;
}

// ---------------------------------------------------------------------------
// Local repositories
// ---------------------------------------------------------------------------

/// Identifies the remote repository an item belongs to, for matching against
/// local working copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub provider: ProviderId,
    pub owner: String,
    pub name: String,
    pub url: String,
}

/// How far the locator may go to produce a working copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocateOptions {
    /// Ignore any repository already resolved on the item.
    pub force: bool,
    /// Open a matching repository that is known but not open.
    pub open_if_needed: bool,
    /// Ask the user to pick a repository when no match is known.
    pub prompt: bool,
    /// Keep a repository opened by this request open afterwards.
    pub keep_open: bool,
}

/// A remote configured in a local working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRemote {
    pub name: RemoteName,
    pub provider: Option<ProviderId>,
    /// Owner segment of the remote's repository path (`owner` in
    /// `github.com/owner/repo`), when the URL could be parsed.
    pub owner: Option<String>,
}

/// A branch in a local working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalBranch {
    pub name: BranchName,
    /// Upstream in `remote/branch` form, if tracking one.
    pub upstream: Option<String>,
    /// `true` for remote-tracking branches (`refs/remotes/...`).
    pub remote: bool,
}

/// A local working copy as exposed by the repository locator.
#[async_trait]
pub trait LocalRepository: Send + Sync + std::fmt::Debug {
    /// Filesystem path of the working copy.
    fn path(&self) -> &str;

    async fn remotes(&self) -> Result<Vec<GitRemote>, TriageError>;

    async fn branches(&self) -> Result<Vec<LocalBranch>, TriageError>;
}

/// A reference the "switch"/"review" workflows can check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchRef {
    /// An existing local branch already tracking the pull request head.
    Local {
        name: BranchName,
        upstream: String,
    },
    /// A remote branch that has not been fetched or checked out locally.
    RemoteUnmaterialized {
        remote: RemoteName,
        branch: BranchName,
        sha: Option<CommitSha>,
    },
}

impl BranchRef {
    /// The full ref name (`branch` or `remote/branch`).
    pub fn ref_name(&self) -> String {
        match self {
            Self::Local { name, .. } => name.to_string(),
            Self::RemoteUnmaterialized { remote, branch, .. } => format!("{remote}/{branch}"),
        }
    }
}

/// Resolves remote identities to local working copies.
#[async_trait]
pub trait RepositoryLocator: Send + Sync {
    async fn get_repository(
        &self,
        descriptor: &RepositoryDescriptor,
        options: LocateOptions,
    ) -> Result<Option<Arc<dyn LocalRepository>>, TriageError>;
}

/// Readiness gate for repository discovery.
///
/// Resolves immediately when no discovery is running.
#[async_trait]
pub trait RepositoryDiscovery: Send + Sync {
    async fn wait_for_discovery(&self);
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Source of "now" for TTL decisions; injected so tests control expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
