//! Raw, provider-sourced pull requests and issues.
//!
//! These values are produced by a [`crate::ProviderGateway`] and never mutated
//! afterwards: a new fetch yields new values. Classification reads them; the
//! derived [`crate::FocusItem`] copies what presentation needs.

use serde::{Deserialize, Serialize};

use crate::{
    BranchName, CheckRollupState, CommitSha, EntityId, ItemNumber, MergeableState, ProviderId,
    RepositoryAccessLevel, ReviewDecision, Timestamp,
};

// ---------------------------------------------------------------------------
// Shared parts
// ---------------------------------------------------------------------------

/// The account that opened a pull request or issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Login name (e.g. `"octocat"`).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// The repository that owns an item, as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
    /// The viewer's permission on the repository. `None` when the provider
    /// did not report it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<RepositoryAccessLevel>,
}

impl RepositoryRef {
    /// Returns `"owner/name"`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// The head of a pull request: the branch being proposed for merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadRef {
    pub branch: BranchName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<CommitSha>,
    /// Owner of the repository the head branch lives in. Differs from the
    /// base repository owner for pull requests opened from a fork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_owner: Option<String>,
}

/// Why a search returned an item for the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchReason {
    Authored,
    ReviewRequested,
    Assigned,
    Mentioned,
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub provider: ProviderId,
    pub number: ItemNumber,
    pub entity_id: EntityId,
    pub title: String,
    pub url: String,
    pub author: Author,
    pub repository: RepositoryRef,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub is_draft: bool,
    pub mergeable_state: MergeableState,
    #[serde(default)]
    pub review_decision: Option<ReviewDecision>,
    #[serde(default)]
    pub check_rollup: Option<CheckRollupState>,
    /// Whether the provider lets the viewer update (and therefore merge) the
    /// pull request.
    #[serde(default)]
    pub viewer_can_update: bool,
    #[serde(default)]
    pub head: Option<HeadRef>,
    /// Logins or team slugs with an outstanding review request.
    #[serde(default)]
    pub requested_reviewers: Vec<String>,
}

impl PullRequest {
    /// Returns `true` if the viewer may merge this pull request: the provider
    /// allows updates and the viewer holds at least `Write` on the repository.
    pub fn viewer_has_write_access(&self) -> bool {
        self.viewer_can_update
            && self
                .repository
                .access_level
                .is_some_and(|level| level >= RepositoryAccessLevel::Write)
    }

    /// Returns `true` if the CI rollup for the head commit failed.
    pub fn checks_failed(&self) -> bool {
        self.check_rollup == Some(CheckRollupState::Failed)
    }
}

/// A pull request together with the reasons the search matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchedPullRequest {
    pub pull_request: PullRequest,
    #[serde(default)]
    pub reasons: Vec<SearchReason>,
}

impl SearchedPullRequest {
    pub fn has_reason(&self, reason: SearchReason) -> bool {
        self.reasons.contains(&reason)
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub provider: ProviderId,
    pub number: ItemNumber,
    pub entity_id: EntityId,
    pub title: String,
    pub url: String,
    pub author: Author,
    pub repository: RepositoryRef,
    pub updated_at: Timestamp,
}

/// An issue together with the reasons the search matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchedIssue {
    pub issue: Issue,
    #[serde(default)]
    pub reasons: Vec<SearchReason>,
}

// ---------------------------------------------------------------------------
// Either kind
// ---------------------------------------------------------------------------

/// A borrowed view of one fetched item of either kind, as handed to the
/// classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteItem<'a> {
    PullRequest(&'a SearchedPullRequest),
    Issue(&'a SearchedIssue),
}

impl RemoteItem<'_> {
    pub fn entity_id(&self) -> &EntityId {
        match self {
            Self::PullRequest(pr) => &pr.pull_request.entity_id,
            Self::Issue(issue) => &issue.issue.entity_id,
        }
    }
}
