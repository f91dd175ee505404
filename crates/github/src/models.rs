//! Serde models for GitHub GraphQL search results.
//!
//! Field names follow the GraphQL schema (`camelCase`, `SCREAMING_SNAKE_CASE`
//! enum values). Only the fields the triage engine reads are modelled; unknown
//! fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use triage::ProviderId;

// ---------------------------------------------------------------------------
// Snapshot envelope
// ---------------------------------------------------------------------------

/// A saved set of search results, one entry per provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSnapshot {
    #[serde(default)]
    pub providers: Vec<ProviderSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSnapshot {
    pub provider: ProviderId,
    #[serde(default)]
    pub pull_requests: Searches<PullRequestNode>,
    #[serde(default)]
    pub issues: Searches<IssueNode>,
}

/// Results of the per-reason searches (`author:@me`, `review-requested:@me`,
/// `assignee:@me`, `mentions:@me`). One node may appear under several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Searches<T> {
    #[serde(default)]
    pub authored: Vec<T>,
    #[serde(default)]
    pub review_requested: Vec<T>,
    #[serde(default)]
    pub assigned: Vec<T>,
    #[serde(default)]
    pub mentioned: Vec<T>,
}

impl<T> Default for Searches<T> {
    fn default() -> Self {
        Self {
            authored: Vec::new(),
            review_requested: Vec::new(),
            assigned: Vec::new(),
            mentioned: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// GraphQL nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorNode {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerNode {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: String,
    pub owner: OwnerNode,
    #[serde(default)]
    pub viewer_permission: Option<RepositoryPermission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryPermission {
    Admin,
    Maintain,
    Write,
    Triage,
    Read,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeableStateNode {
    Mergeable,
    Conflicting,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecisionNode {
    Approved,
    ChangesRequested,
    ReviewRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusStateNode {
    Success,
    Failure,
    Error,
    Pending,
    Expected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCheckRollupNode {
    pub state: StatusStateNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    #[serde(default)]
    pub status_check_rollup: Option<StatusCheckRollupNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestCommitNode {
    pub commit: CommitNode,
}

/// `{ nodes: [...] }` connection wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub nodes: Vec<T>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// A user (`login`) or team (`name`) with a pending review request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestedReviewerNode {
    User { login: String },
    Team { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequestNode {
    #[serde(default)]
    pub requested_reviewer: Option<RequestedReviewerNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    /// `None` for pull requests from deleted accounts.
    #[serde(default)]
    pub author: Option<ActorNode>,
    pub repository: RepositoryNode,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_draft: bool,
    pub mergeable: MergeableStateNode,
    #[serde(default)]
    pub review_decision: Option<ReviewDecisionNode>,
    #[serde(default)]
    pub viewer_can_update: bool,
    /// Only the last commit is requested.
    #[serde(default)]
    pub commits: Connection<PullRequestCommitNode>,
    #[serde(default)]
    pub head_ref_name: Option<String>,
    #[serde(default)]
    pub head_ref_oid: Option<String>,
    #[serde(default)]
    pub head_repository_owner: Option<OwnerNode>,
    #[serde(default)]
    pub review_requests: Connection<ReviewRequestNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueNode {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub author: Option<ActorNode>,
    pub repository: RepositoryNode,
    pub updated_at: DateTime<Utc>,
}
