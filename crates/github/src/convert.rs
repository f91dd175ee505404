//! Conversion from GitHub search nodes into triage domain items.

use std::collections::HashMap;

use triage::{
    Author, BranchName, CheckRollupState, CommitSha, EntityId, HeadRef, Issue, ItemNumber,
    MergeableState, ProviderId, PullRequest, RepositoryAccessLevel, RepositoryRef, ReviewDecision,
    SearchReason, SearchedIssue, SearchedPullRequest, Timestamp,
};

use crate::errors::GithubError;
use crate::models::{
    ActorNode, IssueNode, MergeableStateNode, PullRequestNode, RepositoryNode,
    RepositoryPermission, RequestedReviewerNode, ReviewDecisionNode, Searches, StatusStateNode,
};

/// Login GitHub reports for content whose author account was deleted.
const GHOST_LOGIN: &str = "ghost";

impl<T> Searches<T> {
    /// Flattens the searches into `(reason, node)` pairs, authored first.
    fn into_tagged(self) -> impl Iterator<Item = (SearchReason, T)> {
        let tag = |reason: SearchReason, nodes: Vec<T>| nodes.into_iter().map(move |n| (reason, n));
        tag(SearchReason::Authored, self.authored)
            .chain(tag(SearchReason::ReviewRequested, self.review_requested))
            .chain(tag(SearchReason::Assigned, self.assigned))
            .chain(tag(SearchReason::Mentioned, self.mentioned))
    }
}

// ---------------------------------------------------------------------------
// Search merging
// ---------------------------------------------------------------------------

/// Converts every pull request in `searches`, merging nodes returned by more
/// than one search into a single item carrying every reason.
///
/// Nodes that cannot be converted are skipped with a warning.
pub fn searched_pull_requests(
    provider: ProviderId,
    searches: Searches<PullRequestNode>,
) -> Vec<SearchedPullRequest> {
    let mut merged: Vec<SearchedPullRequest> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (reason, node) in searches.into_tagged() {
        if let Some(&at) = index.get(&node.id) {
            add_reason(&mut merged[at].reasons, reason);
            continue;
        }
        let id = node.id.clone();
        match pull_request(provider, node) {
            Ok(pull_request) => {
                index.insert(id, merged.len());
                merged.push(SearchedPullRequest {
                    pull_request,
                    reasons: vec![reason],
                });
            }
            Err(error) => tracing::warn!(%error, "Skipping pull request node"),
        }
    }
    merged
}

/// Issue counterpart of [`searched_pull_requests`].
pub fn searched_issues(provider: ProviderId, searches: Searches<IssueNode>) -> Vec<SearchedIssue> {
    let mut merged: Vec<SearchedIssue> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (reason, node) in searches.into_tagged() {
        if let Some(&at) = index.get(&node.id) {
            add_reason(&mut merged[at].reasons, reason);
            continue;
        }
        let id = node.id.clone();
        match issue(provider, node) {
            Ok(issue) => {
                index.insert(id, merged.len());
                merged.push(SearchedIssue {
                    issue,
                    reasons: vec![reason],
                });
            }
            Err(error) => tracing::warn!(%error, "Skipping issue node"),
        }
    }
    merged
}

fn add_reason(reasons: &mut Vec<SearchReason>, reason: SearchReason) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

pub fn pull_request(provider: ProviderId, node: PullRequestNode) -> Result<PullRequest, GithubError> {
    let entity_id = EntityId::new(node.id.as_str())
        .ok_or_else(|| GithubError::invalid_node("pull request", &node.id, "empty node id"))?;

    let check_rollup = node
        .commits
        .nodes
        .last()
        .and_then(|last| last.commit.status_check_rollup.as_ref())
        .map(|rollup| check_rollup_state(rollup.state));

    let head = node
        .head_ref_name
        .and_then(BranchName::new)
        .map(|branch| HeadRef {
            branch,
            sha: node.head_ref_oid.and_then(CommitSha::new),
            remote_owner: node.head_repository_owner.map(|owner| owner.login),
        });

    let requested_reviewers = node
        .review_requests
        .nodes
        .into_iter()
        .filter_map(|request| request.requested_reviewer)
        .map(|reviewer| match reviewer {
            RequestedReviewerNode::User { login } => login,
            RequestedReviewerNode::Team { name } => name,
        })
        .collect();

    Ok(PullRequest {
        provider,
        number: ItemNumber::new(node.number),
        entity_id,
        title: node.title,
        url: node.url,
        author: author(node.author),
        repository: repository(node.repository),
        updated_at: Timestamp::from_utc(node.updated_at),
        is_draft: node.is_draft,
        mergeable_state: mergeable_state(node.mergeable),
        review_decision: node.review_decision.map(review_decision),
        check_rollup,
        viewer_can_update: node.viewer_can_update,
        head,
        requested_reviewers,
    })
}

pub fn issue(provider: ProviderId, node: IssueNode) -> Result<Issue, GithubError> {
    let entity_id = EntityId::new(node.id.as_str())
        .ok_or_else(|| GithubError::invalid_node("issue", &node.id, "empty node id"))?;

    Ok(Issue {
        provider,
        number: ItemNumber::new(node.number),
        entity_id,
        title: node.title,
        url: node.url,
        author: author(node.author),
        repository: repository(node.repository),
        updated_at: Timestamp::from_utc(node.updated_at),
    })
}

fn author(actor: Option<ActorNode>) -> Author {
    match actor {
        Some(actor) => Author {
            name: actor.login,
            avatar_url: actor.avatar_url,
        },
        None => Author {
            name: GHOST_LOGIN.to_owned(),
            avatar_url: None,
        },
    }
}

fn repository(node: RepositoryNode) -> RepositoryRef {
    RepositoryRef {
        owner: node.owner.login,
        name: node.name,
        access_level: node.viewer_permission.map(access_level),
    }
}

// ---------------------------------------------------------------------------
// Enum mappings
// ---------------------------------------------------------------------------

fn access_level(permission: RepositoryPermission) -> RepositoryAccessLevel {
    match permission {
        RepositoryPermission::Admin => RepositoryAccessLevel::Admin,
        RepositoryPermission::Maintain => RepositoryAccessLevel::Maintain,
        RepositoryPermission::Write => RepositoryAccessLevel::Write,
        RepositoryPermission::Triage => RepositoryAccessLevel::Triage,
        RepositoryPermission::Read => RepositoryAccessLevel::Read,
    }
}

fn mergeable_state(state: MergeableStateNode) -> MergeableState {
    match state {
        MergeableStateNode::Mergeable => MergeableState::Mergeable,
        MergeableStateNode::Conflicting => MergeableState::Conflicting,
        MergeableStateNode::Unknown => MergeableState::Unknown,
    }
}

fn review_decision(decision: ReviewDecisionNode) -> ReviewDecision {
    match decision {
        ReviewDecisionNode::Approved => ReviewDecision::Approved,
        ReviewDecisionNode::ChangesRequested => ReviewDecision::ChangesRequested,
        ReviewDecisionNode::ReviewRequired => ReviewDecision::ReviewRequired,
    }
}

fn check_rollup_state(state: StatusStateNode) -> CheckRollupState {
    match state {
        StatusStateNode::Success => CheckRollupState::Success,
        StatusStateNode::Failure | StatusStateNode::Error => CheckRollupState::Failed,
        StatusStateNode::Pending | StatusStateNode::Expected => CheckRollupState::Pending,
    }
}
