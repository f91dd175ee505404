//! Builders shared by this crate's unit tests.

use crate::{
    ActionCategory, Annotation, AnnotationId, AnnotationKind, Author, EntityId, FocusItem, Issue,
    ItemNumber, MergeableState, ProviderId, PullRequest, RepositoryRef, SearchReason,
    SearchedIssue, SearchedPullRequest, Timestamp,
};

fn repository() -> RepositoryRef {
    RepositoryRef {
        owner: "octo-org".to_owned(),
        name: "widgets".to_owned(),
        access_level: None,
    }
}

/// A mergeable pull request with no review decision, CI rollup, or write
/// access; tests set the fields they care about.
pub fn pull_request(entity: &str, reasons: &[SearchReason]) -> SearchedPullRequest {
    SearchedPullRequest {
        pull_request: PullRequest {
            provider: ProviderId::GitHub,
            number: ItemNumber::new(1),
            entity_id: EntityId::new(entity).unwrap(),
            title: format!("Pull request {entity}"),
            url: format!("https://github.com/octo-org/widgets/pull/{entity}"),
            author: Author {
                name: "octocat".to_owned(),
                avatar_url: None,
            },
            repository: repository(),
            updated_at: Timestamp::from_millis(1_000).unwrap(),
            is_draft: false,
            mergeable_state: MergeableState::Mergeable,
            review_decision: None,
            check_rollup: None,
            viewer_can_update: false,
            head: None,
            requested_reviewers: Vec::new(),
        },
        reasons: reasons.to_vec(),
    }
}

pub fn issue(entity: &str) -> SearchedIssue {
    SearchedIssue {
        issue: Issue {
            provider: ProviderId::GitHub,
            number: ItemNumber::new(7),
            entity_id: EntityId::new(entity).unwrap(),
            title: format!("Issue {entity}"),
            url: format!("https://github.com/octo-org/widgets/issues/{entity}"),
            author: Author {
                name: "octocat".to_owned(),
                avatar_url: None,
            },
            repository: repository(),
            updated_at: Timestamp::from_millis(1_000).unwrap(),
        },
        reasons: vec![SearchReason::Assigned],
    }
}

pub fn annotation(entity: &str, kind: AnnotationKind) -> Annotation {
    Annotation {
        id: AnnotationId::new(format!("annotation-{entity}")).unwrap(),
        entity_id: EntityId::new(entity).unwrap(),
        kind,
    }
}

/// A focus item in `category` updated at `sort_time` epoch millis.
pub fn focus_item(
    entity: &str,
    category: ActionCategory,
    sort_time: i64,
    annotation: Option<&Annotation>,
) -> FocusItem {
    let mut searched = pull_request(entity, &[SearchReason::Authored]);
    searched.pull_request.updated_at = Timestamp::from_millis(sort_time).unwrap();
    FocusItem::from_pull_request(&searched, Some(category), annotation)
}
