//! The classification decision procedure.
//!
//! [`classify`] is pure and total: every reachable pull request or issue
//! state maps to exactly one [`Classification`], and nothing here panics or
//! returns an error. States the procedure does not recognise are
//! [`Classification::Excluded`] rather than forced into a category.

use crate::{
    ActionCategory, Annotation, MergeableState, RemoteItem, ReviewDecision, SearchReason,
    SearchedPullRequest,
};

/// Outcome of classifying one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The item belongs in this category.
    Categorized(ActionCategory),
    /// The item carries a snooze annotation. It stays out of every category
    /// bucket whatever its state; the category it would otherwise have, if
    /// any, is kept so unsnoozing can restore it.
    Snoozed(Option<ActionCategory>),
    /// The item is not emitted.
    Excluded(Exclusion),
}

impl Classification {
    /// The category the item is (or would be, if not snoozed) bucketed in.
    pub fn category(self) -> Option<ActionCategory> {
        match self {
            Self::Categorized(category) => Some(category),
            Self::Snoozed(category) => category,
            Self::Excluded(_) => None,
        }
    }
}

/// Why an item was left out of the categorized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// Authored, approved and mergeable, but the viewer cannot merge it.
    ReadOnlyApproved,
    /// Review requested from the viewer, but CI is failing.
    ReviewWithFailedChecks,
    /// No rule in the decision procedure matched.
    NotActionable,
    /// Issues have no category in the taxonomy.
    Issue,
}

/// Classifies `item` given its current annotation, if any.
///
/// A snooze annotation wins over every other rule, so a snoozed pull request
/// is never excluded.
pub fn classify(item: RemoteItem<'_>, annotation: Option<&Annotation>) -> Classification {
    let searched = match item {
        RemoteItem::PullRequest(searched) => searched,
        RemoteItem::Issue(_) => return Classification::Excluded(Exclusion::Issue),
    };

    if annotation.is_some_and(Annotation::is_snooze) {
        return Classification::Snoozed(categorize(searched).ok());
    }

    match categorize(searched) {
        Ok(category) => Classification::Categorized(category),
        Err(exclusion) => Classification::Excluded(exclusion),
    }
}

/// Applies the authored / review-requested rules, ignoring annotations.
fn categorize(searched: &SearchedPullRequest) -> Result<ActionCategory, Exclusion> {
    let pr = &searched.pull_request;

    if searched.has_reason(SearchReason::Authored) {
        if pr.checks_failed() {
            return Ok(ActionCategory::FailedChecks);
        }

        let write = pr.viewer_has_write_access();
        match (pr.mergeable_state, pr.review_decision) {
            (MergeableState::Mergeable, Some(ReviewDecision::Approved)) => {
                return if write {
                    Ok(ActionCategory::Mergeable)
                } else {
                    Err(Exclusion::ReadOnlyApproved)
                };
            }
            (MergeableState::Mergeable, Some(ReviewDecision::ChangesRequested)) => {
                return Ok(ActionCategory::ChangesRequested);
            }
            (MergeableState::Mergeable, Some(ReviewDecision::ReviewRequired)) => {
                return Ok(ActionCategory::WaitingForReview);
            }
            (MergeableState::Mergeable, None) if !pr.requested_reviewers.is_empty() => {
                return Ok(ActionCategory::WaitingForReview);
            }
            (MergeableState::Conflicting, Some(ReviewDecision::Approved)) if write => {
                return Ok(ActionCategory::MergeableConflicts);
            }
            (MergeableState::Conflicting, _) => return Ok(ActionCategory::Conflicts),
            // Unknown mergeability, or mergeable with nothing to wait on:
            // fall through to the reviewer rule.
            _ => {}
        }
    }

    if searched.has_reason(SearchReason::ReviewRequested) {
        if pr.checks_failed() {
            return Err(Exclusion::ReviewWithFailedChecks);
        }
        return Ok(ActionCategory::NeedsReview);
    }

    Err(Exclusion::NotActionable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{annotation, pull_request};
    use crate::{AnnotationKind, CheckRollupState, RepositoryAccessLevel};

    fn classify_pr(searched: SearchedPullRequest) -> Classification {
        classify(RemoteItem::PullRequest(&searched), None)
    }

    #[test]
    fn authored_with_failed_checks_is_failed_checks() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.check_rollup = Some(CheckRollupState::Failed);
        pr.pull_request.review_decision = Some(ReviewDecision::Approved);

        let result = classify_pr(pr);
        assert_eq!(result, Classification::Categorized(ActionCategory::FailedChecks));
        assert_eq!(
            ActionCategory::FailedChecks.suggested_actions(),
            &[crate::FocusAction::Switch, crate::FocusAction::Open]
        );
    }

    #[test]
    fn authored_approved_with_write_access_is_mergeable() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.review_decision = Some(ReviewDecision::Approved);
        pr.pull_request.viewer_can_update = true;
        pr.pull_request.repository.access_level = Some(RepositoryAccessLevel::Write);

        assert_eq!(classify_pr(pr), Classification::Categorized(ActionCategory::Mergeable));
    }

    #[test]
    fn authored_approved_without_write_access_is_excluded() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.review_decision = Some(ReviewDecision::Approved);
        pr.pull_request.viewer_can_update = true;
        pr.pull_request.repository.access_level = Some(RepositoryAccessLevel::Read);

        assert_eq!(
            classify_pr(pr),
            Classification::Excluded(Exclusion::ReadOnlyApproved)
        );
    }

    #[test]
    fn viewer_cannot_update_means_no_write_access() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.review_decision = Some(ReviewDecision::Approved);
        pr.pull_request.viewer_can_update = false;
        pr.pull_request.repository.access_level = Some(RepositoryAccessLevel::Admin);

        assert_eq!(
            classify_pr(pr),
            Classification::Excluded(Exclusion::ReadOnlyApproved)
        );
    }

    #[test]
    fn authored_changes_requested() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.review_decision = Some(ReviewDecision::ChangesRequested);

        assert_eq!(
            classify_pr(pr),
            Classification::Categorized(ActionCategory::ChangesRequested)
        );
    }

    #[test]
    fn authored_review_required_is_waiting_for_review() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.review_decision = Some(ReviewDecision::ReviewRequired);

        assert_eq!(
            classify_pr(pr),
            Classification::Categorized(ActionCategory::WaitingForReview)
        );
    }

    #[test]
    fn authored_without_decision_waits_only_when_reviewers_requested() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        assert_eq!(
            classify_pr(pr.clone()),
            Classification::Excluded(Exclusion::NotActionable)
        );

        pr.pull_request.requested_reviewers = vec!["hubot".to_owned()];
        assert_eq!(
            classify_pr(pr),
            Classification::Categorized(ActionCategory::WaitingForReview)
        );
    }

    #[test]
    fn conflicting_approved_with_write_is_mergeable_conflicts() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.mergeable_state = MergeableState::Conflicting;
        pr.pull_request.review_decision = Some(ReviewDecision::Approved);
        pr.pull_request.viewer_can_update = true;
        pr.pull_request.repository.access_level = Some(RepositoryAccessLevel::Maintain);

        assert_eq!(
            classify_pr(pr),
            Classification::Categorized(ActionCategory::MergeableConflicts)
        );
    }

    #[test]
    fn conflicting_otherwise_is_conflicts() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.mergeable_state = MergeableState::Conflicting;
        pr.pull_request.review_decision = Some(ReviewDecision::Approved);
        assert_eq!(
            classify_pr(pr.clone()),
            Classification::Categorized(ActionCategory::Conflicts)
        );

        pr.pull_request.review_decision = None;
        assert_eq!(classify_pr(pr), Classification::Categorized(ActionCategory::Conflicts));
    }

    #[test]
    fn requested_reviewer_needs_review_unless_checks_failed() {
        let mut pr = pull_request("a", &[SearchReason::ReviewRequested]);
        pr.pull_request.check_rollup = Some(CheckRollupState::Pending);
        assert_eq!(
            classify_pr(pr.clone()),
            Classification::Categorized(ActionCategory::NeedsReview)
        );

        pr.pull_request.check_rollup = Some(CheckRollupState::Failed);
        assert_eq!(
            classify_pr(pr),
            Classification::Excluded(Exclusion::ReviewWithFailedChecks)
        );
    }

    #[test]
    fn authored_with_unknown_mergeability_falls_through_to_reviewer_rule() {
        let mut pr = pull_request("a", &[SearchReason::Authored, SearchReason::ReviewRequested]);
        pr.pull_request.mergeable_state = MergeableState::Unknown;

        assert_eq!(
            classify_pr(pr),
            Classification::Categorized(ActionCategory::NeedsReview)
        );
    }

    #[test]
    fn unrelated_pull_request_is_not_emitted() {
        let pr = pull_request("a", &[SearchReason::Mentioned]);
        assert_eq!(classify_pr(pr), Classification::Excluded(Exclusion::NotActionable));
    }

    #[test]
    fn snooze_keeps_the_underlying_category() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.review_decision = Some(ReviewDecision::ChangesRequested);
        let snooze = annotation("a", AnnotationKind::Snooze);

        let result = classify(RemoteItem::PullRequest(&pr), Some(&snooze));
        assert_eq!(result, Classification::Snoozed(Some(ActionCategory::ChangesRequested)));
        assert_eq!(result.category(), Some(ActionCategory::ChangesRequested));
    }

    #[test]
    fn snooze_wins_over_exclusions() {
        let snooze = annotation("a", AnnotationKind::Snooze);

        let mut failing_review = pull_request("a", &[SearchReason::ReviewRequested]);
        failing_review.pull_request.check_rollup = Some(CheckRollupState::Failed);
        assert_eq!(
            classify(RemoteItem::PullRequest(&failing_review), Some(&snooze)),
            Classification::Snoozed(None)
        );

        let mut read_only = pull_request("a", &[SearchReason::Authored]);
        read_only.pull_request.review_decision = Some(ReviewDecision::Approved);
        read_only.pull_request.viewer_can_update = false;
        assert_eq!(
            classify(RemoteItem::PullRequest(&read_only), Some(&snooze)),
            Classification::Snoozed(None)
        );

        let unrelated = pull_request("a", &[SearchReason::Mentioned]);
        assert_eq!(
            classify(RemoteItem::PullRequest(&unrelated), Some(&snooze)),
            Classification::Snoozed(None)
        );
    }

    #[test]
    fn pin_does_not_change_the_category() {
        let mut pr = pull_request("a", &[SearchReason::Authored]);
        pr.pull_request.review_decision = Some(ReviewDecision::ChangesRequested);
        let pin = annotation("a", AnnotationKind::Pin);

        assert_eq!(
            classify(RemoteItem::PullRequest(&pr), Some(&pin)),
            Classification::Categorized(ActionCategory::ChangesRequested)
        );
    }

    #[test]
    fn classification_is_total_and_single_valued() {
        use crate::RepositoryAccessLevel as Access;

        let reasons: [&[SearchReason]; 4] = [
            &[SearchReason::Authored],
            &[SearchReason::ReviewRequested],
            &[SearchReason::Authored, SearchReason::ReviewRequested],
            &[],
        ];
        let mergeable = [
            MergeableState::Mergeable,
            MergeableState::Conflicting,
            MergeableState::Unknown,
        ];
        let decisions = [
            None,
            Some(ReviewDecision::Approved),
            Some(ReviewDecision::ChangesRequested),
            Some(ReviewDecision::ReviewRequired),
        ];
        let checks = [
            None,
            Some(CheckRollupState::Success),
            Some(CheckRollupState::Pending),
            Some(CheckRollupState::Failed),
        ];
        let access = [(false, Some(Access::Admin)), (true, Some(Access::Read)), (true, Some(Access::Write))];

        for reason in reasons {
            for state in mergeable {
                for decision in decisions {
                    for check in checks {
                        for (can_update, level) in access {
                            let mut pr = pull_request("a", reason);
                            pr.pull_request.mergeable_state = state;
                            pr.pull_request.review_decision = decision;
                            pr.pull_request.check_rollup = check;
                            pr.pull_request.viewer_can_update = can_update;
                            pr.pull_request.repository.access_level = level;

                            let item = RemoteItem::PullRequest(&pr);
                            let first = classify(item, None);
                            // Deterministic: the same input always yields the same single outcome.
                            assert_eq!(first, classify(item, None));
                            if let Some(category) = first.category() {
                                assert!(ActionCategory::ALL.contains(&category));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn issues_are_excluded() {
        let issue = crate::test_support::issue("i");
        assert_eq!(
            classify(RemoteItem::Issue(&issue), None),
            Classification::Excluded(Exclusion::Issue)
        );
    }
}
