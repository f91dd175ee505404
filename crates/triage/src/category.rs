//! The action-category taxonomy, suggested actions, and presentation groups.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Action categories
// ---------------------------------------------------------------------------

/// What the viewer has to do next with a pull request.
///
/// Declaration order is priority order: the most actionable category comes
/// first, and the derived `Ord` is used by ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionCategory {
    Mergeable,
    MergeableConflicts,
    FailedChecks,
    Conflicts,
    ChangesRequested,
    NeedsReview,
    WaitingForReview,
}

impl ActionCategory {
    /// Every category in priority order.
    pub const ALL: [ActionCategory; 7] = [
        ActionCategory::Mergeable,
        ActionCategory::MergeableConflicts,
        ActionCategory::FailedChecks,
        ActionCategory::Conflicts,
        ActionCategory::ChangesRequested,
        ActionCategory::NeedsReview,
        ActionCategory::WaitingForReview,
    ];

    /// Zero-based priority; lower is more actionable.
    pub fn priority(self) -> usize {
        self as usize
    }

    /// The fixed, ordered actions offered for a pull request in this category.
    pub fn suggested_actions(self) -> &'static [FocusAction] {
        use FocusAction::*;
        match self {
            Self::Mergeable => &[Merge, Switch, Open],
            Self::MergeableConflicts => &[Switch, Open],
            Self::FailedChecks => &[Switch, Open],
            Self::Conflicts => &[Switch, Open],
            Self::ChangesRequested => &[Switch, Open],
            Self::NeedsReview => &[Review, DeclineReview, Open],
            Self::WaitingForReview => &[Nudge, ChangeReviewers, Switch, Open],
        }
    }

    /// The presentation group this category is bucketed into.
    pub fn group(self) -> FocusGroup {
        match self {
            Self::Mergeable => FocusGroup::Mergeable,
            Self::MergeableConflicts | Self::FailedChecks | Self::Conflicts => FocusGroup::Blocked,
            Self::ChangesRequested => FocusGroup::FollowUp,
            Self::NeedsReview => FocusGroup::NeedsReview,
            Self::WaitingForReview => FocusGroup::WaitingForReview,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mergeable => "Ready to Merge",
            Self::MergeableConflicts | Self::Conflicts => "Resolve Conflicts",
            Self::FailedChecks => "Failed Checks",
            Self::ChangesRequested => "Changes Requested",
            Self::NeedsReview => "Needs Your Review",
            Self::WaitingForReview => "Waiting for Review",
        }
    }

    /// One-line explanation of the category, with the item author filled in
    /// where the wording refers to them.
    pub fn description(self, author: &str) -> String {
        match self {
            Self::Mergeable => "Ready to merge".to_owned(),
            Self::MergeableConflicts => {
                "You need to resolve merge conflicts, before this can be merged".to_owned()
            }
            Self::FailedChecks => "You need to resolve the failing checks".to_owned(),
            Self::Conflicts => "You need to resolve merge conflicts".to_owned(),
            Self::ChangesRequested => {
                "Reviewers requested changes before this can be merged".to_owned()
            }
            Self::NeedsReview => format!("{author} requested your review"),
            Self::WaitingForReview => {
                "Waiting for reviewers to approve this pull request".to_owned()
            }
        }
    }
}

impl std::fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            Self::Mergeable => "mergeable",
            Self::MergeableConflicts => "mergeable-conflicts",
            Self::FailedChecks => "failed-checks",
            Self::Conflicts => "conflicts",
            Self::ChangesRequested => "changes-requested",
            Self::NeedsReview => "needs-review",
            Self::WaitingForReview => "waiting-for-review",
        };
        f.write_str(key)
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A remediation the presentation layer can offer for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusAction {
    Open,
    Merge,
    Review,
    Switch,
    ChangeReviewers,
    Nudge,
    DeclineReview,
}

impl FocusAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open on GitHub",
            Self::Merge => "Merge",
            Self::Review => "Start Review",
            Self::Switch => "Switch to Branch or Worktree",
            Self::ChangeReviewers => "Change Reviewers",
            Self::Nudge => "Nudge",
            Self::DeclineReview => "Decline Review",
        }
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// A user-facing bucket. `Pinned` and `Snoozed` are overlays; the rest are
/// derived from [`ActionCategory::group`].
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusGroup {
    Pinned,
    Mergeable,
    Blocked,
    NeedsReview,
    FollowUp,
    WaitingForReview,
    Snoozed,
}

impl FocusGroup {
    pub const ALL: [FocusGroup; 7] = [
        FocusGroup::Pinned,
        FocusGroup::Mergeable,
        FocusGroup::Blocked,
        FocusGroup::NeedsReview,
        FocusGroup::FollowUp,
        FocusGroup::WaitingForReview,
        FocusGroup::Snoozed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pinned => "Pinned",
            Self::Mergeable => "Ready to Merge",
            Self::Blocked => "Blocked",
            Self::NeedsReview => "Needs Your Review",
            Self::FollowUp => "Requires Follow-up",
            Self::WaitingForReview => "Waiting for Review",
            Self::Snoozed => "Snoozed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_declaration_order() {
        for (index, category) in ActionCategory::ALL.iter().enumerate() {
            assert_eq!(category.priority(), index);
        }
        assert!(ActionCategory::Mergeable < ActionCategory::WaitingForReview);
    }

    #[test]
    fn blocked_group_covers_conflicts_and_checks() {
        assert_eq!(ActionCategory::MergeableConflicts.group(), FocusGroup::Blocked);
        assert_eq!(ActionCategory::FailedChecks.group(), FocusGroup::Blocked);
        assert_eq!(ActionCategory::Conflicts.group(), FocusGroup::Blocked);
        assert_eq!(ActionCategory::ChangesRequested.group(), FocusGroup::FollowUp);
    }

    #[test]
    fn every_category_ends_with_open() {
        for category in ActionCategory::ALL {
            assert_eq!(category.suggested_actions().last(), Some(&FocusAction::Open));
        }
    }

    #[test]
    fn needs_review_description_names_the_author() {
        assert_eq!(
            ActionCategory::NeedsReview.description("octocat"),
            "octocat requested your review"
        );
    }

    #[test]
    fn display_uses_kebab_case_keys() {
        assert_eq!(ActionCategory::MergeableConflicts.to_string(), "mergeable-conflicts");
    }
}
