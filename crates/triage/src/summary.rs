//! Condensed view of a grouped triage set for status indicators.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ActionCategory, EntityId, FocusGroup, GroupedItems, ItemNumber};

/// How many blocked items fall under each blocking reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockedBreakdown {
    pub failed_checks: usize,
    pub mergeable_conflicts: usize,
    pub conflicts: usize,
}

/// The item a status indicator should point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItem {
    pub entity_id: EntityId,
    pub number: ItemNumber,
    pub group: FocusGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageSummary {
    pub counts: BTreeMap<FocusGroup, usize>,
    pub blocked: BlockedBreakdown,
    /// First mergeable item, else first blocked item.
    pub top_item: Option<TopItem>,
}

impl TriageSummary {
    pub fn from_grouped(grouped: &GroupedItems) -> Self {
        let counts = grouped
            .iter()
            .map(|(group, items)| (*group, items.len()))
            .collect();

        let mut blocked = BlockedBreakdown::default();
        for item in grouped.get(&FocusGroup::Blocked).into_iter().flatten() {
            match item.category {
                Some(ActionCategory::FailedChecks) => blocked.failed_checks += 1,
                Some(ActionCategory::MergeableConflicts) => blocked.mergeable_conflicts += 1,
                Some(ActionCategory::Conflicts) => blocked.conflicts += 1,
                _ => {}
            }
        }

        let top_item = [FocusGroup::Mergeable, FocusGroup::Blocked]
            .into_iter()
            .find_map(|group| {
                grouped.get(&group).and_then(|items| items.first()).map(|item| TopItem {
                    entity_id: item.entity_id.clone(),
                    number: item.number,
                    group,
                })
            });

        Self {
            counts,
            blocked,
            top_item,
        }
    }

    /// `true` when nothing needs attention. Snoozed items do not count.
    ///
    /// An empty set caused by a suppressed fetch failure looks the same as a
    /// genuinely empty one.
    pub fn all_caught_up(&self) -> bool {
        self.counts
            .iter()
            .all(|(group, count)| *group == FocusGroup::Snoozed || *count == 0)
    }

    pub fn count(&self, group: FocusGroup) -> usize {
        self.counts.get(&group).copied().unwrap_or(0)
    }

    /// One line per non-empty group, as a status tooltip would list them.
    pub fn lines(&self) -> Vec<String> {
        if self.all_caught_up() {
            return vec!["You are all caught up!".to_owned()];
        }

        let mut lines = Vec::new();
        for (group, count) in &self.counts {
            let line = match group {
                FocusGroup::Mergeable => {
                    format!("{} that can be merged.", pluralize_prs(*count))
                }
                FocusGroup::Blocked => {
                    let mut parts = Vec::new();
                    if self.blocked.failed_checks > 0 {
                        parts.push(format!("{} failed CI checks", self.blocked.failed_checks));
                    }
                    if self.blocked.mergeable_conflicts > 0 {
                        parts.push(format!(
                            "{} can be merged once conflicts are resolved",
                            self.blocked.mergeable_conflicts
                        ));
                    }
                    if self.blocked.conflicts > 0 {
                        parts.push(format!("{} with conflicts", self.blocked.conflicts));
                    }
                    format!("{} blocked: {}.", pluralize_prs(*count), parts.join("; "))
                }
                FocusGroup::NeedsReview => {
                    format!("{} waiting for your review.", pluralize_prs(*count))
                }
                FocusGroup::FollowUp => {
                    format!("{} reviewed but requiring changes.", pluralize_prs(*count))
                }
                FocusGroup::WaitingForReview => {
                    format!("{} waiting on reviewers.", pluralize_prs(*count))
                }
                FocusGroup::Pinned | FocusGroup::Snoozed => {
                    format!("{} {}.", pluralize_prs(*count), group.label().to_lowercase())
                }
            };
            lines.push(line);
        }
        lines
    }
}

fn pluralize_prs(count: usize) -> String {
    if count == 1 {
        "1 pull request".to_owned()
    } else {
        format!("{count} pull requests")
    }
}
