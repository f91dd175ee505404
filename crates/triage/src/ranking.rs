//! Ranking and grouping of classified items.
//!
//! Pin/snooze flags can be flipped concurrently by the mutation coordinator,
//! so each item's flags are read once up front and the sort runs over that
//! snapshot. Sorting against live flags could observe an inconsistent order
//! mid-sort.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::{ActionCategory, FocusGroup, FocusItem};

/// Items bucketed by group, in group display order. Empty groups are absent.
pub type GroupedItems = BTreeMap<FocusGroup, Vec<FocusItem>>;

struct Ranked {
    key: (bool, bool, Option<ActionCategory>, Reverse<i64>),
    pinned: bool,
    snoozed: bool,
    item: FocusItem,
}

fn rank(items: &[FocusItem]) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = items
        .iter()
        .map(|item| {
            let (pinned, snoozed) = item.flags();
            Ranked {
                // `false < true`, so pinned items (key `false`) sort first and
                // uncategorized items sort after every category.
                key: (
                    !pinned,
                    item.category.is_none(),
                    item.category,
                    Reverse(item.sort_time),
                ),
                pinned,
                snoozed,
                item: item.clone(),
            }
        })
        .collect();
    // Stable: items with equal keys keep their input order.
    ranked.sort_by(|a, b| a.key.cmp(&b.key));
    ranked
}

/// Returns `items` ordered pinned first, then by category priority, then
/// most recent first.
pub fn sort_focus_items(items: &[FocusItem]) -> Vec<FocusItem> {
    rank(items).into_iter().map(|ranked| ranked.item).collect()
}

/// Sorts `items` and buckets them into presentation groups.
///
/// Snoozed items land only in [`FocusGroup::Snoozed`]. Pinned items land in
/// [`FocusGroup::Pinned`] and also in their category's group. An item with no
/// category that is neither snoozed nor pinned lands nowhere.
pub fn group_and_sort(items: &[FocusItem]) -> GroupedItems {
    let mut grouped = GroupedItems::new();

    for ranked in rank(items) {
        if ranked.snoozed {
            grouped.entry(FocusGroup::Snoozed).or_default().push(ranked.item);
            continue;
        }

        if ranked.pinned {
            grouped
                .entry(FocusGroup::Pinned)
                .or_default()
                .push(ranked.item.clone());
        }

        if let Some(category) = ranked.item.category {
            grouped.entry(category.group()).or_default().push(ranked.item);
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{annotation, focus_item};
    use crate::AnnotationKind;

    fn ids(items: &[FocusItem]) -> Vec<&str> {
        items.iter().map(|item| item.entity_id.as_str()).collect()
    }

    #[test]
    fn more_recent_first_within_a_category() {
        let items = vec![
            focus_item("old", ActionCategory::Conflicts, 100, None),
            focus_item("new", ActionCategory::Conflicts, 200, None),
        ];

        assert_eq!(ids(&sort_focus_items(&items)), ["new", "old"]);
    }

    #[test]
    fn category_priority_beats_recency() {
        let items = vec![
            focus_item("waiting", ActionCategory::WaitingForReview, 900, None),
            focus_item("merge", ActionCategory::Mergeable, 100, None),
        ];

        assert_eq!(ids(&sort_focus_items(&items)), ["merge", "waiting"]);
    }

    #[test]
    fn pinned_items_sort_ahead_of_everything() {
        let pin = annotation("pinned", AnnotationKind::Pin);
        let items = vec![
            focus_item("merge", ActionCategory::Mergeable, 900, None),
            focus_item("pinned", ActionCategory::WaitingForReview, 1, Some(&pin)),
        ];

        assert_eq!(ids(&sort_focus_items(&items)), ["pinned", "merge"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let items = vec![
            focus_item("first", ActionCategory::NeedsReview, 5, None),
            focus_item("second", ActionCategory::NeedsReview, 5, None),
        ];

        assert_eq!(ids(&sort_focus_items(&items)), ["first", "second"]);
    }

    #[test]
    fn pinned_items_appear_in_pinned_and_category_groups() {
        let pin = annotation("p", AnnotationKind::Pin);
        let items = vec![focus_item("p", ActionCategory::FailedChecks, 1, Some(&pin))];

        let grouped = group_and_sort(&items);
        assert_eq!(ids(&grouped[&FocusGroup::Pinned]), ["p"]);
        assert_eq!(ids(&grouped[&FocusGroup::Blocked]), ["p"]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn snoozed_items_only_appear_in_snoozed() {
        let snooze = annotation("s", AnnotationKind::Snooze);
        let items = vec![
            focus_item("s", ActionCategory::Mergeable, 1, Some(&snooze)),
            focus_item("m", ActionCategory::Mergeable, 2, None),
        ];

        let grouped = group_and_sort(&items);
        assert_eq!(ids(&grouped[&FocusGroup::Snoozed]), ["s"]);
        assert_eq!(ids(&grouped[&FocusGroup::Mergeable]), ["m"]);
        assert!(!grouped.contains_key(&FocusGroup::Pinned));
    }

    #[test]
    fn empty_groups_are_omitted_and_order_is_display_order() {
        let items = vec![
            focus_item("w", ActionCategory::WaitingForReview, 1, None),
            focus_item("c", ActionCategory::ChangesRequested, 1, None),
            focus_item("m", ActionCategory::Mergeable, 1, None),
        ];

        let grouped = group_and_sort(&items);
        let groups: Vec<FocusGroup> = grouped.keys().copied().collect();
        assert_eq!(
            groups,
            [
                FocusGroup::Mergeable,
                FocusGroup::FollowUp,
                FocusGroup::WaitingForReview
            ]
        );
    }

    #[test]
    fn grouping_reads_flags_flipped_after_classification() {
        let items = vec![focus_item("x", ActionCategory::NeedsReview, 1, None)];
        items[0].set_snoozed(true);

        let grouped = group_and_sort(&items);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), [FocusGroup::Snoozed]);
    }

    #[test]
    fn uncategorized_items_only_surface_when_snoozed_or_pinned() {
        let snooze = annotation("s", AnnotationKind::Snooze);
        let mut snoozed = focus_item("s", ActionCategory::Mergeable, 1, Some(&snooze));
        snoozed.category = None;
        let grouped = group_and_sort(std::slice::from_ref(&snoozed));
        assert_eq!(ids(&grouped[&FocusGroup::Snoozed]), ["s"]);
        assert_eq!(grouped.len(), 1);

        // Unsnoozing leaves no category group to fall back to.
        snoozed.set_snoozed(false);
        assert!(group_and_sort(std::slice::from_ref(&snoozed)).is_empty());

        snoozed.set_pinned(true);
        let grouped = group_and_sort(std::slice::from_ref(&snoozed));
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), [FocusGroup::Pinned]);
    }

    #[test]
    fn uncategorized_items_sort_after_categorized_ones() {
        let mut bare = focus_item("bare", ActionCategory::Mergeable, 900, None);
        bare.category = None;
        let items = vec![bare, focus_item("waiting", ActionCategory::WaitingForReview, 1, None)];

        assert_eq!(ids(&sort_focus_items(&items)), ["waiting", "bare"]);
    }

    #[test]
    fn no_items_yields_no_groups() {
        assert!(group_and_sort(&[]).is_empty());
    }
}
