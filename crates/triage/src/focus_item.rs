//! The presentation-ready view over a classified pull request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    ActionCategory, Annotation, Author, EnrichableItem, EnrichableKind, EntityId, FocusAction,
    HeadRef, ItemNumber, LocalRepository, ProviderId, RepositoryDescriptor, RepositoryRef,
    SearchedPullRequest, Timestamp,
};

/// Interior-mutable part of a [`FocusItem`], shared by every clone.
///
/// Optimistic pin/snooze flips and the lazily resolved working copy are
/// written here so that every holder of the triage set observes them.
#[derive(Debug, Default)]
struct ItemState {
    pinned: bool,
    snoozed: bool,
    annotation: Option<Annotation>,
    repository: Option<Arc<dyn LocalRepository>>,
}

/// A classified pull request with its annotation state.
///
/// Rebuilt on every classification pass and never persisted. Cloning is
/// cheap and clones share pin/snooze state and the resolved repository.
#[derive(Debug, Clone)]
pub struct FocusItem {
    pub provider: ProviderId,
    pub number: ItemNumber,
    pub entity_id: EntityId,
    pub title: String,
    pub date: Timestamp,
    pub author: Author,
    pub repository: RepositoryRef,
    pub url: String,
    pub head: Option<HeadRef>,
    /// `None` only for a snoozed item that no rule would otherwise emit.
    pub category: Option<ActionCategory>,
    pub suggested_actions: Vec<FocusAction>,
    /// Epoch milliseconds used as the recency tie-breaker.
    pub sort_time: i64,
    state: Arc<Mutex<ItemState>>,
}

impl FocusItem {
    /// Builds the view for `searched` in `category`, seeding pin/snooze state
    /// from `annotation`.
    pub fn from_pull_request(
        searched: &SearchedPullRequest,
        category: Option<ActionCategory>,
        annotation: Option<&Annotation>,
    ) -> Self {
        let pr = &searched.pull_request;
        let state = ItemState {
            pinned: annotation.is_some_and(Annotation::is_pin),
            snoozed: annotation.is_some_and(Annotation::is_snooze),
            annotation: annotation.cloned(),
            repository: None,
        };

        Self {
            provider: pr.provider,
            number: pr.number,
            entity_id: pr.entity_id.clone(),
            title: pr.title.clone(),
            date: pr.updated_at,
            author: pr.author.clone(),
            repository: pr.repository.clone(),
            url: pr.url.clone(),
            head: pr.head.clone(),
            category,
            suggested_actions: category
                .map(|category| category.suggested_actions().to_vec())
                .unwrap_or_else(|| vec![FocusAction::Open]),
            sort_time: pr.updated_at.as_millis(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, ItemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pinned(&self) -> bool {
        self.state().pinned
    }

    pub fn snoozed(&self) -> bool {
        self.state().snoozed
    }

    /// `(pinned, snoozed)` read under one lock.
    pub fn flags(&self) -> (bool, bool) {
        let state = self.state();
        (state.pinned, state.snoozed)
    }

    /// Sets the pinned flag. Pinning clears a snooze.
    pub fn set_pinned(&self, pinned: bool) {
        let mut state = self.state();
        state.pinned = pinned;
        if pinned {
            state.snoozed = false;
        }
    }

    /// Sets the snoozed flag. Snoozing clears a pin.
    pub fn set_snoozed(&self, snoozed: bool) {
        let mut state = self.state();
        state.snoozed = snoozed;
        if snoozed {
            state.pinned = false;
        }
    }

    /// The annotation this item was built with, or the one most recently
    /// written through a mutation.
    pub fn annotation(&self) -> Option<Annotation> {
        self.state().annotation.clone()
    }

    pub fn set_annotation(&self, annotation: Option<Annotation>) {
        self.state().annotation = annotation;
    }

    /// Removes and returns the annotation.
    pub fn take_annotation(&self) -> Option<Annotation> {
        self.state().annotation.take()
    }

    pub fn local_repository(&self) -> Option<Arc<dyn LocalRepository>> {
        self.state().repository.clone()
    }

    pub fn set_local_repository(&self, repository: Option<Arc<dyn LocalRepository>>) {
        self.state().repository = repository;
    }

    /// Returns `"owner/name"` of the owning repository.
    pub fn repo_and_owner(&self) -> String {
        self.repository.full_name()
    }

    /// Descriptor written to the enrichment store with an annotation.
    pub fn enrichable(&self) -> EnrichableItem {
        EnrichableItem {
            kind: EnrichableKind::PullRequest,
            entity_id: self.entity_id.clone(),
            url: self.url.clone(),
            provider: self.provider,
        }
    }

    /// Identity handed to the repository locator.
    pub fn repository_descriptor(&self) -> RepositoryDescriptor {
        RepositoryDescriptor {
            provider: self.provider,
            owner: self.repository.owner.clone(),
            name: self.repository.name.clone(),
            url: self.url.clone(),
        }
    }

    /// Returns `true` if `other` is a clone of this item (shares its state).
    pub fn shares_state_with(&self, other: &FocusItem) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
