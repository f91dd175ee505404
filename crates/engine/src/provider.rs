//! The [`FocusProvider`] orchestrator.
//!
//! One instance per process owns the cache slots for pull requests, issues,
//! and annotations, drives the classifier over whatever the slots hold, and
//! coordinates optimistic pin/snooze mutations against the enrichment store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use triage::{
    classify, group_and_sort, Annotation, AnnotationFilter, AnnotationKind, BranchRef,
    Classification, Clock, EnrichmentStore, EntityId, Exclusion, FocusItem, GroupedItems,
    LocalRepository, LocateOptions, ProviderGateway, RemoteItem, RepositoryDiscovery,
    RepositoryLocator, SearchedIssue, SearchedPullRequest, SystemClock, Timestamp, TriageError,
    TriageSummary,
};

use crate::cache::{FetchOutcome, TtlCache};
use crate::config::EngineConfig;
use crate::events::{EventBus, FocusEvent};
use crate::repository;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// External collaborators the orchestrator calls.
#[derive(Clone)]
pub struct FocusDependencies {
    pub gateway: Arc<dyn ProviderGateway>,
    pub enrichments: Arc<dyn EnrichmentStore>,
    pub locator: Arc<dyn RepositoryLocator>,
    pub discovery: Arc<dyn RepositoryDiscovery>,
}

/// Per-call options for [`FocusProvider::fetch_triage_set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriageOptions {
    /// Replace every cache slot instead of reusing live ones.
    pub force: bool,
    pub include_issues: bool,
    pub include_pull_requests: bool,
}

impl Default for TriageOptions {
    fn default() -> Self {
        Self {
            force: false,
            include_issues: false,
            include_pull_requests: true,
        }
    }
}

impl TriageOptions {
    pub fn forced(self) -> Self {
        Self {
            force: true,
            ..self
        }
    }
}

/// The outcome of one classification pass.
#[derive(Debug)]
pub struct TriageSet {
    /// Every categorized or snoozed item, in fetch order.
    pub items: Vec<FocusItem>,
    /// Approved, mergeable pull requests left out because the viewer cannot
    /// merge them.
    pub read_only_approved: usize,
    pub refreshed_at: Timestamp,
}

impl TriageSet {
    pub fn grouped(&self) -> GroupedItems {
        group_and_sort(&self.items)
    }

    pub fn summary(&self) -> TriageSummary {
        TriageSummary::from_grouped(&self.grouped())
    }

    pub fn find(&self, entity_id: &EntityId) -> Option<&FocusItem> {
        self.items.iter().find(|item| &item.entity_id == entity_id)
    }
}

// ---------------------------------------------------------------------------
// Fetch inputs
// ---------------------------------------------------------------------------

/// What one source contributed to a classification pass.
enum Input<T> {
    Skipped,
    Fetched(Arc<Vec<T>>),
    /// The fetch failed; the source counts as empty.
    Failed,
}

impl<T> Input<T> {
    fn settle(source: &'static str, outcome: FetchOutcome<T>) -> Self {
        match outcome {
            Ok(items) => Self::Fetched(items),
            Err(error) => {
                tracing::warn!(source, %error, "Fetch failed; treating source as empty");
                Self::Failed
            }
        }
    }

    fn items(&self) -> &[T] {
        match self {
            Self::Fetched(items) => items.as_slice(),
            Self::Skipped | Self::Failed => &[],
        }
    }

    fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Both inputs come from the same cache slot (or were both skipped).
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Skipped, Self::Skipped) => true,
            (Self::Fetched(a), Self::Fetched(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

struct Inputs {
    pull_requests: Input<SearchedPullRequest>,
    issues: Input<SearchedIssue>,
    annotations: Input<Annotation>,
}

impl Inputs {
    fn any_failed(&self) -> bool {
        self.pull_requests.is_failed() || self.issues.is_failed() || self.annotations.is_failed()
    }

    fn same_as(&self, other: &Self) -> bool {
        self.pull_requests.same_as(&other.pull_requests)
            && self.issues.same_as(&other.issues)
            && self.annotations.same_as(&other.annotations)
    }
}

/// The last classification pass and the slot contents it was built from.
struct Memo {
    inputs: Inputs,
    set: Arc<TriageSet>,
}

// ---------------------------------------------------------------------------
// FocusProvider
// ---------------------------------------------------------------------------

/// Fetches, classifies, and annotates the viewer's work items.
///
/// # Consistency
///
/// Pin and snooze are optimistic. The flag on the [`FocusItem`] (and every
/// clone of it) flips and [`FocusEvent::Changed`] is published before the
/// enrichment store is written. If the write fails the error is returned and
/// the flip is *not* rolled back; the item shows the optimistic state until
/// the next fetch after the annotation slot is replaced. Concurrent mutations
/// of one item are not serialized: the last store write wins.
pub struct FocusProvider {
    dependencies: FocusDependencies,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    pull_requests: TtlCache<SearchedPullRequest>,
    issues: TtlCache<SearchedIssue>,
    annotations: TtlCache<Annotation>,
    memo: Mutex<Option<Memo>>,
    events: EventBus,
}

impl FocusProvider {
    pub fn new(dependencies: FocusDependencies, config: EngineConfig) -> Result<Self, TriageError> {
        Self::with_clock(dependencies, config, Arc::new(SystemClock))
    }

    /// Builds a provider whose TTL decisions read `clock`.
    pub fn with_clock(
        dependencies: FocusDependencies,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TriageError> {
        config.validate()?;
        Ok(Self {
            pull_requests: TtlCache::new(config.cache_ttl),
            issues: TtlCache::new(config.cache_ttl),
            annotations: TtlCache::new(config.cache_ttl),
            memo: Mutex::new(None),
            events: EventBus::new(config.event_capacity),
            dependencies,
            config,
            clock,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FocusEvent> {
        self.events.subscribe()
    }

    fn memo(&self) -> MutexGuard<'_, Option<Memo>> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Triage
    // -----------------------------------------------------------------------

    /// Returns the classified triage set.
    ///
    /// Waits for repository discovery, then reads the three cache slots
    /// concurrently. A source whose fetch fails contributes nothing; only
    /// cancellation fails the call, checked before and after the reads.
    ///
    /// When no slot changed since the previous call, the previous set is
    /// returned as-is (the same `Arc`) without a classification pass. Every
    /// successful call publishes [`FocusEvent::Refreshed`] with the set it
    /// returns.
    ///
    /// `cancellation` only abandons this call. Cache slots are shared between
    /// callers, so the source fetches behind them never observe it.
    #[tracing::instrument(
        skip_all,
        fields(
            force = options.force,
            include_issues = options.include_issues,
            include_pull_requests = options.include_pull_requests,
        )
    )]
    pub async fn fetch_triage_set(
        &self,
        options: TriageOptions,
        cancellation: &CancellationToken,
    ) -> Result<Arc<TriageSet>, TriageError> {
        self.dependencies.discovery.wait_for_discovery().await;

        if cancellation.is_cancelled() {
            return Err(TriageError::Cancelled);
        }

        let now = self.clock.now();
        let inputs = self.read_inputs(options, now).await;

        if cancellation.is_cancelled() {
            return Err(TriageError::Cancelled);
        }

        if let Some(set) = self.memoized(&inputs) {
            tracing::debug!(items = set.items.len(), "Cache slots unchanged; reusing triage set");
            self.events.publish(FocusEvent::Refreshed(Arc::clone(&set)));
            return Ok(set);
        }

        let set = Arc::new(classify_inputs(&inputs, now));
        tracing::info!(
            items = set.items.len(),
            read_only_approved = set.read_only_approved,
            "Triage set refreshed"
        );

        if !inputs.any_failed() {
            *self.memo() = Some(Memo {
                inputs,
                set: Arc::clone(&set),
            });
        }

        self.events.publish(FocusEvent::Refreshed(Arc::clone(&set)));
        Ok(set)
    }

    async fn read_inputs(&self, options: TriageOptions, now: Timestamp) -> Inputs {
        // A slot's fetch may be awaited by several callers; none of their
        // tokens may fail it for the others.
        let detached = CancellationToken::new();
        let cancellation = &detached;
        let providers = self.config.providers.as_slice();
        let gateway = &self.dependencies.gateway;
        let enrichments = &self.dependencies.enrichments;

        let pull_requests = async {
            if !options.include_pull_requests {
                return Input::Skipped;
            }
            let outcome = self
                .pull_requests
                .get_or_fetch(now, options.force, || {
                    gateway.my_pull_requests(providers, cancellation)
                })
                .await;
            Input::settle("pull requests", outcome)
        };

        let issues = async {
            if !options.include_issues {
                return Input::Skipped;
            }
            let outcome = self
                .issues
                .get_or_fetch(now, options.force, || gateway.my_issues(providers, cancellation))
                .await;
            Input::settle("issues", outcome)
        };

        let annotations = async {
            let outcome = self
                .annotations
                .get_or_fetch(now, options.force, || enrichments.get(None, cancellation))
                .await;
            Input::settle("annotations", outcome)
        };

        let (pull_requests, issues, annotations) = tokio::join!(pull_requests, issues, annotations);
        Inputs {
            pull_requests,
            issues,
            annotations,
        }
    }

    fn memoized(&self, inputs: &Inputs) -> Option<Arc<TriageSet>> {
        self.memo()
            .as_ref()
            .filter(|memo| memo.inputs.same_as(inputs))
            .map(|memo| Arc::clone(&memo.set))
    }

    /// Drops every cache slot so the next fetch goes back to the sources.
    pub fn refresh(&self) {
        self.pull_requests.invalidate();
        self.issues.invalidate();
        self.annotations.invalidate();
        self.memo().take();
        tracing::debug!("All cache slots invalidated");
        self.events.changed();
    }

    fn annotations_changed(&self) {
        self.annotations.invalidate();
        self.events.changed();
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------
    //
    // Each mutation flips the item and publishes `Changed` when called, before
    // the returned future is first polled.

    pub fn pin<'a>(
        &'a self,
        item: &'a FocusItem,
    ) -> impl Future<Output = Result<(), TriageError>> + Send + 'a {
        item.set_pinned(true);
        self.events.changed();

        async move {
            let annotation = self
                .dependencies
                .enrichments
                .pin_item(&item.enrichable())
                .await?;
            tracing::debug!(entity_id = %item.entity_id, annotation_id = %annotation.id, "Pinned");
            item.set_annotation(Some(annotation));
            self.annotations_changed();
            Ok(())
        }
    }

    pub fn unpin<'a>(
        &'a self,
        item: &'a FocusItem,
    ) -> impl Future<Output = Result<(), TriageError>> + Send + 'a {
        item.set_pinned(false);
        self.events.changed();

        async move {
            self.remove_annotation(item, AnnotationKind::Pin).await?;
            tracing::debug!(entity_id = %item.entity_id, "Unpinned");
            self.annotations_changed();
            Ok(())
        }
    }

    pub fn snooze<'a>(
        &'a self,
        item: &'a FocusItem,
    ) -> impl Future<Output = Result<(), TriageError>> + Send + 'a {
        item.set_snoozed(true);
        self.events.changed();

        async move {
            let annotation = self
                .dependencies
                .enrichments
                .snooze_item(&item.enrichable())
                .await?;
            tracing::debug!(entity_id = %item.entity_id, annotation_id = %annotation.id, "Snoozed");
            item.set_annotation(Some(annotation));
            self.annotations_changed();
            Ok(())
        }
    }

    pub fn unsnooze<'a>(
        &'a self,
        item: &'a FocusItem,
    ) -> impl Future<Output = Result<(), TriageError>> + Send + 'a {
        item.set_snoozed(false);
        self.events.changed();

        async move {
            self.remove_annotation(item, AnnotationKind::Snooze).await?;
            tracing::debug!(entity_id = %item.entity_id, "Unsnoozed");
            self.annotations_changed();
            Ok(())
        }
    }

    /// Deletes `item`'s annotation of `kind`. Uses the id the item already
    /// knows, else looks it up in the store.
    async fn remove_annotation(
        &self,
        item: &FocusItem,
        kind: AnnotationKind,
    ) -> Result<(), TriageError> {
        let store = &self.dependencies.enrichments;
        let ids = match item.annotation() {
            Some(annotation) if annotation.kind == kind => vec![annotation.id],
            _ => {
                let filter = AnnotationFilter::for_entity(item.entity_id.clone()).with_kind(kind);
                store
                    .get(Some(&filter), &CancellationToken::new())
                    .await?
                    .into_iter()
                    .map(|annotation| annotation.id)
                    .collect()
            }
        };

        for id in &ids {
            match kind {
                AnnotationKind::Pin => store.unpin_item(id).await?,
                AnnotationKind::Snooze => store.unsnooze_item(id).await?,
            }
        }

        if item.annotation().is_some_and(|annotation| annotation.kind == kind) {
            item.set_annotation(None);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Repositories
    // -----------------------------------------------------------------------

    /// Returns the local working copy for `item`, resolving it through the
    /// repository locator the first time (or every time with `force`).
    pub async fn locate_repository(
        &self,
        item: &FocusItem,
        options: LocateOptions,
    ) -> Result<Option<Arc<dyn LocalRepository>>, TriageError> {
        repository::locate_repository(self.dependencies.locator.as_ref(), item, options).await
    }

    /// Returns the branch to check out for `item`. Requires the repository to
    /// have been located first.
    pub async fn resolve_branch_ref(
        &self,
        item: &FocusItem,
    ) -> Result<Option<BranchRef>, TriageError> {
        let Some(local) = item.local_repository() else {
            return Ok(None);
        };
        repository::resolve_branch_ref(local.as_ref(), item).await
    }
}

// ---------------------------------------------------------------------------
// Classification pass
// ---------------------------------------------------------------------------

fn classify_inputs(inputs: &Inputs, now: Timestamp) -> TriageSet {
    let annotations: HashMap<&EntityId, &Annotation> = inputs
        .annotations
        .items()
        .iter()
        .map(|annotation| (&annotation.entity_id, annotation))
        .collect();

    let mut items = Vec::new();
    let mut read_only_approved = 0;

    for searched in inputs.pull_requests.items() {
        let pr = &searched.pull_request;
        if pr.is_draft {
            continue;
        }

        let annotation = annotations.get(&pr.entity_id).copied();
        match classify(RemoteItem::PullRequest(searched), annotation) {
            Classification::Categorized(category) => {
                items.push(FocusItem::from_pull_request(searched, Some(category), annotation));
            }
            Classification::Snoozed(category) => {
                items.push(FocusItem::from_pull_request(searched, category, annotation));
            }
            Classification::Excluded(Exclusion::ReadOnlyApproved) => {
                read_only_approved += 1;
                tracing::debug!(
                    entity_id = %pr.entity_id,
                    "Approved pull request dropped: viewer cannot merge it"
                );
            }
            Classification::Excluded(reason) => {
                tracing::trace!(entity_id = %pr.entity_id, ?reason, "Pull request not emitted");
            }
        }
    }

    for searched in inputs.issues.items() {
        let annotation = annotations.get(&searched.issue.entity_id).copied();
        if let Classification::Excluded(reason) = classify(RemoteItem::Issue(searched), annotation)
        {
            tracing::trace!(entity_id = %searched.issue.entity_id, ?reason, "Issue not emitted");
        }
    }

    TriageSet {
        items,
        read_only_approved,
        refreshed_at: now,
    }
}
