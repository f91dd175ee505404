//! Fakes for the engine's ports, shared by the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use engine::{DiscoveryGate, EngineConfig, FocusDependencies, FocusProvider};
use tokio_util::sync::CancellationToken;
use triage::{
    Annotation, AnnotationFilter, AnnotationId, AnnotationKind, Author, BranchName, Clock,
    EnrichableItem, EnrichmentStore, EntityId, GitRemote, HeadRef, ItemNumber, LocalBranch,
    LocalRepository, LocateOptions, MergeableState, ProviderGateway, ProviderId, PullRequest,
    RemoteName, RepositoryAccessLevel, RepositoryDescriptor, RepositoryLocator, RepositoryRef,
    ReviewDecision, SearchReason, SearchedIssue, SearchedPullRequest, Timestamp, TriageError,
};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn entity(value: &str) -> EntityId {
    EntityId::new(value).unwrap()
}

/// An authored, approved, mergeable pull request the viewer can merge.
pub fn mergeable_pr(id: &str, updated_at_ms: i64) -> SearchedPullRequest {
    SearchedPullRequest {
        pull_request: PullRequest {
            provider: ProviderId::GitHub,
            number: ItemNumber::new(updated_at_ms as u64),
            entity_id: entity(id),
            title: format!("Pull request {id}"),
            url: format!("https://github.com/octo-org/widgets/pull/{id}"),
            author: Author {
                name: "octocat".to_owned(),
                avatar_url: None,
            },
            repository: RepositoryRef {
                owner: "octo-org".to_owned(),
                name: "widgets".to_owned(),
                access_level: Some(RepositoryAccessLevel::Write),
            },
            updated_at: Timestamp::from_millis(updated_at_ms).unwrap(),
            is_draft: false,
            mergeable_state: MergeableState::Mergeable,
            review_decision: Some(ReviewDecision::Approved),
            check_rollup: None,
            viewer_can_update: true,
            head: Some(HeadRef {
                branch: BranchName::new("feature/login").unwrap(),
                sha: None,
                remote_owner: Some("Contributor".to_owned()),
            }),
            requested_reviewers: Vec::new(),
        },
        reasons: vec![SearchReason::Authored],
    }
}

/// A pull request from someone else awaiting the viewer's review.
pub fn review_requested_pr(id: &str, updated_at_ms: i64) -> SearchedPullRequest {
    let mut searched = mergeable_pr(id, updated_at_ms);
    searched.pull_request.review_decision = Some(ReviewDecision::ReviewRequired);
    searched.reasons = vec![SearchReason::ReviewRequested];
    searched
}

pub fn draft_pr(id: &str, updated_at_ms: i64) -> SearchedPullRequest {
    let mut searched = mergeable_pr(id, updated_at_ms);
    searched.pull_request.is_draft = true;
    searched
}

pub fn annotation(id: &str, entity_id: &str, kind: AnnotationKind) -> Annotation {
    Annotation {
        id: AnnotationId::new(id).unwrap(),
        entity_id: entity(entity_id),
        kind,
    }
}

// ---------------------------------------------------------------------------
// Provider gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeGateway {
    pull_requests: Mutex<Vec<SearchedPullRequest>>,
    issues: Mutex<Vec<SearchedIssue>>,
    fail_pull_requests: Mutex<bool>,
    cancel_during_fetch: Mutex<Option<CancellationToken>>,
    saw_cancelled_token: AtomicBool,
    pub pull_request_calls: AtomicUsize,
    pub issue_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn with_pull_requests(pull_requests: Vec<SearchedPullRequest>) -> Self {
        let gateway = Self::default();
        gateway.set_pull_requests(pull_requests);
        gateway
    }

    pub fn set_pull_requests(&self, pull_requests: Vec<SearchedPullRequest>) {
        *self.pull_requests.lock().unwrap() = pull_requests;
    }

    pub fn set_issues(&self, issues: Vec<SearchedIssue>) {
        *self.issues.lock().unwrap() = issues;
    }

    pub fn fail_pull_requests(&self, fail: bool) {
        *self.fail_pull_requests.lock().unwrap() = fail;
    }

    /// Cancels `token` from inside the next pull request fetch.
    pub fn cancel_during_fetch(&self, token: CancellationToken) {
        *self.cancel_during_fetch.lock().unwrap() = Some(token);
    }

    /// Whether any pull request fetch was handed an already cancelled token.
    pub fn saw_cancelled_token(&self) -> bool {
        self.saw_cancelled_token.load(Ordering::SeqCst)
    }

    pub fn pull_request_calls(&self) -> usize {
        self.pull_request_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderGateway for FakeGateway {
    async fn my_pull_requests(
        &self,
        _providers: &[ProviderId],
        cancellation: &CancellationToken,
    ) -> Result<Vec<SearchedPullRequest>, TriageError> {
        self.pull_request_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = self.cancel_during_fetch.lock().unwrap().take() {
            token.cancel();
        }
        if cancellation.is_cancelled() {
            self.saw_cancelled_token.store(true, Ordering::SeqCst);
        }
        if *self.fail_pull_requests.lock().unwrap() {
            return Err(TriageError::provider("pull requests", "rate limited"));
        }
        Ok(self.pull_requests.lock().unwrap().clone())
    }

    async fn my_issues(
        &self,
        _providers: &[ProviderId],
        _cancellation: &CancellationToken,
    ) -> Result<Vec<SearchedIssue>, TriageError> {
        self.issue_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.issues.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Enrichment store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeStore {
    annotations: Mutex<Vec<Annotation>>,
    next_id: AtomicUsize,
    fail_writes: Mutex<bool>,
    pub get_calls: AtomicUsize,
}

impl FakeStore {
    pub fn with_annotations(annotations: Vec<Annotation>) -> Self {
        let store = Self::default();
        *store.annotations.lock().unwrap() = annotations;
        store
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.annotations.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn write(&self, item: &EnrichableItem, kind: AnnotationKind) -> Result<Annotation, TriageError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(TriageError::enrichment("store offline"));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let annotation = Annotation {
            id: AnnotationId::new(format!("stored-{n}")).unwrap(),
            entity_id: item.entity_id.clone(),
            kind,
        };
        let mut annotations = self.annotations.lock().unwrap();
        annotations.retain(|existing| existing.entity_id != item.entity_id);
        annotations.push(annotation.clone());
        Ok(annotation)
    }

    fn remove(&self, id: &AnnotationId) -> Result<(), TriageError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(TriageError::enrichment("store offline"));
        }
        self.annotations
            .lock()
            .unwrap()
            .retain(|annotation| &annotation.id != id);
        Ok(())
    }
}

#[async_trait]
impl EnrichmentStore for FakeStore {
    async fn get(
        &self,
        filter: Option<&AnnotationFilter>,
        _cancellation: &CancellationToken,
    ) -> Result<Vec<Annotation>, TriageError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .annotations
            .lock()
            .unwrap()
            .iter()
            .filter(|annotation| filter.is_none_or(|filter| filter.matches(annotation)))
            .cloned()
            .collect())
    }

    async fn pin_item(&self, item: &EnrichableItem) -> Result<Annotation, TriageError> {
        self.write(item, AnnotationKind::Pin)
    }

    async fn unpin_item(&self, id: &AnnotationId) -> Result<(), TriageError> {
        self.remove(id)
    }

    async fn snooze_item(&self, item: &EnrichableItem) -> Result<Annotation, TriageError> {
        self.write(item, AnnotationKind::Snooze)
    }

    async fn unsnooze_item(&self, id: &AnnotationId) -> Result<(), TriageError> {
        self.remove(id)
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FakeRepository {
    pub remotes: Vec<GitRemote>,
    pub branches: Vec<LocalBranch>,
}

#[async_trait]
impl LocalRepository for FakeRepository {
    fn path(&self) -> &str {
        "/work/widgets"
    }

    async fn remotes(&self) -> Result<Vec<GitRemote>, TriageError> {
        Ok(self.remotes.clone())
    }

    async fn branches(&self) -> Result<Vec<LocalBranch>, TriageError> {
        Ok(self.branches.clone())
    }
}

pub fn remote(name: &str, owner: &str) -> GitRemote {
    GitRemote {
        name: RemoteName::new(name).unwrap(),
        provider: Some(ProviderId::GitHub),
        owner: Some(owner.to_owned()),
    }
}

pub fn local_branch(name: &str, upstream: Option<&str>) -> LocalBranch {
    LocalBranch {
        name: BranchName::new(name).unwrap(),
        upstream: upstream.map(str::to_owned),
        remote: false,
    }
}

#[derive(Default)]
pub struct FakeLocator {
    pub repository: Option<Arc<FakeRepository>>,
    pub calls: AtomicUsize,
    pub last_descriptor: Mutex<Option<RepositoryDescriptor>>,
}

#[async_trait]
impl RepositoryLocator for FakeLocator {
    async fn get_repository(
        &self,
        descriptor: &RepositoryDescriptor,
        _options: LocateOptions,
    ) -> Result<Option<Arc<dyn LocalRepository>>, TriageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_descriptor.lock().unwrap() = Some(descriptor.clone());
        Ok(self
            .repository
            .clone()
            .map(|repository| repository as Arc<dyn LocalRepository>))
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn advance_minutes(&self, minutes: i64) {
        self.millis.fetch_add(minutes * 60 * 1000, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst)).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub store: Arc<FakeStore>,
    pub locator: Arc<FakeLocator>,
    pub discovery: Arc<DiscoveryGate>,
    pub clock: Arc<ManualClock>,
    pub provider: Arc<FocusProvider>,
}

impl Harness {
    pub fn new(gateway: FakeGateway, store: FakeStore) -> Self {
        Self::with_locator(gateway, store, FakeLocator::default())
    }

    pub fn with_locator(gateway: FakeGateway, store: FakeStore, locator: FakeLocator) -> Self {
        let gateway = Arc::new(gateway);
        let store = Arc::new(store);
        let locator = Arc::new(locator);
        let discovery = Arc::new(DiscoveryGate::new());
        let clock = Arc::new(ManualClock::default());

        let dependencies = FocusDependencies {
            gateway: gateway.clone(),
            enrichments: store.clone(),
            locator: locator.clone(),
            discovery: discovery.clone(),
        };
        let provider = FocusProvider::with_clock(dependencies, EngineConfig::default(), clock.clone())
            .unwrap();

        Self {
            gateway,
            store,
            locator,
            discovery,
            clock,
            provider: Arc::new(provider),
        }
    }
}
