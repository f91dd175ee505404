//! Core triage domain for Focus.
//!
//! This crate contains every domain concept of the triage engine: the raw
//! provider items, pin/snooze annotations, the action-category taxonomy, the
//! classification decision procedure, ranking and grouping, and the port
//! traits the engine calls on external collaborators.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; the `engine`, `github`, and `enrichment`
//! crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`EntityId`, `AnnotationId`, etc.) |
//! | [`types`] | Provider states, access levels, `Timestamp` |
//! | [`items`] | Searched pull requests and issues |
//! | [`annotation`] | Pin/snooze annotations and store descriptors |
//! | [`category`] | Action categories, suggested actions, groups |
//! | [`focus_item`] | The derived, presentation-ready `FocusItem` |
//! | [`classifier`] | The classification decision procedure |
//! | [`ranking`] | Sorting and grouping |
//! | [`summary`] | Status-indicator summary of a grouped set |
//! | [`ports`] | Collaborator traits and the injected clock |
//! | [`errors`] | `TriageError` |

pub mod annotation;
pub mod category;
pub mod classifier;
pub mod errors;
pub mod focus_item;
pub mod identifiers;
pub mod items;
pub mod ports;
pub mod ranking;
pub mod summary;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use annotation::{Annotation, AnnotationFilter, AnnotationKind, EnrichableItem, EnrichableKind};
pub use category::{ActionCategory, FocusAction, FocusGroup};
pub use classifier::{classify, Classification, Exclusion};
pub use errors::TriageError;
pub use focus_item::FocusItem;
pub use identifiers::{AnnotationId, BranchName, CommitSha, EntityId, ItemNumber, RemoteName};
pub use items::{
    Author, HeadRef, Issue, PullRequest, RemoteItem, RepositoryRef, SearchReason, SearchedIssue,
    SearchedPullRequest,
};
pub use ports::{
    BranchRef, Clock, EnrichmentStore, GitRemote, LocalBranch, LocalRepository, LocateOptions,
    ProviderGateway, RepositoryDescriptor, RepositoryDiscovery, RepositoryLocator, SystemClock,
};
pub use ranking::{group_and_sort, sort_focus_items, GroupedItems};
pub use summary::{BlockedBreakdown, TopItem, TriageSummary};
pub use types::{
    CheckRollupState, MergeableState, ProviderId, RepositoryAccessLevel, ReviewDecision, Timestamp,
};
