//! Focus GitHub infrastructure adapter.
//!
//! Models the GitHub GraphQL search payloads the triage engine consumes,
//! converts them into [`triage`] domain items, and implements
//! [`triage::ProviderGateway`] over saved search snapshots.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. GitHub wire
//! details (GraphQL field names, enum spellings, the deleted-user login) are
//! handled here; the [`triage`] crate never sees them.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`models`] | Serde models of search result nodes and the snapshot envelope |
//! | [`convert`] | Node → domain conversion and per-reason search merging |
//! | [`gateway`] | `SnapshotGateway` |
//! | [`errors`] | `GithubError` |

pub mod convert;
pub mod errors;
pub mod gateway;
pub mod models;

pub use errors::GithubError;
pub use gateway::SnapshotGateway;
pub use models::{ProviderSnapshot, SearchSnapshot, Searches};
