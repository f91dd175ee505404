//! Focus enrichment store adapter.
//!
//! Implements [`triage::EnrichmentStore`] over a local JSON file so pin and
//! snooze annotations survive between runs.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** File format, atomic replacement and id generation live
//! here. The engine sees only [`triage::EnrichmentStore`].
//!
//! ## File Format
//!
//! ```json
//! { "annotations": [
//!     { "id": "…uuid…", "kind": "pin",
//!       "item": { "kind": "pr", "entity_id": "PR_kw…", "url": "…", "provider": "github" },
//!       "created_at": "2024-05-01T12:00:00Z" } ] }
//! ```

pub mod errors;
pub mod store;

pub use errors::EnrichmentError;
pub use store::{AnnotationRecord, FileEnrichmentStore};
