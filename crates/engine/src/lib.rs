//! Focus triage orchestration.
//!
//! This crate provides [`FocusProvider`], which owns the TTL-bounded cache
//! slots for pull requests, issues, and annotations, runs the classifier from
//! the [`triage`] crate over them, and applies optimistic pin/snooze
//! mutations. It also provides the discovery gate, the event channel, and the
//! periodic [`RefreshScheduler`].
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The engine sequences calls between the business
//! logic in [`triage`] and the port traits it defines (provider gateway,
//! enrichment store, repository locator). It contains no classification rules
//! of its own.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`provider`] | `FocusProvider`, `TriageSet`, `TriageOptions` |
//! | [`cache`] | TTL cache slots with shared in-flight fetches |
//! | [`events`] | `FocusEvent` broadcast channel |
//! | [`discovery`] | `DiscoveryGate` readiness gate |
//! | [`refresh`] | `RefreshScheduler` |
//! | [`config`] | `EngineConfig` |

pub mod cache;
pub mod config;
pub mod discovery;
pub mod events;
pub mod provider;
pub mod refresh;
mod repository;

pub use cache::DEFAULT_CACHE_TTL;
pub use config::EngineConfig;
pub use discovery::DiscoveryGate;
pub use events::{EventBus, FocusEvent, DEFAULT_EVENT_CAPACITY};
pub use provider::{FocusDependencies, FocusProvider, TriageOptions, TriageSet};
pub use refresh::RefreshScheduler;
