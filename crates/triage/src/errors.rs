//! Top-level error type for the triage domain.
//!
//! [`TriageError`] is the error every port trait returns. Infrastructure
//! crates define their own error enums and convert into it at the port
//! boundary, so orchestration code only ever matches on these variants.
//!
//! ## Handling rules
//!
//! - Provider failures are isolated per source by the orchestrator and never
//!   surface from a triage fetch.
//! - `Cancelled` is propagated to the caller and never retried.
//! - Enrichment write failures propagate from mutations unchanged.
//! - Nothing in the core retries automatically.

use thiserror::Error;

/// Errors produced by the triage engine and its ports.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriageError {
    /// The caller's cancellation token was signalled at a checked
    /// suspension point.
    #[error("Operation cancelled")]
    Cancelled,

    /// A provider gateway search failed.
    ///
    /// Produced by: gateway adapters. Absorbed by the orchestrator, which
    /// treats the failing source as empty.
    #[error("Provider fetch failed for {source_name}: {message}")]
    Provider {
        /// Which fetch failed (e.g. `"pull requests"`).
        source_name: String,
        message: String,
    },

    /// The enrichment store could not be read or written.
    #[error("Enrichment store error: {message}")]
    Enrichment { message: String },

    /// The repository locator or a local repository query failed.
    #[error("Repository error: {message}")]
    Repository { message: String },

    /// Runtime configuration is invalid.
    ///
    /// Produced at load time; the engine never starts with an invalid config.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TriageError {
    pub fn provider(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn enrichment(message: impl Into<String>) -> Self {
        Self::Enrichment {
            message: message.into(),
        }
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
