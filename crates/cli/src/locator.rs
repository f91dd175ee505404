//! Repository locator for a terminal session.

use std::sync::Arc;

use async_trait::async_trait;
use triage::{LocalRepository, LocateOptions, RepositoryDescriptor, RepositoryLocator, TriageError};

/// Knows no local working copies; every lookup comes back empty.
///
/// The CLI lists and annotates items but never checks branches out, so it
/// has nothing to resolve repositories against.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLocator;

#[async_trait]
impl RepositoryLocator for DetachedLocator {
    async fn get_repository(
        &self,
        descriptor: &RepositoryDescriptor,
        _options: LocateOptions,
    ) -> Result<Option<Arc<dyn LocalRepository>>, TriageError> {
        tracing::debug!(
            owner = %descriptor.owner,
            name = %descriptor.name,
            "No local repositories in a detached session"
        );
        Ok(None)
    }
}
