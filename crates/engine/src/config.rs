//! Runtime settings for [`crate::FocusProvider`].

use std::time::Duration;

use triage::{ProviderId, TriageError};

use crate::cache::DEFAULT_CACHE_TTL;
use crate::events::DEFAULT_EVENT_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Lifetime of each cached fetch.
    pub cache_ttl: Duration,
    /// Providers passed to every gateway search.
    pub providers: Vec<ProviderId>,
    /// Buffer size of the event channel.
    pub event_capacity: usize,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), TriageError> {
        if self.cache_ttl.is_zero() {
            return Err(TriageError::configuration("cache TTL must be greater than zero"));
        }
        if self.providers.is_empty() {
            return Err(TriageError::configuration("at least one provider is required"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            providers: ProviderId::DEFAULT.to_vec(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(1800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_ttl_and_no_providers() {
        let zero_ttl = EngineConfig {
            cache_ttl: Duration::ZERO,
            ..EngineConfig::default()
        };
        assert!(matches!(
            zero_ttl.validate(),
            Err(TriageError::Configuration { .. })
        ));

        let no_providers = EngineConfig {
            providers: Vec::new(),
            ..EngineConfig::default()
        };
        assert!(no_providers.validate().is_err());
    }
}
