//! `.focus/config.toml` loading and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::{EngineConfig, TriageOptions, DEFAULT_EVENT_CAPACITY};
use serde::{Deserialize, Serialize};
use triage::{ProviderId, TriageError};

pub const DEFAULT_CONFIG_PATH: &str = ".focus/config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub cache_ttl_minutes: u64,
    /// Minutes between forced refreshes in `watch`; zero or negative
    /// disables the scheduler.
    pub refresh_rate_minutes: i64,
    pub include_issues: bool,
    pub include_pull_requests: bool,
    pub providers: Vec<ProviderId>,
    /// Saved GitHub search results replayed by the provider gateway.
    pub snapshot_path: PathBuf,
    pub annotations_path: PathBuf,
    pub log_format: LogFormat,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: 30,
            refresh_rate_minutes: 0,
            include_issues: false,
            include_pull_requests: true,
            providers: ProviderId::DEFAULT.to_vec(),
            snapshot_path: PathBuf::from(".focus/search.json"),
            annotations_path: PathBuf::from(".focus/annotations.json"),
            log_format: LogFormat::Pretty,
        }
    }
}

impl FocusConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, TriageError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(TriageError::configuration(format!(
                    "Failed to read {}: {error}",
                    path.display()
                )));
            }
        };
        Self::parse(&raw).map_err(|error| match error {
            TriageError::Configuration { message } => {
                TriageError::configuration(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, TriageError> {
        let config: Self = toml::from_str(raw)
            .map_err(|error| TriageError::configuration(format!("Invalid TOML: {error}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TriageError> {
        if self.cache_ttl_minutes == 0 {
            return Err(TriageError::configuration(
                "cache_ttl_minutes must be greater than zero",
            ));
        }
        if self.providers.is_empty() {
            return Err(TriageError::configuration("providers must not be empty"));
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cache_ttl: Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60)),
            providers: self.providers.clone(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn triage_options(&self, force: bool) -> TriageOptions {
        TriageOptions {
            force,
            include_issues: self.include_issues,
            include_pull_requests: self.include_pull_requests,
        }
    }
}
