//! Periodic forced refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{FocusProvider, TriageOptions};

/// Background task that re-runs a forced triage fetch on a fixed period.
///
/// Each pass publishes [`crate::FocusEvent::Refreshed`] through the
/// provider, which is how subscribers learn about it.
#[derive(Debug)]
pub struct RefreshScheduler {
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Starts refreshing every `refresh_rate_minutes`. Returns `None` (no
    /// task) when the rate is zero or negative.
    pub fn start(
        provider: Arc<FocusProvider>,
        refresh_rate_minutes: i64,
        options: TriageOptions,
    ) -> Option<Self> {
        let minutes = u64::try_from(refresh_rate_minutes).ok().filter(|m| *m > 0)?;
        Some(Self::start_with_period(
            provider,
            Duration::from_secs(minutes * 60),
            options,
        ))
    }

    /// Starts refreshing every `period`. The first pass runs immediately.
    pub fn start_with_period(
        provider: Arc<FocusProvider>,
        period: Duration,
        options: TriageOptions,
    ) -> Self {
        let cancellation = CancellationToken::new();
        let task = tokio::spawn(run(provider, period, options.forced(), cancellation.clone()));
        tracing::info!(period_secs = period.as_secs(), "Refresh scheduler started");
        Self { cancellation, task }
    }

    /// Stops the task and waits for an in-progress pass to finish.
    pub async fn stop(self) {
        self.cancellation.cancel();
        if let Err(error) = self.task.await {
            tracing::warn!(%error, "Refresh task ended abnormally");
        }
    }
}

async fn run(
    provider: Arc<FocusProvider>,
    period: Duration,
    options: TriageOptions,
    cancellation: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => break,
            _ = interval.tick() => {}
        }

        match provider.fetch_triage_set(options, &cancellation).await {
            Ok(set) => tracing::debug!(items = set.items.len(), "Scheduled refresh complete"),
            Err(error) if error.is_cancelled() => break,
            Err(error) => tracing::warn!(%error, "Scheduled refresh failed"),
        }
    }

    tracing::info!("Refresh scheduler stopped");
}
