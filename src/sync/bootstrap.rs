use std::time::Duration;

use async_trait::async_trait;

use super::api::SectionsApi;
use super::error::SyncError;
use crate::core::section::Section;

/// How long and how often the initial load waits for a sleeping backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Delay primitive used between bootstrap attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Outcome of the bounded retry loop.
#[derive(Debug)]
pub enum LoadResult {
    Loaded {
        sections: Vec<Section>,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
        last_error: SyncError,
    },
}

/// Fetch the full section list, retrying serially on any failure.
///
/// An empty list is a successful load. Every kind of failure is retried until
/// `policy.max_retries` is used up.
pub async fn load_with_retry(
    api: &dyn SectionsApi,
    sleeper: &dyn Sleeper,
    policy: RetryPolicy,
) -> LoadResult {
    let mut attempts = 0;
    loop {
        attempts += 1;
        let err = match api.list_sections().await {
            Ok(sections) => {
                log::info!(
                    "Loaded {} sections after {} attempt(s)",
                    sections.len(),
                    attempts
                );
                return LoadResult::Loaded { sections, attempts };
            }
            Err(e) => e,
        };

        let retries_used = attempts - 1;
        if retries_used >= policy.max_retries {
            log::error!("Backend not responding after {} attempt(s): {}", attempts, err);
            return LoadResult::Exhausted {
                attempts,
                last_error: err,
            };
        }

        log::warn!(
            "Section load attempt {} failed ({}), retrying in {:?}",
            attempts,
            err,
            policy.backoff
        );
        sleeper.sleep(policy.backoff).await;
    }
}
