//! Periodic purge of trashed NPCs whose restore window has passed.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use super::NpcLifecycle;

/// One sweep. Failures are logged; the next sweep retries.
pub async fn sweep_expired(lifecycle: &NpcLifecycle) -> Option<u64> {
    match lifecycle.cleanup_expired().await {
        Ok(deleted) => Some(deleted),
        Err(e) => {
            tracing::warn!(error = %e, "Expired NPC cleanup failed");
            None
        }
    }
}

/// Sweep once immediately, then every `every`. Runs until the task is dropped.
pub async fn run_cleanup_scheduler(lifecycle: Arc<NpcLifecycle>, every: Duration) {
    tracing::info!(interval_secs = every.as_secs(), "Starting expired NPC cleanup");

    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        sweep_expired(&lifecycle).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockCampaignRepo, MockLlmPort, MockNpcRepo, RepoError};
    use crate::use_cases::npc::NpcGenerator;
    use chrono::Utc;

    fn lifecycle(npcs: MockNpcRepo) -> Arc<NpcLifecycle> {
        let mut llm = MockLlmPort::new();
        llm.expect_supports_structured_output().return_const(true);
        Arc::new(NpcLifecycle::new(
            Arc::new(npcs),
            Arc::new(MockCampaignRepo::new()),
            Arc::new(NpcGenerator::new(Arc::new(llm))),
            Arc::new(FixedClock(Utc::now())),
            chrono::Duration::days(30),
        ))
    }

    #[tokio::test]
    async fn sweep_swallows_repository_errors() {
        let mut npcs = MockNpcRepo::new();
        npcs.expect_delete_expired()
            .returning(|_| Err(RepoError::database("delete_expired_npcs", "disk I/O error")));

        assert_eq!(sweep_expired(&lifecycle(npcs)).await, None);
    }

    #[tokio::test]
    async fn scheduler_runs_immediately_and_keeps_going_after_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut npcs = MockNpcRepo::new();
        npcs.expect_delete_expired().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(RepoError::database("delete_expired_npcs", "locked"))
            } else {
                Ok(0)
            }
        });

        let handle = tokio::spawn(run_cleanup_scheduler(
            lifecycle(npcs),
            Duration::from_millis(10),
        ));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(calls.load(Ordering::SeqCst) >= 2);
    }
}
