//! Single-flight coordination of session refreshes.
//!
//! Any number of requests may hit a 401 at the same time. The first one to
//! ask starts a refresh; everyone else awaits the same shared outcome. Once
//! the refresh settles the slot is cleared so a later 401 starts a fresh
//! attempt.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::runtime::Handle;
use tracing::error;

type InFlight = Shared<BoxFuture<'static, bool>>;
type Slot = Arc<Mutex<Option<InFlight>>>;

/// Shares one in-flight refresh between all callers.
///
/// Each attempt runs on its own Tokio task, so it completes and clears the
/// slot even when every caller waiting on it has been dropped.
#[derive(Clone, Default)]
pub struct RefreshCoordinator {
    slot: Slot,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

/// Empties the slot when the attempt task finishes, panics, or is cancelled.
struct ClearOnDrop(Slot);

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        lock(&self.0).take();
    }
}

impl RefreshCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Join the in-flight refresh or start one with `start`.
    ///
    /// `start` is only invoked when no refresh is pending. Inside a Tokio
    /// runtime its future is spawned; elsewhere the callers drive it.
    /// Resolves to `true` when the session was renewed; an attempt that
    /// panics counts as a failure.
    pub async fn refresh<F, Fut>(&self, start: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let in_flight = {
            let mut slot = lock(&self.slot);
            if let Some(existing) = slot.as_ref() {
                existing.clone()
            } else {
                let attempt = start();
                let guard = ClearOnDrop(Arc::clone(&self.slot));
                let attempt = async move {
                    let renewed = attempt.await;
                    drop(guard);
                    renewed
                };
                let shared = match Handle::try_current() {
                    Ok(runtime) => runtime
                        .spawn(attempt)
                        .map(|joined| {
                            joined.unwrap_or_else(|err| {
                                error!(%err, "session refresh task failed");
                                false
                            })
                        })
                        .boxed()
                        .shared(),
                    Err(_) => attempt.boxed().shared(),
                };
                *slot = Some(shared.clone());
                shared
            }
        };
        in_flight.await
    }
}

fn lock(slot: &Mutex<Option<InFlight>>) -> MutexGuard<'_, Option<InFlight>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::future::join_all;
    use rstest::rstest;

    fn counted(
        calls: &Arc<AtomicUsize>,
        outcome: bool,
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, bool> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(delay).await;
                outcome
            }
            .boxed()
        }
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn concurrent_callers_share_one_attempt(#[case] outcome: bool) {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let waiters = (0..5).map(|_| {
            coordinator.refresh(counted(&calls, outcome, Duration::from_millis(20)))
        });
        let results = join_all(waiters).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|renewed| *renewed == outcome));
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn settled_refresh_allows_a_new_attempt() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        assert!(!coordinator.refresh(counted(&calls, false, Duration::ZERO)).await);
        assert!(coordinator.refresh(counted(&calls, true, Duration::ZERO)).await);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropped_caller_does_not_cancel_the_refresh() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(5),
            coordinator.refresh(counted(&calls, true, Duration::from_millis(50))),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(coordinator.is_refreshing());

        let renewed = coordinator
            .refresh(counted(&calls, false, Duration::ZERO))
            .await;

        assert!(renewed, "second caller should join the pending attempt");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!coordinator.is_refreshing());
    }

    #[tokio::test]
    async fn abandoned_attempt_settles_without_any_waiter() {
        let coordinator = RefreshCoordinator::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let finished_in_attempt = Arc::clone(&finished);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(5),
            coordinator.refresh(move || async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                finished_in_attempt.fetch_add(1, Ordering::SeqCst);
                false
            }),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert!(!coordinator.is_refreshing());
        assert!(coordinator.refresh(counted(&calls, true, Duration::ZERO)).await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    fn exploding_refresh() -> bool {
        panic!("refresh transport exploded")
    }

    #[tokio::test]
    async fn panicking_attempt_reports_failure_and_clears_the_slot() {
        let coordinator = RefreshCoordinator::new();

        let renewed = coordinator.refresh(|| async { exploding_refresh() }).await;

        assert!(!renewed);
        assert!(!coordinator.is_refreshing());
    }
}
