//! Single-flight coordination for the token refresh protocol.
//!
//! At most one refresh call is outstanding per client. The first caller to
//! observe an expiry becomes the leader and issues the refresh; everyone
//! else enqueues a oneshot continuation and waits. The queue is drained
//! exactly once per cycle, in FIFO order, every waiter observing the same
//! resolved token or the same rejection.

use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::error::ApiError;

/// Outcome of a settled refresh cycle, delivered to every waiter.
pub type RefreshOutcome = Result<String, ApiError>;

/// Role assigned to a caller entering the refresh protocol.
pub enum RefreshTicket {
    /// This caller must perform the refresh and then settle the cycle.
    Leader,
    /// A refresh is already in flight; await the shared outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct CoordinatorState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Encapsulates the refresh-in-progress flag and the pending queue.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<CoordinatorState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the protocol: become the leader, or queue behind the one in
    /// flight.
    pub fn begin(&self) -> RefreshTicket {
        let mut state = self.state.lock().expect("refresh lock poisoned");
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            RefreshTicket::Follower(rx)
        } else {
            state.in_flight = true;
            RefreshTicket::Leader
        }
    }

    /// Settle the cycle: clear the in-flight flag and drain the queue in
    /// FIFO order. Called by the leader on success and failure alike.
    pub fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().expect("refresh lock poisoned");
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        let count = waiters.len();
        for waiter in waiters {
            // A dropped receiver means that caller went away; nothing to do.
            let _ = waiter.send(outcome.clone());
        }
        tracing::debug!(waiters = count, ok = outcome.is_ok(), "refresh cycle settled");
    }

    /// Whether a refresh call is currently outstanding.
    pub fn in_flight(&self) -> bool {
        self.state.lock().expect("refresh lock poisoned").in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_caller_is_leader() {
        let coordinator = RefreshCoordinator::new();
        assert!(matches!(coordinator.begin(), RefreshTicket::Leader));
        assert!(coordinator.in_flight());
    }

    #[test]
    fn test_second_caller_is_follower() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.begin();
        assert!(matches!(coordinator.begin(), RefreshTicket::Follower(_)));
    }

    #[tokio::test]
    async fn test_settle_resolves_followers_fifo() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.begin();

        let mut receivers = Vec::new();
        for _ in 0..3 {
            match coordinator.begin() {
                RefreshTicket::Follower(rx) => receivers.push(rx),
                RefreshTicket::Leader => panic!("second leader while in flight"),
            }
        }

        coordinator.settle(Ok("new-token".to_string()));
        assert!(!coordinator.in_flight());

        for rx in receivers {
            let outcome = rx.await.expect("waiter dropped");
            assert_eq!(outcome.unwrap(), "new-token");
        }
    }

    #[tokio::test]
    async fn test_settle_rejects_all_waiters_with_same_error() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.begin();

        let followers: Vec<_> = (0..2)
            .map(|_| match coordinator.begin() {
                RefreshTicket::Follower(rx) => rx,
                RefreshTicket::Leader => panic!("second leader while in flight"),
            })
            .collect();

        coordinator.settle(Err(ApiError::RefreshRejected {
            message: "401".to_string(),
        }));

        for rx in followers {
            let outcome = rx.await.expect("waiter dropped");
            assert!(matches!(outcome, Err(ApiError::RefreshRejected { .. })));
        }
    }

    #[test]
    fn test_new_cycle_possible_after_settle() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.begin();
        coordinator.settle(Err(ApiError::NotAuthenticated));
        assert!(matches!(coordinator.begin(), RefreshTicket::Leader));
    }

    #[test]
    fn test_settle_with_dropped_waiter_does_not_panic() {
        let coordinator = RefreshCoordinator::new();
        let _leader = coordinator.begin();
        match coordinator.begin() {
            RefreshTicket::Follower(rx) => drop(rx),
            RefreshTicket::Leader => panic!("second leader while in flight"),
        }
        coordinator.settle(Ok("token".to_string()));
    }
}
