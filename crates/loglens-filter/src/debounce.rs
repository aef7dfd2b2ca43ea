use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::coordinator::FilterCoordinator;
use crate::eval::Evaluate;

/// Default inactivity window for text input
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

/// Debounces text-input events in front of the coordinator.
///
/// Each input cancels the previously pending timer and starts a new one, so
/// at most one timer is outstanding per store. When the window elapses
/// without further input, the settled query goes through the same
/// sequence-numbered submission path as every other trigger. Level toggles
/// bypass this entirely and call [`FilterCoordinator::set_levels`] directly.
pub struct QueryDebouncer<E> {
    coordinator: FilterCoordinator<E>,
    interval: Duration,
    pending: Mutex<CancellationToken>,
}

impl<E: Evaluate> QueryDebouncer<E> {
    pub fn new(coordinator: FilterCoordinator<E>, interval: Duration) -> Self {
        Self {
            coordinator,
            interval,
            pending: Mutex::new(CancellationToken::new()),
        }
    }

    /// Register query input, restarting the inactivity window
    pub fn input(&self, query: impl Into<String>) {
        let query = query.into();
        let token = {
            let mut pending = self.pending.lock();
            pending.cancel();
            *pending = CancellationToken::new();
            pending.clone()
        };

        let coordinator = self.coordinator.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(interval) => {
                    coordinator.set_query(query);
                }
            }
        });
    }

    /// Drop any pending input without firing it
    pub fn cancel(&self) {
        self.pending.lock().cancel();
    }
}
