use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{trace, warn};

use loglens_types::{EntrySnapshot, FilterCriteria, FilteredView, LogLevel, LogStats};

use crate::eval::Evaluate;
use crate::pipeline;
use crate::store::EntryStore;

/// Notification for a committed narrowing pass
#[derive(Clone, Debug)]
pub struct ViewUpdate {
    /// Sequence number of the request that produced this view
    pub seq: u64,

    /// The criteria the view satisfies
    pub criteria: FilterCriteria,

    /// The newly committed view
    pub view: FilteredView,

    /// Fresh stats for the view; `None` when the stats evaluator failed and
    /// previously displayed stats should stay on screen
    pub stats: Option<LogStats>,
}

#[derive(Default)]
struct Committed {
    seq: u64,
    view: FilteredView,
    stats: LogStats,
}

/// Sequences the asynchronous narrowing passes so that the committed view
/// always reflects the most recently submitted criteria.
///
/// Every submission gets a monotonically increasing sequence number. A pass
/// that finishes after a newer one has been submitted is discarded on the
/// commit path; in-flight evaluator calls are never cancelled, only their
/// effect is suppressed. All commits happen under one lock, so the update
/// channel sees strictly increasing sequence numbers.
pub struct FilterCoordinator<E> {
    store: Arc<EntryStore>,
    evaluate: Arc<E>,
    latest: Arc<AtomicU64>,
    committed: Arc<Mutex<Committed>>,
    update_tx: mpsc::UnboundedSender<ViewUpdate>,
}

impl<E> Clone for FilterCoordinator<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            evaluate: Arc::clone(&self.evaluate),
            latest: Arc::clone(&self.latest),
            committed: Arc::clone(&self.committed),
            update_tx: self.update_tx.clone(),
        }
    }
}

impl<E: Evaluate> FilterCoordinator<E> {
    /// Create a coordinator and the receiver for committed view updates
    pub fn new(store: Arc<EntryStore>, evaluate: E) -> (Self, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            store,
            evaluate: Arc::new(evaluate),
            latest: Arc::new(AtomicU64::new(0)),
            committed: Arc::new(Mutex::new(Committed::default())),
            update_tx,
        };
        (coordinator, update_rx)
    }

    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    /// Replace the snapshot for a newly loaded file and submit the current
    /// criteria against it.
    ///
    /// No await happens between the replacement and the submission, so any
    /// pass still in flight against the old snapshot is already stale by
    /// sequence number before it can land.
    pub fn load(&self, snapshot: EntrySnapshot) -> Option<u64> {
        self.store.replace_snapshot(snapshot);
        self.submit()
    }

    /// Apply a settled query value and start a narrowing pass.
    ///
    /// Text input is debounced upstream (see [`QueryDebouncer`]); this is
    /// the post-debounce entry point.
    ///
    /// [`QueryDebouncer`]: crate::debounce::QueryDebouncer
    pub fn set_query(&self, query: String) -> Option<u64> {
        self.store.set_query(query);
        self.submit()
    }

    /// Apply a level selection and start a narrowing pass immediately,
    /// using the last settled query value
    pub fn set_levels(&self, levels: HashSet<LogLevel>) -> Option<u64> {
        self.store.set_levels(levels);
        self.submit()
    }

    /// Start a narrowing pass for the store's current criteria.
    ///
    /// Returns the assigned sequence number, or `None` when no snapshot is
    /// loaded (a no-op: no sequence number is consumed, nothing is spawned).
    pub fn submit(&self) -> Option<u64> {
        let snapshot = self.store.snapshot()?;
        let criteria = self.store.criteria();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let evaluate = Arc::clone(&self.evaluate);
        let latest = Arc::clone(&self.latest);
        let committed = Arc::clone(&self.committed);
        let update_tx = self.update_tx.clone();

        tokio::spawn(async move {
            let records = match pipeline::narrow(&*evaluate, snapshot, &criteria).await {
                Ok(records) => records,
                Err(e) => {
                    warn!(seq, error = %e, "narrowing pass failed, keeping previous view");
                    return;
                }
            };
            let view = FilteredView::new(records);

            // Stats belong to the same pass; their failure is tolerated and
            // the previous stats stay on screen.
            let stats = match evaluate.stats(&view.records).await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!(seq, error = %e, "stats evaluator failed, keeping previous stats");
                    None
                }
            };

            let mut slot = committed.lock();
            if latest.load(Ordering::SeqCst) > seq {
                trace!(seq, "discarding stale result");
                return;
            }
            slot.seq = seq;
            slot.view = view.clone();
            if let Some(stats) = stats {
                slot.stats = stats;
            }
            let _ = update_tx.send(ViewUpdate {
                seq,
                criteria,
                view,
                stats,
            });
        });

        Some(seq)
    }

    /// The currently committed view
    pub fn current_view(&self) -> FilteredView {
        self.committed.lock().view.clone()
    }

    /// Stats for the currently committed view
    pub fn current_stats(&self) -> LogStats {
        self.committed.lock().stats
    }
}
