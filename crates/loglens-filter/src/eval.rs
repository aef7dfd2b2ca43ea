use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use loglens_types::{ArcRecord, EntrySnapshot, LogLevel, LogStats};

use crate::error::EvalError;

/// The narrowing evaluator contract.
///
/// Implementations are pure with respect to their inputs and must preserve
/// input order; they may be arbitrarily slow or remote. The composition of
/// the passes (search from the full snapshot, then level restriction, and
/// the empty-set/full-set equivalence) is the pipeline's job, not the
/// evaluator's.
pub trait Evaluate: Send + Sync + 'static {
    /// Text search over the full snapshot; returns an order-preserving
    /// subsequence of its records
    fn search(
        &self,
        snapshot: Arc<EntrySnapshot>,
        query: String,
    ) -> impl Future<Output = Result<Vec<ArcRecord>, EvalError>> + Send;

    /// Restrict records to the given levels, preserving order
    fn filter_levels(
        &self,
        records: Vec<ArcRecord>,
        levels: HashSet<LogLevel>,
    ) -> impl Future<Output = Result<Vec<ArcRecord>, EvalError>> + Send;

    /// Per-level counts for a finished view
    fn stats(
        &self,
        records: &[ArcRecord],
    ) -> impl Future<Output = Result<LogStats, EvalError>> + Send;
}

/// In-process evaluators: case-insensitive substring matching over message,
/// level, and timestamp, and straight level-set membership.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalEvaluators;

impl Evaluate for LocalEvaluators {
    async fn search(
        &self,
        snapshot: Arc<EntrySnapshot>,
        query: String,
    ) -> Result<Vec<ArcRecord>, EvalError> {
        let needle = query.to_lowercase();
        Ok(snapshot
            .records()
            .iter()
            .filter(|record| {
                record.message.to_lowercase().contains(&needle)
                    || record.level.as_str().to_lowercase().contains(&needle)
                    || record
                        .timestamp
                        .as_ref()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn filter_levels(
        &self,
        records: Vec<ArcRecord>,
        levels: HashSet<LogLevel>,
    ) -> Result<Vec<ArcRecord>, EvalError> {
        Ok(records
            .into_iter()
            .filter(|record| levels.contains(&record.level))
            .collect())
    }

    async fn stats(&self, records: &[ArcRecord]) -> Result<LogStats, EvalError> {
        let mut stats = LogStats {
            total: records.len(),
            ..LogStats::default()
        };
        for record in records {
            match record.level {
                LogLevel::Error => stats.error += 1,
                LogLevel::Warn => stats.warn += 1,
                LogLevel::Info => stats.info += 1,
                LogLevel::Debug => stats.debug += 1,
            }
        }
        Ok(stats)
    }
}
