use std::sync::Arc;

use loglens_types::{ArcRecord, EntrySnapshot, FilterCriteria};

use crate::error::EvalError;
use crate::eval::Evaluate;

/// Run one narrowing pass: search first, from the FULL snapshot, then level
/// restriction on the search result.
///
/// Both criteria are recomputed from the authoritative snapshot on every
/// pass, never accumulated onto a previous view, so the final answer is the
/// same regardless of which criterion changed last. A level selection that
/// is empty or covers every level admits all records without invoking the
/// level evaluator at all.
pub async fn narrow<E: Evaluate>(
    evaluate: &E,
    snapshot: Arc<EntrySnapshot>,
    criteria: &FilterCriteria,
) -> Result<Vec<ArcRecord>, EvalError> {
    let intermediate = if criteria.query_restricted() {
        evaluate
            .search(Arc::clone(&snapshot), criteria.query.clone())
            .await?
    } else {
        snapshot.records().to_vec()
    };

    if criteria.level_restricted() {
        evaluate
            .filter_levels(intermediate, criteria.levels.clone())
            .await
    } else {
        Ok(intermediate)
    }
}
