//! Count-based top-N ranking shared by the favoriting and remixing engines.

use crate::error::{ServiceError, ServiceResult};

/// Orders `candidates` by descending score and returns the first `limit`.
///
/// The sort is stable, so candidates with equal scores keep their relative
/// order from the input list; callers that pass a most-recent-first
/// candidate list get most-recent-first tie-breaking for free. A `limit`
/// larger than the candidate count returns every candidate.
pub fn top_by_score<K, F>(candidates: Vec<K>, limit: i64, mut score: F) -> ServiceResult<Vec<K>>
where
    F: FnMut(&K) -> anyhow::Result<usize>,
{
    if limit < 0 {
        return Err(ServiceError::InvalidOperation(
            "trending limit may not be negative".into(),
        ));
    }

    let mut scored = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let count = score(&candidate)?;
        scored.push((count, candidate));
    }
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit as usize);
    Ok(scored.into_iter().map(|(_, candidate)| candidate).collect())
}
