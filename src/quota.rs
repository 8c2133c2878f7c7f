//! Splits a requested question count across the selected question types.

use crate::error::{StudyQueryError, StudyResult};
use tracing::debug;

/// Allocate `total` across `types`, in order.
///
/// Every type receives `total / K`; the first `total % K` types receive one more. The
/// returned pairs keep the input order and their counts sum to `total`. `types` must be
/// non-empty and free of duplicates.
pub fn allocate<T>(total: usize, types: &[T]) -> StudyResult<Vec<(T, usize)>>
where
    T: Clone + PartialEq + std::fmt::Debug,
{
    if types.is_empty() {
        return Err(StudyQueryError::InvalidInput(
            "at least one question type must be selected".to_string(),
        ));
    }

    for (i, t) in types.iter().enumerate() {
        if types[..i].contains(t) {
            return Err(StudyQueryError::InvalidInput(format!(
                "question type {:?} selected more than once",
                t
            )));
        }
    }

    let k = types.len();
    let base = total / k;
    let remainder = total % k;

    let allocation: Vec<(T, usize)> = types
        .iter()
        .enumerate()
        .map(|(i, t)| (t.clone(), base + usize::from(i < remainder)))
        .collect();

    debug!(total, types = k, base, remainder, "Allocated question quota");
    Ok(allocation)
}
