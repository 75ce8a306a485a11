//! Ranking and greedy overlap suppression of match candidates

use super::types::MatchResult;

/// Sort by score descending.
///
/// The sort is stable, so equal scores keep scan order (top-to-bottom,
/// left-to-right) as long as the input is in scan order.
pub fn rank(candidates: &mut [MatchResult]) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Keep the best candidate of every overlapping cluster.
///
/// `candidates` must already be ranked. A candidate is dropped when its
/// rectangle's intersection-over-union with an already kept one exceeds
/// `overlap_threshold` (0.0 means any shared pixel counts as a duplicate).
/// Stops once `limit` candidates are kept.
pub fn suppress_overlapping(
    candidates: Vec<MatchResult>,
    overlap_threshold: f32,
    limit: usize,
) -> Vec<MatchResult> {
    let mut kept: Vec<MatchResult> = Vec::new();

    for candidate in candidates {
        if kept.len() >= limit {
            break;
        }
        let rect = candidate.rect();
        let duplicate_of = kept
            .iter()
            .find(|k| k.rect().iou(&rect) > overlap_threshold);
        match duplicate_of {
            Some(k) => {
                log::trace!("Suppressed {} (overlaps kept {})", candidate, k);
            }
            None => kept.push(candidate),
        }
    }

    kept
}
