//! Reciprocal Rank Fusion (§4.3 step 4), narrowed from
//! three-list `fuse` (lexical + vector + entity) to the two lists this spec
//! names (lexical + vector). Grounded on
//! `cortex-retrieval::search::rrf_fusion::fuse`.

use std::collections::HashMap;

/// `score(rank) = 1 / (k + rank + 1)`, 0-based rank (§4.3 step 4).
pub fn rrf_contribution(k: f64, rank_zero_based: usize) -> f64 {
    1.0 / (k + rank_zero_based as f64 + 1.0)
}

/// Fuse two ranked lists of internal row ids (0-based rank order) into a
/// single score-per-row-id map.
pub fn fuse(lexical: &[i64], vector: &[i64], k: f64) -> HashMap<i64, f64> {
    let mut scores: HashMap<i64, f64> = HashMap::new();
    for (rank, row_id) in lexical.iter().enumerate() {
        *scores.entry(*row_id).or_default() += rrf_contribution(k, rank);
    }
    for (rank, row_id) in vector.iter().enumerate() {
        *scores.entry(*row_id).or_default() += rrf_contribution(k, rank);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rank_scores_highest() {
        assert!(rrf_contribution(60.0, 0) > rrf_contribution(60.0, 1));
    }

    #[test]
    fn union_of_both_lists_is_scored() {
        let scores = fuse(&[1, 2, 3], &[3, 4], 60.0);
        assert_eq!(scores.len(), 4);
        // row 3 appears in both lists, so it should outscore a
        // single-list-only row at the same rank.
        assert!(scores[&3] > scores[&4]);
    }

    #[test]
    fn empty_lists_produce_empty_scores() {
        let scores = fuse(&[], &[], 60.0);
        assert!(scores.is_empty());
    }
}
