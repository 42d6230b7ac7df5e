//! Step 5 — consolidate near-duplicate issues/decisions (§4.4 step 5).
//! Greedy, first-match-wins clustering by cosine similarity, the same
//! scan-order tie-break already used for pattern-overlap merging
//! (`memex_storage::queries::pattern_queries`). Deliberately NOT
//! `cortex-consolidation::algorithms`'s `hdbscan`-style density
//! clustering: a single threshold and a minimum cluster size, not a
//! density model.

use chrono::NaiveDate;

use memex_core::constants::{
    CONSOLIDATION_COSINE_THRESHOLD, CONSOLIDATION_MIN_AGE_DAYS, CONSOLIDATION_MIN_CLUSTER_SIZE,
    CONSOLIDATION_WINDOW_DAYS,
};
use memex_core::errors::MemexResult;
use memex_core::{Entry, EntryType, Tier};
use memex_storage::{ListFilter, StorageEngine};

struct Candidate {
    row_id: i64,
    entry: Entry,
    vector: Vec<f32>,
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// `find_consolidation_candidates(0.75)`: greedy clusters of non-archived
/// issues+decisions from the last 30 days, cosine ≥ threshold, first-match,
/// min size 3.
fn find_clusters(candidates: &[Candidate], threshold: f32, min_size: usize) -> Vec<Vec<usize>> {
    let mut clusters: Vec<(usize, Vec<usize>)> = Vec::new(); // (representative idx, member idxs)
    for (i, c) in candidates.iter().enumerate() {
        let mut placed = false;
        for (rep, members) in clusters.iter_mut() {
            if cosine(&c.vector, &candidates[*rep].vector) >= threshold {
                members.push(i);
                placed = true;
                break;
            }
        }
        if !placed {
            clusters.push((i, vec![i]));
        }
    }
    clusters
        .into_iter()
        .map(|(_, members)| members)
        .filter(|m| m.len() >= min_size)
        .collect()
}

pub fn consolidate(store: &StorageEngine, today: NaiveDate) -> MemexResult<usize> {
    let mut all_candidates = Vec::new();

    for entry_type in [EntryType::Issue, EntryType::Decision] {
        let rows = store.list_with_rowids(ListFilter {
            entry_type: Some(entry_type),
            days: Some(CONSOLIDATION_WINDOW_DAYS),
            include_archived: false,
            today,
        })?;
        for (row_id, entry) in rows {
            if entry.pinned {
                continue;
            }
            if let Some(vector) = store.get_vec(row_id)? {
                all_candidates.push(Candidate { row_id, entry, vector });
            }
        }
    }

    let clusters = find_clusters(&all_candidates, CONSOLIDATION_COSINE_THRESHOLD, CONSOLIDATION_MIN_CLUSTER_SIZE);

    let mut archived_count = 0;
    for cluster in clusters {
        let members: Vec<&Candidate> = cluster.iter().map(|&i| &all_candidates[i]).collect();
        if !members.iter().all(|c| c.entry.age_days(today) > CONSOLIDATION_MIN_AGE_DAYS) {
            continue;
        }

        let survivor_idx = members
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.entry
                    .access_count
                    .cmp(&b.entry.access_count)
                    .then_with(|| a.entry.date.cmp(&b.entry.date))
                    .then_with(|| a.entry.time.cmp(&b.entry.time))
            })
            .map(|(idx, _)| idx)
            .expect("cluster is non-empty");

        let survivor = members[survivor_idx];
        let mut merged_tags = survivor.entry.tags.clone();
        for (idx, other) in members.iter().enumerate() {
            if idx == survivor_idx {
                continue;
            }
            for tag in &other.entry.tags {
                if !merged_tags.contains(tag) {
                    merged_tags.push(tag.clone());
                }
            }
        }

        let merged_content = format!(
            "{}\n[Consolidated from {} entries]",
            survivor.entry.content,
            members.len()
        );
        let survivor_tier = if survivor.entry.tier == Tier::Ephemeral {
            Tier::Working
        } else {
            survivor.entry.tier
        };
        store.consolidate_into_survivor(&survivor.entry.id, &merged_tags, &merged_content, survivor_tier)?;

        let loser_ids: Vec<String> = members
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != survivor_idx)
            .map(|(_, c)| c.entry.id.clone())
            .collect();
        archived_count += store.archive(&loser_ids)?;
    }

    Ok(archived_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clusters_below_min_size_are_dropped() {
        let candidates = vec![
            Candidate {
                row_id: 1,
                entry: dummy_entry("a"),
                vector: vec![1.0, 0.0],
            },
            Candidate {
                row_id: 2,
                entry: dummy_entry("b"),
                vector: vec![1.0, 0.0],
            },
        ];
        let clusters = find_clusters(&candidates, 0.75, 3);
        assert!(clusters.is_empty());
    }

    #[test]
    fn a_cluster_of_three_similar_vectors_survives() {
        let candidates = vec![
            Candidate { row_id: 1, entry: dummy_entry("a"), vector: vec![1.0, 0.0] },
            Candidate { row_id: 2, entry: dummy_entry("b"), vector: vec![0.99, 0.01] },
            Candidate { row_id: 3, entry: dummy_entry("c"), vector: vec![0.98, 0.02] },
        ];
        let clusters = find_clusters(&candidates, 0.75, 3);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    fn dummy_entry(id: &str) -> Entry {
        Entry::new(
            id.into(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "10:00".into(),
            EntryType::Issue,
            vec![],
            "x".into(),
            None,
        )
    }
}
