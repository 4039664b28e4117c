//! Ranking of scored candidates.
//!
//! Scores are computed in parallel, then ordered with a stable sort so that
//! equal scores keep the candidate order the caller supplied.

use log::warn;
use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::entry::CatalogEntry;
use crate::recommend::scorer::Scorer;

/// A scored recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub catalog_entry_id: u64,
    pub score: f64,
    pub reason: String,
    /// The entry itself, kept for display.
    #[serde(skip)]
    pub entry: CatalogEntry,
}

impl RankedResult {
    pub fn new(entry: CatalogEntry, score: f64, reason: String) -> Self {
        RankedResult {
            catalog_entry_id: entry.id,
            score,
            reason,
            entry,
        }
    }
}

/// Score one entry. A failed or non-finite score counts as zero.
pub fn score_entry(scorer: &dyn Scorer, entry: &CatalogEntry) -> f64 {
    match scorer.score(entry) {
        Ok(score) if score.is_finite() => score.max(0.0),
        Ok(score) => {
            warn!(
                "Scorer '{}' produced {score} for entry {}, using 0",
                scorer.name(),
                entry.id
            );
            0.0
        }
        Err(e) => {
            warn!(
                "Scorer '{}' failed for entry {}: {e}, using 0",
                scorer.name(),
                entry.id
            );
            0.0
        }
    }
}

/// Sort descending by score, keeping the existing order for ties.
pub fn sort_ranked(results: &mut [RankedResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Score every candidate and keep the best `limit`.
pub fn rank(candidates: Vec<CatalogEntry>, scorer: &dyn Scorer, limit: usize) -> Vec<RankedResult> {
    let mut results: Vec<RankedResult> = candidates
        .into_par_iter()
        .map(|entry| {
            let score = score_entry(scorer, &entry);
            let reason = scorer.reason(&entry);
            RankedResult::new(entry, score, reason)
        })
        .collect();

    sort_ranked(&mut results);
    results.truncate(limit);
    results
}

/// Candidates fetched per brand when a request names several brands.
pub fn per_brand_limit(top_n: usize, brand_count: usize) -> usize {
    if brand_count == 0 {
        return top_n;
    }
    (top_n / brand_count).max(2)
}

/// Merge independently ranked groups, re-sort globally and truncate.
///
/// Truncation is by score only. A group whose best entry ranks below
/// `top_n` others is dropped entirely.
pub fn merge_groups(groups: Vec<Vec<RankedResult>>, top_n: usize) -> Vec<RankedResult> {
    let mut merged: Vec<RankedResult> = groups.into_iter().flatten().collect();
    sort_ranked(&mut merged);
    merged.truncate(top_n);
    merged
}

/// Interleave ranked results across brands, one per brand per round.
///
/// `ranked` must already be sorted. Entries below `threshold` are only taken
/// while fewer results than brands have been chosen. With no entry from any
/// listed brand the overall top `top_n` are returned.
pub fn round_robin(
    ranked: &[RankedResult],
    brands: &[String],
    threshold: f64,
    top_n: usize,
) -> Vec<RankedResult> {
    let mut groups: Vec<Vec<&RankedResult>> = brands
        .iter()
        .map(|brand| ranked.iter().filter(|r| r.entry.is_brand(brand)).collect())
        .collect();
    groups.retain(|group| !group.is_empty());

    if groups.is_empty() {
        return ranked.iter().take(top_n).cloned().collect();
    }

    let mut pointers = vec![0usize; groups.len()];
    let mut exhausted = vec![false; groups.len()];
    let mut selected = Vec::with_capacity(top_n);

    while selected.len() < top_n {
        let mut added = false;
        for (i, group) in groups.iter().enumerate() {
            if selected.len() >= top_n {
                break;
            }
            if exhausted[i] {
                continue;
            }
            let Some(candidate) = group.get(pointers[i]) else {
                exhausted[i] = true;
                continue;
            };
            if candidate.score >= threshold || selected.len() < groups.len() {
                selected.push((*candidate).clone());
                pointers[i] += 1;
                added = true;
            } else {
                // the rest of this brand scores lower still
                exhausted[i] = true;
            }
        }
        if !added {
            break;
        }
    }

    selected
}

/// Keep results at or above `threshold`, or the best `top_n` if none are.
pub fn threshold_or_top(ranked: Vec<RankedResult>, threshold: f64, top_n: usize) -> Vec<RankedResult> {
    let passing: Vec<RankedResult> = ranked
        .iter()
        .filter(|r| r.score >= threshold)
        .take(top_n)
        .cloned()
        .collect();
    if passing.is_empty() {
        ranked.into_iter().take(top_n).collect()
    } else {
        passing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PhonewiseError, Result};

    #[derive(Debug)]
    struct PriceScorer;

    impl Scorer for PriceScorer {
        fn score(&self, entry: &CatalogEntry) -> Result<f64> {
            Ok(entry.price)
        }

        fn reason(&self, _entry: &CatalogEntry) -> String {
            "price".to_string()
        }

        fn name(&self) -> &'static str {
            "price"
        }
    }

    #[derive(Debug)]
    struct FailingScorer;

    impl Scorer for FailingScorer {
        fn score(&self, entry: &CatalogEntry) -> Result<f64> {
            if entry.id % 2 == 0 {
                Err(PhonewiseError::other("boom"))
            } else {
                Ok(f64::NAN)
            }
        }

        fn reason(&self, _entry: &CatalogEntry) -> String {
            String::new()
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn entries() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new(1, "Samsung", "A", 1000.0),
            CatalogEntry::new(2, "Apple", "B", 3000.0),
            CatalogEntry::new(3, "Xiaomi", "C", 1000.0),
            CatalogEntry::new(4, "Samsung", "D", 2000.0),
        ]
    }

    fn ids(results: &[RankedResult]) -> Vec<u64> {
        results.iter().map(|r| r.catalog_entry_id).collect()
    }

    #[test]
    fn test_rank_is_stable() {
        let results = rank(entries(), &PriceScorer, 10);
        assert_eq!(ids(&results), vec![2, 4, 1, 3]);

        let again = rank(entries(), &PriceScorer, 10);
        assert_eq!(results, again);

        let top = rank(entries(), &PriceScorer, 2);
        assert_eq!(ids(&top), vec![2, 4]);
    }

    #[test]
    fn test_failing_scorer_counts_as_zero() {
        let results = rank(entries(), &FailingScorer, 10);
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.score == 0.0));
        assert_eq!(ids(&results), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_per_brand_limit() {
        assert_eq!(per_brand_limit(6, 3), 2);
        assert_eq!(per_brand_limit(5, 3), 2);
        assert_eq!(per_brand_limit(10, 2), 5);
        assert_eq!(per_brand_limit(5, 0), 5);
    }

    #[test]
    fn test_merge_groups() {
        let samsung = rank(entries().into_iter().filter(|e| e.brand == "Samsung").collect(), &PriceScorer, 2);
        let apple = rank(entries().into_iter().filter(|e| e.brand == "Apple").collect(), &PriceScorer, 2);
        let merged = merge_groups(vec![samsung, apple], 2);
        assert_eq!(ids(&merged), vec![2, 4]);
    }

    #[test]
    fn test_merge_groups_can_drop_a_brand() {
        let group = |brand: &str| {
            rank(entries().into_iter().filter(|e| e.brand == brand).collect(), &PriceScorer, 2)
        };
        let merged = merge_groups(vec![group("Samsung"), group("Apple"), group("Xiaomi")], 3);
        assert_eq!(ids(&merged), vec![2, 4, 1]);
        assert!(merged.iter().all(|r| r.entry.brand != "Xiaomi"));
    }

    #[test]
    fn test_round_robin() {
        let ranked = rank(entries(), &PriceScorer, 10);
        let brands = vec!["Samsung".to_string(), "Xiaomi".to_string()];

        let picked = round_robin(&ranked, &brands, 0.0, 5);
        assert_eq!(ids(&picked), vec![4, 3, 1]);

        // below threshold, only one per brand is guaranteed
        let picked = round_robin(&ranked, &brands, 5000.0, 5);
        assert_eq!(ids(&picked), vec![4, 3]);

        let none = round_robin(&ranked, &["Nokia".to_string()], 0.0, 2);
        assert_eq!(ids(&none), vec![2, 4]);
    }

    #[test]
    fn test_threshold_or_top() {
        let ranked = rank(entries(), &PriceScorer, 10);
        assert_eq!(ids(&threshold_or_top(ranked.clone(), 2000.0, 5)), vec![2, 4]);
        assert_eq!(ids(&threshold_or_top(ranked, 9000.0, 2)), vec![2, 4]);
    }
}
