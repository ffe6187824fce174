use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::scoring::MatchResult;
use crate::tier::Tier;

/// One surviving result with its 1-based rank. Categories are carried along
/// for the aggregate summary only; they are not part of the scorer output.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub rank: usize,
    pub result: MatchResult,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatches {
    pub results: Vec<RankedMatch>,
    pub category_breakdown: Vec<CategorySummary>,
    /// Set when `results` is empty, explaining why. Never an error.
    pub reason: Option<String>,
}

/// Sort scored results descending, assign ranks, and apply the tier policy.
///
/// Ties on overall score keep pool insertion order (stable sort); no further
/// disambiguation by secondary score.
pub fn rank_matches(scored: Vec<(MatchResult, Vec<String>)>, tier: Tier) -> RankedMatches {
    if scored.is_empty() {
        return RankedMatches {
            results: vec![],
            category_breakdown: vec![],
            reason: Some("no eligible subjects after pool filtering".into()),
        };
    }

    let limits = tier.limits();

    let mut ordered = scored;
    ordered.sort_by(|a, b| {
        b.0.score
            .total
            .partial_cmp(&a.0.score.total)
            .unwrap_or(Ordering::Equal)
    });

    let mut results: Vec<RankedMatch> = ordered
        .into_iter()
        .filter(|(result, _)| result.score.total >= limits.min_score)
        .take(limits.max_results)
        .enumerate()
        .map(|(idx, (result, categories))| RankedMatch {
            rank: idx + 1,
            result,
            categories,
        })
        .collect();

    let reason = if results.is_empty() {
        Some("no matches met the minimum score".into())
    } else {
        None
    };

    let category_breakdown = build_category_breakdown(&results);
    results.shrink_to_fit();

    RankedMatches {
        results,
        category_breakdown,
        reason,
    }
}

fn build_category_breakdown(results: &[RankedMatch]) -> Vec<CategorySummary> {
    // BTreeMap keeps the pre-sort grouping deterministic.
    let mut grouped: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for ranked in results {
        for category in &ranked.categories {
            let entry = grouped.entry(category.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += ranked.result.score.total;
        }
    }

    let mut breakdown: Vec<CategorySummary> = grouped
        .into_iter()
        .map(|(category, (count, sum))| CategorySummary {
            category: category.to_string(),
            count,
            average_score: sum / count as f64,
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.average_score
            .partial_cmp(&a.average_score)
            .unwrap_or(Ordering::Equal)
    });
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::MatchMode;
    use crate::matching::insights::derive_insights;
    use crate::matching::scoring::{MatchScore, ScoringResult};

    fn result_with_total(id: &str, total: f64) -> MatchResult {
        let dim = |score: f64| ScoringResult {
            score,
            status: "MATCH",
            details: String::new(),
        };
        let score = MatchScore {
            total,
            skills: dim(total),
            industry: dim(total),
            experience: dim(total),
            preferences: dim(total),
            goals: dim(total),
            engagement: dim(total),
        };
        let insights = derive_insights(&score, MatchMode::CandidateSearch);
        MatchResult {
            subject_id: id.into(),
            score,
            insights,
        }
    }

    #[test]
    fn sorts_descending_and_assigns_ranks() {
        let scored = vec![
            (result_with_total("low", 0.55), vec![]),
            (result_with_total("high", 0.9), vec![]),
            (result_with_total("mid", 0.7), vec![]),
        ];

        let ranked = rank_matches(scored, Tier::Enterprise);
        let ids: Vec<_> = ranked
            .results
            .iter()
            .map(|r| r.result.subject_id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        assert_eq!(
            ranked.results.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(ranked.reason.is_none());
    }

    #[test]
    fn ties_keep_pool_insertion_order() {
        let scored = vec![
            (result_with_total("first", 0.8), vec![]),
            (result_with_total("second", 0.8), vec![]),
            (result_with_total("third", 0.8), vec![]),
        ];

        let ranked = rank_matches(scored, Tier::Enterprise);
        let ids: Vec<_> = ranked
            .results
            .iter()
            .map(|r| r.result.subject_id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn tier_cap_keeps_the_highest_scoring_k() {
        let scored: Vec<_> = (0..10)
            .map(|i| {
                (
                    result_with_total(&format!("s{i}"), 0.5 + i as f64 * 0.04),
                    vec![],
                )
            })
            .collect();

        let ranked = rank_matches(scored, Tier::Free);
        assert_eq!(ranked.results.len(), 5);
        assert_eq!(ranked.results[0].result.subject_id, "s9");
        assert!(ranked
            .results
            .windows(2)
            .all(|w| w[0].result.score.total >= w[1].result.score.total));
    }

    #[test]
    fn min_score_cutoff_drops_weak_results() {
        let scored = vec![
            (result_with_total("keep", 0.6), vec![]),
            (result_with_total("drop", 0.2), vec![]),
        ];
        let ranked = rank_matches(scored, Tier::Free);
        assert_eq!(ranked.results.len(), 1);
        assert_eq!(ranked.results[0].result.subject_id, "keep");
    }

    #[test]
    fn all_filtered_yields_reason_not_error() {
        let scored = vec![(result_with_total("weak", 0.1), vec![])];
        let ranked = rank_matches(scored, Tier::Free);
        assert!(ranked.results.is_empty());
        assert_eq!(
            ranked.reason.as_deref(),
            Some("no matches met the minimum score")
        );
    }

    #[test]
    fn empty_pool_yields_empty_output_with_reason() {
        let ranked = rank_matches(vec![], Tier::Free);
        assert!(ranked.results.is_empty());
        assert!(ranked.category_breakdown.is_empty());
        assert!(ranked.reason.is_some());
    }

    #[test]
    fn category_breakdown_counts_and_averages() {
        let scored = vec![
            (result_with_total("a", 0.9), vec!["fintech".into()]),
            (
                result_with_total("b", 0.7),
                vec!["fintech".into(), "edtech".into()],
            ),
            (result_with_total("c", 0.6), vec!["edtech".into()]),
        ];

        let ranked = rank_matches(scored, Tier::Enterprise);
        assert_eq!(ranked.category_breakdown.len(), 2);

        let fintech = &ranked.category_breakdown[0];
        assert_eq!(fintech.category, "fintech");
        assert_eq!(fintech.count, 2);
        assert!((fintech.average_score - 0.8).abs() < 1e-9);

        let edtech = &ranked.category_breakdown[1];
        assert_eq!(edtech.count, 2);
        assert!((edtech.average_score - 0.65).abs() < 1e-9);
    }
}
