use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::pool::{PoolFilter, SubjectStore};
use super::ranker::{rank_matches, RankedMatches};
use super::scoring::{score_match, MatchResult};
use crate::enrichment::{decorate_result, EnrichmentConfig, InsightEnricher};
use crate::errors::EngineError;
use crate::intent::{resolve_quiz_profile, resolve_search_intent, MatchIntent, QuizProfile};
use crate::normalize::{normalize_candidate, normalize_project, SubjectProfile};
use crate::tier::Tier;
use crate::{CandidateRecord, ProjectRecord};

/// End-to-end matching pipeline: pool retrieval, normalization, scoring,
/// ranking. Enrichment is a separate decoration step applied afterwards.
pub struct MatchingEngine<S> {
    store: S,
}

impl<S: SubjectStore> MatchingEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Rank candidates against an already-parsed company search intent.
    ///
    /// `now` anchors activity-recency signals so that one query scores every
    /// candidate against the same instant.
    pub async fn rank_candidates(
        &self,
        intent_json: &Value,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> Result<RankedMatches, EngineError> {
        let intent = resolve_search_intent(intent_json)?;
        let filter = PoolFilter::for_intent(&intent, tier);
        let pool = self.store.fetch_candidates(&filter).await?;
        debug!(pool_size = pool.len(), "candidate pool retrieved");

        let profiles = pool
            .iter()
            .filter_map(|record| match normalize_candidate(record, now) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(error = %err, "skipping malformed candidate record");
                    None
                }
            });

        Ok(score_and_rank(profiles, &intent, tier))
    }

    /// Rank live projects against a student's discovery-quiz profile.
    pub async fn rank_projects(
        &self,
        profile: &QuizProfile,
        tier: Tier,
    ) -> Result<RankedMatches, EngineError> {
        let intent = resolve_quiz_profile(profile)?;
        let filter = PoolFilter::for_intent(&intent, tier);
        let pool = self.store.fetch_projects(&filter).await?;
        debug!(pool_size = pool.len(), "project pool retrieved");

        let profiles = pool
            .iter()
            .filter_map(|record| match normalize_project(record) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(error = %err, "skipping malformed project record");
                    None
                }
            });

        Ok(score_and_rank(profiles, &intent, tier))
    }
}

/// Score a single candidate against a resolved intent. Unlike the batch
/// path, a malformed record is an error here, not a silent skip.
pub fn score_one_candidate(
    record: &CandidateRecord,
    intent: &MatchIntent,
    now: DateTime<Utc>,
) -> Result<MatchResult, EngineError> {
    let profile = normalize_candidate(record, now)?;
    Ok(score_match(&profile, intent))
}

/// Single-project counterpart of [`score_one_candidate`].
pub fn score_one_project(
    record: &ProjectRecord,
    intent: &MatchIntent,
) -> Result<MatchResult, EngineError> {
    let profile = normalize_project(record)?;
    Ok(score_match(&profile, intent))
}

fn score_and_rank(
    profiles: impl Iterator<Item = SubjectProfile>,
    intent: &MatchIntent,
    tier: Tier,
) -> RankedMatches {
    // Each pair is scored independently; the ranker imposes the only
    // ordering that matters.
    let scored: Vec<(MatchResult, Vec<String>)> = profiles
        .map(|profile| {
            let result = score_match(&profile, intent);
            let mut categories: Vec<String> = profile.categories.into_iter().collect();
            categories.sort();
            (result, categories)
        })
        .collect();

    rank_matches(scored, tier)
}

/// Decorate the top-ranked results with external enrichment text. Each call
/// is bounded by the configured timeout; failures keep the deterministic
/// templates and never disturb ranks or scores.
pub async fn enrich_ranked<E: InsightEnricher>(
    enricher: &E,
    config: &EnrichmentConfig,
    ranked: &mut RankedMatches,
) {
    if !config.enabled {
        return;
    }

    for entry in ranked.results.iter_mut().take(config.max_enriched_results) {
        decorate_result(enricher, config.timeout_secs, &mut entry.result).await;
    }
}
