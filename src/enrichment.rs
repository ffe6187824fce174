use serde::{Deserialize, Serialize};
use tokio::time::{timeout, Duration};
use tracing::warn;

use crate::errors::EnrichmentError;
use crate::matching::scoring::MatchResult;

/// Richer qualitative text produced by the external enrichment service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedText {
    pub explanation: String,
    pub recommended_approach: String,
}

/// Best-effort decoration of already-ranked results. Implementations never
/// influence numeric scores.
pub trait InsightEnricher {
    fn enrich(
        &self,
        result: &MatchResult,
    ) -> impl std::future::Future<Output = Result<EnrichedText, EnrichmentError>> + Send;
}

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Only the top-ranked results are worth an external call.
    pub max_enriched_results: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:8000/api/v1/enrich".into(),
            model: "gpt-4o-mini".into(),
            api_key: String::new(),
            timeout_secs: 12,
            max_enriched_results: 5,
        }
    }
}

impl EnrichmentConfig {
    pub fn from_env() -> Self {
        fn parse_bool(key: &str, default: bool) -> bool {
            match std::env::var(key) {
                Ok(val) => matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
                Err(_) => default,
            }
        }

        fn parse_u64(key: &str, default: u64) -> u64 {
            std::env::var(key)
                .ok()
                .and_then(|raw| raw.parse::<u64>().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            enabled: parse_bool("IM_ENRICHMENT_ENABLED", defaults.enabled),
            endpoint: std::env::var("IM_ENRICHMENT_ENDPOINT").unwrap_or(defaults.endpoint),
            model: std::env::var("IM_ENRICHMENT_MODEL").unwrap_or(defaults.model),
            api_key: std::env::var("IM_ENRICHMENT_API_KEY").unwrap_or_default(),
            timeout_secs: parse_u64("IM_ENRICHMENT_TIMEOUT_SECS", defaults.timeout_secs),
            max_enriched_results: parse_u64("IM_ENRICHMENT_MAX_RESULTS", 5) as usize,
        }
    }
}

#[derive(Serialize)]
struct EnrichmentRequest<'a> {
    model: &'a str,
    subject_id: &'a str,
    overall_score: f64,
    explanation: &'a str,
    strengths: &'a [String],
    concerns: &'a [String],
}

/// HTTP client for the external enrichment service.
pub struct HttpEnricher {
    client: reqwest::Client,
    config: EnrichmentConfig,
}

impl HttpEnricher {
    pub fn new(config: EnrichmentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }
}

impl InsightEnricher for HttpEnricher {
    async fn enrich(&self, result: &MatchResult) -> Result<EnrichedText, EnrichmentError> {
        let request = EnrichmentRequest {
            model: &self.config.model,
            subject_id: &result.subject_id,
            overall_score: result.score.total,
            explanation: &result.insights.explanation,
            strengths: &result.insights.strengths,
            concerns: &result.insights.concerns,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Malformed(format!(
                "enrichment service returned {}",
                response.status()
            )));
        }

        let text: EnrichedText = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Malformed(e.to_string()))?;

        if text.explanation.trim().is_empty() {
            return Err(EnrichmentError::Malformed(
                "empty explanation in enrichment response".into(),
            ));
        }

        Ok(text)
    }
}

/// Apply enrichment to one result with a bounded timeout. Failures and
/// timeouts are recovered locally: the deterministic template stays in place
/// and the numeric score is untouched either way.
pub async fn decorate_result<E: InsightEnricher>(
    enricher: &E,
    timeout_secs: u64,
    result: &mut MatchResult,
) {
    let bounded = timeout(
        Duration::from_secs(timeout_secs),
        enricher.enrich(result),
    );

    match bounded.await {
        Ok(Ok(text)) => {
            result.insights.explanation = text.explanation;
            result.insights.recommended_approach = text.recommended_approach;
            result.insights.enriched = true;
        }
        Ok(Err(err)) => {
            warn!(subject_id = %result.subject_id, error = %err, "enrichment failed; keeping deterministic insights");
        }
        Err(_) => {
            let err = EnrichmentError::Timeout(timeout_secs);
            warn!(subject_id = %result.subject_id, error = %err, "enrichment timed out; keeping deterministic insights");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::MatchMode;
    use crate::matching::insights::derive_insights;
    use crate::matching::scoring::{MatchScore, ScoringResult};

    struct StaticEnricher;

    impl InsightEnricher for StaticEnricher {
        async fn enrich(&self, _result: &MatchResult) -> Result<EnrichedText, EnrichmentError> {
            Ok(EnrichedText {
                explanation: "richer text".into(),
                recommended_approach: "richer approach".into(),
            })
        }
    }

    struct FailingEnricher;

    impl InsightEnricher for FailingEnricher {
        async fn enrich(&self, _result: &MatchResult) -> Result<EnrichedText, EnrichmentError> {
            Err(EnrichmentError::Malformed("boom".into()))
        }
    }

    struct SlowEnricher;

    impl InsightEnricher for SlowEnricher {
        async fn enrich(&self, _result: &MatchResult) -> Result<EnrichedText, EnrichmentError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(EnrichedText {
                explanation: "too late".into(),
                recommended_approach: "too late".into(),
            })
        }
    }

    fn sample_result() -> MatchResult {
        let dim = |score: f64| ScoringResult {
            score,
            status: "MATCH",
            details: String::new(),
        };
        let score = MatchScore {
            total: 0.8,
            skills: dim(0.8),
            industry: dim(0.8),
            experience: dim(0.8),
            preferences: dim(0.8),
            goals: dim(0.8),
            engagement: dim(0.8),
        };
        let insights = derive_insights(&score, MatchMode::CandidateSearch);
        MatchResult {
            subject_id: "cand-1".into(),
            score,
            insights,
        }
    }

    #[tokio::test]
    async fn successful_enrichment_replaces_templates_only() {
        let mut result = sample_result();
        let numeric_before = result.score.clone();

        decorate_result(&StaticEnricher, 5, &mut result).await;

        assert!(result.insights.enriched);
        assert_eq!(result.insights.explanation, "richer text");
        assert_eq!(result.score, numeric_before);
    }

    #[tokio::test]
    async fn failure_keeps_deterministic_fallback() {
        let mut result = sample_result();
        let fallback = result.insights.explanation.clone();

        decorate_result(&FailingEnricher, 5, &mut result).await;

        assert!(!result.insights.enriched);
        assert_eq!(result.insights.explanation, fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_keeps_deterministic_fallback() {
        let mut result = sample_result();
        let fallback = result.insights.explanation.clone();

        decorate_result(&SlowEnricher, 1, &mut result).await;

        assert!(!result.insights.enriched);
        assert_eq!(result.insights.explanation, fallback);
    }

    #[test]
    fn config_defaults_are_sane() {
        let config = EnrichmentConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.timeout_secs, 12);
        assert!(config.max_enriched_results > 0);
    }
}
