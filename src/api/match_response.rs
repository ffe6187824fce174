use serde::{Deserialize, Serialize};

use crate::matching::ranker::{CategorySummary, RankedMatch, RankedMatches};
use crate::matching::scoring::{status_from_score, MatchScore, ScoringResult};

/// One scored dimension as it leaves the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionDto {
    pub score: f64,
    pub status: String,
    pub details: String,
}

impl From<&ScoringResult> for DimensionDto {
    fn from(value: &ScoringResult) -> Self {
        Self {
            score: value.score,
            status: value.status.to_string(),
            details: value.details.clone(),
        }
    }
}

/// Per-dimension breakdown mirroring the internal `MatchScore`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdownDto {
    pub skills: DimensionDto,
    pub industry: DimensionDto,
    pub experience: DimensionDto,
    pub preferences: DimensionDto,
    pub goals: DimensionDto,
    pub engagement: DimensionDto,
}

impl From<&MatchScore> for ScoreBreakdownDto {
    fn from(value: &MatchScore) -> Self {
        Self {
            skills: DimensionDto::from(&value.skills),
            industry: DimensionDto::from(&value.industry),
            experience: DimensionDto::from(&value.experience),
            preferences: DimensionDto::from(&value.preferences),
            goals: DimensionDto::from(&value.goals),
            engagement: DimensionDto::from(&value.engagement),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightsDto {
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub explanation: String,
    pub recommended_approach: String,
    pub enriched: bool,
}

/// One ranked match as served to consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResponse {
    pub subject_id: String,
    pub rank: usize,
    pub overall_score: f64,
    pub status: String,
    pub breakdown: ScoreBreakdownDto,
    pub insights: InsightsDto,
    pub categories: Vec<String>,
}

impl From<&RankedMatch> for MatchResponse {
    fn from(value: &RankedMatch) -> Self {
        let insights = &value.result.insights;
        Self {
            subject_id: value.result.subject_id.clone(),
            rank: value.rank,
            overall_score: value.result.score.total,
            status: status_from_score(value.result.score.total).to_string(),
            breakdown: ScoreBreakdownDto::from(&value.result.score),
            insights: InsightsDto {
                strengths: insights.strengths.clone(),
                concerns: insights.concerns.clone(),
                explanation: insights.explanation.clone(),
                recommended_approach: insights.recommended_approach.clone(),
                enriched: insights.enriched,
            },
            categories: value.categories.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummaryDto {
    pub category: String,
    pub count: usize,
    pub average_score: f64,
}

impl From<&CategorySummary> for CategorySummaryDto {
    fn from(value: &CategorySummary) -> Self {
        Self {
            category: value.category.clone(),
            count: value.count,
            average_score: value.average_score,
        }
    }
}

/// Full response for one matching query. An empty result set is a normal
/// response carrying a `reason`, never an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchListResponse {
    pub results: Vec<MatchResponse>,
    pub category_breakdown: Vec<CategorySummaryDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&RankedMatches> for MatchListResponse {
    fn from(value: &RankedMatches) -> Self {
        Self {
            results: value.results.iter().map(MatchResponse::from).collect(),
            category_breakdown: value
                .category_breakdown
                .iter()
                .map(CategorySummaryDto::from)
                .collect(),
            reason: value.reason.clone(),
        }
    }
}
