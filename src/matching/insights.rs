use super::scoring::{MatchScore, ScoringResult};
use crate::intent::MatchMode;

/// Sub-scores at or above this are surfaced as strengths.
const STRENGTH_THRESHOLD: f64 = 0.7;
/// Sub-scores below this are surfaced as concerns.
const CONCERN_THRESHOLD: f64 = 0.5;

/// Qualitative reading of one scored pair. Strengths and concerns are derived
/// purely from the numeric breakdown; `explanation` and `recommended_approach`
/// start as deterministic templates and may be replaced by enrichment text.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchInsights {
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub explanation: String,
    pub recommended_approach: String,
    /// True only after an external enrichment call replaced the templates.
    pub enriched: bool,
}

fn labeled_dimensions<'a>(
    score: &'a MatchScore,
    mode: MatchMode,
) -> Vec<(&'static str, &'a ScoringResult)> {
    let mut dims = vec![
        ("skills alignment", &score.skills),
        ("industry fit", &score.industry),
        ("experience match", &score.experience),
        ("preference fit", &score.preferences),
        ("goal alignment", &score.goals),
    ];
    if mode == MatchMode::CandidateSearch {
        dims.push(("engagement", &score.engagement));
    }
    dims
}

fn band(score: f64) -> &'static str {
    if score >= STRENGTH_THRESHOLD {
        "strong"
    } else if score >= CONCERN_THRESHOLD {
        "moderate"
    } else {
        "weak"
    }
}

/// Deterministic insight derivation. No external calls; callable offline.
pub fn derive_insights(score: &MatchScore, mode: MatchMode) -> MatchInsights {
    let dims = labeled_dimensions(score, mode);

    // Dimensions with no signal (UNKNOWN) are neither strengths nor concerns.
    let strengths: Vec<String> = dims
        .iter()
        .filter(|(_, d)| d.status != "UNKNOWN" && d.score >= STRENGTH_THRESHOLD)
        .map(|(name, _)| (*name).to_string())
        .collect();

    let concerns: Vec<String> = dims
        .iter()
        .filter(|(_, d)| d.status != "UNKNOWN" && d.score < CONCERN_THRESHOLD)
        .map(|(name, _)| (*name).to_string())
        .collect();

    let explanation = dims
        .iter()
        .map(|(name, d)| format!("{name}: {}", band(d.score)))
        .collect::<Vec<_>>()
        .join("; ");

    let recommended_approach = match (strengths.first(), concerns.first()) {
        (Some(strength), Some(concern)) => {
            format!("Lead with {strength}; address {concern} early in the conversation.")
        }
        (Some(strength), None) => format!("Lead with {strength}; no notable gaps."),
        (None, Some(concern)) => {
            format!("Treat as exploratory; {concern} is the main gap to probe.")
        }
        (None, None) => "Balanced profile; no single dimension stands out.".to_string(),
    };

    MatchInsights {
        strengths,
        concerns,
        explanation,
        recommended_approach,
        enriched: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: f64, status: &'static str) -> ScoringResult {
        ScoringResult {
            score,
            status,
            details: String::new(),
        }
    }

    fn breakdown() -> MatchScore {
        MatchScore {
            total: 0.72,
            skills: result(0.9, "PERFECT_MATCH"),
            industry: result(0.95, "PERFECT_MATCH"),
            experience: result(0.4, "PARTIAL_MATCH"),
            preferences: result(0.5, "UNKNOWN"),
            goals: result(0.6, "PARTIAL_MATCH"),
            engagement: result(0.3, "MISS"),
        }
    }

    #[test]
    fn strengths_and_concerns_follow_thresholds() {
        let insights = derive_insights(&breakdown(), MatchMode::CandidateSearch);
        assert_eq!(
            insights.strengths,
            vec!["skills alignment".to_string(), "industry fit".to_string()]
        );
        assert_eq!(
            insights.concerns,
            vec!["experience match".to_string(), "engagement".to_string()]
        );
        assert!(!insights.enriched);
    }

    #[test]
    fn unknown_dimensions_are_excluded_from_both_lists() {
        let insights = derive_insights(&breakdown(), MatchMode::CandidateSearch);
        assert!(!insights.strengths.iter().any(|s| s == "preference fit"));
        assert!(!insights.concerns.iter().any(|s| s == "preference fit"));
    }

    #[test]
    fn engagement_is_omitted_in_project_mode() {
        let insights = derive_insights(&breakdown(), MatchMode::ProjectDiscovery);
        assert!(!insights.concerns.iter().any(|c| c == "engagement"));
        assert!(!insights.explanation.contains("engagement"));
    }

    #[test]
    fn explanation_uses_band_vocabulary() {
        let insights = derive_insights(&breakdown(), MatchMode::CandidateSearch);
        assert!(insights.explanation.contains("skills alignment: strong"));
        assert!(insights.explanation.contains("experience match: weak"));
        assert!(insights.explanation.contains("goal alignment: moderate"));
    }

    #[test]
    fn approach_references_top_strength_and_concern() {
        let insights = derive_insights(&breakdown(), MatchMode::CandidateSearch);
        assert!(insights.recommended_approach.contains("skills alignment"));
        assert!(insights.recommended_approach.contains("experience match"));
    }
}
