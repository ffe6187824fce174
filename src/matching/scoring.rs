use super::insights::{derive_insights, MatchInsights};
use super::skills::score_skill_alignment;
use super::weights::{Weights, CANDIDATE_SEARCH_WEIGHTS, PROJECT_DISCOVERY_WEIGHTS};
use crate::intent::{ExperienceTarget, MatchIntent, MatchMode};
use crate::normalize::{tokenize_text, EngagementSignals, ExperienceLevel, SubjectProfile};
use crate::taxonomy::industries_adjacent;

/// Neutral default for dimensions with no signal on either side.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Exact category overlap scores highest; adjacency is mid-tier; a disjoint
/// non-empty preference list still earns an exploratory floor, not zero.
const INDUSTRY_EXACT: f64 = 0.95;
const INDUSTRY_ADJACENT: f64 = 0.7;
const INDUSTRY_FLOOR: f64 = 0.3;

const PREFERENCE_MATCH: f64 = 1.0;
const PREFERENCE_MISMATCH: f64 = 0.2;

const GOAL_HIT_INCREMENT: f64 = 0.1;

/// Capped additive bonus for preferred-skill coverage. Bonus only: a missing
/// preferred skill never lowers the required-skill alignment.
const PREFERRED_SKILLS_BONUS: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub weights: Weights,
}

impl MatchingConfig {
    pub fn for_mode(mode: MatchMode) -> Self {
        let weights = match mode {
            MatchMode::CandidateSearch => CANDIDATE_SEARCH_WEIGHTS,
            MatchMode::ProjectDiscovery => PROJECT_DISCOVERY_WEIGHTS,
        };
        Self { weights }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResult {
    pub score: f64,
    pub status: &'static str,
    pub details: String,
}

impl ScoringResult {
    fn neutral(details: impl Into<String>) -> Self {
        Self {
            score: NEUTRAL_SCORE,
            status: "UNKNOWN",
            details: details.into(),
        }
    }

    fn scored(score: f64, details: impl Into<String>) -> Self {
        Self {
            score,
            status: status_from_score(score),
            details: details.into(),
        }
    }
}

/// Full per-dimension breakdown plus the weighted total. Every sub-score lies
/// in [0, 1]; the total is a convex combination under the mode's weights.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub total: f64,
    pub skills: ScoringResult,
    pub industry: ScoringResult,
    pub experience: ScoringResult,
    pub preferences: ScoringResult,
    pub goals: ScoringResult,
    pub engagement: ScoringResult,
}

/// One scored (subject, intent) pair. Created fresh per pair, never mutated;
/// `rank` is assigned later by the ranker, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub subject_id: String,
    pub score: MatchScore,
    pub insights: MatchInsights,
}

pub fn score_match(subject: &SubjectProfile, intent: &MatchIntent) -> MatchResult {
    let scorer = MatchScorer::new(MatchingConfig::for_mode(intent.mode));
    scorer.score(subject, intent)
}

pub struct MatchScorer {
    config: MatchingConfig,
}

impl MatchScorer {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Pure and total for well-formed input: always returns a `MatchResult`,
    /// even a low-scoring one. Malformed subjects and intents are rejected
    /// upstream by the normalizer and resolver.
    pub fn score(&self, subject: &SubjectProfile, intent: &MatchIntent) -> MatchResult {
        let skills = self.score_skills(subject, intent);
        let industry = self.score_industry(subject, intent);
        let experience = self.score_experience(subject, intent);
        let preferences = self.score_preferences(subject, intent);
        let goals = self.score_goals(subject, intent);
        let engagement = self.score_engagement(subject, intent);

        let weights = self.config.weights;
        debug_assert!((weights.sum() - 1.0).abs() < 1e-9);

        let total = skills.score * weights.skills
            + industry.score * weights.industry
            + experience.score * weights.experience
            + preferences.score * weights.preferences
            + goals.score * weights.goals
            + engagement.score * weights.engagement;

        let score = MatchScore {
            total,
            skills,
            industry,
            experience,
            preferences,
            goals,
            engagement,
        };

        let insights = derive_insights(&score, intent.mode);

        MatchResult {
            subject_id: subject.id.clone(),
            score,
            insights,
        }
    }

    /// In candidate search the company's requirement list is the demand side;
    /// in project discovery the project's own requirements are, matched
    /// against the skills the student brings.
    fn score_skills(&self, subject: &SubjectProfile, intent: &MatchIntent) -> ScoringResult {
        let (demand, supply) = match intent.mode {
            MatchMode::CandidateSearch => (&intent.required_skills, &subject.skills),
            MatchMode::ProjectDiscovery => (&subject.skills, &intent.required_skills),
        };

        let required = score_skill_alignment(demand, supply);
        if required.neutral {
            return ScoringResult {
                score: required.score,
                status: "UNKNOWN",
                details: required.reason,
            };
        }

        let mut score = required.score;
        let mut details = required.reason;

        if intent.mode == MatchMode::CandidateSearch && !intent.preferred_skills.is_empty() {
            let preferred_hits = intent
                .preferred_skills
                .intersection(&subject.skills)
                .count();
            let preferred_fraction = preferred_hits as f64 / intent.preferred_skills.len() as f64;
            score = (score + preferred_fraction * PREFERRED_SKILLS_BONUS).min(1.0);
            details.push_str(&format!(
                "; preferred {}/{}",
                preferred_hits,
                intent.preferred_skills.len()
            ));
        }

        ScoringResult::scored(score, details)
    }

    fn score_industry(&self, subject: &SubjectProfile, intent: &MatchIntent) -> ScoringResult {
        if intent.industries.is_empty() {
            return ScoringResult::neutral("no industry preference; neutral default");
        }

        if intent.industries.intersection(&subject.categories).count() > 0 {
            return ScoringResult::scored(INDUSTRY_EXACT, "exact industry match");
        }

        let adjacent = intent.industries.iter().any(|wanted| {
            subject
                .categories
                .iter()
                .any(|have| industries_adjacent(wanted, have))
        });
        if adjacent {
            return ScoringResult::scored(INDUSTRY_ADJACENT, "adjacent industry match");
        }

        ScoringResult::scored(
            INDUSTRY_FLOOR,
            "no industry overlap; exploratory floor applied",
        )
    }

    fn score_experience(&self, subject: &SubjectProfile, intent: &MatchIntent) -> ScoringResult {
        let target = match intent.experience_target {
            ExperienceTarget::Any => {
                return ScoringResult::scored(1.0, "any experience level accepted");
            }
            ExperienceTarget::Level(level) => level,
        };

        let (Some(wanted), Some(actual)) = (target.ordinal(), subject.experience.ordinal()) else {
            return ScoringResult::neutral("subject experience level unspecified");
        };

        let distance = wanted.abs_diff(actual);
        let score = experience_distance_score(distance);
        ScoringResult::scored(
            score,
            format!("experience distance {distance} from requested level"),
        )
    }

    fn score_preferences(&self, subject: &SubjectProfile, intent: &MatchIntent) -> ScoringResult {
        let mut components: Vec<(&'static str, f64)> = Vec::new();

        components.push(("location", location_component(subject, intent)));

        if intent.mode == MatchMode::ProjectDiscovery {
            components.push(("work_style", work_style_component(subject, intent)));
            if let Some(component) = duration_component(subject, intent) {
                components.push(("duration", component));
            }
            if let Some(component) = team_size_component(subject, intent) {
                components.push(("team_size", component));
            }
        }

        let score =
            components.iter().map(|(_, s)| s).sum::<f64>() / components.len() as f64;
        let all_neutral = components
            .iter()
            .all(|(_, s)| (*s - NEUTRAL_SCORE).abs() < 1e-9);

        let details = components
            .iter()
            .map(|(name, s)| format!("{name}={s:.2}"))
            .collect::<Vec<_>>()
            .join(", ");

        if all_neutral {
            ScoringResult::neutral(format!("no preference signal ({details})"))
        } else {
            ScoringResult::scored(score, details)
        }
    }

    /// Keyword co-occurrence between intent goals and the subject's
    /// descriptive text, from a neutral base, capped at 1.0.
    fn score_goals(&self, subject: &SubjectProfile, intent: &MatchIntent) -> ScoringResult {
        if intent.goals.is_empty() {
            return ScoringResult::neutral("no goals specified; neutral default");
        }

        let tokens = tokenize_text(&subject.descriptive_text);
        let hits = intent.goals.intersection(&tokens).count();
        let score = (NEUTRAL_SCORE + hits as f64 * GOAL_HIT_INCREMENT).min(1.0);

        ScoringResult::scored(
            score,
            format!("{hits}/{} goal keywords present", intent.goals.len()),
        )
    }

    fn score_engagement(&self, subject: &SubjectProfile, intent: &MatchIntent) -> ScoringResult {
        if intent.mode == MatchMode::ProjectDiscovery {
            return ScoringResult::neutral("engagement not applicable to projects");
        }

        let Some(signals) = &subject.signals else {
            return ScoringResult::neutral("no behavioral signals available");
        };

        let score = engagement_score(signals);
        ScoringResult::scored(
            score,
            format!(
                "activity days={:?} apps={} completeness={:.2}",
                signals.days_since_active, signals.recent_applications, signals.completeness
            ),
        )
    }
}

/// Fixed ordinal-distance schedule shared by both matching modes.
fn experience_distance_score(distance: u8) -> f64 {
    match distance {
        0 => 1.0,
        1 => 0.85,
        2 => 0.6,
        3 => 0.4,
        _ => 0.2,
    }
}

fn location_component(subject: &SubjectProfile, intent: &MatchIntent) -> f64 {
    if intent.locations.is_empty() {
        return NEUTRAL_SCORE;
    }
    match &subject.location {
        // Absence of data is not evidence of mismatch.
        None => NEUTRAL_SCORE,
        Some(location) if intent.locations.contains(location) => PREFERENCE_MATCH,
        Some(_) => PREFERENCE_MISMATCH,
    }
}

fn work_style_component(subject: &SubjectProfile, intent: &MatchIntent) -> f64 {
    if intent.work_styles.is_empty() {
        return NEUTRAL_SCORE;
    }
    match &subject.work_style {
        None => NEUTRAL_SCORE,
        Some(style) if intent.work_styles.contains(style) => PREFERENCE_MATCH,
        Some(_) => PREFERENCE_MISMATCH,
    }
}

fn duration_component(subject: &SubjectProfile, intent: &MatchIntent) -> Option<f64> {
    let max = intent.max_duration_weeks?;
    Some(match subject.duration_weeks {
        None => NEUTRAL_SCORE,
        Some(weeks) if weeks <= max => PREFERENCE_MATCH,
        Some(_) => PREFERENCE_MISMATCH,
    })
}

fn team_size_component(subject: &SubjectProfile, intent: &MatchIntent) -> Option<f64> {
    let max = intent.max_team_size?;
    Some(match subject.team_size {
        None => NEUTRAL_SCORE,
        Some(size) if size <= max => PREFERENCE_MATCH,
        Some(_) => PREFERENCE_MISMATCH,
    })
}

fn engagement_score(signals: &EngagementSignals) -> f64 {
    let recency = match signals.days_since_active {
        Some(days) if days <= 7 => 1.0,
        Some(days) if days <= 30 => 0.7,
        Some(days) if days <= 90 => 0.4,
        Some(_) => 0.1,
        None => 0.1,
    };
    let frequency = (signals.recent_applications as f64 / 10.0).min(1.0);
    let activity = 0.5 * recency + 0.5 * frequency;

    0.5 * activity + 0.5 * signals.completeness
}

pub fn status_from_score(score: f64) -> &'static str {
    if score >= 0.9 {
        "PERFECT_MATCH"
    } else if score >= 0.7 {
        "MATCH"
    } else if score >= 0.4 {
        "PARTIAL_MATCH"
    } else {
        "MISS"
    }
}
