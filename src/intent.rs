use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::InvalidIntentError;
use crate::normalize::{tokenize_text, ExperienceLevel};
use crate::taxonomy::normalize_term_set;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// A company searching for candidates.
    CandidateSearch,
    /// A student discovering projects from their quiz profile.
    ProjectDiscovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceTarget {
    Any,
    Level(ExperienceLevel),
}

/// Canonical comparison vocabulary consumed by the scorer.
///
/// In `CandidateSearch` mode `required_skills` is what the company demands;
/// in `ProjectDiscovery` mode it carries the skills the student brings, and
/// the demand side is the project's own requirement list.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchIntent {
    pub mode: MatchMode,
    pub required_skills: HashSet<String>,
    pub preferred_skills: HashSet<String>,
    pub experience_target: ExperienceTarget,
    pub industries: HashSet<String>,
    pub locations: HashSet<String>,
    pub work_styles: HashSet<String>,
    pub max_duration_weeks: Option<u32>,
    pub max_team_size: Option<u32>,
    /// Goal keywords, already tokenized for co-occurrence checks.
    pub goals: HashSet<String>,
}

impl MatchIntent {
    pub fn empty(mode: MatchMode) -> Self {
        Self {
            mode,
            required_skills: HashSet::new(),
            preferred_skills: HashSet::new(),
            experience_target: ExperienceTarget::Any,
            industries: HashSet::new(),
            locations: HashSet::new(),
            work_styles: HashSet::new(),
            max_duration_weeks: None,
            max_team_size: None,
            goals: HashSet::new(),
        }
    }
}

/// Structured discovery-quiz profile for student-to-project matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub work_styles: Vec<String>,
    #[serde(default)]
    pub max_duration_weeks: Option<u32>,
    #[serde(default)]
    pub max_team_size: Option<u32>,
    #[serde(default)]
    pub career_goals: Vec<String>,
}

fn string_array(value: &Value, key: &str) -> Result<Option<Vec<String>>, InvalidIntentError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(s) => out.push(s.to_string()),
                    None => {
                        return Err(InvalidIntentError::new(format!(
                            "{key} must be an array of strings"
                        )))
                    }
                }
            }
            Ok(Some(out))
        }
        Some(_) => Err(InvalidIntentError::new(format!(
            "{key} must be an array of strings"
        ))),
    }
}

fn experience_target(value: &Value) -> Result<ExperienceTarget, InvalidIntentError> {
    match value.get("experience_level") {
        None | Some(Value::Null) => Ok(ExperienceTarget::Any),
        Some(Value::String(raw)) => parse_experience_target(raw),
        Some(_) => Err(InvalidIntentError::new(
            "experience_level must be a string",
        )),
    }
}

fn parse_experience_target(raw: &str) -> Result<ExperienceTarget, InvalidIntentError> {
    if raw.trim().eq_ignore_ascii_case("any") {
        return Ok(ExperienceTarget::Any);
    }
    match ExperienceLevel::parse(Some(raw)) {
        ExperienceLevel::Unspecified => Err(InvalidIntentError::new(format!(
            "unknown experience level: {raw}"
        ))),
        level => Ok(ExperienceTarget::Level(level)),
    }
}

fn location_set(raw: &[String]) -> HashSet<String> {
    raw.iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect()
}

fn goal_keywords(raw: &[String]) -> HashSet<String> {
    raw.iter()
        .flat_map(|phrase| tokenize_text(phrase))
        .collect()
}

/// Resolve an already-parsed company search intent (dict-like output of the
/// upstream NLP parser) into the canonical vocabulary. Never re-invokes the
/// parser; malformed input fails with `InvalidIntentError`.
pub fn resolve_search_intent(value: &Value) -> Result<MatchIntent, InvalidIntentError> {
    if !value.is_object() {
        return Err(InvalidIntentError::new("intent must be a JSON object"));
    }

    let required = string_array(value, "required_skills")?
        .ok_or_else(|| InvalidIntentError::new("required_skills key is missing"))?;
    let preferred = string_array(value, "preferred_skills")?.unwrap_or_default();
    let industries = string_array(value, "industries")?.unwrap_or_default();
    let locations = string_array(value, "locations")?.unwrap_or_default();
    let goals = string_array(value, "goals")?.unwrap_or_default();

    Ok(MatchIntent {
        mode: MatchMode::CandidateSearch,
        required_skills: normalize_term_set(&required),
        preferred_skills: normalize_term_set(&preferred),
        experience_target: experience_target(value)?,
        industries: normalize_term_set(&industries),
        locations: location_set(&locations),
        work_styles: HashSet::new(),
        max_duration_weeks: None,
        max_team_size: None,
        goals: goal_keywords(&goals),
    })
}

/// Resolve a student discovery-quiz profile into the canonical vocabulary.
pub fn resolve_quiz_profile(profile: &QuizProfile) -> Result<MatchIntent, InvalidIntentError> {
    let experience_target = match profile.experience_level.as_deref() {
        None => ExperienceTarget::Any,
        Some(raw) => parse_experience_target(raw)?,
    };

    Ok(MatchIntent {
        mode: MatchMode::ProjectDiscovery,
        required_skills: normalize_term_set(&profile.skills),
        preferred_skills: HashSet::new(),
        experience_target,
        industries: normalize_term_set(&profile.interests),
        locations: location_set(&profile.preferred_locations),
        work_styles: location_set(&profile.work_styles),
        max_duration_weeks: profile.max_duration_weeks,
        max_team_size: profile.max_team_size,
        goals: goal_keywords(&profile.career_goals),
    })
}
