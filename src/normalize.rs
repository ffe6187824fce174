use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::errors::MalformedSubjectError;
use crate::taxonomy::normalize_term_set;
use crate::{CandidateRecord, ProjectRecord};

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9+#]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    Candidate,
    Project,
}

/// Ordinal experience scale. `Unspecified` is an explicit sentinel so scoring
/// can tell "no signal" (neutral) apart from an actual level mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Entry,
    Junior,
    Mid,
    Senior,
    Lead,
    Unspecified,
}

impl ExperienceLevel {
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            ExperienceLevel::Entry => Some(0),
            ExperienceLevel::Junior => Some(1),
            ExperienceLevel::Mid => Some(2),
            ExperienceLevel::Senior => Some(3),
            ExperienceLevel::Lead => Some(4),
            ExperienceLevel::Unspecified => None,
        }
    }

    /// Resolve a free-form level string. Anything unrecognized maps to the
    /// `Unspecified` sentinel, never to a guessed level.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return ExperienceLevel::Unspecified;
        };

        match raw.trim().to_lowercase().as_str() {
            "entry" | "intern" | "beginner" | "student" => ExperienceLevel::Entry,
            "junior" => ExperienceLevel::Junior,
            "mid" | "middle" | "intermediate" => ExperienceLevel::Mid,
            "senior" | "advanced" => ExperienceLevel::Senior,
            "lead" | "principal" | "expert" => ExperienceLevel::Lead,
            _ => ExperienceLevel::Unspecified,
        }
    }
}

/// Candidate-only behavioral signals, pre-resolved against a reference
/// instant so scoring stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementSignals {
    pub days_since_active: Option<i64>,
    pub recent_applications: u32,
    /// Profile completeness ratio, clamped to [0, 1].
    pub completeness: f64,
}

/// Canonical comparison object consumed by the scorer. Immutable per run.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectProfile {
    pub id: String,
    pub kind: SubjectKind,
    pub skills: HashSet<String>,
    pub categories: HashSet<String>,
    pub experience: ExperienceLevel,
    pub location: Option<String>,
    pub descriptive_text: String,
    pub work_style: Option<String>,
    pub duration_weeks: Option<u32>,
    pub team_size: Option<u32>,
    pub signals: Option<EngagementSignals>,
}

fn clean_identity(id: &Option<String>) -> Result<String, MalformedSubjectError> {
    match id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(MalformedSubjectError::new("subject id missing or blank")),
    }
}

fn clean_location(location: &Option<String>) -> Option<String> {
    location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_lowercase)
}

/// Lower-cased word tokens of a free-text blob, for keyword alignment only.
pub fn tokenize_text(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    RE_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalize a raw candidate record into a comparable profile.
///
/// Missing optional fields map to explicit sentinels (`Unspecified`, `None`)
/// rather than empty strings; a missing identity is the only rejection.
pub fn normalize_candidate(
    record: &CandidateRecord,
    now: DateTime<Utc>,
) -> Result<SubjectProfile, MalformedSubjectError> {
    let id = clean_identity(&record.id)?;

    let mut descriptive_text = record.bio.clone().unwrap_or_default();
    if !record.interest_tags.is_empty() {
        descriptive_text.push(' ');
        descriptive_text.push_str(&record.interest_tags.join(" "));
    }

    let signals = EngagementSignals {
        days_since_active: record
            .last_active_at
            .map(|at| (now - at).num_days().max(0)),
        recent_applications: record.recent_applications.unwrap_or(0),
        completeness: record.profile_completeness.unwrap_or(0.0).clamp(0.0, 1.0),
    };

    Ok(SubjectProfile {
        id,
        kind: SubjectKind::Candidate,
        skills: normalize_term_set(&record.skills),
        categories: normalize_term_set(&record.industries),
        experience: ExperienceLevel::parse(record.experience_level.as_deref()),
        location: clean_location(&record.location),
        descriptive_text,
        work_style: None,
        duration_weeks: None,
        team_size: None,
        signals: Some(signals),
    })
}

/// Normalize a raw project record into a comparable profile. Projects carry
/// no behavioral signals; `signals` stays `None`.
pub fn normalize_project(record: &ProjectRecord) -> Result<SubjectProfile, MalformedSubjectError> {
    let id = clean_identity(&record.id)?;

    let descriptive_text = [record.title.as_deref(), record.description.as_deref()]
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    Ok(SubjectProfile {
        id,
        kind: SubjectKind::Project,
        skills: normalize_term_set(&record.required_skills),
        categories: normalize_term_set(&record.categories),
        experience: ExperienceLevel::parse(record.experience_level.as_deref()),
        location: clean_location(&record.location),
        descriptive_text,
        work_style: record
            .work_style
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase),
        duration_weeks: record.duration_weeks,
        team_size: record.team_size,
        signals: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn base_candidate() -> CandidateRecord {
        CandidateRecord {
            id: Some("cand-1".into()),
            skills: vec!["Python".into(), "python3".into(), " SQL ".into()],
            industries: vec!["FinTech".into()],
            experience_level: Some("Junior".into()),
            location: Some(" Berlin ".into()),
            bio: Some("Aspiring data engineer".into()),
            interest_tags: vec!["analytics".into()],
            last_active_at: Some(Utc.with_ymd_and_hms(2026, 2, 24, 12, 0, 0).unwrap()),
            recent_applications: Some(3),
            profile_completeness: Some(0.8),
            status: Some("active".into()),
        }
    }

    #[test]
    fn candidate_sets_are_lowercased_and_deduped() {
        let profile = normalize_candidate(&base_candidate(), now()).unwrap();
        assert_eq!(profile.skills.len(), 2);
        assert!(profile.skills.contains("python"));
        assert!(profile.skills.contains("sql"));
        assert!(profile.categories.contains("fintech"));
        assert_eq!(profile.location.as_deref(), Some("berlin"));
    }

    #[test]
    fn candidate_signals_resolve_against_reference_instant() {
        let profile = normalize_candidate(&base_candidate(), now()).unwrap();
        let signals = profile.signals.unwrap();
        assert_eq!(signals.days_since_active, Some(5));
        assert_eq!(signals.recent_applications, 3);
        assert!((signals.completeness - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_optional_fields_become_sentinels() {
        let record = CandidateRecord {
            id: Some("cand-2".into()),
            ..CandidateRecord::default()
        };
        let profile = normalize_candidate(&record, now()).unwrap();
        assert_eq!(profile.experience, ExperienceLevel::Unspecified);
        assert_eq!(profile.location, None);
        let signals = profile.signals.unwrap();
        assert_eq!(signals.days_since_active, None);
        assert_eq!(signals.completeness, 0.0);
    }

    #[test]
    fn missing_identity_is_rejected() {
        let record = CandidateRecord {
            id: Some("   ".into()),
            ..CandidateRecord::default()
        };
        let err = normalize_candidate(&record, now()).unwrap_err();
        assert!(err.reason.contains("id"));
    }

    #[test]
    fn completeness_is_clamped() {
        let mut record = base_candidate();
        record.profile_completeness = Some(1.7);
        let profile = normalize_candidate(&record, now()).unwrap();
        assert_eq!(profile.signals.unwrap().completeness, 1.0);
    }

    #[test]
    fn project_profiles_have_no_signals() {
        let record = ProjectRecord {
            id: Some("proj-1".into()),
            title: Some("Growth analytics internship".into()),
            description: Some("Work with SQL dashboards".into()),
            required_skills: vec!["sql".into(), "Excel".into()],
            categories: vec!["Marketing".into()],
            experience_level: Some("entry".into()),
            work_style: Some("Remote".into()),
            ..ProjectRecord::default()
        };

        let profile = normalize_project(&record).unwrap();
        assert_eq!(profile.kind, SubjectKind::Project);
        assert!(profile.signals.is_none());
        assert_eq!(profile.experience, ExperienceLevel::Entry);
        assert_eq!(profile.work_style.as_deref(), Some("remote"));
        assert!(profile.descriptive_text.contains("Growth analytics"));
    }

    #[test]
    fn experience_parse_handles_unknown_labels() {
        assert_eq!(ExperienceLevel::parse(Some("SENIOR")), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::parse(Some("wizard")), ExperienceLevel::Unspecified);
        assert_eq!(ExperienceLevel::parse(None), ExperienceLevel::Unspecified);
    }

    #[test]
    fn tokenizer_extracts_word_tokens() {
        let tokens = tokenize_text("Build C# dashboards, learn ML!");
        assert!(tokens.contains("c#"));
        assert!(tokens.contains("dashboards"));
        assert!(tokens.contains("ml"));
    }
}
