pub mod api;
pub mod db;
pub mod enrichment;
pub mod errors;
pub mod intent;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod taxonomy;
pub mod tier;

use chrono::{DateTime, Utc};

// Raw subject records as they come out of the external store. Everything the
// marketplace does not guarantee to be present is an Option; the normalizer is
// responsible for turning these into comparable profiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRecord {
    pub id: Option<String>,
    pub skills: Vec<String>,
    pub industries: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub interest_tags: Vec<String>,
    pub last_active_at: Option<DateTime<Utc>>,
    pub recent_applications: Option<u32>,
    pub profile_completeness: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Vec<String>,
    pub categories: Vec<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub work_style: Option<String>,
    pub duration_weeks: Option<u32>,
    pub team_size: Option<u32>,
    pub status: Option<String>,
}
