use crate::errors::PoolRetrievalError;
use crate::intent::{MatchIntent, MatchMode};
use crate::taxonomy::{has_related_skill, normalize_term_set};
use crate::tier::Tier;
use crate::{CandidateRecord, ProjectRecord};

/// Cheap pre-filters for bounding the scoring workload. Only the status
/// predicate excludes rows; the skill and location hints order the pool so
/// the most promising rows survive ceiling truncation. The pool is therefore
/// a superset of the true match set, bounded only by the ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolFilter {
    pub status: String,
    pub skill_hints: Vec<String>,
    pub location_hint: Option<String>,
    pub limit: usize,
}

impl PoolFilter {
    /// Derive the pool filter for one query. The row limit is the tier's
    /// pool ceiling; hints come straight from the resolved intent.
    pub fn for_intent(intent: &MatchIntent, tier: Tier) -> Self {
        let status = match intent.mode {
            MatchMode::CandidateSearch => "active",
            MatchMode::ProjectDiscovery => "live",
        };

        let mut skill_hints: Vec<String> = intent.required_skills.iter().cloned().collect();
        skill_hints.sort();

        Self {
            status: status.to_string(),
            skill_hints,
            location_hint: intent.locations.iter().min().cloned(),
            limit: tier.pool_ceiling(),
        }
    }

    fn admits(&self, status: Option<&str>) -> bool {
        status == Some(self.status.as_str())
    }

    /// Skill hint: prefer rows whose skills overlap the requirement list or
    /// are taxonomy-related to it. Never excludes; related skills earn
    /// partial credit in scoring, so dropping them here would starve the
    /// scorer of rows it would accept.
    fn prefers_skills(&self, skills: &[String]) -> bool {
        if self.skill_hints.is_empty() || skills.is_empty() {
            return false;
        }
        let normalized = normalize_term_set(skills);
        self.skill_hints
            .iter()
            .any(|hint| normalized.contains(hint) || has_related_skill(hint, &normalized))
    }

    fn prefers_location(&self, location: Option<&str>) -> bool {
        match (self.location_hint.as_deref(), location) {
            (Some(hint), Some(loc)) => hint == loc,
            _ => false,
        }
    }
}

/// External store boundary. Implementations must apply only the cheap
/// `PoolFilter` predicates, never the full scoring algorithm.
pub trait SubjectStore {
    fn fetch_candidates(
        &self,
        filter: &PoolFilter,
    ) -> impl std::future::Future<Output = Result<Vec<CandidateRecord>, PoolRetrievalError>> + Send;

    fn fetch_projects(
        &self,
        filter: &PoolFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ProjectRecord>, PoolRetrievalError>> + Send;
}

/// In-memory store used by tests and local tooling. Same exclusion semantics
/// as the Postgres store: status filter, preference ordering, ceiling
/// truncation.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    pub candidates: Vec<CandidateRecord>,
    pub projects: Vec<ProjectRecord>,
}

impl SubjectStore for InMemoryStore {
    async fn fetch_candidates(
        &self,
        filter: &PoolFilter,
    ) -> Result<Vec<CandidateRecord>, PoolRetrievalError> {
        let mut admitted: Vec<CandidateRecord> = self
            .candidates
            .iter()
            .filter(|c| filter.admits(c.status.as_deref()))
            .cloned()
            .collect();
        admitted.sort_by_key(|c| {
            (
                !filter.prefers_skills(&c.skills),
                !filter.prefers_location(c.location.as_deref()),
            )
        });
        admitted.truncate(filter.limit);
        Ok(admitted)
    }

    async fn fetch_projects(
        &self,
        filter: &PoolFilter,
    ) -> Result<Vec<ProjectRecord>, PoolRetrievalError> {
        let mut admitted: Vec<ProjectRecord> = self
            .projects
            .iter()
            .filter(|p| filter.admits(p.status.as_deref()))
            .cloned()
            .collect();
        admitted.sort_by_key(|p| {
            (
                !filter.prefers_skills(&p.required_skills),
                !filter.prefers_location(p.location.as_deref()),
            )
        });
        admitted.truncate(filter.limit);
        Ok(admitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_filter() -> PoolFilter {
        PoolFilter {
            status: "active".into(),
            skill_hints: vec!["python".into()],
            location_hint: None,
            limit: 10,
        }
    }

    fn candidate(id: &str, status: &str, skills: &[&str]) -> CandidateRecord {
        CandidateRecord {
            id: Some(id.into()),
            status: Some(status.into()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..CandidateRecord::default()
        }
    }

    #[tokio::test]
    async fn filters_by_status() {
        let store = InMemoryStore {
            candidates: vec![
                candidate("a", "active", &["python"]),
                candidate("b", "suspended", &["python"]),
            ],
            projects: vec![],
        };

        let pool = store.fetch_candidates(&base_filter()).await.unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn skill_hint_orders_but_never_excludes() {
        let mut filter = base_filter();
        filter.skill_hints = vec!["react".into()];

        let store = InMemoryStore {
            candidates: vec![
                candidate("disjoint", "active", &["seo"]),
                candidate("nodata", "active", &[]),
                candidate("exact", "active", &["React.js"]),
                candidate("related", "active", &["vue"]),
            ],
            projects: vec![],
        };

        let pool = store.fetch_candidates(&filter).await.unwrap();
        let ids: Vec<_> = pool.iter().filter_map(|c| c.id.as_deref()).collect();
        // Preferred rows first (stable within each group); nothing dropped.
        assert_eq!(ids, vec!["exact", "related", "disjoint", "nodata"]);
    }

    #[tokio::test]
    async fn ceiling_keeps_preferred_skill_rows() {
        let mut filter = base_filter();
        filter.skill_hints = vec!["react".into()];
        filter.limit = 2;

        let store = InMemoryStore {
            candidates: vec![
                candidate("disjoint", "active", &["seo"]),
                candidate("related", "active", &["vue"]),
                candidate("exact", "active", &["react"]),
            ],
            projects: vec![],
        };

        let pool = store.fetch_candidates(&filter).await.unwrap();
        let ids: Vec<_> = pool.iter().filter_map(|c| c.id.as_deref()).collect();
        assert_eq!(ids, vec!["related", "exact"]);
    }

    #[tokio::test]
    async fn respects_pool_ceiling() {
        let store = InMemoryStore {
            candidates: (0..20)
                .map(|i| candidate(&format!("c{i}"), "active", &["python"]))
                .collect(),
            projects: vec![],
        };

        let mut filter = base_filter();
        filter.limit = 5;
        let pool = store.fetch_candidates(&filter).await.unwrap();
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn filter_derives_from_intent_and_tier() {
        let mut intent = MatchIntent::empty(MatchMode::CandidateSearch);
        intent.required_skills.insert("python".into());
        intent.locations.insert("berlin".into());

        let filter = PoolFilter::for_intent(&intent, Tier::Free);
        assert_eq!(filter.status, "active");
        assert_eq!(filter.skill_hints, vec!["python".to_string()]);
        assert_eq!(filter.location_hint.as_deref(), Some("berlin"));
        assert_eq!(filter.limit, Tier::Free.pool_ceiling());
    }

    #[test]
    fn project_mode_targets_live_projects() {
        let intent = MatchIntent::empty(MatchMode::ProjectDiscovery);
        let filter = PoolFilter::for_intent(&intent, Tier::Professional);
        assert_eq!(filter.status, "live");
    }
}
