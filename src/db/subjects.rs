use tokio_postgres::Row;
use tracing::debug;

use crate::db::PgPool;
use crate::errors::PoolRetrievalError;
use crate::matching::pool::{PoolFilter, SubjectStore};
use crate::{CandidateRecord, ProjectRecord};

/// Postgres-backed subject store. Same exclusion semantics as the in-memory
/// store: only the status predicate filters rows. The skill and location
/// hints are ordering expressions, so preferred rows survive the row ceiling
/// but nothing is excluded by them. SQL overlap is raw-text and therefore
/// coarser than the scorer's alias-aware matching; that only affects
/// ordering, never admission.
#[derive(Clone)]
pub struct PgSubjectStore {
    pool: PgPool,
}

impl PgSubjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CANDIDATE_QUERY: &str = "SELECT \
        id, skills, industries, experience_level, location, bio, \
        interest_tags, last_active_at, recent_applications, \
        profile_completeness, status \
    FROM candidates \
    WHERE status = $1 \
    ORDER BY (skills && $2) DESC NULLS LAST, \
        (location = $3) DESC NULLS LAST, \
        last_active_at DESC NULLS LAST \
    LIMIT $4";

const PROJECT_QUERY: &str = "SELECT \
        id, title, description, required_skills, categories, \
        experience_level, location, work_style, duration_weeks, \
        team_size, status \
    FROM projects \
    WHERE status = $1 \
    ORDER BY (required_skills && $2) DESC NULLS LAST, \
        (location = $3) DESC NULLS LAST, \
        id \
    LIMIT $4";

fn map_candidate(row: &Row) -> Result<CandidateRecord, PoolRetrievalError> {
    let mapping = |e: tokio_postgres::Error| PoolRetrievalError::Mapping(e.to_string());
    Ok(CandidateRecord {
        id: row.try_get("id").map_err(mapping)?,
        skills: row
            .try_get::<_, Option<Vec<String>>>("skills")
            .map_err(mapping)?
            .unwrap_or_default(),
        industries: row
            .try_get::<_, Option<Vec<String>>>("industries")
            .map_err(mapping)?
            .unwrap_or_default(),
        experience_level: row.try_get("experience_level").map_err(mapping)?,
        location: row.try_get("location").map_err(mapping)?,
        bio: row.try_get("bio").map_err(mapping)?,
        interest_tags: row
            .try_get::<_, Option<Vec<String>>>("interest_tags")
            .map_err(mapping)?
            .unwrap_or_default(),
        last_active_at: row.try_get("last_active_at").map_err(mapping)?,
        recent_applications: row
            .try_get::<_, Option<i32>>("recent_applications")
            .map_err(mapping)?
            .and_then(|n| u32::try_from(n).ok()),
        profile_completeness: row.try_get("profile_completeness").map_err(mapping)?,
        status: row.try_get("status").map_err(mapping)?,
    })
}

fn map_project(row: &Row) -> Result<ProjectRecord, PoolRetrievalError> {
    let mapping = |e: tokio_postgres::Error| PoolRetrievalError::Mapping(e.to_string());
    Ok(ProjectRecord {
        id: row.try_get("id").map_err(mapping)?,
        title: row.try_get("title").map_err(mapping)?,
        description: row.try_get("description").map_err(mapping)?,
        required_skills: row
            .try_get::<_, Option<Vec<String>>>("required_skills")
            .map_err(mapping)?
            .unwrap_or_default(),
        categories: row
            .try_get::<_, Option<Vec<String>>>("categories")
            .map_err(mapping)?
            .unwrap_or_default(),
        experience_level: row.try_get("experience_level").map_err(mapping)?,
        location: row.try_get("location").map_err(mapping)?,
        work_style: row.try_get("work_style").map_err(mapping)?,
        duration_weeks: row
            .try_get::<_, Option<i32>>("duration_weeks")
            .map_err(mapping)?
            .and_then(|n| u32::try_from(n).ok()),
        team_size: row
            .try_get::<_, Option<i32>>("team_size")
            .map_err(mapping)?
            .and_then(|n| u32::try_from(n).ok()),
        status: row.try_get("status").map_err(mapping)?,
    })
}

impl SubjectStore for PgSubjectStore {
    async fn fetch_candidates(
        &self,
        filter: &PoolFilter,
    ) -> Result<Vec<CandidateRecord>, PoolRetrievalError> {
        let client = self.pool.get().await?;
        let limit = filter.limit as i64;
        let rows = client
            .query(
                CANDIDATE_QUERY,
                &[&filter.status, &filter.skill_hints, &filter.location_hint, &limit],
            )
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(map_candidate(row)?);
        }
        debug!(fetched = records.len(), "candidate rows");
        Ok(records)
    }

    async fn fetch_projects(
        &self,
        filter: &PoolFilter,
    ) -> Result<Vec<ProjectRecord>, PoolRetrievalError> {
        let client = self.pool.get().await?;
        let limit = filter.limit as i64;
        let rows = client
            .query(
                PROJECT_QUERY,
                &[&filter.status, &filter.skill_hints, &filter.location_hint, &limit],
            )
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(map_project(row)?);
        }
        debug!(fetched = records.len(), "project rows");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_parameterize_status_hints_and_limit() {
        for query in [CANDIDATE_QUERY, PROJECT_QUERY] {
            assert!(query.contains("status = $1"));
            assert!(query.contains("&& $2"));
            assert!(query.contains("location = $3"));
            assert!(query.contains("LIMIT $4"));
        }
    }

    #[test]
    fn hints_only_appear_in_the_ordering_clause() {
        for query in [CANDIDATE_QUERY, PROJECT_QUERY] {
            let where_clause = &query[query.find("WHERE").unwrap()..query.find("ORDER").unwrap()];
            assert!(!where_clause.contains("$2"));
            assert!(!where_clause.contains("$3"));
        }
    }

    #[test]
    fn candidate_query_prefers_recent_activity() {
        assert!(CANDIDATE_QUERY.contains("last_active_at DESC NULLS LAST"));
    }
}
