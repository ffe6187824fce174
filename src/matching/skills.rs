use std::collections::HashSet;

use crate::taxonomy::has_related_skill;

/// Neutral score when the demand side lists no skill requirements. Absence of
/// constraint must neither inflate nor deflate ranking.
pub const NEUTRAL_SKILLS_SCORE: f64 = 0.8;

/// Partial credit per missing requirement covered by a taxonomy-related skill.
const RELATED_CREDIT: f64 = 0.5;

/// Bonus per surplus skill beyond the requirement list, and its cap.
const SURPLUS_BONUS_PER_SKILL: f64 = 0.02;
const SURPLUS_BONUS_CAP: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillAlignment {
    /// Final sub-score in [0, 1].
    pub score: f64,
    /// Exact-match fraction over the demand set (0 when demand is empty).
    pub exact_fraction: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// True when demand was empty and the neutral default applies.
    pub neutral: bool,
    pub reason: String,
}

/// Score how well `supply` covers `demand`.
///
/// Exact-match fraction over the demand set, plus partial credit for missing
/// requirements covered by a related skill, plus a capped surplus bonus.
pub fn score_skill_alignment(
    demand: &HashSet<String>,
    supply: &HashSet<String>,
) -> SkillAlignment {
    if demand.is_empty() {
        return SkillAlignment {
            score: NEUTRAL_SKILLS_SCORE,
            exact_fraction: 0.0,
            matched: vec![],
            missing: vec![],
            neutral: true,
            reason: "no skill requirements specified; neutral default".into(),
        };
    }

    let mut matched: Vec<String> = demand.intersection(supply).cloned().collect();
    matched.sort();
    let mut missing: Vec<String> = demand.difference(supply).cloned().collect();
    missing.sort();

    let demand_len = demand.len() as f64;
    let exact_fraction = matched.len() as f64 / demand_len;

    let related_hits = missing
        .iter()
        .filter(|skill| has_related_skill(skill, supply))
        .count();
    let related_credit = related_hits as f64 * RELATED_CREDIT / demand_len;

    let surplus = supply.len().saturating_sub(demand.len());
    let surplus_bonus = (surplus as f64 * SURPLUS_BONUS_PER_SKILL).min(SURPLUS_BONUS_CAP);

    let score = (exact_fraction + related_credit + surplus_bonus).min(1.0);

    let reason = format!(
        "{}/{} required skills matched ({} related, {} surplus)",
        matched.len(),
        demand.len(),
        related_hits,
        surplus
    );

    SkillAlignment {
        score,
        exact_fraction,
        matched,
        missing,
        neutral: false,
        reason,
    }
}
