use serde::{Deserialize, Serialize};

/// Service tier controlling result volume and the minimum surfaced score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Free,
    Professional,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierLimits {
    pub max_results: usize,
    /// Results below this overall score are dropped by the ranker.
    pub min_score: f64,
}

impl Tier {
    /// Static tier-to-limit lookup. Not part of the scoring algorithm; the
    /// ranker honors it when cutting the result list.
    pub fn limits(&self) -> TierLimits {
        match self {
            Tier::Free => TierLimits {
                max_results: 5,
                min_score: 0.5,
            },
            Tier::Professional => TierLimits {
                max_results: 25,
                min_score: 0.4,
            },
            Tier::Enterprise => TierLimits {
                max_results: 100,
                min_score: 0.3,
            },
        }
    }

    /// Pool ceiling: scoring cost is bounded at 3x the tier's result cap.
    pub fn pool_ceiling(&self) -> usize {
        self.limits().max_results * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_grow_with_tier() {
        assert!(Tier::Free.limits().max_results < Tier::Professional.limits().max_results);
        assert!(Tier::Professional.limits().max_results < Tier::Enterprise.limits().max_results);
        assert!(Tier::Enterprise.limits().min_score < Tier::Free.limits().min_score);
    }

    #[test]
    fn pool_ceiling_is_triple_the_result_cap() {
        assert_eq!(Tier::Free.pool_ceiling(), 15);
        assert_eq!(Tier::Enterprise.pool_ceiling(), 300);
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Tier::Free).unwrap(), "\"FREE\"");
    }
}
