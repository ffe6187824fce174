/// Weights for student-to-project discovery matching.
/// Skills dominate; engagement signals do not exist for projects.
pub const PROJECT_DISCOVERY_WEIGHTS: Weights = Weights {
    skills: 0.30,
    industry: 0.20,
    experience: 0.20,
    preferences: 0.15,
    goals: 0.15,
    engagement: 0.0,
};

/// Weights for company candidate search. Behavioral engagement signals carry
/// real weight here; softer preference dimensions are discounted in exchange.
pub const CANDIDATE_SEARCH_WEIGHTS: Weights = Weights {
    skills: 0.30,
    industry: 0.15,
    experience: 0.15,
    preferences: 0.10,
    goals: 0.10,
    engagement: 0.20,
};

#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub skills: f64,
    pub industry: f64,
    pub experience: f64,
    pub preferences: f64,
    pub goals: f64,
    pub engagement: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skills
            + self.industry
            + self.experience
            + self.preferences
            + self.goals
            + self.engagement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!((PROJECT_DISCOVERY_WEIGHTS.sum() - 1.0).abs() < 1e-9);
        assert!((CANDIDATE_SEARCH_WEIGHTS.sum() - 1.0).abs() < 1e-9);
    }

    // Non-negative weights make the total monotone in every sub-score.
    #[test]
    fn weights_are_nonnegative() {
        for weights in [PROJECT_DISCOVERY_WEIGHTS, CANDIDATE_SEARCH_WEIGHTS] {
            for value in [
                weights.skills,
                weights.industry,
                weights.experience,
                weights.preferences,
                weights.goals,
                weights.engagement,
            ] {
                assert!(value >= 0.0);
            }
        }
    }
}
